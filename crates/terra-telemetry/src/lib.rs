// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Terra Telemetry
//!
//! Logging bootstrap and an in-memory metrics registry. Lanes report through
//! the sink traits of `terra_core::telemetry`; handles from this crate
//! implement them.

#![warn(missing_docs)]

pub mod metrics;

pub use metrics::registry::{CounterHandle, GaugeHandle, MetricsRegistry};
pub use metrics::{Metric, MetricId, MetricValue, MetricsError, MetricsResult};

/// Installs the process-wide `env_logger`, honouring `RUST_LOG` and falling
/// back to `default_filter`.
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init_logging(default_filter: &str) {
    use env_logger::{Builder, Env};

    let result = Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
