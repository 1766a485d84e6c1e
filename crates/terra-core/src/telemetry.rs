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

//! Abstract sinks for diagnostics produced on the hot path.
//!
//! Lanes report through these traits so they do not depend on a concrete
//! telemetry backend.

/// A monotonically increasing counter.
pub trait CounterSink: Send + Sync {
    /// Adds `delta` to the counter.
    fn increment_by(&self, delta: u64);

    /// Adds one to the counter.
    fn increment(&self) {
        self.increment_by(1);
    }
}

/// A value that can go up or down.
pub trait GaugeSink: Send + Sync {
    /// Replaces the current value.
    fn set(&self, value: f64);
}
