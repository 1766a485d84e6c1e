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

//! Registry for managing metrics.

use super::{Metric, MetricId, MetricValue, MetricsError, MetricsResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use terra_core::telemetry::{CounterSink, GaugeSink};

#[derive(Debug)]
enum Cell {
    Counter(AtomicU64),
    // f64 bit pattern
    Gauge(AtomicU64),
}

#[derive(Debug)]
struct Entry {
    description: String,
    cell: Cell,
}

impl Entry {
    fn value(&self) -> MetricValue {
        match &self.cell {
            Cell::Counter(v) => MetricValue::Counter(v.load(Ordering::Relaxed)),
            Cell::Gauge(bits) => MetricValue::Gauge(f64::from_bits(bits.load(Ordering::Relaxed))),
        }
    }
}

/// Central registry for metrics.
///
/// Registration takes a lock; updates through handles are lock-free. Cloning
/// the registry shares the same storage.
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    entries: Arc<RwLock<BTreeMap<MetricId, Arc<Entry>>>>,
}

impl MetricsRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a counter, or return the existing one with the same id.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        let entry = self.get_or_insert(id.clone(), description.into(), || {
            Cell::Counter(AtomicU64::new(0))
        });
        if matches!(entry.cell, Cell::Counter(_)) {
            Ok(CounterHandle { id, entry })
        } else {
            Err(MetricsError::TypeMismatch(id))
        }
    }

    /// Register a gauge, or return the existing one with the same id.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = MetricId::new(namespace, name);
        let entry = self.get_or_insert(id.clone(), description.into(), || {
            Cell::Gauge(AtomicU64::new(0f64.to_bits()))
        });
        if matches!(entry.cell, Cell::Gauge(_)) {
            Ok(GaugeHandle { id, entry })
        } else {
            Err(MetricsError::TypeMismatch(id))
        }
    }

    fn get_or_insert(
        &self,
        id: MetricId,
        description: String,
        make: impl FnOnce() -> Cell,
    ) -> Arc<Entry> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = entries.entry(id).or_insert_with_key(|id| {
            log::trace!("Registering metric {id}");
            Arc::new(Entry {
                description,
                cell: make(),
            })
        });
        entry.clone()
    }

    /// Get a snapshot of a metric by ID.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .get(id)
            .map(|entry| Metric {
                id: id.clone(),
                description: entry.description.clone(),
                value: entry.value(),
            })
            .ok_or_else(|| MetricsError::NotFound(id.clone()))
    }

    /// Snapshot of every metric, ordered by id.
    pub fn snapshot(&self) -> Vec<Metric> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .iter()
            .map(|(id, entry)| Metric {
                id: id.clone(),
                description: entry.description.clone(),
                value: entry.value(),
            })
            .collect()
    }

    /// Logs every metric at info level.
    pub fn log_snapshot(&self) {
        for metric in self.snapshot() {
            match metric.value {
                MetricValue::Counter(v) => log::info!("{} = {v}", metric.id),
                MetricValue::Gauge(v) => log::info!("{} = {v:.3}", metric.id),
            }
        }
    }
}

/// Handle for updating a counter.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    entry: Arc<Entry>,
}

impl CounterHandle {
    /// The counter's id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }

    /// Current value.
    pub fn get(&self) -> u64 {
        self.entry.value().as_counter().unwrap_or(0)
    }
}

impl CounterSink for CounterHandle {
    fn increment_by(&self, delta: u64) {
        if let Cell::Counter(v) = &self.entry.cell {
            v.fetch_add(delta, Ordering::Relaxed);
        }
    }
}

/// Handle for updating a gauge.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    entry: Arc<Entry>,
}

impl GaugeHandle {
    /// The gauge's id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }

    /// Current value.
    pub fn get(&self) -> f64 {
        self.entry.value().as_gauge().unwrap_or(0.0)
    }
}

impl GaugeSink for GaugeHandle {
    fn set(&self, value: f64) {
        if let Cell::Gauge(bits) = &self.entry.cell {
            bits.store(value.to_bits(), Ordering::Relaxed);
        }
    }
}
