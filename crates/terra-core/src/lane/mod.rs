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

//! # Lane Abstraction
//!
//! The base trait shared by every processing lane in the terrain pipeline.
//!
//! A **Lane** is a reusable processing strategy for one stage of a frame: the
//! terrain cull lane turns visible tiles into per-layer draw batches, the label
//! lane turns vector features into text primitives. Lanes expose identity and a
//! cost estimate so a scheduler can reason about them generically, while their
//! domain-specific entry points stay strongly typed.

use std::fmt;

/// Error type for lane operations.
///
/// The hot paths never produce these: per-draw degradation is counted and
/// skipped. They are reserved for misuse of a lane as a whole.
#[derive(Debug, thiserror::Error)]
pub enum LaneError {
    /// The lane was driven before its per-frame `setup` ran.
    #[error("Lane not initialized")]
    NotInitialized,
}

/// Classification of lane types, used for routing and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Per-frame visibility culling and draw batching.
    Cull,
    /// Vector feature to label conversion.
    Label,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKind::Cull => write!(f, "Cull"),
            LaneKind::Label => write!(f, "Label"),
        }
    }
}

/// Base trait for all lane types.
pub trait Lane {
    /// Human-readable name identifying this lane's strategy.
    ///
    /// Used for logging and debugging. Should be unique within a lane kind.
    fn strategy_name(&self) -> &'static str;

    /// The kind of processing this lane performs.
    fn lane_kind(&self) -> LaneKind;

    /// Estimated computational cost of running this lane for the work it holds.
    ///
    /// Default returns `1.0` (medium cost).
    fn estimate_cost(&self) -> f32 {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_kind_display() {
        assert_eq!(LaneKind::Cull.to_string(), "Cull");
        assert_eq!(LaneKind::Label.to_string(), "Label");
    }

    #[test]
    fn test_lane_error_display() {
        use std::error::Error;

        assert_eq!(LaneError::NotInitialized.to_string(), "Lane not initialized");
        assert!(LaneError::NotInitialized.source().is_none());
    }
}
