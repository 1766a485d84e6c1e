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

//! # Terra Lanes
//!
//! Hot-path execution pipelines of the terrain renderer.
//!
//! - [`render_lane`]: turns the visible tile hierarchy into per-layer draw batches.
//! - [`label_lane`]: turns vector features into text label primitives.

#![warn(missing_docs)]

pub mod label_lane;
pub mod render_lane;
