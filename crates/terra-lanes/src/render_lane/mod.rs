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

//! Rendering lane - per-frame terrain culling and draw batching.
//!
//! The [`TerrainCuller`] reacts to the traversal driver's node events and fills a
//! [`TerrainRenderData`]: one [`LayerDrawable`] per active layer, each holding
//! the frame's [`DrawTileCommand`](terra_core::terrain::DrawTileCommand)s in
//! visitation order, plus the frame's bounding volume.

mod draw_builder;
mod layer_drawable;
mod terrain_cull_lane;
mod terrain_render_data;

pub use layer_drawable::*;
pub use terrain_cull_lane::*;
pub use terrain_render_data::*;
