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

//! The terrain data model consumed by the cull pass.
//!
//! Tiles, their surfaces and render models are created by the paging system
//! and are read-only while a frame is being culled. Layers are shared between
//! tiles and frames; their visibility may be toggled between frames.

mod context;
mod draw_command;
mod layer;
mod pass;
mod patch;
mod raster;
mod tile;
mod tile_key;

pub use context::*;
pub use draw_command::*;
pub use layer::*;
pub use pass::*;
pub use patch::*;
pub use raster::*;
pub use tile::*;
pub use tile_key::*;
