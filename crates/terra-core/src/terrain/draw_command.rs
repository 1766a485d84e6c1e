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

//! Structure representing one tile-layer draw call.

use super::{ElevationTexelCoeff, MorphConstants, PassHandle, PatchDrawCallback, TileGeometry, TileKey};
use crate::math::DMat4;
use glam::Vec4;
use std::fmt;
use std::sync::Arc;

/// A self-contained description of drawing one tile for one layer.
///
/// Produced by the cull pass, consumed by the submission stage. Transforms are
/// copied by value; the geometry is shared; the pass is referenced by a handle
/// into the tile's render model that is valid for the current frame only.
#[derive(Clone)]
pub struct DrawTileCommand {
    /// Handle of the rendering pass within the tile's render model.
    pub pass: PassHandle,
    /// The surface's local-to-parent matrix.
    pub matrix: DMat4,
    /// The model-view matrix active when the command was built.
    pub model_view_matrix: DMat4,
    /// The tile's key.
    pub key: TileKey,
    /// The tile key packed for shaders.
    pub key_value: Vec4,
    /// Shared surface geometry.
    pub geometry: Arc<TileGeometry>,
    /// LOD morph constants.
    pub morph_constants: MorphConstants,
    /// LOD-scaled distance from the view point to the surface bound center.
    pub range: f32,
    /// Elevation sampling correction; identity when the tile has no raster.
    pub elev_texel_coeff: ElevationTexelCoeff,
    /// Set for commands produced for patch layers.
    pub draw_patch: bool,
    /// Custom draw logic of the patch layer, if any.
    pub draw_callback: Option<Arc<dyn PatchDrawCallback>>,
}

impl DrawTileCommand {
    /// Marks this command as a patch draw using `callback`.
    pub fn mark_patch(&mut self, callback: Option<Arc<dyn PatchDrawCallback>>) {
        self.draw_patch = true;
        self.draw_callback = callback;
    }

    /// Runs the patch draw callback, if any. Returns whether one ran.
    pub fn draw_patch_tile(&self) -> bool {
        match &self.draw_callback {
            Some(callback) if self.draw_patch => {
                callback.draw_tile(self);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for DrawTileCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawTileCommand")
            .field("pass", &self.pass)
            .field("key", &self.key)
            .field("range", &self.range)
            .field("elev_texel_coeff", &self.elev_texel_coeff)
            .field("draw_patch", &self.draw_patch)
            .field("has_draw_callback", &self.draw_callback.is_some())
            .finish_non_exhaustive()
    }
}
