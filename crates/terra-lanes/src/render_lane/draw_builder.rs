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

//! Builds one draw command from a tile and a rendering pass.

use super::TerrainCuller;
use terra_core::math::DVec3;
use terra_core::terrain::{
    DrawTileCommand, ElevationTexelCoeff, LayerUid, PassHandle, RenderingPass, TileNode,
};
use terra_core::traversal::CullTraversal;

impl<'a, T: CullTraversal> TerrainCuller<'a, T> {
    /// Distance from `position`, in the current model-view frame, to the local view point.
    ///
    /// With `with_lod_scale` the distance is multiplied by the traversal's LOD scale.
    pub fn distance_to_view_point(&self, position: DVec3, with_lod_scale: bool) -> f32 {
        let distance = (position - self.traversal.view_point_local()).length() as f32;
        if with_lod_scale {
            distance * self.traversal.lod_scale()
        } else {
            distance
        }
    }

    /// Appends a draw command for `tile` to the batch of layer `uid`.
    ///
    /// `pass` must be the pass `handle` refers to in the tile's render model.
    /// Returns the stored command so the caller can complete it, or `None` when
    /// the pass belongs to a hidden image layer or no batch exists for `uid`.
    /// The latter increments the orphaned-pass counter.
    pub fn add_draw_command(
        &mut self,
        uid: LayerUid,
        handle: PassHandle,
        pass: &RenderingPass,
        tile: &TileNode,
    ) -> Option<&mut DrawTileCommand> {
        if pass.is_hidden_image() {
            log::trace!("Skipping hidden image {} on tile {}", uid, tile.key());
            return None;
        }

        if self.terrain.layer(uid).is_none() {
            self.orphaned_passes += 1;
            if let Some(sink) = &self.orphan_sink {
                sink.increment();
            }
            log::debug!("No draw batch for {} (tile {}), pass orphaned", uid, tile.key());
            return None;
        }

        let surface = tile.surface();
        // Bound center in the surface's local frame, where the view point is expressed.
        let center = surface
            .inverse_matrix()
            .transform_point3(surface.bound().center);
        let range = self.distance_to_view_point(center, true);

        let elev_texel_coeff = match tile.elevation_raster() {
            Some(raster) => ElevationTexelCoeff::for_raster(raster, self.context.use_texture_border()),
            None => ElevationTexelCoeff::IDENTITY,
        };

        let key = *tile.key();
        let command = DrawTileCommand {
            pass: handle,
            matrix: *surface.matrix(),
            model_view_matrix: self.traversal.model_view_matrix(),
            key,
            key_value: key.key_value(),
            geometry: surface.geometry().clone(),
            morph_constants: tile.morph_constants(),
            range,
            elev_texel_coeff,
            draw_patch: false,
            draw_callback: None,
        };

        self.terrain.layer_mut(uid).map(|drawable| drawable.push(command))
    }
}
