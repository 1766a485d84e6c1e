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

//! The terrain cull lane.
//!
//! [`TerrainCuller`] is driven by [`traverse`](terra_core::traversal::traverse):
//! it receives a `Tile` event followed by a `Surface` event for every visible
//! tile and turns them into draw commands in the frame's [`TerrainRenderData`].

use super::TerrainRenderData;
use std::sync::Arc;
use terra_core::lane::{Lane, LaneError, LaneKind};
use terra_core::telemetry::CounterSink;
use terra_core::terrain::{RenderContext, SurfaceNode, TileNode};
use terra_core::traversal::{traverse_all, CullTraversal, TerrainNodeRef, TerrainVisitor};

/// Collects per-layer draw commands for one camera during one frame.
///
/// The culler never decides visibility itself; it only sees what the traversal
/// driver hands it. The driver must deliver a tile's `Tile` event before its
/// `Surface` event.
pub struct TerrainCuller<'a, T: CullTraversal> {
    pub(super) context: &'a RenderContext,
    pub(super) traversal: T,
    pub(super) terrain: TerrainRenderData,
    pub(super) orphaned_passes: u64,
    pub(super) orphan_sink: Option<Arc<dyn CounterSink>>,
    current_tile: Option<&'a TileNode>,
    initialized: bool,
}

impl<'a, T: CullTraversal> TerrainCuller<'a, T> {
    /// Creates a culler reading configuration from `context` and matrices from `traversal`.
    ///
    /// [`TerrainCuller::setup`] must run before the first traversal.
    pub fn new(context: &'a RenderContext, traversal: T) -> Self {
        Self {
            context,
            traversal,
            terrain: TerrainRenderData::new(),
            orphaned_passes: 0,
            orphan_sink: None,
            current_tile: None,
            initialized: false,
        }
    }

    /// Mirrors the orphaned-pass counter into `sink`.
    pub fn with_orphan_sink(mut self, sink: Arc<dyn CounterSink>) -> Self {
        self.orphan_sink = Some(sink);
        self
    }

    /// Prepares the culler for a new frame.
    ///
    /// Rebuilds the layer batches from the context's map frame and bindings.
    pub fn setup(&mut self, frame_number: u64) {
        self.terrain.setup(
            self.context.map_frame(),
            self.context.render_bindings(),
            frame_number,
        );
        self.current_tile = None;
        self.initialized = true;
    }

    /// Traverses `roots` and fills the frame's batches.
    pub fn cull(&mut self, roots: &'a [TileNode]) -> Result<(), LaneError> {
        if !self.initialized {
            return Err(LaneError::NotInitialized);
        }
        traverse_all(roots, self);
        log::debug!(
            "Frame {}: {} draw commands, {} orphaned passes so far",
            self.terrain.frame_number(),
            self.terrain.total_commands(),
            self.orphaned_passes
        );
        Ok(())
    }

    /// Number of draws dropped because their layer had no batch.
    ///
    /// Accumulates across frames.
    pub fn orphaned_passes(&self) -> u64 {
        self.orphaned_passes
    }

    /// The batches built so far.
    pub fn render_data(&self) -> &TerrainRenderData {
        &self.terrain
    }

    /// Consumes the culler and returns its batches.
    pub fn into_render_data(self) -> TerrainRenderData {
        self.terrain
    }

    /// The rendering configuration.
    pub fn context(&self) -> &RenderContext {
        self.context
    }

    /// The traversal driver's state.
    pub fn traversal(&self) -> &T {
        &self.traversal
    }

    /// Mutable access to the traversal driver's state, e.g. to move the camera between frames.
    pub fn traversal_mut(&mut self) -> &mut T {
        &mut self.traversal
    }

    fn apply_tile(&mut self, tile: &'a TileNode) {
        self.current_tile = Some(tile);

        let patch_layers = Arc::clone(self.terrain.patch_layers());
        if patch_layers.is_empty() {
            return;
        }

        let Some((handle, pass)) = tile.render_model().default_pass() else {
            log::trace!("Tile {} has no default pass, skipping patch layers", tile.key());
            return;
        };

        let mut pushed = false;
        for layer in patch_layers.iter() {
            if !layer.accepts(tile.key()) {
                continue;
            }
            if !pushed {
                let matrix = tile
                    .surface()
                    .compute_local_to_world(&self.traversal.model_view_matrix());
                self.traversal.push_model_view_matrix(matrix);
                pushed = true;
            }
            if let Some(command) = self.add_draw_command(layer.uid(), handle, pass, tile) {
                command.mark_patch(layer.draw_callback().cloned());
            }
        }

        if pushed {
            self.traversal.pop_model_view_matrix();
        }
    }

    fn apply_surface(&mut self, surface: &'a SurfaceNode) {
        let Some(tile) = self.current_tile else {
            log::warn!("Surface visited outside of a tile, ignoring");
            return;
        };

        let matrix = surface.compute_local_to_world(&self.traversal.model_view_matrix());
        self.traversal.push_model_view_matrix(matrix);

        let model = tile.render_model();
        for (handle, pass) in model.iter() {
            if !pass.renders_as_tile() {
                continue;
            }
            if let Some(uid) = pass.source_uid() {
                self.add_draw_command(uid, handle, pass, tile);
            }
        }

        let tile_layers = Arc::clone(self.terrain.tile_layers());
        if !tile_layers.is_empty() {
            if let Some((handle, pass)) = model.default_pass() {
                for layer in tile_layers.iter() {
                    // Already drawn through the layer's own pass.
                    if model.has_pass_for(layer.uid()) {
                        continue;
                    }
                    self.add_draw_command(layer.uid(), handle, pass, tile);
                }
            }
        }

        self.traversal.pop_model_view_matrix();

        self.terrain.draw_state_mut().expand_by(surface.bound());
    }
}

impl<'a, T: CullTraversal> TerrainVisitor<'a> for TerrainCuller<'a, T> {
    fn apply(&mut self, node: TerrainNodeRef<'a>) {
        match node {
            TerrainNodeRef::Tile(tile) => self.apply_tile(tile),
            TerrainNodeRef::Surface(surface) => self.apply_surface(surface),
        }
    }
}

impl<T: CullTraversal> Lane for TerrainCuller<'_, T> {
    fn strategy_name(&self) -> &'static str {
        "TerrainCull"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Cull
    }

    fn estimate_cost(&self) -> f32 {
        // Roughly one unit per thousand commands from the last frame.
        1.0 + self.terrain.total_commands() as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use terra_core::math::{BoundingSphere, DMat4, DVec3};
    use terra_core::terrain::{
        Layer, LayerKind, LayerUid, MapFrame, MapLayer, RenderBindings, RenderingPass,
        TileGeometry, TileKey, TileRenderModel,
    };
    use terra_core::traversal::CullState;

    fn tile_at(x: f64) -> TileNode {
        let surface = SurfaceNode::new(
            DMat4::from_translation(DVec3::new(x, 0.0, 0.0)),
            BoundingSphere::new(DVec3::ZERO, 1.0),
            Arc::new(TileGeometry::default()),
        );
        TileNode::new(TileKey::new(0, 0, 0), surface)
    }

    fn camera() -> CullState {
        CullState::look_at(DVec3::new(0.0, 0.0, 10.0), DVec3::ZERO, DVec3::Y, 1.0)
    }

    #[test]
    fn test_cull_before_setup_is_an_error() {
        let context = RenderContext::default();
        let roots = vec![tile_at(0.0)];
        let mut culler = TerrainCuller::new(&context, camera());
        assert!(matches!(culler.cull(&roots), Err(LaneError::NotInitialized)));
    }

    #[test]
    fn test_surface_pass_is_batched_with_range() {
        let imagery = Arc::new(Layer::new(LayerUid(1), "imagery", LayerKind::Image));
        let frame = MapFrame::new(vec![MapLayer::Data(imagery.clone())]);
        let context = RenderContext::new(frame, RenderBindings::default(), false);

        let tile = tile_at(0.0)
            .with_render_model(TileRenderModel::new().with_pass(RenderingPass::for_layer(imagery, vec![])));
        let roots = vec![tile];

        let mut culler = TerrainCuller::new(&context, camera());
        culler.setup(1);
        culler.cull(&roots).expect("cull");

        let batch = culler.render_data().layer(LayerUid(1)).expect("batch");
        assert_eq!(batch.len(), 1);
        assert_relative_eq!(batch.tiles()[0].range, 10.0, epsilon = 1e-4);
        assert!(!batch.tiles()[0].draw_patch);
        assert_eq!(culler.traversal().depth(), 0);
    }

    #[test]
    fn test_lane_metadata() {
        let context = RenderContext::default();
        let culler = TerrainCuller::new(&context, camera());
        assert_eq!(culler.strategy_name(), "TerrainCull");
        assert_eq!(culler.lane_kind(), LaneKind::Cull);
        assert_relative_eq!(culler.estimate_cost(), 1.0);
    }
}
