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

//! The per-frame output of the cull lane.
//!
//! `TerrainRenderData` is rebuilt every frame from the map's layer stack. It is
//! the only thing the submission stage reads: one [`LayerDrawable`] per active
//! layer, the layers that need special handling, and the frame's bounds.

use super::LayerDrawable;
use ahash::AHashMap;
use std::sync::Arc;
use terra_core::math::{Aabb, BoundingSphere};
use terra_core::terrain::{
    Layer, LayerUid, MapFrame, MapLayer, PatchLayer, RenderBindings, RenderType,
};

/// Bounding volumes of everything drawn this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawState {
    /// Union of all visited surface bounds.
    pub bounding_sphere: BoundingSphere,
    /// Box enclosing [`DrawState::bounding_sphere`].
    pub bounding_box: Aabb,
}

impl DrawState {
    /// Grows both volumes to enclose `bound`.
    pub fn expand_by(&mut self, bound: &BoundingSphere) {
        self.bounding_sphere.expand_by(bound);
        let sphere = self.bounding_sphere;
        self.bounding_box.expand_by_sphere(&sphere);
    }

    /// Returns both volumes to the empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Layer batches and frame-wide state for one frame.
#[derive(Debug, Clone)]
pub struct TerrainRenderData {
    layers: Vec<LayerDrawable>,
    index: AHashMap<LayerUid, usize>,
    patch_layers: Arc<[Arc<PatchLayer>]>,
    tile_layers: Arc<[Arc<Layer>]>,
    bindings: Arc<RenderBindings>,
    draw_state: DrawState,
    frame_number: u64,
}

impl Default for TerrainRenderData {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            index: AHashMap::new(),
            patch_layers: Arc::from(Vec::new()),
            tile_layers: Arc::from(Vec::new()),
            bindings: Arc::default(),
            draw_state: DrawState::default(),
            frame_number: 0,
        }
    }
}

impl TerrainRenderData {
    /// Creates empty render data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the layer batches from `frame` and snapshots `bindings`.
    ///
    /// Only enabled data layers drawn as tiles and patch layers get a batch;
    /// draws for any other layer count as orphaned.
    /// Command buffers of layers that survive from the previous frame are reused.
    pub fn setup(&mut self, frame: &MapFrame, bindings: &Arc<RenderBindings>, frame_number: u64) {
        let mut spare: AHashMap<LayerUid, Vec<_>> = self
            .layers
            .drain(..)
            .map(|drawable| (drawable.uid(), drawable.into_buffer()))
            .collect();

        self.index.clear();
        let mut patch_layers = Vec::new();
        let mut tile_layers = Vec::new();

        for (order, layer) in frame.layers().iter().enumerate() {
            match layer {
                MapLayer::Data(data) => {
                    if !data.is_enabled() || data.render_type() != RenderType::Tile {
                        continue;
                    }
                    if !data.is_image() {
                        tile_layers.push(Arc::clone(data));
                    }
                }
                MapLayer::Patch(patch) => patch_layers.push(Arc::clone(patch)),
            }

            let uid = layer.uid();
            let buffer = spare.remove(&uid).unwrap_or_default();
            self.index.insert(uid, self.layers.len());
            self.layers
                .push(LayerDrawable::with_buffer(order, layer.clone(), buffer));
        }

        self.patch_layers = Arc::from(patch_layers);
        self.tile_layers = Arc::from(tile_layers);
        self.bindings = Arc::clone(bindings);
        self.draw_state.reset();
        self.frame_number = frame_number;

        log::debug!(
            "Terrain render data set up for frame {}: {} layers ({} patch, {} global tile)",
            frame_number,
            self.layers.len(),
            self.patch_layers.len(),
            self.tile_layers.len()
        );
    }

    /// All batches, in map draw order.
    pub fn layers(&self) -> &[LayerDrawable] {
        &self.layers
    }

    /// The batch for `uid`, if the layer is active.
    pub fn layer(&self, uid: LayerUid) -> Option<&LayerDrawable> {
        self.index.get(&uid).map(|&i| &self.layers[i])
    }

    /// Mutable access to the batch for `uid`.
    pub fn layer_mut(&mut self, uid: LayerUid) -> Option<&mut LayerDrawable> {
        match self.index.get(&uid) {
            Some(&i) => self.layers.get_mut(i),
            None => None,
        }
    }

    /// Active patch layers, in draw order.
    pub fn patch_layers(&self) -> &Arc<[Arc<PatchLayer>]> {
        &self.patch_layers
    }

    /// Active layers drawn once per tile as a whole, excluding image layers.
    pub fn tile_layers(&self) -> &Arc<[Arc<Layer>]> {
        &self.tile_layers
    }

    /// The sampler bindings this frame was set up with.
    pub fn bindings(&self) -> &Arc<RenderBindings> {
        &self.bindings
    }

    /// The frame's bounding volumes.
    pub fn draw_state(&self) -> &DrawState {
        &self.draw_state
    }

    /// Mutable access to the frame's bounding volumes.
    pub fn draw_state_mut(&mut self) -> &mut DrawState {
        &mut self.draw_state
    }

    /// The frame these batches belong to.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Total number of commands across all batches.
    pub fn total_commands(&self) -> usize {
        self.layers.iter().map(LayerDrawable::len).sum()
    }

    /// Drops every command and the frame bounds, keeping the layer layout.
    pub fn clear(&mut self) {
        self.layers.iter_mut().for_each(LayerDrawable::clear);
        self.draw_state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_core::math::DVec3;
    use terra_core::terrain::{LayerKind, SamplerBinding, SamplerUsage};

    fn frame() -> MapFrame {
        MapFrame::new(vec![
            MapLayer::Data(Arc::new(Layer::new(LayerUid(1), "imagery", LayerKind::Image))),
            MapLayer::Data(Arc::new(Layer::new(LayerUid(2), "roads", LayerKind::Tile))),
            MapLayer::Patch(Arc::new(PatchLayer::new(LayerUid(3), "grass"))),
            MapLayer::Data(Arc::new(
                Layer::new(LayerUid(4), "disabled", LayerKind::Tile).with_enabled(false),
            )),
            MapLayer::Data(Arc::new(Layer::new(LayerUid(5), "dem", LayerKind::Elevation))),
        ])
    }

    #[test]
    fn test_setup_creates_one_batch_per_enabled_layer() {
        let mut data = TerrainRenderData::new();
        data.setup(&frame(), &Arc::default(), 7);

        assert_eq!(data.layers().len(), 3);
        assert!(data.layer(LayerUid(1)).is_some());
        assert!(data.layer(LayerUid(4)).is_none());
        assert!(data.layer(LayerUid(5)).is_none());
        assert_eq!(data.layer(LayerUid(3)).map(LayerDrawable::order), Some(2));
        assert_eq!(data.frame_number(), 7);
    }

    #[test]
    fn test_setup_snapshots_bindings() {
        let bindings = Arc::new(RenderBindings::new(vec![SamplerBinding {
            name: "terra_color".into(),
            usage: SamplerUsage::Color,
            unit: 0,
        }]));
        let mut data = TerrainRenderData::new();
        data.setup(&frame(), &bindings, 0);

        assert!(Arc::ptr_eq(data.bindings(), &bindings));
        assert_eq!(data.bindings().get(SamplerUsage::Color).map(|b| b.unit), Some(0));
    }

    #[test]
    fn test_setup_classifies_patch_and_tile_layers() {
        let mut data = TerrainRenderData::new();
        data.setup(&frame(), &Arc::default(), 0);

        assert_eq!(data.patch_layers().len(), 1);
        assert_eq!(data.patch_layers()[0].uid(), LayerUid(3));
        // Image layers render as tiles but are drawn through their own passes.
        assert_eq!(data.tile_layers().len(), 1);
        assert_eq!(data.tile_layers()[0].uid(), LayerUid(2));
    }

    #[test]
    fn test_setup_resets_draw_state() {
        let mut data = TerrainRenderData::new();
        data.setup(&frame(), &Arc::default(), 0);
        data.draw_state_mut()
            .expand_by(&BoundingSphere::new(DVec3::ZERO, 5.0));
        assert!(data.draw_state().bounding_sphere.is_valid());

        data.setup(&frame(), &Arc::default(), 1);
        assert!(!data.draw_state().bounding_sphere.is_valid());
        assert!(!data.draw_state().bounding_box.is_valid());
    }

    #[test]
    fn test_draw_state_box_encloses_sphere() {
        let mut state = DrawState::default();
        state.expand_by(&BoundingSphere::new(DVec3::new(1.0, 2.0, 3.0), 2.0));
        state.expand_by(&BoundingSphere::new(DVec3::new(-4.0, 0.0, 0.0), 1.0));

        let sphere = state.bounding_sphere;
        let corner = sphere.center + DVec3::splat(sphere.radius);
        assert!(state.bounding_box.contains_point(corner - DVec3::splat(1e-9)));
        assert!(state.bounding_box.contains_point(sphere.center - DVec3::X * sphere.radius));
    }
}
