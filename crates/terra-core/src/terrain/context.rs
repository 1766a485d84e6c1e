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

//! The per-frame render context: active layers, sampler bindings and
//! engine-wide texture conventions.
//!
//! A `RenderContext` is read-only during a cull pass and may be shared by the
//! cull passes of several cameras.

use super::{ElevationTexelCoeff, Layer, LayerUid, PatchLayer};
use crate::config::{ConfigError, TerrainConfig};
use serde::Deserialize;
use std::sync::Arc;

/// What a sampler binding carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SamplerUsage {
    /// Color of the layer being drawn.
    Color,
    /// Parent tile's color, for LOD blending.
    ColorParent,
    /// Elevation raster.
    Elevation,
    /// Normal map.
    Normal,
    /// Land-cover coverage.
    Coverage,
    /// A texture shared by every pass.
    Shared,
}

/// A named sampler slot bound to a texture unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerBinding {
    /// Uniform name in the terrain shaders.
    pub name: String,
    /// What the slot carries.
    pub usage: SamplerUsage,
    /// Texture unit.
    pub unit: u32,
}

/// The ordered sampler bindings of the terrain shaders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderBindings {
    bindings: Vec<SamplerBinding>,
}

impl RenderBindings {
    /// Creates a binding set.
    pub fn new(bindings: Vec<SamplerBinding>) -> Self {
        Self { bindings }
    }

    /// Finds the first binding with `usage`.
    pub fn get(&self, usage: SamplerUsage) -> Option<&SamplerBinding> {
        self.bindings.iter().find(|b| b.usage == usage)
    }

    /// All bindings, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SamplerBinding> {
        self.bindings.iter()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// One entry of the map's layer stack.
#[derive(Debug, Clone)]
pub enum MapLayer {
    /// A data layer (image, elevation or global tile layer).
    Data(Arc<Layer>),
    /// A procedural patch layer.
    Patch(Arc<PatchLayer>),
}

impl MapLayer {
    /// The layer's identifier.
    pub fn uid(&self) -> LayerUid {
        match self {
            MapLayer::Data(layer) => layer.uid(),
            MapLayer::Patch(layer) => layer.uid(),
        }
    }

    /// The layer's display name.
    pub fn name(&self) -> &str {
        match self {
            MapLayer::Data(layer) => layer.name(),
            MapLayer::Patch(layer) => layer.name(),
        }
    }
}

/// A snapshot of the map's layer stack, in draw order.
#[derive(Debug, Clone, Default)]
pub struct MapFrame {
    layers: Vec<MapLayer>,
}

impl MapFrame {
    /// Creates a frame from an ordered layer stack.
    pub fn new(layers: Vec<MapLayer>) -> Self {
        Self { layers }
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    /// Finds a data layer by uid.
    pub fn data_layer(&self, uid: LayerUid) -> Option<&Arc<Layer>> {
        self.layers.iter().find_map(|l| match l {
            MapLayer::Data(layer) if layer.uid() == uid => Some(layer),
            _ => None,
        })
    }

    /// Returns `true` if any layer uses `uid`.
    pub fn contains(&self, uid: LayerUid) -> bool {
        self.layers.iter().any(|l| l.uid() == uid)
    }
}

/// Process-wide, per-frame terrain rendering configuration.
#[derive(Debug, Clone)]
pub struct RenderContext {
    map_frame: MapFrame,
    bindings: Arc<RenderBindings>,
    use_texture_border: bool,
    lod_scale: f32,
}

impl RenderContext {
    /// Creates a context.
    pub fn new(map_frame: MapFrame, bindings: RenderBindings, use_texture_border: bool) -> Self {
        Self {
            map_frame,
            bindings: Arc::new(bindings),
            use_texture_border,
            lod_scale: 1.0,
        }
    }

    /// Builds a context from a validated configuration.
    ///
    /// Patch layers carry callbacks and are attached afterwards with
    /// [`add_patch_layer`](Self::add_patch_layer).
    pub fn from_config(config: &TerrainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let layers = config
            .layers
            .iter()
            .map(|cfg| MapLayer::Data(Arc::new(cfg.to_layer())))
            .collect();
        let bindings = config
            .bindings
            .iter()
            .map(|cfg| SamplerBinding {
                name: cfg.name.clone(),
                usage: cfg.usage,
                unit: cfg.unit,
            })
            .collect();

        log::debug!(
            "Render context built from config: {} layers, {} bindings, texture border {}",
            config.layers.len(),
            config.bindings.len(),
            config.use_texture_border
        );

        Ok(Self {
            map_frame: MapFrame::new(layers),
            bindings: Arc::new(RenderBindings::new(bindings)),
            use_texture_border: config.use_texture_border,
            lod_scale: config.lod_scale,
        })
    }

    /// Appends a data layer to the layer stack.
    pub fn add_layer(&mut self, layer: Arc<Layer>) -> Result<(), ConfigError> {
        self.push_unique(MapLayer::Data(layer))
    }

    /// Appends a patch layer to the layer stack.
    pub fn add_patch_layer(&mut self, layer: Arc<PatchLayer>) -> Result<(), ConfigError> {
        self.push_unique(MapLayer::Patch(layer))
    }

    fn push_unique(&mut self, layer: MapLayer) -> Result<(), ConfigError> {
        let uid = layer.uid();
        if self.map_frame.contains(uid) {
            return Err(ConfigError::DuplicateLayerUid(uid.0));
        }
        self.map_frame.layers.push(layer);
        Ok(())
    }

    /// The current layer stack.
    pub fn map_frame(&self) -> &MapFrame {
        &self.map_frame
    }

    /// The sampler bindings, shared with every frame that snapshots them.
    pub fn render_bindings(&self) -> &Arc<RenderBindings> {
        &self.bindings
    }

    /// Whether elevation textures carry a one-texel guard border.
    pub fn use_texture_border(&self) -> bool {
        self.use_texture_border
    }

    /// Texel offset used for elevation sampling under this context's border convention.
    pub fn elevation_texel_bias(&self) -> f32 {
        ElevationTexelCoeff::texel_bias(self.use_texture_border)
    }

    /// Default LOD scale for cull passes driven from this context.
    pub fn lod_scale(&self) -> f32 {
        self.lod_scale
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(MapFrame::default(), RenderBindings::default(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::LayerKind;

    #[test]
    fn test_duplicate_uids_rejected() {
        let mut ctx = RenderContext::default();
        ctx.add_layer(Arc::new(Layer::new(LayerUid(1), "a", LayerKind::Image)))
            .unwrap();
        let err = ctx
            .add_patch_layer(Arc::new(PatchLayer::new(LayerUid(1), "p")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLayerUid(1)));
        assert_eq!(ctx.map_frame().layers().len(), 1);
    }

    #[test]
    fn test_texel_bias_follows_border_convention() {
        let ctx = RenderContext::new(MapFrame::default(), RenderBindings::default(), true);
        assert_eq!(ctx.elevation_texel_bias(), 1.5);
        let ctx = RenderContext::new(MapFrame::default(), RenderBindings::default(), false);
        assert_eq!(ctx.elevation_texel_bias(), 0.5);
    }

    #[test]
    fn test_binding_lookup() {
        let bindings = RenderBindings::new(vec![
            SamplerBinding {
                name: "terra_tex".into(),
                usage: SamplerUsage::Color,
                unit: 0,
            },
            SamplerBinding {
                name: "terra_elev".into(),
                usage: SamplerUsage::Elevation,
                unit: 2,
            },
        ]);
        assert_eq!(bindings.get(SamplerUsage::Elevation).map(|b| b.unit), Some(2));
        assert!(bindings.get(SamplerUsage::Normal).is_none());
    }
}
