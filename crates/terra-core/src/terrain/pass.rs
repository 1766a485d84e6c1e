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

//! Per-tile rendering passes and the tile render model that owns them.

use super::{Layer, LayerUid, RenderType};
use glam::DMat4;
use std::sync::Arc;

/// Which layer a rendering pass samples for.
///
/// The default pass holds layer-agnostic samplers and is what patch layers and
/// global tile layers draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassSource {
    /// The layer-agnostic pass.
    Default,
    /// The pass for one specific data layer.
    Layer(LayerUid),
}

/// Opaque identifier of a GPU texture, owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// One sampler binding of a pass: the texture and the matrix mapping tile
/// texture coordinates into it (identity for the tile's own data, a
/// scale/bias when borrowing an ancestor's texture).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampler {
    /// Bound texture, if the tile has one for this unit.
    pub texture: Option<TextureId>,
    /// Texture coordinate transform.
    pub matrix: DMat4,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            texture: None,
            matrix: DMat4::IDENTITY,
        }
    }
}

/// The sampler state used to draw one tile for one layer.
#[derive(Debug, Clone)]
pub struct RenderingPass {
    source: PassSource,
    layer: Option<Arc<Layer>>,
    /// Samplers indexed by binding unit.
    pub samplers: Vec<Sampler>,
}

impl RenderingPass {
    /// Creates the layer-agnostic pass.
    pub fn default_pass(samplers: Vec<Sampler>) -> Self {
        Self {
            source: PassSource::Default,
            layer: None,
            samplers,
        }
    }

    /// Creates the pass for `layer`.
    pub fn for_layer(layer: Arc<Layer>, samplers: Vec<Sampler>) -> Self {
        Self {
            source: PassSource::Layer(layer.uid()),
            layer: Some(layer),
            samplers,
        }
    }

    /// Which layer this pass belongs to.
    pub fn source(&self) -> PassSource {
        self.source
    }

    /// The layer uid, or `None` for the default pass.
    pub fn source_uid(&self) -> Option<LayerUid> {
        match self.source {
            PassSource::Default => None,
            PassSource::Layer(uid) => Some(uid),
        }
    }

    /// The layer this pass samples, if any.
    pub fn layer(&self) -> Option<&Arc<Layer>> {
        self.layer.as_ref()
    }

    /// Returns `true` when the pass belongs to an image layer that is currently hidden.
    pub fn is_hidden_image(&self) -> bool {
        self.layer
            .as_ref()
            .is_some_and(|layer| layer.is_image() && !layer.is_visible())
    }

    /// Returns `true` when the pass's layer is drawn as textured tiles.
    pub fn renders_as_tile(&self) -> bool {
        self.layer
            .as_ref()
            .is_some_and(|layer| layer.render_type() == RenderType::Tile)
    }
}

/// A non-owning handle to a pass inside a [`TileRenderModel`].
///
/// Handles are only meaningful together with the tile they were taken from, and
/// only until that tile's render model is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassHandle(pub u32);

/// The ordered rendering passes of one tile.
///
/// Holds at most one pass per [`PassSource`].
#[derive(Debug, Clone, Default)]
pub struct TileRenderModel {
    passes: Vec<RenderingPass>,
}

impl TileRenderModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `pass`, replacing any existing pass with the same source.
    pub fn add_pass(&mut self, pass: RenderingPass) -> PassHandle {
        if let Some(index) = self.passes.iter().position(|p| p.source == pass.source) {
            self.passes[index] = pass;
            return PassHandle(index as u32);
        }
        self.passes.push(pass);
        PassHandle((self.passes.len() - 1) as u32)
    }

    /// Builder-style variant of [`add_pass`](Self::add_pass).
    pub fn with_pass(mut self, pass: RenderingPass) -> Self {
        self.add_pass(pass);
        self
    }

    /// Resolves a handle taken from this model.
    pub fn pass(&self, handle: PassHandle) -> Option<&RenderingPass> {
        self.passes.get(handle.0 as usize)
    }

    /// Finds the pass for `source`.
    pub fn find(&self, source: PassSource) -> Option<(PassHandle, &RenderingPass)> {
        self.iter().find(|(_, pass)| pass.source == source)
    }

    /// Finds the layer-agnostic pass.
    pub fn default_pass(&self) -> Option<(PassHandle, &RenderingPass)> {
        self.find(PassSource::Default)
    }

    /// Returns `true` if a pass exists for `uid`.
    pub fn has_pass_for(&self, uid: LayerUid) -> bool {
        self.find(PassSource::Layer(uid)).is_some()
    }

    /// Iterates over passes in order, with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (PassHandle, &RenderingPass)> {
        self.passes
            .iter()
            .enumerate()
            .map(|(i, pass)| (PassHandle(i as u32), pass))
    }

    /// Number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Returns `true` if the model holds no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}
