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

//! Data layers and their identifiers.

use serde::Deserialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// A stable numeric identifier for a data layer.
///
/// The identifier doubles as the key of the layer's draw batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct LayerUid(pub u32);

impl fmt::Display for LayerUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// What kind of data a layer provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum LayerKind {
    /// Color imagery, sampled through a per-tile rendering pass.
    Image,
    /// Elevation data; feeds the tile's elevation raster and never draws by itself.
    Elevation,
    /// A layer that renders every tile uniformly without per-tile data
    /// (for example a basemap fallback).
    Tile,
    /// A procedural layer drawn through a custom callback.
    Patch,
}

/// How the terrain engine renders a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderType {
    /// Drawn as textured terrain tiles.
    Tile,
    /// Drawn through a patch callback.
    Patch,
    /// Not drawn directly.
    None,
}

impl LayerKind {
    /// Returns how layers of this kind are rendered.
    pub fn render_type(self) -> RenderType {
        match self {
            LayerKind::Image | LayerKind::Tile => RenderType::Tile,
            LayerKind::Patch => RenderType::Patch,
            LayerKind::Elevation => RenderType::None,
        }
    }
}

/// A named source of renderable data spanning many tiles.
#[derive(Debug)]
pub struct Layer {
    uid: LayerUid,
    name: String,
    kind: LayerKind,
    enabled: bool,
    visible: AtomicBool,
}

impl Layer {
    /// Creates an enabled, visible layer.
    pub fn new(uid: LayerUid, name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            uid,
            name: name.into(),
            kind,
            enabled: true,
            visible: AtomicBool::new(true),
        }
    }

    /// Sets the initial visibility.
    pub fn with_visible(self, visible: bool) -> Self {
        self.visible.store(visible, Ordering::Relaxed);
        self
    }

    /// Sets whether the layer takes part in rendering at all.
    ///
    /// Disabled layers get no draw batch.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The layer's stable identifier.
    pub fn uid(&self) -> LayerUid {
        self.uid
    }

    /// The layer's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The layer's data kind.
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Shorthand for `self.kind().render_type()`.
    pub fn render_type(&self) -> RenderType {
        self.kind.render_type()
    }

    /// Returns `true` for imagery layers.
    pub fn is_image(&self) -> bool {
        self.kind == LayerKind::Image
    }

    /// Returns whether the layer takes part in rendering.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the current visibility flag.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    /// Toggles visibility. Takes effect on the next draw command built for this layer.
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Relaxed);
    }
}
