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

//! Patch layers: procedural layers drawn through a custom callback.

use super::{DrawTileCommand, LayerUid, TileKey};
use std::fmt;
use std::sync::Arc;

/// Decides whether a patch layer applies to a given tile.
pub trait AcceptCallback: Send + Sync {
    /// Returns `true` to draw the layer on the tile at `key`.
    fn accept(&self, key: &TileKey) -> bool;
}

impl<F> AcceptCallback for F
where
    F: Fn(&TileKey) -> bool + Send + Sync,
{
    fn accept(&self, key: &TileKey) -> bool {
        self(key)
    }
}

/// Custom drawing logic attached to patch draw commands.
///
/// Invoked by the submission stage, never by the cull pass.
pub trait PatchDrawCallback: Send + Sync {
    /// Draws one tile.
    fn draw_tile(&self, command: &DrawTileCommand);
}

/// A layer rendered by procedural logic instead of standard textured tiles.
pub struct PatchLayer {
    uid: LayerUid,
    name: String,
    accept: Option<Arc<dyn AcceptCallback>>,
    draw_callback: Option<Arc<dyn PatchDrawCallback>>,
}

impl PatchLayer {
    /// Creates a patch layer that accepts every tile and has no draw callback.
    pub fn new(uid: LayerUid, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            accept: None,
            draw_callback: None,
        }
    }

    /// Restricts the layer to tiles accepted by `callback`.
    pub fn with_accept_callback(mut self, callback: impl AcceptCallback + 'static) -> Self {
        self.accept = Some(Arc::new(callback));
        self
    }

    /// Attaches the callback that draws the layer's tiles.
    pub fn with_draw_callback(mut self, callback: Arc<dyn PatchDrawCallback>) -> Self {
        self.draw_callback = Some(callback);
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

    /// Consults the accept callback. Layers without one accept everything.
    pub fn accepts(&self, key: &TileKey) -> bool {
        self.accept.as_ref().map_or(true, |cb| cb.accept(key))
    }

    /// The draw callback, if any.
    pub fn draw_callback(&self) -> Option<&Arc<dyn PatchDrawCallback>> {
        self.draw_callback.as_ref()
    }
}

impl fmt::Debug for PatchLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchLayer")
            .field("uid", &self.uid)
            .field("name", &self.name)
            .field("has_accept", &self.accept.is_some())
            .field("has_draw_callback", &self.draw_callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_without_callback() {
        let layer = PatchLayer::new(LayerUid(7), "grass");
        assert!(layer.accepts(&TileKey::new(0, 0, 0)));
        assert!(layer.draw_callback().is_none());
    }

    #[test]
    fn test_accept_callback_filters_by_lod() {
        let layer = PatchLayer::new(LayerUid(7), "grass").with_accept_callback(|key: &TileKey| key.lod >= 14);
        assert!(!layer.accepts(&TileKey::new(13, 0, 0)));
        assert!(layer.accepts(&TileKey::new(14, 0, 0)));
    }
}
