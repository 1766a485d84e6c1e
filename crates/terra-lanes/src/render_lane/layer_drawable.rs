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

//! Per-layer batches of draw commands.

use terra_core::terrain::{DrawTileCommand, LayerUid, MapLayer};

/// All draw commands collected for one layer during a frame.
///
/// Commands are kept in traversal order; the submission stage relies on it.
#[derive(Debug, Clone)]
pub struct LayerDrawable {
    order: usize,
    layer: MapLayer,
    tiles: Vec<DrawTileCommand>,
}

impl LayerDrawable {
    /// Creates an empty batch for `layer` at position `order` in the layer stack.
    pub fn new(order: usize, layer: MapLayer) -> Self {
        Self::with_buffer(order, layer, Vec::new())
    }

    /// Creates an empty batch reusing the allocation of `buffer`.
    pub(crate) fn with_buffer(order: usize, layer: MapLayer, mut buffer: Vec<DrawTileCommand>) -> Self {
        buffer.clear();
        Self {
            order,
            layer,
            tiles: buffer,
        }
    }

    /// The layer's identifier.
    pub fn uid(&self) -> LayerUid {
        self.layer.uid()
    }

    /// Position of the layer in the map's draw order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The layer this batch draws.
    pub fn layer(&self) -> &MapLayer {
        &self.layer
    }

    /// The frame's commands, in the order they were appended.
    pub fn tiles(&self) -> &[DrawTileCommand] {
        &self.tiles
    }

    /// Number of commands in the batch.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns `true` if nothing was appended this frame.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Appends `command` and returns the stored copy for in-place completion.
    pub fn push(&mut self, command: DrawTileCommand) -> &mut DrawTileCommand {
        let index = self.tiles.len();
        self.tiles.push(command);
        &mut self.tiles[index]
    }

    /// Drops all commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub(crate) fn into_buffer(self) -> Vec<DrawTileCommand> {
        self.tiles
    }
}
