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

//! Quadtree tile addressing.

use glam::Vec4;
use std::fmt;

/// Address of a tile in the terrain quadtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Level of detail; 0 is the root.
    pub lod: u32,
    /// Column within the level.
    pub x: u32,
    /// Row within the level.
    pub y: u32,
}

impl TileKey {
    /// Creates a key.
    pub const fn new(lod: u32, x: u32, y: u32) -> Self {
        Self { lod, x, y }
    }

    /// Returns the key of child `quadrant` (0..4, row-major) one level down.
    pub fn child(&self, quadrant: u32) -> Self {
        Self {
            lod: self.lod + 1,
            x: self.x * 2 + (quadrant & 1),
            y: self.y * 2 + ((quadrant >> 1) & 1),
        }
    }

    /// Returns the parent key, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        (self.lod > 0).then(|| Self {
            lod: self.lod - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }

    /// Packs the key into the vector handed to shaders.
    ///
    /// Tile coordinates are wrapped to 16 bits so they survive the trip through `f32`.
    pub fn key_value(&self) -> Vec4 {
        Vec4::new(
            (self.x & 0xFFFF) as f32,
            (self.y & 0xFFFF) as f32,
            self.lod as f32,
            -1.0,
        )
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.lod, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_parent_round_trip() {
        let key = TileKey::new(3, 5, 2);
        for q in 0..4 {
            assert_eq!(key.child(q).parent(), Some(key));
        }
        assert_eq!(TileKey::new(0, 0, 0).parent(), None);
        assert_eq!(key.child(3), TileKey::new(4, 11, 5));
    }

    #[test]
    fn test_key_value_wraps() {
        let key = TileKey::new(18, 0x1_0002, 7);
        assert_eq!(key.key_value(), Vec4::new(2.0, 7.0, 18.0, -1.0));
        assert_eq!(key.to_string(), "18/65538/7");
    }
}
