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

//! Text label primitives produced by the label lane.

use terra_core::feature::{Color, SizeMode};
use terra_core::math::{Aabb, DQuat, DVec3};

/// Font used when a symbol names none.
pub const DEFAULT_FONT: &str = "fonts/arial.ttf";

/// Character size used when a symbol sets none.
pub const DEFAULT_CHARACTER_SIZE: f32 = 32.0;

/// Render bin for labels; drawn after everything else.
pub const LABEL_RENDER_BIN: i32 = 99_999;

/// Anchor of the text relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    /// Centered both ways.
    #[default]
    CenterCenter,
}

/// Decoration drawn behind the glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backdrop {
    /// Plain glyphs.
    #[default]
    None,
    /// A halo around every glyph.
    Outline,
}

/// Hides a label that is on the far side of the globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CullPlane {
    /// Unit normal of the plane through the origin.
    pub normal: DVec3,
}

impl CullPlane {
    /// Creates a plane facing `direction`. Returns `None` for a zero vector.
    pub fn new(direction: DVec3) -> Option<Self> {
        direction.try_normalize().map(|normal| Self { normal })
    }

    /// Returns `true` when a viewer at `eye` must not see the label.
    pub fn culls(&self, eye: DVec3) -> bool {
        eye.dot(self.normal) <= 0.0
    }
}

/// One text primitive ready for the text renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    /// The resolved text.
    pub text: String,
    /// Font file.
    pub font: String,
    /// Anchor position in the features' local frame.
    pub position: DVec3,
    /// Orientation of the text plane.
    pub rotation: DQuat,
    /// Character height.
    pub character_size: f32,
    /// Units of `character_size`.
    pub size_mode: SizeMode,
    /// Text anchor.
    pub alignment: TextAlignment,
    /// Whether depth testing is disabled for the label.
    pub depth_always: bool,
    /// Render bin number.
    pub render_bin: i32,
    /// Glyph color.
    pub color: Color,
    /// Backdrop color.
    pub halo_color: Color,
    /// Backdrop style.
    pub backdrop: Backdrop,
    /// Whether the label turns to face the camera.
    pub auto_rotate_to_screen: bool,
    /// Horizon culling, set for geocentric maps only.
    pub cull_plane: Option<CullPlane>,
    /// Approximate extent of the rendered text around `position`.
    pub bounds: Aabb,
}

impl TextLabel {
    /// Returns `true` when the label is visible from `eye`.
    pub fn is_visible_from(&self, eye: DVec3) -> bool {
        self.cull_plane.map_or(true, |plane| !plane.culls(eye))
    }
}

/// Estimated width of `text` drawn at `size`, from per-glyph advances.
pub fn estimate_text_width(text: &str, size: f32) -> f32 {
    text.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                size * 0.7
            } else if matches!(c, 'i' | 'l' | '!' | '.' | ' ') {
                size * 0.3
            } else {
                size * 0.5
            }
        })
        .sum()
}

/// The labels built from one batch of features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelGroup {
    labels: Vec<TextLabel>,
}

impl LabelGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label.
    pub fn push(&mut self, label: TextLabel) {
        self.labels.push(label);
    }

    /// The labels, in feature order.
    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    /// Iterates the labels.
    pub fn iter(&self) -> impl Iterator<Item = &TextLabel> {
        self.labels.iter()
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if the group holds no label.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns `true` when `bounds` overlaps any label already in the group, in XY.
    pub fn overlaps(&self, bounds: &Aabb) -> bool {
        self.labels.iter().any(|label| {
            let other = &label.bounds;
            !(bounds.max.x < other.min.x
                || other.max.x < bounds.min.x
                || bounds.max.y < other.min.y
                || other.max.y < bounds.min.y)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_text_width_uses_glyph_classes() {
        assert_relative_eq!(estimate_text_width("Ai", 10.0), 10.0);
        assert_relative_eq!(estimate_text_width("ab", 10.0), 10.0);
        assert_relative_eq!(estimate_text_width("", 10.0), 0.0);
    }

    #[test]
    fn test_cull_plane_hides_far_side() {
        let plane = CullPlane::new(DVec3::new(0.0, 0.0, 5.0)).expect("non-zero");
        assert!(!plane.culls(DVec3::new(0.0, 0.0, 10.0)));
        assert!(plane.culls(DVec3::new(0.0, 0.0, -10.0)));
        assert!(plane.culls(DVec3::new(10.0, 0.0, 0.0)));
        assert!(CullPlane::new(DVec3::ZERO).is_none());
    }
}
