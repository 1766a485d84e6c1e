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

//! Text styling for feature labels.

/// Delimiter pair used by default to mark attribute names in content templates.
pub const DEFAULT_ATTRIBUTE_DELIMITER: &str = "[]";

/// An RGBA color in linear space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    /// Creates a color from components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Units of a label's character size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Pixels on screen.
    #[default]
    Screen,
    /// World units.
    Object,
}

/// Where a label is placed on line geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinePlacement {
    /// At the middle of the line.
    #[default]
    AlongLine,
    /// At the center of the line's bounds.
    Centroid,
}

/// How a label placed along a line is oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineOrientation {
    /// No rotation.
    #[default]
    Horizontal,
    /// Along the line's direction.
    Parallel,
    /// Across the line.
    Perpendicular,
}

/// Text styling descriptor.
///
/// Unset options fall back to engine defaults when a label is built.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSymbol {
    /// Content template, with attribute names bracketed by the delimiter pair.
    pub content: Option<String>,
    /// Two-character delimiter pair for `content`.
    pub content_attribute_delimiter: String,
    /// Single attribute to use as text when no content template is set.
    pub attribute: Option<String>,
    /// Font file. Empty or unset selects the default font.
    pub font: Option<String>,
    /// Character size.
    pub size: Option<f32>,
    /// Units of `size`.
    pub size_mode: Option<SizeMode>,
    /// Placement on line geometry.
    pub line_placement: Option<LinePlacement>,
    /// Orientation on line geometry.
    pub line_orientation: Option<LineOrientation>,
    /// Text color.
    pub fill: Color,
    /// Outline color.
    pub halo: Color,
    /// Emit at most one label per distinct text.
    pub remove_duplicate_labels: Option<bool>,
    /// Keep labels facing the screen.
    pub rotate_to_screen: Option<bool>,
    /// Drop labels that would overlap labels already placed in the same batch.
    pub hide_clutter: Option<bool>,
}

impl Default for TextSymbol {
    fn default() -> Self {
        Self {
            content: None,
            content_attribute_delimiter: DEFAULT_ATTRIBUTE_DELIMITER.to_owned(),
            attribute: None,
            font: None,
            size: None,
            size_mode: None,
            line_placement: None,
            line_orientation: None,
            fill: Color::WHITE,
            halo: Color::BLACK,
            remove_duplicate_labels: None,
            rotate_to_screen: None,
            hide_clutter: None,
        }
    }
}

impl TextSymbol {
    /// A symbol that renders `template` with the default delimiters.
    pub fn with_content(template: impl Into<String>) -> Self {
        Self {
            content: Some(template.into()),
            ..Default::default()
        }
    }

    /// A symbol that renders one attribute verbatim.
    pub fn with_attribute(attribute: impl Into<String>) -> Self {
        Self {
            attribute: Some(attribute.into()),
            ..Default::default()
        }
    }
}
