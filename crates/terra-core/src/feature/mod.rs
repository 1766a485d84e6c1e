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

//! Vector features and text styling consumed by the label lane.

mod filter_context;
mod geometry;
mod symbol;

pub use filter_context::*;
pub use geometry::*;
pub use symbol::*;

use std::collections::BTreeMap;
use std::fmt;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Text.
    String(String),
    /// Integer.
    Int(i64),
    /// Floating point.
    Double(f64),
    /// Boolean.
    Bool(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Double(v) => write!(f, "{v}"),
            AttributeValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

/// A vector feature: optional geometry plus named attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    /// Feature identifier.
    pub id: u64,
    /// The feature's geometry, if any.
    pub geometry: Option<Geometry>,
    /// Named attributes.
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Explicit text for text annotations. Takes precedence over any symbol content.
    pub annotation: Option<String>,
}

impl Feature {
    /// Creates a feature with `geometry` and no attributes.
    pub fn new(id: u64, geometry: Geometry) -> Self {
        Self {
            id,
            geometry: Some(geometry),
            ..Default::default()
        }
    }

    /// Creates a text annotation feature.
    pub fn annotation(id: u64, geometry: Geometry, text: impl Into<String>) -> Self {
        Self {
            id,
            geometry: Some(geometry),
            annotation: Some(text.into()),
            ..Default::default()
        }
    }

    /// Sets an attribute, builder-style.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the attribute formatted as text; missing attributes are empty.
    pub fn get_attr(&self, name: &str) -> String {
        self.attributes
            .get(name)
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_get_attr_formats_values() {
        let f = Feature::new(1, Geometry::Point(DVec3::ZERO))
            .with_attr("name", "Springfield")
            .with_attr("pop", 30_000i64)
            .with_attr("capital", false);
        assert_eq!(f.get_attr("name"), "Springfield");
        assert_eq!(f.get_attr("pop"), "30000");
        assert_eq!(f.get_attr("capital"), "false");
        assert_eq!(f.get_attr("missing"), "");
    }
}
