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

//! Attribute substitution in label content templates.

use terra_core::feature::Feature;

/// Replaces every delimited attribute name in `template` with the feature's value.
///
/// `delimiters` holds the opening and closing characters, e.g. `"[]"`. With
/// fewer than two characters the template is returned unchanged. Unknown
/// attributes substitute empty text; an opening delimiter with no closing one
/// is kept literally along with the rest of the template.
pub fn parse_attributes(feature: &Feature, template: &str, delimiters: &str) -> String {
    let mut chars = delimiters.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next()) else {
        return template.to_owned();
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(open) {
        out.push_str(&rest[..start]);
        let name_start = &rest[start + open.len_utf8()..];
        match name_start.find(close) {
            Some(end) => {
                out.push_str(&feature.get_attr(&name_start[..end]));
                rest = &name_start[end + close.len_utf8()..];
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_core::feature::Geometry;
    use terra_core::math::DVec3;

    fn city() -> Feature {
        Feature::new(1, Geometry::Point(DVec3::ZERO))
            .with_attr("name", "Springfield")
            .with_attr("state", "Oregon")
            .with_attr("pop", 62_000i64)
    }

    #[test]
    fn test_substitutes_every_attribute() {
        assert_eq!(
            parse_attributes(&city(), "City [name], [state]", "[]"),
            "City Springfield, Oregon"
        );
        assert_eq!(parse_attributes(&city(), "[pop]", "[]"), "62000");
    }

    #[test]
    fn test_unterminated_attribute_is_literal() {
        assert_eq!(parse_attributes(&city(), "City [name", "[]"), "City [name");
        assert_eq!(
            parse_attributes(&city(), "[name] [state", "[]"),
            "Springfield [state"
        );
    }

    #[test]
    fn test_short_delimiter_returns_template() {
        assert_eq!(parse_attributes(&city(), "[name]", "["), "[name]");
        assert_eq!(parse_attributes(&city(), "[name]", ""), "[name]");
    }

    #[test]
    fn test_missing_attribute_is_empty() {
        assert_eq!(parse_attributes(&city(), "<[nope]>", "[]"), "<>");
    }

    #[test]
    fn test_custom_delimiters() {
        assert_eq!(
            parse_attributes(&city(), "{name} (pop. {pop})", "{}"),
            "Springfield (pop. 62000)"
        );
    }
}
