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

//! Builds text labels from a batch of vector features.

use super::{
    estimate_text_width, parse_attributes, Backdrop, CullPlane, LabelGroup, TextAlignment,
    TextLabel, DEFAULT_CHARACTER_SIZE, DEFAULT_FONT, LABEL_RENDER_BIN,
};
use std::collections::HashSet;
use terra_core::feature::{
    Feature, FilterContext, Geometry, LineOrientation, LinePlacement, TextSymbol,
};
use terra_core::lane::{Lane, LaneKind};
use terra_core::math::{Aabb, DQuat, DVec3};

/// Converts features into text labels according to a [`TextSymbol`].
///
/// The lane holds no per-batch state; every call to [`BuildTextLane::build`]
/// starts with an empty duplicate set and an empty clutter set.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildTextLane;

impl BuildTextLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Builds one label per feature that has geometry and resolves to non-empty text.
    ///
    /// Returns `None` when no symbol is given. Features are never fatal: a
    /// feature that cannot be labelled is skipped.
    pub fn build(
        &self,
        features: &[Feature],
        symbol: Option<&TextSymbol>,
        context: &FilterContext,
    ) -> Option<LabelGroup> {
        let symbol = symbol?;
        let remove_duplicates = symbol.remove_duplicate_labels.unwrap_or(false);
        let hide_clutter = symbol.hide_clutter.unwrap_or(false);
        let rotate_to_screen = symbol.rotate_to_screen.unwrap_or(false);

        let mut placed_texts: HashSet<String> = HashSet::new();
        let mut group = LabelGroup::new();

        for feature in features {
            let Some(geometry) = &feature.geometry else {
                continue;
            };

            let text = resolve_text(feature, symbol);
            if text.is_empty() {
                continue;
            }
            if remove_duplicates && placed_texts.contains(&text) {
                log::trace!("Skipping duplicate label {:?}", text);
                continue;
            }

            let Some((position, rotation)) = place(geometry, symbol, rotate_to_screen, context)
            else {
                log::trace!("Feature {} has no placeable geometry", feature.id);
                continue;
            };
            let label = make_label(text, position, rotation, symbol, rotate_to_screen, context);

            if hide_clutter && group.overlaps(&label.bounds) {
                log::trace!("Hiding cluttered label {:?}", label.text);
                continue;
            }
            if remove_duplicates {
                placed_texts.insert(label.text.clone());
            }
            group.push(label);
        }

        log::debug!(
            "Built {} labels from {} features",
            group.len(),
            features.len()
        );
        Some(group)
    }
}

impl Lane for BuildTextLane {
    fn strategy_name(&self) -> &'static str {
        "BuildText"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Label
    }
}

/// Annotation text wins, then the content template, then the single attribute.
fn resolve_text(feature: &Feature, symbol: &TextSymbol) -> String {
    if let Some(annotation) = &feature.annotation {
        annotation.clone()
    } else if let Some(content) = &symbol.content {
        parse_attributes(feature, content, &symbol.content_attribute_delimiter)
    } else if let Some(attribute) = &symbol.attribute {
        feature.get_attr(attribute)
    } else {
        String::new()
    }
}

/// Position and rotation of a label. Later geometry parts override earlier ones.
///
/// Parts without vertices are ignored; `None` when no part can be placed.
fn place(
    geometry: &Geometry,
    symbol: &TextSymbol,
    rotate_to_screen: bool,
    context: &FilterContext,
) -> Option<(DVec3, DQuat)> {
    let placement = symbol.line_placement.unwrap_or_default();
    let orientation = symbol.line_orientation.unwrap_or_default();

    let mut position = None;
    let mut rotation = DQuat::IDENTITY;

    for part in geometry.parts() {
        let bounds = part.bounds();
        if !bounds.is_valid() {
            continue;
        }
        let along_line = matches!(part, Geometry::LineString(_)) && placement == LinePlacement::AlongLine;
        if !along_line {
            position = Some(bounds.center());
            continue;
        }

        let Some((start, end)) = part.segment_at(part.length() / 2.0) else {
            position = Some(bounds.center());
            continue;
        };
        let midpoint = (start + end) / 2.0;
        position = Some(midpoint);

        if rotate_to_screen || orientation == LineOrientation::Horizontal {
            continue;
        }
        let Some(mut dir) = (end - start).try_normalize() else {
            continue;
        };
        if orientation == LineOrientation::Perpendicular {
            let up = match context.ellipsoid() {
                Some(ellipsoid) if context.is_geocentric() => {
                    ellipsoid.compute_local_up(context.to_world(midpoint))
                }
                _ => DVec3::Z,
            };
            dir = up.cross(dir);
        }
        if let Some(dir) = dir.try_normalize() {
            rotation = DQuat::from_rotation_arc(DVec3::X, dir);
        }
    }

    position.map(|position| (position, rotation))
}

fn make_label(
    text: String,
    position: DVec3,
    rotation: DQuat,
    symbol: &TextSymbol,
    rotate_to_screen: bool,
    context: &FilterContext,
) -> TextLabel {
    let font = symbol
        .font
        .as_deref()
        .filter(|font| !font.is_empty())
        .unwrap_or(DEFAULT_FONT)
        .to_owned();
    let character_size = symbol.size.unwrap_or(DEFAULT_CHARACTER_SIZE);

    let half_extents = DVec3::new(
        f64::from(estimate_text_width(&text, character_size)) / 2.0,
        f64::from(character_size) / 2.0,
        0.0,
    );
    let bounds = Aabb::from_center_half_extents(position, half_extents);

    let cull_plane = if context.is_geocentric() {
        CullPlane::new(context.inverse_reference_frame().transform_point3(position))
    } else {
        None
    };

    TextLabel {
        text,
        font,
        position,
        rotation,
        character_size,
        size_mode: symbol.size_mode.unwrap_or_default(),
        alignment: TextAlignment::CenterCenter,
        depth_always: true,
        render_bin: LABEL_RENDER_BIN,
        color: symbol.fill,
        halo_color: symbol.halo,
        backdrop: Backdrop::Outline,
        auto_rotate_to_screen: rotate_to_screen,
        cull_plane,
        bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use terra_core::feature::{Ellipsoid, SizeMode};
    use terra_core::math::DMat4;

    fn line(points: &[(f64, f64)]) -> Geometry {
        Geometry::LineString(points.iter().map(|&(x, y)| DVec3::new(x, y, 0.0)).collect())
    }

    fn build(features: &[Feature], symbol: &TextSymbol) -> LabelGroup {
        BuildTextLane::new()
            .build(features, Some(symbol), &FilterContext::projected())
            .expect("symbol given")
    }

    #[test]
    fn test_no_symbol_builds_nothing() {
        let features = vec![Feature::annotation(1, Geometry::Point(DVec3::ZERO), "x")];
        assert!(BuildTextLane::new()
            .build(&features, None, &FilterContext::projected())
            .is_none());
    }

    #[test]
    fn test_text_source_priority() {
        let mut symbol = TextSymbol::with_content("[name]!");
        symbol.attribute = Some("name".into());

        let annotated = Feature::annotation(1, Geometry::Point(DVec3::ZERO), "Note")
            .with_attr("name", "ignored");
        let templated = Feature::new(2, Geometry::Point(DVec3::X)).with_attr("name", "Ridge");
        let group = build(&[annotated, templated.clone()], &symbol);
        assert_eq!(group.labels()[0].text, "Note");
        assert_eq!(group.labels()[1].text, "Ridge!");

        let group = build(&[templated], &TextSymbol::with_attribute("name"));
        assert_eq!(group.labels()[0].text, "Ridge");
    }

    #[test]
    fn test_features_without_geometry_or_text_are_skipped() {
        let no_geometry = Feature::default().with_attr("name", "Ghost");
        let no_text = Feature::new(2, Geometry::Point(DVec3::ZERO));
        let group = build(&[no_geometry, no_text], &TextSymbol::with_attribute("name"));
        assert!(group.is_empty());
    }

    #[test]
    fn test_defaults_applied() {
        let feature = Feature::new(1, Geometry::Point(DVec3::new(1.0, 2.0, 3.0))).with_attr("n", "A");
        let mut symbol = TextSymbol::with_attribute("n");
        symbol.font = Some(String::new());
        let label = build(&[feature], &symbol).labels()[0].clone();

        assert_eq!(label.font, DEFAULT_FONT);
        assert_relative_eq!(label.character_size, 32.0);
        assert_eq!(label.size_mode, SizeMode::Screen);
        assert_eq!(label.alignment, TextAlignment::CenterCenter);
        assert_eq!(label.backdrop, Backdrop::Outline);
        assert_eq!(label.render_bin, 99_999);
        assert!(label.depth_always);
        assert!(label.cull_plane.is_none());
        assert_eq!(label.position, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_line_label_at_midpoint_parallel() {
        let feature = Feature::new(1, line(&[(0.0, 0.0), (0.0, 10.0)])).with_attr("n", "Road");
        let mut symbol = TextSymbol::with_attribute("n");
        symbol.line_orientation = Some(LineOrientation::Parallel);
        let label = build(&[feature], &symbol).labels()[0].clone();

        assert_relative_eq!(label.position.y, 5.0);
        let x_axis = label.rotation * DVec3::X;
        assert_relative_eq!(x_axis.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(x_axis.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_perpendicular_uses_up_cross_direction() {
        let feature = Feature::new(1, line(&[(0.0, 0.0), (10.0, 0.0)])).with_attr("n", "River");
        let mut symbol = TextSymbol::with_attribute("n");
        symbol.line_orientation = Some(LineOrientation::Perpendicular);
        let label = build(&[feature], &symbol).labels()[0].clone();

        // +Z cross +X is +Y.
        let x_axis = label.rotation * DVec3::X;
        assert_relative_eq!(x_axis.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotate_to_screen_keeps_identity_rotation() {
        let feature = Feature::new(1, line(&[(0.0, 0.0), (0.0, 10.0)])).with_attr("n", "Road");
        let mut symbol = TextSymbol::with_attribute("n");
        symbol.line_orientation = Some(LineOrientation::Parallel);
        symbol.rotate_to_screen = Some(true);
        let label = build(&[feature], &symbol).labels()[0].clone();

        assert_eq!(label.rotation, DQuat::IDENTITY);
        assert!(label.auto_rotate_to_screen);
    }

    #[test]
    fn test_centroid_placement_uses_bounds_center() {
        let feature =
            Feature::new(1, line(&[(0.0, 0.0), (10.0, 0.0), (10.0, 30.0)])).with_attr("n", "Trail");
        let mut symbol = TextSymbol::with_attribute("n");
        symbol.line_placement = Some(LinePlacement::Centroid);
        let label = build(&[feature], &symbol).labels()[0].clone();
        assert_eq!(label.position, DVec3::new(5.0, 15.0, 0.0));
    }

    #[test]
    fn test_last_part_wins() {
        let geometry = Geometry::Multi(vec![
            Geometry::Point(DVec3::new(100.0, 0.0, 0.0)),
            Geometry::Point(DVec3::new(-3.0, 4.0, 0.0)),
        ]);
        let feature = Feature::new(1, geometry).with_attr("n", "Islands");
        let label = build(&[feature], &TextSymbol::with_attribute("n")).labels()[0].clone();
        assert_eq!(label.position, DVec3::new(-3.0, 4.0, 0.0));
    }

    #[test]
    fn test_empty_parts_are_not_placed() {
        let empty_line = Feature::new(1, Geometry::LineString(vec![])).with_attr("n", "Nowhere");
        let empty_ring = Feature::new(2, Geometry::Polygon(vec![])).with_attr("n", "Void");
        let group = build(&[empty_line, empty_ring], &TextSymbol::with_attribute("n"));
        assert!(group.is_empty());

        // An empty part does not override a placeable one.
        let geometry = Geometry::Multi(vec![
            Geometry::Point(DVec3::new(2.0, 3.0, 0.0)),
            Geometry::LineString(vec![]),
        ]);
        let feature = Feature::new(3, geometry).with_attr("n", "Cape");
        let label = build(&[feature], &TextSymbol::with_attribute("n")).labels()[0].clone();
        assert_eq!(label.position, DVec3::new(2.0, 3.0, 0.0));
        assert!(label.position.is_finite());
    }

    #[test]
    fn test_hide_clutter_drops_overlapping_labels() {
        let features = vec![
            Feature::new(1, Geometry::Point(DVec3::ZERO)).with_attr("n", "Alpha"),
            Feature::new(2, Geometry::Point(DVec3::new(5.0, 0.0, 0.0))).with_attr("n", "Beta"),
            Feature::new(3, Geometry::Point(DVec3::new(10_000.0, 0.0, 0.0))).with_attr("n", "Gamma"),
        ];
        let mut symbol = TextSymbol::with_attribute("n");
        symbol.hide_clutter = Some(true);
        let group = build(&features, &symbol);

        let texts: Vec<_> = group.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha", "Gamma"]);
    }

    #[test]
    fn test_geocentric_labels_get_cull_plane() {
        let frame = DMat4::from_translation(DVec3::new(0.0, 0.0, 6_378_137.0));
        let context = FilterContext::geocentric(frame, Ellipsoid::WGS84);
        let feature = Feature::new(1, Geometry::Point(DVec3::new(0.0, 0.0, 10.0))).with_attr("n", "Peak");
        let group = BuildTextLane::new()
            .build(&[feature], Some(&TextSymbol::with_attribute("n")), &context)
            .expect("symbol given");

        let label = &group.labels()[0];
        let plane = label.cull_plane.expect("geocentric");
        assert_relative_eq!(plane.normal.length(), 1.0, epsilon = 1e-12);
        assert!(label.is_visible_from(plane.normal * 100.0));
        assert!(!label.is_visible_from(-plane.normal * 100.0));
    }
}
