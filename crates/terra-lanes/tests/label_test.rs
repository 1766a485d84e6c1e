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

//! Integration tests for the label lane.

use terra_core::feature::{Feature, FilterContext, Geometry, TextSymbol};
use terra_core::math::DVec3;
use terra_lanes::label_lane::{BuildTextLane, LabelGroup};

fn point(x: f64, y: f64) -> Geometry {
    Geometry::Point(DVec3::new(x, y, 0.0))
}

fn build(features: &[Feature], symbol: &TextSymbol) -> LabelGroup {
    BuildTextLane::new()
        .build(features, Some(symbol), &FilterContext::projected())
        .expect("symbol given")
}

fn texts(group: &LabelGroup) -> Vec<&str> {
    group.iter().map(|label| label.text.as_str()).collect()
}

#[test]
fn test_content_template_substitutes_attributes() {
    let feature = Feature::new(1, point(0.0, 0.0))
        .with_attr("name", "Springfield")
        .with_attr("state", "Oregon");
    let group = build(&[feature], &TextSymbol::with_content("City [name], [state]"));
    assert_eq!(texts(&group), vec!["City Springfield, Oregon"]);
}

#[test]
fn test_unterminated_template_passes_through() {
    let feature = Feature::new(1, point(0.0, 0.0)).with_attr("name", "Springfield");
    let group = build(&[feature], &TextSymbol::with_content("City [name"));
    assert_eq!(texts(&group), vec!["City [name"]);
}

#[test]
fn test_duplicate_labels_removed_when_requested() {
    let features = vec![
        Feature::new(1, point(0.0, 0.0)).with_attr("name", "Lake"),
        Feature::new(2, point(1000.0, 0.0)).with_attr("name", "Lake"),
        Feature::new(3, point(2000.0, 0.0)).with_attr("name", "Pond"),
    ];

    let mut symbol = TextSymbol::with_attribute("name");
    assert_eq!(texts(&build(&features, &symbol)), vec!["Lake", "Lake", "Pond"]);

    symbol.remove_duplicate_labels = Some(true);
    assert_eq!(texts(&build(&features, &symbol)), vec!["Lake", "Pond"]);
}

#[test]
fn test_hidden_duplicate_does_not_block_later_copy() {
    // The first "Lake" is hidden by clutter, so a later "Lake" may still be placed.
    let features = vec![
        Feature::new(1, point(0.0, 0.0)).with_attr("name", "Harbor"),
        Feature::new(2, point(1.0, 0.0)).with_attr("name", "Lake"),
        Feature::new(3, point(5000.0, 0.0)).with_attr("name", "Lake"),
    ];
    let mut symbol = TextSymbol::with_attribute("name");
    symbol.remove_duplicate_labels = Some(true);
    symbol.hide_clutter = Some(true);

    let group = build(&features, &symbol);
    assert_eq!(texts(&group), vec!["Harbor", "Lake"]);
    assert_eq!(group.labels()[1].position.x, 5000.0);
}

#[test]
fn test_each_call_starts_with_empty_state() {
    let features = vec![Feature::new(1, point(0.0, 0.0)).with_attr("name", "Lake")];
    let mut symbol = TextSymbol::with_attribute("name");
    symbol.remove_duplicate_labels = Some(true);
    symbol.hide_clutter = Some(true);

    let lane = BuildTextLane::new();
    let context = FilterContext::projected();
    for _ in 0..2 {
        let group = lane.build(&features, Some(&symbol), &context).expect("symbol given");
        assert_eq!(group.len(), 1);
    }
}
