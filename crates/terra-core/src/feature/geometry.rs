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

//! Feature geometry.

use crate::math::{Aabb, DVec3};

/// Feature geometry. Multi-geometries nest.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single point.
    Point(DVec3),
    /// A polyline.
    LineString(Vec<DVec3>),
    /// A closed ring; the closing edge is implicit.
    Polygon(Vec<DVec3>),
    /// A collection of parts.
    Multi(Vec<Geometry>),
}

impl Geometry {
    /// Returns the leaf (non-multi) parts in order.
    pub fn parts(&self) -> Vec<&Geometry> {
        let mut out = Vec::new();
        self.collect_parts(&mut out);
        out
    }

    fn collect_parts<'a>(&'a self, out: &mut Vec<&'a Geometry>) {
        match self {
            Geometry::Multi(parts) => parts.iter().for_each(|p| p.collect_parts(out)),
            leaf => out.push(leaf),
        }
    }

    /// The bounding box of every vertex. Invalid for empty geometry.
    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::INVALID;
        match self {
            Geometry::Point(p) => aabb.expand_by_point(*p),
            Geometry::LineString(points) | Geometry::Polygon(points) => {
                points.iter().for_each(|p| aabb.expand_by_point(*p));
            }
            Geometry::Multi(parts) => parts.iter().for_each(|p| aabb.expand_by_aabb(&p.bounds())),
        }
        aabb
    }

    /// Total length of a line string; zero for other geometry.
    pub fn length(&self) -> f64 {
        match self {
            Geometry::LineString(points) => points.windows(2).map(|w| w[0].distance(w[1])).sum(),
            _ => 0.0,
        }
    }

    /// Finds the segment of a line string containing the point `distance`
    /// along it, returning its endpoints.
    ///
    /// Returns `None` for other geometry, for lines with fewer than two points,
    /// or when `distance` lies beyond the end of the line.
    pub fn segment_at(&self, distance: f64) -> Option<(DVec3, DVec3)> {
        let Geometry::LineString(points) = self else {
            return None;
        };
        let mut travelled = 0.0;
        for w in points.windows(2) {
            let seg_len = w[0].distance(w[1]);
            if distance >= travelled && distance <= travelled + seg_len {
                return Some((w[0], w[1]));
            }
            travelled += seg_len;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Geometry {
        Geometry::LineString(vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(10.0, 30.0, 0.0),
        ])
    }

    #[test]
    fn test_length_and_segment() {
        let g = line();
        assert_eq!(g.length(), 40.0);
        let (a, b) = g.segment_at(20.0).unwrap();
        assert_eq!(a, DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(b, DVec3::new(10.0, 30.0, 0.0));
        assert!(g.segment_at(41.0).is_none());
        assert!(Geometry::LineString(vec![DVec3::ZERO]).segment_at(0.0).is_none());
    }

    #[test]
    fn test_bounds_and_parts() {
        let multi = Geometry::Multi(vec![line(), Geometry::Point(DVec3::new(-5.0, 2.0, 1.0))]);
        let b = multi.bounds();
        assert_eq!(b.min, DVec3::new(-5.0, 0.0, 0.0));
        assert_eq!(b.max, DVec3::new(10.0, 30.0, 1.0));
        assert_eq!(multi.parts().len(), 2);
        assert!(!Geometry::LineString(vec![]).bounds().is_valid());
    }
}
