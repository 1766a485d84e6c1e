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

//! Bounding volumes used for culling and frame-extent accumulation.
//!
//! Both volumes start out invalid and grow monotonically as they are expanded,
//! which is exactly how the per-frame terrain extent is built up.

use super::{max_axis_scale, DMat4, DVec3};

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// An AABB is defined by its minimum and maximum corner points. It is the box
/// half of the frame bounding volume handed to shadow and clip planning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: DVec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: DVec3,
}

impl Aabb {
    /// An invalid `Aabb` where `min` components are positive infinity and `max` are negative infinity.
    ///
    /// Expanding `INVALID` by any valid volume yields exactly that volume.
    pub const INVALID: Self = Self {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    /// Creates a new `Aabb` from two corner points, in any order.
    #[inline]
    pub fn from_min_max(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a new `Aabb` from a center point and its half-extents.
    #[inline]
    pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Calculates the center point of the `Aabb`.
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the full size (width, height, depth) of the `Aabb`.
    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Checks if the `Aabb` is valid (i.e., `min` <= `max` on all axes).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Checks if a point is contained within or on the boundary of the `Aabb`.
    #[inline]
    pub fn contains_point(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Checks if `other` lies entirely inside this box.
    #[inline]
    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Checks if this `Aabb` intersects with another `Aabb`. Touching boxes intersect.
    #[inline]
    pub fn intersects_aabb(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Grows the box so that it encloses `point`.
    #[inline]
    pub fn expand_by_point(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grows the box so that it encloses `other`.
    #[inline]
    pub fn expand_by_aabb(&mut self, other: &Aabb) {
        if !other.is_valid() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Grows the box so that it encloses the sphere `sphere`.
    ///
    /// Invalid spheres leave the box untouched.
    pub fn expand_by_sphere(&mut self, sphere: &BoundingSphere) {
        if !sphere.is_valid() {
            return;
        }
        let r = DVec3::splat(sphere.radius);
        self.min = self.min.min(sphere.center - r);
        self.max = self.max.max(sphere.center + r);
    }
}

impl Default for Aabb {
    /// Returns the default `Aabb`, which is `Aabb::INVALID`.
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

/// A bounding sphere, the primary bound carried by terrain surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Center of the sphere.
    pub center: DVec3,
    /// Radius of the sphere. Negative means "no volume yet".
    pub radius: f64,
}

impl BoundingSphere {
    /// An empty sphere. Expanding it by any valid sphere yields that sphere.
    pub const INVALID: Self = Self {
        center: DVec3::ZERO,
        radius: -1.0,
    };

    /// Creates a sphere from its center and radius.
    #[inline]
    pub const fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Returns `true` once the sphere encloses something.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.radius >= 0.0
    }

    /// Checks whether `other` lies entirely inside this sphere (with a small tolerance).
    pub fn contains_sphere(&self, other: &BoundingSphere) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }
        self.center.distance(other.center) + other.radius <= self.radius * (1.0 + 1e-9) + 1e-9
    }

    /// Grows the sphere to the smallest sphere enclosing both itself and `other`.
    pub fn expand_by(&mut self, other: &BoundingSphere) {
        if !other.is_valid() {
            return;
        }
        if !self.is_valid() {
            *self = *other;
            return;
        }

        let d = self.center.distance(other.center);

        // `other` is already inside.
        if d + other.radius <= self.radius {
            return;
        }

        // `self` is inside `other`.
        if d + self.radius <= other.radius {
            *self = *other;
            return;
        }

        let new_radius = (self.radius + d + other.radius) * 0.5;
        let ratio = (new_radius - self.radius) / d;
        self.center += (other.center - self.center) * ratio;
        self.radius = new_radius;
    }

    /// Returns this sphere carried through `matrix`.
    ///
    /// The radius is scaled by the largest axis scale so the result stays conservative.
    pub fn transform(&self, matrix: &DMat4) -> Self {
        if !self.is_valid() {
            return *self;
        }
        Self {
            center: matrix.transform_point3(self.center),
            radius: self.radius * max_axis_scale(matrix),
        }
    }
}

impl Default for BoundingSphere {
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}
