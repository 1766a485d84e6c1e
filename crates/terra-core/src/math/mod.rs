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

//! Provides the mathematics primitives used by the terrain pipeline.
//!
//! Linear algebra comes from `glam`. Matrices and positions are kept in double
//! precision because tile transforms are expressed in planet-scale coordinates;
//! per-draw scalars (ranges, texel coefficients) are single precision since
//! they are what the GPU consumes.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

// --- Declare Sub-Modules ---

pub mod geometry;

// --- Re-export Principal Types ---

pub use self::geometry::{Aabb, BoundingSphere};
pub use glam::{DMat4, DQuat, DVec2, DVec3, DVec4, Vec2, Vec4};

// --- Utility Functions ---

/// Performs an approximate equality comparison between two doubles with a custom tolerance.
///
/// # Examples
///
/// ```
/// use terra_core::math::approx_eq_eps;
/// assert!(approx_eq_eps(0.001, 0.002, 1e-2));
/// assert!(!approx_eq_eps(0.001, 0.002, 1e-4));
/// ```
#[inline]
pub fn approx_eq_eps(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Returns the largest axis scale factor encoded in the upper 3x3 of `matrix`.
///
/// Used to carry a bounding radius through a transform.
#[inline]
pub fn max_axis_scale(matrix: &DMat4) -> f64 {
    matrix
        .x_axis
        .truncate()
        .length()
        .max(matrix.y_axis.truncate().length())
        .max(matrix.z_axis.truncate().length())
}
