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

//! Spatial context for feature processing.

use crate::math::{DMat4, DVec3};

/// A reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Equatorial radius.
    pub radius_equator: f64,
    /// Polar radius.
    pub radius_polar: f64,
}

impl Ellipsoid {
    /// The WGS-84 ellipsoid, in meters.
    pub const WGS84: Self = Self {
        radius_equator: 6_378_137.0,
        radius_polar: 6_356_752.314_245,
    };

    /// The geodetic up vector at an earth-centered world position.
    pub fn compute_local_up(&self, world: DVec3) -> DVec3 {
        let a2 = self.radius_equator * self.radius_equator;
        let b2 = self.radius_polar * self.radius_polar;
        DVec3::new(world.x / a2, world.y / a2, world.z / b2).try_normalize().unwrap_or(DVec3::Z)
    }
}

/// Spatial and reference-frame context shared by a batch of features.
///
/// Feature coordinates are expressed in a local reference frame; the context
/// maps them to world space.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterContext {
    geocentric: bool,
    reference_frame: DMat4,
    inverse_reference_frame: DMat4,
    ellipsoid: Option<Ellipsoid>,
}

impl Default for FilterContext {
    fn default() -> Self {
        Self::projected()
    }
}

impl FilterContext {
    /// A flat, projected context whose local frame is the world frame.
    pub fn projected() -> Self {
        Self {
            geocentric: false,
            reference_frame: DMat4::IDENTITY,
            inverse_reference_frame: DMat4::IDENTITY,
            ellipsoid: None,
        }
    }

    /// A geocentric context. `reference_frame` maps local coordinates to world.
    pub fn geocentric(reference_frame: DMat4, ellipsoid: Ellipsoid) -> Self {
        Self {
            geocentric: true,
            reference_frame,
            inverse_reference_frame: reference_frame.inverse(),
            ellipsoid: Some(ellipsoid),
        }
    }

    /// Whether world space is earth-centered.
    pub fn is_geocentric(&self) -> bool {
        self.geocentric
    }

    /// The ellipsoid of a geocentric context.
    pub fn ellipsoid(&self) -> Option<&Ellipsoid> {
        self.ellipsoid.as_ref()
    }

    /// Local to world.
    pub fn reference_frame(&self) -> &DMat4 {
        &self.reference_frame
    }

    /// World to local.
    pub fn inverse_reference_frame(&self) -> &DMat4 {
        &self.inverse_reference_frame
    }

    /// Maps a local point to world space.
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.reference_frame.transform_point3(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_up_on_axes() {
        let e = Ellipsoid::WGS84;
        let up = e.compute_local_up(DVec3::new(e.radius_equator, 0.0, 0.0));
        assert_relative_eq!(up.x, 1.0, epsilon = 1e-12);
        let up = e.compute_local_up(DVec3::new(0.0, 0.0, e.radius_polar));
        assert_relative_eq!(up.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_to_world_round_trip() {
        let frame = DMat4::from_translation(DVec3::new(100.0, 0.0, 0.0));
        let ctx = FilterContext::geocentric(frame, Ellipsoid::WGS84);
        let w = ctx.to_world(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(w, DVec3::new(101.0, 2.0, 3.0));
        let back = ctx.inverse_reference_frame().transform_point3(w);
        assert_relative_eq!(back.x, 1.0, epsilon = 1e-12);
    }
}
