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

//! Elevation rasters and the texel correction used to sample them.

use std::fmt;

/// An error raised when constructing terrain data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    /// A raster needs at least one texel on each axis.
    #[error("elevation raster must be at least 1x1, got {width}x{height}")]
    Empty {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The sample buffer does not match the raster dimensions.
    #[error("elevation raster expects {expected} samples, got {actual}")]
    SizeMismatch {
        /// `width * height`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },
}

/// Elevation samples for one tile, row-major.
#[derive(Clone, PartialEq)]
pub struct ElevationRaster {
    width: u32,
    height: u32,
    heights: Vec<f32>,
}

impl ElevationRaster {
    /// Creates a raster, validating its dimensions.
    pub fn new(width: u32, height: u32, heights: Vec<f32>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if heights.len() != expected {
            return Err(RasterError::SizeMismatch {
                expected,
                actual: heights.len(),
            });
        }
        Ok(Self {
            width,
            height,
            heights,
        })
    }

    /// Creates a raster with every sample set to `height_value`.
    pub fn flat(width: u32, height: u32, height_value: f32) -> Result<Self, RasterError> {
        Self::new(
            width,
            height,
            vec![height_value; width as usize * height as usize],
        )
    }

    /// Width in texels (the `s` dimension).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels (the `t` dimension).
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Debug for ElevationRaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevationRaster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Scale and bias mapping a `[0, 1]` texture coordinate onto the interior of
/// an elevation raster.
///
/// Elevation is sampled on texel centers rather than edges, and rasters may be
/// padded with a one-texel guard border to hide seams between neighbours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationTexelCoeff {
    /// Multiplier applied to the texture coordinate.
    pub scale: f32,
    /// Offset added after scaling.
    pub bias: f32,
}

impl ElevationTexelCoeff {
    /// No correction; used when the tile has no raster.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        bias: 0.0,
    };

    /// Texel offset to the first usable sample center.
    pub fn texel_bias(use_texture_border: bool) -> f32 {
        if use_texture_border {
            1.5
        } else {
            0.5
        }
    }

    /// Computes the coefficients for a raster `size` texels wide.
    ///
    /// Sampling on center shrinks the area by one texel and shifts it by half a
    /// texel; a border removes one more texel on each side.
    pub fn for_size(size: f32, texel_bias: f32) -> Self {
        Self {
            scale: (size - 2.0 * texel_bias) / size,
            bias: texel_bias / size,
        }
    }

    /// Computes the coefficients for `raster`.
    pub fn for_raster(raster: &ElevationRaster, use_texture_border: bool) -> Self {
        Self::for_size(raster.width() as f32, Self::texel_bias(use_texture_border))
    }

    /// The coefficients packed as `(scale, bias)`.
    pub fn as_vec2(&self) -> glam::Vec2 {
        glam::Vec2::new(self.scale, self.bias)
    }
}

impl Default for ElevationTexelCoeff {
    fn default() -> Self {
        Self::IDENTITY
    }
}
