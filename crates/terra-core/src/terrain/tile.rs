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

//! Tiles and their geometry-bearing surfaces.

use super::{ElevationRaster, TileKey, TileRenderModel};
use crate::math::{BoundingSphere, DMat4};
use glam::Vec2;
use std::sync::Arc;

/// Constants driving the vertex morph between two LOD levels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MorphConstants {
    /// `end / (end - start)`.
    pub end_over_span: f32,
    /// `1 / (end - start)`.
    pub one_over_span: f32,
}

impl MorphConstants {
    /// Computes the constants for a morph that starts at range `start` and
    /// completes at range `end`. A degenerate span yields zeros (no morph).
    pub fn from_range(start: f32, end: f32) -> Self {
        let span = end - start;
        if span.abs() <= f32::EPSILON {
            return Self::default();
        }
        Self {
            end_over_span: end / span,
            one_over_span: 1.0 / span,
        }
    }

    /// The constants packed for a shader uniform.
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.end_over_span, self.one_over_span)
    }
}

/// Shared GPU geometry for a tile surface. Owned by the paging system.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileGeometry {
    /// Debug label.
    pub label: String,
    /// Number of vertices in the shared vertex buffer.
    pub vertex_count: u32,
    /// Number of indices drawn for the tile.
    pub index_count: u32,
}

/// The geometry-bearing child of a tile.
#[derive(Debug, Clone)]
pub struct SurfaceNode {
    matrix: DMat4,
    inverse_matrix: DMat4,
    local_bound: BoundingSphere,
    bound: BoundingSphere,
    geometry: Arc<TileGeometry>,
}

impl SurfaceNode {
    /// Creates a surface.
    ///
    /// `matrix` maps the surface's local frame into its parent frame and must be
    /// invertible. `local_bound` is expressed in the local frame.
    pub fn new(matrix: DMat4, local_bound: BoundingSphere, geometry: Arc<TileGeometry>) -> Self {
        Self {
            matrix,
            inverse_matrix: matrix.inverse(),
            local_bound,
            bound: local_bound.transform(&matrix),
            geometry,
        }
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> &DMat4 {
        &self.matrix
    }

    /// Parent-to-local matrix.
    pub fn inverse_matrix(&self) -> &DMat4 {
        &self.inverse_matrix
    }

    /// Bound in the parent frame.
    pub fn bound(&self) -> &BoundingSphere {
        &self.bound
    }

    /// Bound in the local frame.
    pub fn local_bound(&self) -> &BoundingSphere {
        &self.local_bound
    }

    /// The shared geometry.
    pub fn geometry(&self) -> &Arc<TileGeometry> {
        &self.geometry
    }

    /// Composes this surface's transform onto `model_view`.
    pub fn compute_local_to_world(&self, model_view: &DMat4) -> DMat4 {
        *model_view * self.matrix
    }
}

/// A node of the visible terrain quadtree.
#[derive(Debug, Clone)]
pub struct TileNode {
    key: TileKey,
    surface: SurfaceNode,
    render_model: TileRenderModel,
    morph_constants: MorphConstants,
    elevation_raster: Option<Arc<ElevationRaster>>,
    children: Vec<TileNode>,
}

impl TileNode {
    /// Creates a leaf tile with an empty render model.
    pub fn new(key: TileKey, surface: SurfaceNode) -> Self {
        Self {
            key,
            surface,
            render_model: TileRenderModel::default(),
            morph_constants: MorphConstants::default(),
            elevation_raster: None,
            children: Vec::new(),
        }
    }

    /// Replaces the render model.
    pub fn with_render_model(mut self, render_model: TileRenderModel) -> Self {
        self.render_model = render_model;
        self
    }

    /// Attaches an elevation raster.
    pub fn with_elevation_raster(mut self, raster: Arc<ElevationRaster>) -> Self {
        self.elevation_raster = Some(raster);
        self
    }

    /// Sets the morph constants.
    pub fn with_morph_constants(mut self, morph_constants: MorphConstants) -> Self {
        self.morph_constants = morph_constants;
        self
    }

    /// Appends a child tile.
    pub fn add_child(&mut self, child: TileNode) {
        self.children.push(child);
    }

    /// The tile's key.
    pub fn key(&self) -> &TileKey {
        &self.key
    }

    /// The tile's surface.
    pub fn surface(&self) -> &SurfaceNode {
        &self.surface
    }

    /// The tile's render model.
    pub fn render_model(&self) -> &TileRenderModel {
        &self.render_model
    }

    /// Mutable access for the paging system.
    pub fn render_model_mut(&mut self) -> &mut TileRenderModel {
        &mut self.render_model
    }

    /// The tile's elevation raster, if loaded.
    pub fn elevation_raster(&self) -> Option<&Arc<ElevationRaster>> {
        self.elevation_raster.as_ref()
    }

    /// The tile's morph constants.
    pub fn morph_constants(&self) -> MorphConstants {
        self.morph_constants
    }

    /// Child tiles, in traversal order.
    pub fn children(&self) -> &[TileNode] {
        &self.children
    }

    /// Counts this tile and all of its descendants.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TileNode::subtree_len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::DVec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_surface_bound_in_parent_frame() {
        let m = DMat4::from_translation(DVec3::new(100.0, 0.0, 0.0));
        let surface = SurfaceNode::new(
            m,
            BoundingSphere::new(DVec3::new(1.0, 2.0, 3.0), 5.0),
            Arc::new(TileGeometry::default()),
        );
        assert_eq!(surface.bound().center, DVec3::new(101.0, 2.0, 3.0));
        assert_relative_eq!(surface.bound().radius, 5.0);

        let back = surface.inverse_matrix().transform_point3(surface.bound().center);
        assert_relative_eq!(back.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_morph_constants() {
        let m = MorphConstants::from_range(50.0, 100.0);
        assert_relative_eq!(m.end_over_span, 2.0);
        assert_relative_eq!(m.one_over_span, 0.02);
        assert_eq!(MorphConstants::from_range(10.0, 10.0), MorphConstants::default());
    }

    #[test]
    fn test_subtree_len() {
        let surface = SurfaceNode::new(
            DMat4::IDENTITY,
            BoundingSphere::new(DVec3::ZERO, 1.0),
            Arc::new(TileGeometry::default()),
        );
        let root_key = TileKey::new(0, 0, 0);
        let mut root = TileNode::new(root_key, surface.clone());
        for q in 0..4 {
            root.add_child(TileNode::new(root_key.child(q), surface.clone()));
        }
        assert_eq!(root.subtree_len(), 5);
    }
}
