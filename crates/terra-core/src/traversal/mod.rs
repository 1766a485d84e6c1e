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

//! Traversal contracts between the scene driver and the cull pass.
//!
//! The driver walks the visible tile hierarchy depth-first and reports each
//! node it enters; the cull pass reacts to those events and uses the driver's
//! transform stack and view queries.

use crate::math::{DMat4, DVec3};
use crate::terrain::{SurfaceNode, TileNode};

/// Transform stack and view-dependent queries provided by the traversal driver.
pub trait CullTraversal {
    /// The model-view matrix at the top of the stack.
    fn model_view_matrix(&self) -> DMat4;

    /// Pushes a full model-view matrix.
    fn push_model_view_matrix(&mut self, matrix: DMat4);

    /// Pops the matrix pushed last.
    fn pop_model_view_matrix(&mut self);

    /// The eye point expressed in the frame of the current model-view matrix.
    fn view_point_local(&self) -> DVec3;

    /// The view-dependent LOD multiplier.
    fn lod_scale(&self) -> f32;
}

#[derive(Debug, Clone, Copy)]
struct StackEntry {
    model_view: DMat4,
    eye_local: DVec3,
}

impl StackEntry {
    fn new(model_view: DMat4) -> Self {
        // The eye sits at the view-space origin.
        Self {
            model_view,
            eye_local: model_view.inverse().transform_point3(DVec3::ZERO),
        }
    }
}

/// A camera's model-view stack.
///
/// The bottom entry is the camera's view matrix and is never popped.
#[derive(Debug, Clone)]
pub struct CullState {
    stack: Vec<StackEntry>,
    lod_scale: f32,
    push_count: u64,
}

impl CullState {
    /// Creates a stack rooted at `view_matrix` (world to eye).
    pub fn new(view_matrix: DMat4, lod_scale: f32) -> Self {
        Self {
            stack: vec![StackEntry::new(view_matrix)],
            lod_scale,
            push_count: 0,
        }
    }

    /// Creates a stack for a camera at `eye` looking at `target`.
    pub fn look_at(eye: DVec3, target: DVec3, up: DVec3, lod_scale: f32) -> Self {
        Self::new(DMat4::look_at_rh(eye, target, up), lod_scale)
    }

    /// Changes the LOD multiplier.
    pub fn set_lod_scale(&mut self, lod_scale: f32) {
        self.lod_scale = lod_scale;
    }

    /// Number of matrices above the camera's view matrix.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Total number of pushes since creation.
    pub fn push_count(&self) -> u64 {
        self.push_count
    }

    fn top(&self) -> &StackEntry {
        // The root entry is never popped.
        &self.stack[self.stack.len() - 1]
    }
}

impl CullTraversal for CullState {
    fn model_view_matrix(&self) -> DMat4 {
        self.top().model_view
    }

    fn push_model_view_matrix(&mut self, matrix: DMat4) {
        self.push_count += 1;
        self.stack.push(StackEntry::new(matrix));
    }

    fn pop_model_view_matrix(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            log::warn!("Unbalanced model-view pop ignored");
        }
    }

    fn view_point_local(&self) -> DVec3 {
        self.top().eye_local
    }

    fn lod_scale(&self) -> f32 {
        self.lod_scale
    }
}

/// A node-enter event emitted by the traversal driver.
#[derive(Debug, Clone, Copy)]
pub enum TerrainNodeRef<'a> {
    /// Entering a tile. All following surfaces belong to it until the next tile.
    Tile(&'a TileNode),
    /// Entering the geometry-bearing child of the current tile.
    Surface(&'a SurfaceNode),
}

impl<'a> TerrainNodeRef<'a> {
    /// Returns `true` for tile events.
    pub fn is_tile(&self) -> bool {
        matches!(self, TerrainNodeRef::Tile(_))
    }

    /// Returns `true` for surface events.
    pub fn is_surface(&self) -> bool {
        matches!(self, TerrainNodeRef::Surface(_))
    }
}

/// Receives node-enter events during a traversal.
pub trait TerrainVisitor<'a> {
    /// Called once per entered node, in depth-first order.
    fn apply(&mut self, node: TerrainNodeRef<'a>);
}

/// Walks `tile` and its descendants depth-first.
///
/// Each tile emits `Tile` then `Surface` before its children are visited.
/// Traversal always continues into children.
pub fn traverse<'a, V>(tile: &'a TileNode, visitor: &mut V)
where
    V: TerrainVisitor<'a> + ?Sized,
{
    visitor.apply(TerrainNodeRef::Tile(tile));
    visitor.apply(TerrainNodeRef::Surface(tile.surface()));
    for child in tile.children() {
        traverse(child, visitor);
    }
}

/// Walks every root in order.
pub fn traverse_all<'a, V>(roots: &'a [TileNode], visitor: &mut V)
where
    V: TerrainVisitor<'a> + ?Sized,
{
    for root in roots {
        traverse(root, visitor);
    }
}
