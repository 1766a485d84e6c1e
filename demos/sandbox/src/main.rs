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

//! Runs one terrain cull pass and one label build over synthetic data.
//!
//! Usage: `sandbox [config.ron]`. Without an argument the bundled
//! `terrain.ron` is used.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use terra_core::feature::{Feature, FilterContext, Geometry, LineOrientation, TextSymbol};
use terra_core::math::{BoundingSphere, DMat4, DVec3};
use terra_core::telemetry::GaugeSink;
use terra_core::terrain::{
    DrawTileCommand, ElevationRaster, LayerUid, MapLayer, PatchDrawCallback, PatchLayer,
    RenderContext, RenderingPass, SurfaceNode, TileGeometry, TileKey, TileNode, TileRenderModel,
};
use terra_core::traversal::CullState;
use terra_core::TerrainConfig;
use terra_lanes::label_lane::BuildTextLane;
use terra_lanes::render_lane::TerrainCuller;
use terra_telemetry::MetricsRegistry;

const GRASS: LayerUid = LayerUid(100);
const TREE_DEPTH: u32 = 3;
const ROOT_HALF_SIZE: f64 = 8_000.0;
const RASTER_SIZE: u32 = 17;

struct LoggingPatchDraw;

impl PatchDrawCallback for LoggingPatchDraw {
    fn draw_tile(&self, command: &DrawTileCommand) {
        log::trace!("grass patch on tile {} at range {:.1}", command.key, command.range);
    }
}

/// Builds a full quadtree with one pass per data layer that has per-tile imagery.
fn build_tile(
    context: &RenderContext,
    raster: &Arc<ElevationRaster>,
    key: TileKey,
    center: DVec3,
    half_size: f64,
    depth: u32,
) -> TileNode {
    let geometry = Arc::new(TileGeometry {
        label: format!("tile {key}"),
        vertex_count: RASTER_SIZE * RASTER_SIZE,
        index_count: (RASTER_SIZE - 1) * (RASTER_SIZE - 1) * 6,
    });
    let surface = SurfaceNode::new(
        DMat4::from_translation(center),
        BoundingSphere::new(DVec3::ZERO, half_size * std::f64::consts::SQRT_2),
        geometry,
    );

    let mut model = TileRenderModel::new().with_pass(RenderingPass::default_pass(vec![]));
    for layer in context.map_frame().layers() {
        if let MapLayer::Data(layer) = layer {
            if layer.is_image() {
                model.add_pass(RenderingPass::for_layer(Arc::clone(layer), vec![]));
            }
        }
    }

    let mut tile = TileNode::new(key, surface)
        .with_render_model(model)
        .with_elevation_raster(Arc::clone(raster));

    if depth > 0 {
        let quarter = half_size / 2.0;
        for q in 0..4 {
            let offset = DVec3::new(
                if q % 2 == 0 { -quarter } else { quarter },
                if q < 2 { -quarter } else { quarter },
                0.0,
            );
            tile.add_child(build_tile(
                context,
                raster,
                key.child(q),
                center + offset,
                quarter,
                depth - 1,
            ));
        }
    }
    tile
}

fn sample_features() -> Vec<Feature> {
    vec![
        Feature::new(1, Geometry::Point(DVec3::new(-2_000.0, 1_500.0, 0.0)))
            .with_attr("name", "Springfield")
            .with_attr("state", "Oregon"),
        Feature::new(2, Geometry::Point(DVec3::new(3_000.0, -2_500.0, 0.0)))
            .with_attr("name", "Eugene")
            .with_attr("state", "Oregon"),
        Feature::new(
            3,
            Geometry::LineString(vec![
                DVec3::new(-6_000.0, -6_000.0, 0.0),
                DVec3::new(0.0, -1_000.0, 0.0),
                DVec3::new(6_000.0, 4_000.0, 0.0),
            ]),
        )
        .with_attr("name", "McKenzie River")
        .with_attr("state", "Oregon"),
        Feature::annotation(4, Geometry::Point(DVec3::new(0.0, 0.0, 0.0)), "Valley"),
    ]
}

fn main() -> Result<()> {
    terra_telemetry::init_logging("info");

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("terrain.ron"));
    let config = TerrainConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let mut context = RenderContext::from_config(&config).context("building render context")?;
    let grass = PatchLayer::new(GRASS, "grass")
        .with_accept_callback(|key: &TileKey| key.lod >= 2)
        .with_draw_callback(Arc::new(LoggingPatchDraw));
    context
        .add_patch_layer(Arc::new(grass))
        .context("attaching grass patch layer")?;

    let raster = Arc::new(
        ElevationRaster::flat(RASTER_SIZE, RASTER_SIZE, 0.0).context("building elevation raster")?,
    );
    let roots = vec![build_tile(
        &context,
        &raster,
        TileKey::new(0, 0, 0),
        DVec3::ZERO,
        ROOT_HALF_SIZE,
        TREE_DEPTH,
    )];
    log::info!("Built quadtree with {} tiles", roots[0].subtree_len());

    let registry = MetricsRegistry::new();
    let orphaned = registry.register_counter("terrain", "orphaned_passes", "Draws without a layer batch")?;
    let commands = registry.register_gauge("terrain", "draw_commands", "Draw commands in the last frame")?;

    let camera = CullState::look_at(
        DVec3::new(0.0, -12_000.0, 6_000.0),
        DVec3::ZERO,
        DVec3::Z,
        context.lod_scale(),
    );
    let mut culler = TerrainCuller::new(&context, camera).with_orphan_sink(Arc::new(orphaned));
    culler.setup(1);
    culler.cull(&roots).context("culling frame 1")?;

    let data = culler.render_data();
    commands.set(data.total_commands() as f64);
    for binding in data.bindings().iter() {
        log::debug!("Sampler '{}' ({:?}) on unit {}", binding.name, binding.usage, binding.unit);
    }
    for drawable in data.layers() {
        log::info!(
            "Layer {} '{}' (order {}): {} draw commands",
            drawable.uid(),
            drawable.layer().name(),
            drawable.order(),
            drawable.len()
        );
    }
    let patch_draws = data
        .layer(GRASS)
        .map(|drawable| drawable.tiles().iter().filter(|c| c.draw_patch_tile()).count())
        .unwrap_or(0);
    log::info!("Ran {} grass patch draws", patch_draws);

    let bounds = data.draw_state().bounding_sphere;
    log::info!(
        "Frame bounds: center {:?}, radius {:.1}",
        bounds.center,
        bounds.radius
    );

    let mut symbol = TextSymbol::with_content("[name], [state]");
    symbol.remove_duplicate_labels = Some(true);
    symbol.line_orientation = Some(LineOrientation::Parallel);
    let labels = BuildTextLane::new()
        .build(&sample_features(), Some(&symbol), &FilterContext::projected())
        .unwrap_or_default();
    for label in labels.iter() {
        log::info!("Label {:?} at {:?}", label.text, label.position);
    }

    registry.log_snapshot();
    Ok(())
}
