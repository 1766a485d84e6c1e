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

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use terra_core::math::{BoundingSphere, DMat4, DVec3};
use terra_core::terrain::{
    Layer, LayerKind, LayerUid, MapFrame, MapLayer, PatchLayer, RenderBindings, RenderContext,
    RenderingPass, SurfaceNode, TileGeometry, TileKey, TileNode, TileRenderModel,
};
use terra_core::traversal::CullState;
use terra_lanes::render_lane::TerrainCuller;

fn build_tile(key: TileKey, center: DVec3, half_size: f64, depth: u32, imagery: &Arc<Layer>) -> TileNode {
    let surface = SurfaceNode::new(
        DMat4::from_translation(center),
        BoundingSphere::new(DVec3::ZERO, half_size * std::f64::consts::SQRT_2),
        Arc::new(TileGeometry::default()),
    );
    let model = TileRenderModel::new()
        .with_pass(RenderingPass::default_pass(vec![]))
        .with_pass(RenderingPass::for_layer(imagery.clone(), vec![]));
    let mut tile = TileNode::new(key, surface).with_render_model(model);
    if depth > 0 {
        let quarter = half_size / 2.0;
        for q in 0..4 {
            let offset = DVec3::new(
                if q % 2 == 0 { -quarter } else { quarter },
                if q < 2 { -quarter } else { quarter },
                0.0,
            );
            tile.add_child(build_tile(key.child(q), center + offset, quarter, depth - 1, imagery));
        }
    }
    tile
}

fn bench_cull(c: &mut Criterion) {
    let imagery = Arc::new(Layer::new(LayerUid(1), "imagery", LayerKind::Image));
    let frame = MapFrame::new(vec![
        MapLayer::Data(imagery.clone()),
        MapLayer::Data(Arc::new(Layer::new(LayerUid(2), "roads", LayerKind::Tile))),
        MapLayer::Patch(Arc::new(PatchLayer::new(LayerUid(3), "grass"))),
    ]);
    let context = RenderContext::new(frame, RenderBindings::default(), true);

    // 1 + 4 + 16 + 64 + 256 + 1024 tiles.
    let roots = vec![build_tile(TileKey::new(0, 0, 0), DVec3::ZERO, 10_000.0, 5, &imagery)];

    let mut group = c.benchmark_group("Terrain Cull");

    group.bench_function("Quadtree depth 5, three layers", |b| {
        let camera = CullState::look_at(DVec3::new(0.0, -5_000.0, 3_000.0), DVec3::ZERO, DVec3::Z, 1.0);
        let mut culler = TerrainCuller::new(&context, camera);
        let mut frame_number = 0;
        b.iter(|| {
            frame_number += 1;
            culler.setup(frame_number);
            culler.cull(black_box(&roots)).ok();
            black_box(culler.render_data().total_commands());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cull);
criterion_main!(benches);
