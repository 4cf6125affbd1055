//! Frame Loop Demo
//!
//! Drives an opaque and a shadow pass over a scrolling field of renderables
//! for a few frames, recording into the mock command stream, and logs what
//! each frame would have submitted.
//!
//! Run with:
//!   RUST_LOG=prism_render=trace cargo run -p prism-render --example frame_loop

use std::sync::Arc;

use glam::{Mat4, Vec3};
use prism_core::logging;
use prism_core::profiling::{new_frame, profile_scope, set_enabled};
use prism_render::*;
use prism_test_utils::{MockCommandStream, MockRenderContext};

const FRAMES: u32 = 6;
const RENDERABLES: u32 = 5_000;
const MATERIALS: u32 = 8;

fn main() {
    logging::init();
    set_enabled(true);

    let ctx = Arc::new(MockRenderContext::new());
    let config = RendererConfig {
        frames_in_flight: 3,
        max_draw_entries: 16_384,
    };
    let mut renderer = Renderer::new(ctx.clone(), Arc::new(TaskPool::default_threads()), config)
        .expect("Failed to create renderer");
    renderer
        .add_pass(DrawPassConfig::opaque())
        .expect("Invalid opaque pass");
    renderer
        .add_pass(DrawPassConfig::new("shadow", PassMask::SHADOW, 60.0))
        .expect("Invalid shadow pass");

    let mut meshes = MergedMeshTable::new();
    let (cube, _) = meshes.append(36, 24);
    let (quad, _) = meshes.append(6, 4);

    let mut materials = MaterialTable::new();
    for m in 0..MATERIALS {
        let sets = (0..config.frames_in_flight as u32)
            .map(|slot| DescriptorSetHandle(m * 10 + slot))
            .collect();
        materials.insert(MaterialHandle(m), MaterialBinding::new(PipelineHandle(m), sets));
    }

    let world: Arc<[RenderableData]> = (0..RENDERABLES)
        .map(|i| {
            let mut mask = PassMask::OPAQUE;
            if i % 3 == 0 {
                mask |= PassMask::SHADOW;
            }
            let mut pairs = vec![MeshMaterialPair::new(cube, MaterialHandle(i % MATERIALS))];
            if i % 5 == 0 {
                pairs.push(MeshMaterialPair::new(quad, MaterialHandle((i + 1) % MATERIALS)));
            }
            RenderableData::new(
                Vec3::new((i % 100) as f32 - 50.0, 0.0, -((i / 100) as f32) * 2.0),
                Vec3::splat(0.5),
                mask,
                pairs,
                i,
            )
        })
        .collect();

    let proj = Mat4::perspective_rh(60f32.to_radians(), 16.0 / 9.0, 0.1, 500.0);
    let mut view = View::perspective(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 60.0, 16.0 / 9.0, 0.1, 500.0);

    for frame in 0..FRAMES {
        new_frame();
        profile_scope!("frame");

        let eye = Vec3::new(0.0, 2.0, -(frame as f32) * 10.0);
        view.tick(eye, Mat4::look_at_rh(eye, eye + Vec3::NEG_Z, Vec3::Y), proj);
        renderer.set_view(view);

        let mut stream = MockCommandStream::new();
        renderer.prepare(&world);
        let stats = renderer.record(&mut stream, &meshes, &materials);

        tracing::info!(
            "Frame {} (slot {}): {} renderables, {} batches, {} draw calls, {} pipeline binds",
            frame,
            renderer.frames().current_index(),
            stats.renderables,
            stats.batches,
            stats.draw_calls,
            stats.pipeline_binds
        );

        renderer.end_frame();
        ctx.clear_calls();
    }
}
