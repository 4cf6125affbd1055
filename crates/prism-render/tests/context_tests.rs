//! Graphics context lifecycle and real-device buffer tests.

use glam::Vec3;
use prism_render::{
    DrawIndexedIndirect, DrawPass, DrawPassConfig, FrameSlots, GpuResourceRegistry,
    GraphicsContext, GraphicsError, InlineScheduler, MaterialBinding, MaterialHandle,
    MaterialTable, MergedMeshTable, MeshMaterialPair, PassMask, RenderContext, RenderableData,
    RendererConfig, View, WgpuCommandStream,
};
use std::sync::Arc;

const FLAT_SHADER: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    let x = f32(i32(index) - 1);
    let y = f32(i32(index & 1u) * 2 - 1);
    return vec4<f32>(x * 0.5, y * 0.5, 0.5, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.5, 0.0, 1.0);
}
"#;

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

#[test]
#[ignore] // Requires GPU - run with: cargo test --test context_tests -- --ignored
fn test_context_creation_sync() {
    match GraphicsContext::new_owned_sync() {
        Ok(ctx) => {
            assert_eq!(Arc::strong_count(&ctx), 1);
            assert!(
                ctx.device()
                    .features()
                    .contains(wgpu::Features::INDIRECT_FIRST_INSTANCE)
            );
        }
        Err(e) => {
            // Allow test to pass if no suitable GPU (CI environments)
            println!("GPU not available: {}", e);
        }
    }
}

#[test]
#[ignore] // Requires GPU
fn test_context_cleanup() {
    if let Ok(ctx) = GraphicsContext::new_owned_sync() {
        let weak = Arc::downgrade(&ctx);
        assert!(weak.upgrade().is_some());

        drop(ctx);

        assert!(weak.upgrade().is_none());
    }
}

#[test]
#[ignore] // Requires GPU
fn test_frame_slots_on_device() {
    let Ok(ctx) = GraphicsContext::new_owned_sync() else {
        return;
    };

    let config = RendererConfig {
        frames_in_flight: 3,
        max_draw_entries: 64,
    };
    let mut frames = FrameSlots::new(ctx.as_ref(), &config).unwrap();

    for _ in 0..config.frames_in_flight {
        let slot = frames.current_mut();
        assert_eq!(slot.indirect().buffer().size(), 64 * 20);
        slot.push_commands(ctx.as_ref(), &[DrawIndexedIndirect::single(3, 0, 0, 0)]);
        frames.advance();
    }

    ctx.queue().submit([]);
}

#[test]
#[ignore] // Requires GPU
fn test_wgpu_stream_records_frame_slot() {
    let Ok(ctx) = GraphicsContext::new_owned_sync() else {
        return;
    };
    let device = ctx.device();

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Flat Shader"),
        source: wgpu::ShaderSource::Wgsl(FLAT_SHADER.into()),
    });
    let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Layout"),
        entries: &[],
    });
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Flat Pipeline Layout"),
        bind_group_layouts: &[&material_layout],
        push_constant_ranges: &[],
    });
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Flat Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });
    let bind_groups: Vec<wgpu::BindGroup> = (0..2)
        .map(|_| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Material Bind Group"),
                layout: &material_layout,
                entries: &[],
            })
        })
        .collect();

    let mut registry = GpuResourceRegistry::new();
    let pipeline_handle = registry.register_pipeline(pipeline);
    let descriptor_sets = bind_groups
        .into_iter()
        .map(|group| registry.register_bind_group(group))
        .collect();
    assert_eq!(registry.pipeline_count(), 1);
    assert_eq!(registry.bind_group_count(), 2);

    let mut materials = MaterialTable::new();
    materials.insert(
        MaterialHandle(0),
        MaterialBinding::new(pipeline_handle, descriptor_sets),
    );
    let mut meshes = MergedMeshTable::new();
    let (triangle, _) = meshes.append(3, 3);

    let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Triangle Indices"),
        size: 12,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    ctx.queue()
        .write_buffer(&index_buffer, 0, bytemuck::cast_slice(&[0u32, 1, 2]));

    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Stream Target"),
        size: wgpu::Extent3d {
            width: 64,
            height: 64,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let world: Arc<[RenderableData]> = (0..4u32)
        .map(|i| {
            RenderableData::new(
                Vec3::new(i as f32 - 2.0, 0.0, -5.0),
                Vec3::splat(0.5),
                PassMask::OPAQUE,
                vec![MeshMaterialPair::new(triangle, MaterialHandle(0))],
                i,
            )
        })
        .collect();
    let view = View::perspective(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 90.0, 1.0, 0.1, 100.0);

    let config = RendererConfig {
        frames_in_flight: 2,
        max_draw_entries: 16,
    };
    let mut frames = FrameSlots::new(ctx.as_ref(), &config).unwrap();
    let mut pass = DrawPass::new(DrawPassConfig::opaque(), Arc::new(InlineScheduler)).unwrap();
    pass.prepare_render_data(&world, &view);
    pass.update_view_data(ctx.as_ref(), frames.current(), &view);

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Stream Encoder"),
    });
    let stats = {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Stream Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        let mut stream = WgpuCommandStream::new(&mut render_pass, &registry, 0);
        pass.record_draw_commands(
            ctx.as_ref(),
            &mut stream,
            frames.current_mut(),
            &meshes,
            &materials,
        )
    };
    ctx.queue().submit([encoder.finish()]);

    assert_eq!(stats.draw_entries, 4);
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.pipeline_binds, 1);
    assert_eq!(frames.current().commands_written(), 4);
}

#[test]
fn test_graphics_error_display() {
    let err = GraphicsError::MissingFeatures(wgpu::Features::INDIRECT_FIRST_INSTANCE);
    let debug = format!("{:?}", err);
    assert!(debug.contains("MissingFeatures"));
    assert!(err.to_string().contains("missing required features"));
}

#[test]
fn test_context_is_a_render_context() {
    fn assert_render_context<T: RenderContext>() {}
    assert_render_context::<GraphicsContext>();
}
