//! [`CommandStream`] over a live `wgpu::RenderPass`.
//!
//! Draw passes only know opaque pipeline and descriptor handles. The
//! [`GpuResourceRegistry`] maps those handles to the wgpu objects they stand
//! for, and [`WgpuCommandStream`] issues the actual render pass commands.
//!
//! Indirect draws are issued with `multi_draw_indexed_indirect`, which needs
//! `DownlevelFlags::INDIRECT_EXECUTION`. Non-zero `first_instance` values need
//! `Features::INDIRECT_FIRST_INSTANCE`. `GraphicsContext` checks both.

use prism_core::alloc::HashMap;
use prism_test_utils::{CommandStream, DescriptorSetHandle, GpuBuffer, PipelineHandle};

use crate::indirect::{DrawIndexedIndirect, IndirectCommand};

/// Handle to wgpu object lookup for pipelines and bind groups.
#[derive(Default)]
pub struct GpuResourceRegistry {
    pipelines: HashMap<PipelineHandle, wgpu::RenderPipeline>,
    bind_groups: HashMap<DescriptorSetHandle, wgpu::BindGroup>,
    next_pipeline: u32,
    next_bind_group: u32,
}

impl GpuResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_pipeline(&mut self, pipeline: wgpu::RenderPipeline) -> PipelineHandle {
        let handle = PipelineHandle(self.next_pipeline);
        self.next_pipeline += 1;
        self.pipelines.insert(handle, pipeline);
        handle
    }

    pub fn register_bind_group(&mut self, bind_group: wgpu::BindGroup) -> DescriptorSetHandle {
        let handle = DescriptorSetHandle(self.next_bind_group);
        self.next_bind_group += 1;
        self.bind_groups.insert(handle, bind_group);
        handle
    }

    pub fn remove_pipeline(&mut self, handle: PipelineHandle) -> Option<wgpu::RenderPipeline> {
        self.pipelines.remove(&handle)
    }

    pub fn remove_bind_group(&mut self, handle: DescriptorSetHandle) -> Option<wgpu::BindGroup> {
        self.bind_groups.remove(&handle)
    }

    /// # Panics
    ///
    /// Panics if the handle was never registered.
    pub fn pipeline(&self, handle: PipelineHandle) -> &wgpu::RenderPipeline {
        match self.pipelines.get(&handle) {
            Some(pipeline) => pipeline,
            None => panic!("Pipeline {:?} is not registered", handle),
        }
    }

    /// # Panics
    ///
    /// Panics if the handle was never registered.
    pub fn bind_group(&self, handle: DescriptorSetHandle) -> &wgpu::BindGroup {
        match self.bind_groups.get(&handle) {
            Some(bind_group) => bind_group,
            None => panic!("Bind group {:?} is not registered", handle),
        }
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub fn bind_group_count(&self) -> usize {
        self.bind_groups.len()
    }
}

/// Records draw pass commands into a wgpu render pass.
///
/// Material descriptor sets are bound at `material_group`. Other groups, such
/// as the view and object data, are bound by the caller before recording.
pub struct WgpuCommandStream<'a, 'pass> {
    pass: &'a mut wgpu::RenderPass<'pass>,
    registry: &'a GpuResourceRegistry,
    material_group: u32,
}

impl<'a, 'pass> WgpuCommandStream<'a, 'pass> {
    pub fn new(
        pass: &'a mut wgpu::RenderPass<'pass>,
        registry: &'a GpuResourceRegistry,
        material_group: u32,
    ) -> Self {
        Self {
            pass,
            registry,
            material_group,
        }
    }
}

impl CommandStream for WgpuCommandStream<'_, '_> {
    fn bind_pipeline(&mut self, pipeline: PipelineHandle) {
        self.pass.set_pipeline(self.registry.pipeline(pipeline));
    }

    fn bind_descriptor(&mut self, set: DescriptorSetHandle) {
        self.pass
            .set_bind_group(self.material_group, self.registry.bind_group(set), &[]);
    }

    fn draw_indexed_indirect(&mut self, buffer: &GpuBuffer, offset: u64, count: u32, stride: u32) {
        // wgpu reads tightly packed commands only.
        assert_eq!(
            stride as u64,
            DrawIndexedIndirect::SIZE,
            "wgpu indirect draws require a stride of {} bytes",
            DrawIndexedIndirect::SIZE
        );
        self.pass
            .multi_draw_indexed_indirect(buffer.as_wgpu(), offset, count);
    }
}
