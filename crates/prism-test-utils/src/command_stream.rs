//! The command surface a draw pass records into.

use crate::gpu_types::{DescriptorSetHandle, GpuBuffer, PipelineHandle};

/// Minimal command-encoding surface used by the draw pass.
///
/// Implementations translate these calls into a real render pass (see the
/// wgpu stream in `prism-render`) or record them for inspection.
pub trait CommandStream {
    /// Bind a graphics pipeline.
    fn bind_pipeline(&mut self, pipeline: PipelineHandle);

    /// Bind a descriptor set (bind group).
    fn bind_descriptor(&mut self, set: DescriptorSetHandle);

    /// Issue `count` indexed draws whose parameters are read from `buffer`,
    /// starting at byte `offset` and advancing `stride` bytes per command.
    fn draw_indexed_indirect(&mut self, buffer: &GpuBuffer, offset: u64, count: u32, stride: u32);
}
