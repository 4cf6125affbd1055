//! Trait abstracting GPU buffer operations.
//!
//! The `RenderContext` trait lets the draw pass create its frame-slot buffers
//! and upload into them without knowing whether a real device sits behind it.

use crate::gpu_types::GpuBuffer;
use wgpu::BufferDescriptor;

/// Trait abstracting GPU buffer creation and uploads.
///
/// Methods take `&self` and return owned wrapper types, so several components
/// can share one context (via `Arc`) and mocks can record calls through
/// interior mutability.
///
/// # Example
///
/// ```rust,no_run
/// use prism_test_utils::RenderContext;
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload(ctx: &dyn RenderContext, bytes: &[u8]) {
///     let buffer = ctx.create_buffer(&BufferDescriptor {
///         label: None,
///         size: bytes.len() as u64,
///         usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     });
///     ctx.write_buffer(&buffer, 0, bytes);
/// }
/// ```
pub trait RenderContext: Send + Sync {
    /// Create a GPU buffer.
    ///
    /// Returns an owned `GpuBuffer` which can be either real or mock.
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Write data to a buffer.
    ///
    /// For real buffers, this maps to `queue.write_buffer()`.
    /// For mock buffers, this records the operation and stores the bytes.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);
}
