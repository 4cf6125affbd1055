//! Indirect draw buffer support for GPU-driven rendering.
//!
//! This module provides type-safe wrappers for indirect draw commands and
//! buffers. Buffers are created and written through a [`RenderContext`], so
//! the same code drives wgpu or the recording mock.
//!
//! # Feature Requirements
//!
//! - `INDIRECT_FIRST_INSTANCE`: Required for a non-zero `first_instance` in indirect commands.
//! - `multi_draw_indexed_indirect()`: Requires `DownlevelFlags::INDIRECT_EXECUTION`.

use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use prism_test_utils::{GpuBuffer, RenderContext};

/// Indirect draw command for indexed geometry.
///
/// This matches the layout expected by `wgpu::RenderPass::draw_indexed_indirect`
/// and by `VkDrawIndexedIndirectCommand`.
///
/// # Fields
///
/// * `index_count` - Number of indices to draw
/// * `instance_count` - Number of instances to draw
/// * `first_index` - Index of the first index to draw
/// * `base_vertex` - Value added to each index before indexing into the vertex buffer
/// * `first_instance` - Instance ID of the first instance (requires INDIRECT_FIRST_INSTANCE)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DrawIndexedIndirect {
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub base_vertex: i32,
    pub first_instance: u32,
}

// SAFETY: DrawIndexedIndirect is a repr(C) struct with no padding
unsafe impl Pod for DrawIndexedIndirect {}
unsafe impl Zeroable for DrawIndexedIndirect {}

static_assertions::assert_eq_size!(DrawIndexedIndirect, [u32; 5]);

impl DrawIndexedIndirect {
    /// Create a new indexed indirect draw command.
    pub const fn new(
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        first_instance: u32,
    ) -> Self {
        Self {
            index_count,
            instance_count,
            first_index,
            base_vertex,
            first_instance,
        }
    }

    /// A single-instance draw whose instance index selects per-object data.
    pub const fn single(index_count: u32, first_index: u32, base_vertex: i32, object: u32) -> Self {
        Self::new(index_count, 1, first_index, base_vertex, object)
    }

    /// Size of the command in bytes.
    pub const fn size() -> u64 {
        std::mem::size_of::<Self>() as u64
    }
}

/// Marker trait for indirect draw command types.
pub trait IndirectCommand: Pod + Zeroable + Default {
    /// Size of a single command in bytes.
    const SIZE: u64;
}

impl IndirectCommand for DrawIndexedIndirect {
    const SIZE: u64 = std::mem::size_of::<Self>() as u64;
}

/// A fixed-capacity GPU buffer of indirect commands.
///
/// # Type Parameters
///
/// * `T` - The type of indirect command
///
/// # Example
///
/// ```
/// use prism_render::{DrawIndexedIndirect, IndirectBuffer};
/// use prism_test_utils::MockRenderContext;
///
/// let ctx = MockRenderContext::new();
/// let indirect = IndirectBuffer::<DrawIndexedIndirect>::new(&ctx, Some("commands"), 100);
///
/// indirect.write(&ctx, &[DrawIndexedIndirect::single(36, 0, 0, 7)]);
/// assert_eq!(indirect.offset_of(2), 40);
/// ```
pub struct IndirectBuffer<T: IndirectCommand> {
    buffer: GpuBuffer,
    capacity: usize,
    _marker: PhantomData<T>,
}

impl<T: IndirectCommand> IndirectBuffer<T> {
    /// Create a new indirect buffer with the specified capacity.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The render context creating the buffer
    /// * `label` - Optional debug label
    /// * `capacity` - Maximum number of commands the buffer can hold
    pub fn new(ctx: &dyn RenderContext, label: Option<&str>, capacity: usize) -> Self {
        let buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
            label,
            size: T::SIZE * capacity as u64,
            usage: wgpu::BufferUsages::INDIRECT
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            capacity,
            _marker: PhantomData,
        }
    }

    /// Get the underlying buffer.
    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    /// Get the capacity (maximum number of commands).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the size of the buffer in bytes.
    pub fn size_bytes(&self) -> u64 {
        T::SIZE * self.capacity as u64
    }

    /// Get the byte offset of a command at the given index.
    pub fn offset_of(&self, index: usize) -> u64 {
        T::SIZE * index as u64
    }

    /// Write commands to the buffer starting at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the write would exceed the buffer capacity.
    pub fn write_at(&self, ctx: &dyn RenderContext, start_index: usize, commands: &[T]) {
        assert!(
            start_index + commands.len() <= self.capacity,
            "Indirect buffer write would exceed capacity: {} + {} > {}",
            start_index,
            commands.len(),
            self.capacity
        );

        let offset = T::SIZE * start_index as u64;
        ctx.write_buffer(&self.buffer, offset, bytemuck::cast_slice(commands));
    }

    /// Write commands to the buffer starting at index 0.
    ///
    /// # Panics
    ///
    /// Panics if the write would exceed the buffer capacity.
    pub fn write(&self, ctx: &dyn RenderContext, commands: &[T]) {
        self.write_at(ctx, 0, commands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_indexed_indirect_size() {
        // Verify the struct matches wgpu's expected layout
        assert_eq!(DrawIndexedIndirect::size(), 20); // 4 u32s + 1 i32 = 20 bytes
        assert_eq!(DrawIndexedIndirect::SIZE, 20);
    }

    #[test]
    fn test_draw_indexed_indirect_single() {
        let cmd = DrawIndexedIndirect::single(36, 12, -4, 9);
        assert_eq!(cmd.index_count, 36);
        assert_eq!(cmd.instance_count, 1);
        assert_eq!(cmd.first_index, 12);
        assert_eq!(cmd.base_vertex, -4);
        assert_eq!(cmd.first_instance, 9);
    }

    #[test]
    fn test_byte_layout() {
        let cmd = DrawIndexedIndirect::single(3, 6, 1, 2);
        let bytes: &[u8] = bytemuck::bytes_of(&cmd);
        let words: Vec<u32> = bytes
            .chunks_exact(4)
            .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(words, vec![3, 1, 6, 1, 2]);
    }

    mod mock {
        use super::super::*;
        use prism_test_utils::MockRenderContext;

        #[test]
        fn test_buffer_creation() {
            let ctx = MockRenderContext::new();
            let indirect = IndirectBuffer::<DrawIndexedIndirect>::new(&ctx, Some("test"), 8);

            assert_eq!(indirect.capacity(), 8);
            assert_eq!(indirect.size_bytes(), 160);
            assert_eq!(indirect.buffer().size(), 160);
            let usage = ctx.buffer_usage(indirect.buffer()).unwrap();
            assert!(usage.contains(wgpu::BufferUsages::INDIRECT | wgpu::BufferUsages::COPY_DST));
        }

        #[test]
        fn test_write_at_offset() {
            let ctx = MockRenderContext::new();
            let indirect = IndirectBuffer::<DrawIndexedIndirect>::new(&ctx, None, 4);
            let cmd = DrawIndexedIndirect::single(6, 0, 0, 3);

            indirect.write_at(&ctx, 2, &[cmd]);

            let read: Vec<DrawIndexedIndirect> = ctx.read_buffer(indirect.buffer(), 4);
            assert_eq!(read[0], DrawIndexedIndirect::default());
            assert_eq!(read[2], cmd);
        }

        #[test]
        #[should_panic(expected = "exceed capacity")]
        fn test_write_past_capacity_panics() {
            let ctx = MockRenderContext::new();
            let indirect = IndirectBuffer::<DrawIndexedIndirect>::new(&ctx, None, 2);
            indirect.write_at(&ctx, 1, &[DrawIndexedIndirect::default(); 2]);
        }
    }
}
