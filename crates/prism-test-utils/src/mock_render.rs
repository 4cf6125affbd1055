//! Mock implementation of RenderContext for testing.
//!
//! This module provides a mock GPU context that records operations and keeps
//! a CPU copy of every buffer, without touching a GPU.

use crate::{gpu_types::GpuBuffer, render_context::RenderContext};
use bytemuck::Pod;
use parking_lot::Mutex;
use wgpu::*;

/// Records a GPU operation call for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    CreateBuffer {
        label: Option<String>,
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        size: usize,
    },
}

/// Mock buffers stored in the context.
#[derive(Debug, Clone)]
struct MockBuffer {
    usage: BufferUsages,
    contents: Vec<u8>,
}

/// Mock implementation of RenderContext for testing.
///
/// # Borrow Checking Pattern: Interior Mutability
///
/// Methods take `&self` but need to mutate internal state (record calls).
/// `parking_lot::Mutex` keeps the type `Send + Sync`, which the trait requires.
///
/// # Example
///
/// ```rust
/// use prism_test_utils::{MockRenderContext, RenderContext};
/// use wgpu::*;
///
/// let mock = MockRenderContext::new();
///
/// let buffer = mock.create_buffer(&BufferDescriptor {
///     label: None,
///     size: 8,
///     usage: BufferUsages::UNIFORM,
///     mapped_at_creation: false,
/// });
/// mock.write_buffer(&buffer, 4, &[9, 9, 9, 9]);
///
/// assert!(buffer.is_mock());
/// assert_eq!(mock.buffer_contents(&buffer), vec![0, 0, 0, 0, 9, 9, 9, 9]);
/// ```
pub struct MockRenderContext {
    /// Recorded calls for verification
    calls: Mutex<Vec<RenderCall>>,

    /// Mock buffers (we don't create real GPU buffers)
    buffers: Mutex<Vec<MockBuffer>>,
}

impl MockRenderContext {
    /// Create a new mock render context.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            buffers: Mutex::new(Vec::new()),
        }
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    /// Count buffer create operations.
    pub fn count_buffer_creates(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::CreateBuffer { .. }))
            .count()
    }

    /// Count buffer write operations.
    pub fn count_buffer_writes(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::WriteBuffer { .. }))
            .count()
    }

    /// Count writes that targeted one specific buffer.
    pub fn count_writes_to(&self, buffer: &GpuBuffer) -> usize {
        let Some(id) = buffer.mock_id() else {
            return 0;
        };
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::WriteBuffer { buffer_id, .. } if *buffer_id == id))
            .count()
    }

    /// Snapshot of a mock buffer's bytes.
    ///
    /// # Panics
    /// Panics if the buffer was not created by this context.
    pub fn buffer_contents(&self, buffer: &GpuBuffer) -> Vec<u8> {
        let id = buffer
            .mock_id()
            .expect("buffer_contents requires a mock buffer");
        self.buffers.lock()[id].contents.clone()
    }

    /// Read the first `count` elements of a mock buffer as `T`.
    pub fn read_buffer<T: Pod>(&self, buffer: &GpuBuffer, count: usize) -> Vec<T> {
        let bytes = self.buffer_contents(buffer);
        let stride = std::mem::size_of::<T>();
        bytes[..count * stride]
            .chunks_exact(stride)
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    /// Usage flags a mock buffer was created with.
    pub fn buffer_usage(&self, buffer: &GpuBuffer) -> Option<BufferUsages> {
        let id = buffer.mock_id()?;
        self.buffers.lock().get(id).map(|b| b.usage)
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let mut buffers = self.buffers.lock();
        let id = buffers.len();

        buffers.push(MockBuffer {
            usage: desc.usage,
            contents: vec![0; desc.size as usize],
        });

        self.calls.lock().push(RenderCall::CreateBuffer {
            label: desc.label.map(|s| s.to_string()),
            size: desc.size,
            usage: desc.usage,
        });

        GpuBuffer::mock(id, desc.size)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        let Some(buffer_id) = buffer.mock_id() else {
            return;
        };

        let mut buffers = self.buffers.lock();
        let contents = &mut buffers[buffer_id].contents;
        let start = offset as usize;
        let end = start + data.len();
        assert!(
            end <= contents.len(),
            "Mock write of {} bytes at offset {} overflows buffer of {} bytes",
            data.len(),
            offset,
            contents.len()
        );
        contents[start..end].copy_from_slice(data);

        self.calls.lock().push(RenderCall::WriteBuffer {
            buffer_id,
            offset,
            size: data.len(),
        });
    }
}
