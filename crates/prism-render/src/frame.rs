//! Frame-in-flight resource rotation.
//!
//! While the GPU consumes frame K the CPU records frame K+1 into a different
//! slot. Each slot owns its own indirect and view buffers, so a write into one
//! slot can never be observed through another. Waiting for the GPU to release
//! a slot is the caller's job.

use prism_core::profiling::profile_function;
use prism_test_utils::{GpuBuffer, RenderContext};

use crate::config::{ConfigError, RendererConfig};
use crate::indirect::{DrawIndexedIndirect, IndirectBuffer};
use crate::view::GpuViewData;

/// Transient GPU resources of one frame in flight.
pub struct FrameSlot {
    index: usize,
    indirect: IndirectBuffer<DrawIndexedIndirect>,
    view_buffer: GpuBuffer,
    /// Commands already uploaded into `indirect` this frame.
    commands_written: usize,
}

impl FrameSlot {
    fn new(ctx: &dyn RenderContext, index: usize, max_draw_entries: usize) -> Self {
        let indirect_label = format!("Indirect Buffer [{}]", index);
        let view_label = format!("View Data [{}]", index);

        let indirect = IndirectBuffer::new(ctx, Some(indirect_label.as_str()), max_draw_entries);
        let view_buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
            label: Some(view_label.as_str()),
            size: GpuViewData::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            index,
            indirect,
            view_buffer,
            commands_written: 0,
        }
    }

    /// Slot index, used to pick per-slot descriptor sets.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn indirect(&self) -> &IndirectBuffer<DrawIndexedIndirect> {
        &self.indirect
    }

    pub fn view_buffer(&self) -> &GpuBuffer {
        &self.view_buffer
    }

    pub fn commands_written(&self) -> usize {
        self.commands_written
    }

    /// Commands that still fit into the indirect buffer this frame.
    pub fn remaining_capacity(&self) -> usize {
        self.indirect.capacity() - self.commands_written
    }

    pub fn write_view(&self, ctx: &dyn RenderContext, data: &GpuViewData) {
        profile_function!();
        ctx.write_buffer(&self.view_buffer, 0, bytemuck::bytes_of(data));
    }

    /// Upload `commands` after the ones already written this frame.
    ///
    /// Returns the command index of the first uploaded command. Several passes
    /// share one slot this way without overwriting each other.
    ///
    /// # Panics
    ///
    /// Panics if the commands do not fit into the indirect buffer.
    pub fn push_commands(&mut self, ctx: &dyn RenderContext, commands: &[DrawIndexedIndirect]) -> usize {
        let start = self.commands_written;
        if commands.is_empty() {
            return start;
        }
        self.indirect.write_at(ctx, start, commands);
        self.commands_written += commands.len();
        start
    }

    /// Forget this frame's commands. Called when the slot comes around again.
    pub fn reset(&mut self) {
        self.commands_written = 0;
    }
}

/// Rotating set of frame slots, selected by `frame_index % len`.
pub struct FrameSlots {
    slots: Vec<FrameSlot>,
    frame_index: u64,
}

impl FrameSlots {
    /// Create every slot's buffers up front.
    pub fn new(ctx: &dyn RenderContext, config: &RendererConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let slots = (0..config.frames_in_flight)
            .map(|index| FrameSlot::new(ctx, index, config.max_draw_entries))
            .collect();

        tracing::debug!(
            "Created {} frame slots with {} indirect commands each",
            config.frames_in_flight,
            config.max_draw_entries
        );

        Ok(Self {
            slots,
            frame_index: 0,
        })
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        (self.frame_index % self.slots.len() as u64) as usize
    }

    pub fn current(&self) -> &FrameSlot {
        &self.slots[self.current_index()]
    }

    pub fn current_mut(&mut self) -> &mut FrameSlot {
        let index = self.current_index();
        &mut self.slots[index]
    }

    /// Move to the next frame. The newly selected slot starts empty.
    pub fn advance(&mut self) {
        self.frame_index += 1;
        self.current_mut().reset();
    }

    /// Number of frames advanced past since creation.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&FrameSlot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameSlot> {
        self.slots.iter()
    }
}
