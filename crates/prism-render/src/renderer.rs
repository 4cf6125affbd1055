use std::sync::Arc;

use prism_core::profiling::profile_function;
use prism_test_utils::{CommandStream, RenderContext};

use crate::config::{ConfigError, DrawPassConfig, RendererConfig};
use crate::draw_pass::{DrawPass, DrawPassStats};
use crate::frame::{FrameSlot, FrameSlots};
use crate::material::MaterialTable;
use crate::mesh::MergedMeshTable;
use crate::renderable::RenderableData;
use crate::scheduler::Scheduler;
use crate::view::View;

/// Drives the draw passes of one view through the frame loop.
///
/// Per frame: [`set_view`](Self::set_view), [`prepare`](Self::prepare),
/// [`record`](Self::record), [`end_frame`](Self::end_frame). A frame that is
/// skipped simply does not call these. Waiting for the GPU to finish with the
/// slot `end_frame` rotates to is the caller's job.
pub struct Renderer {
    context: Arc<dyn RenderContext>,
    scheduler: Arc<dyn Scheduler>,
    config: RendererConfig,
    view: View,
    frames: FrameSlots,
    passes: Vec<DrawPass>,
}

impl Renderer {
    /// Create a renderer and allocate every frame slot.
    pub fn new(
        context: Arc<dyn RenderContext>,
        scheduler: Arc<dyn Scheduler>,
        config: RendererConfig,
    ) -> Result<Self, ConfigError> {
        let frames = FrameSlots::new(context.as_ref(), &config)?;
        let view = View::new(
            glam::Vec3::ZERO,
            glam::Mat4::IDENTITY,
            glam::Mat4::IDENTITY,
            0.0,
            1.0,
        );

        Ok(Self {
            context,
            scheduler,
            config,
            view,
            frames,
            passes: Vec::new(),
        })
    }

    /// Append a pass. Passes record in the order they were added.
    ///
    /// Returns the index of the new pass.
    pub fn add_pass(&mut self, config: DrawPassConfig) -> Result<usize, ConfigError> {
        let pass = DrawPass::new(config, self.scheduler.clone())?;
        self.passes.push(pass);
        Ok(self.passes.len() - 1)
    }

    /// Set the camera for the coming frame.
    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Extract and batch every pass, and upload the view into the current slot.
    pub fn prepare(&mut self, draw_list: &Arc<[RenderableData]>) {
        profile_function!();

        for pass in &mut self.passes {
            pass.prepare_render_data(draw_list, &self.view);
        }
        self.frames
            .current()
            .write_view(self.context.as_ref(), &self.view.gpu_data());
    }

    /// Record every pass into `stream`. Returns the summed pass stats.
    pub fn record(
        &mut self,
        stream: &mut dyn CommandStream,
        meshes: &MergedMeshTable,
        materials: &MaterialTable,
    ) -> DrawPassStats {
        profile_function!();

        let slot = self.frames.current_mut();
        let mut total = DrawPassStats::default();
        for pass in &mut self.passes {
            total += pass.record_draw_commands(self.context.as_ref(), stream, slot, meshes, materials);
        }
        total
    }

    /// Finish the frame and rotate to the next slot.
    pub fn end_frame(&mut self) {
        self.frames.advance();
        tracing::trace!(
            "Frame {} begins on slot {}",
            self.frames.frame_index(),
            self.frames.current_index()
        );
    }

    pub fn context(&self) -> &dyn RenderContext {
        self.context.as_ref()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn frames(&self) -> &FrameSlots {
        &self.frames
    }

    /// Slot the current frame records into.
    pub fn current_slot(&self) -> &FrameSlot {
        self.frames.current()
    }

    pub fn passes(&self) -> &[DrawPass] {
        &self.passes
    }

    pub fn pass(&self, name: &str) -> Option<&DrawPass> {
        self.passes.iter().find(|p| p.name() == name)
    }
}
