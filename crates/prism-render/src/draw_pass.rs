//! A single draw pass: extract, batch, record.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use glam::Vec3;
//! use prism_render::*;
//! use prism_test_utils::{DescriptorSetHandle, MockCommandStream, MockRenderContext, PipelineHandle};
//!
//! let ctx = MockRenderContext::new();
//! let mut frames = FrameSlots::new(&ctx, &RendererConfig::default()).unwrap();
//! let mut pass = DrawPass::new(DrawPassConfig::opaque(), Arc::new(InlineScheduler)).unwrap();
//!
//! let mut meshes = MergedMeshTable::new();
//! let (cube, _) = meshes.append(36, 24);
//! let mut materials = MaterialTable::new();
//! materials.insert(
//!     MaterialHandle(0),
//!     MaterialBinding::new(PipelineHandle(0), vec![DescriptorSetHandle(0), DescriptorSetHandle(1)]),
//! );
//!
//! let world: Arc<[RenderableData]> = vec![RenderableData::new(
//!     Vec3::new(0.0, 0.0, -5.0),
//!     Vec3::ONE,
//!     PassMask::OPAQUE,
//!     vec![MeshMaterialPair::new(cube, MaterialHandle(0))],
//!     0,
//! )]
//! .into();
//! let view = View::perspective(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 60.0, 1.0, 0.1, 100.0);
//!
//! pass.prepare_render_data(&world, &view);
//! let mut stream = MockCommandStream::new();
//! let stats = pass.record_draw_commands(&ctx, &mut stream, frames.current_mut(), &meshes, &materials);
//! assert_eq!(stats.draw_calls, 1);
//! ```

use std::ops::AddAssign;
use std::sync::Arc;
use std::time::{Duration, Instant};

use prism_core::profiling::profile_function;
use prism_test_utils::{CommandStream, RenderContext};

use crate::batch::{Batcher, InstancedBatch};
use crate::config::{ConfigError, DrawPassConfig};
use crate::extract::RenderableExtractor;
use crate::frame::FrameSlot;
use crate::material::MaterialTable;
use crate::mesh::MergedMeshTable;
use crate::recorder::{CommandRecorder, RecordStats};
use crate::renderable::RenderableData;
use crate::scheduler::Scheduler;
use crate::view::View;

/// Minimum time between two periodic stat reports of a pass.
pub const STATS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Counters of the last frame of a pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrawPassStats {
    /// Renderables left after extraction.
    pub renderables: usize,
    pub batches: usize,
    pub draw_entries: usize,
    pub draw_calls: usize,
    pub pipeline_binds: usize,
}

impl AddAssign for DrawPassStats {
    fn add_assign(&mut self, rhs: Self) {
        self.renderables += rhs.renderables;
        self.batches += rhs.batches;
        self.draw_entries += rhs.draw_entries;
        self.draw_calls += rhs.draw_calls;
        self.pipeline_binds += rhs.pipeline_binds;
    }
}

pub struct DrawPass {
    config: DrawPassConfig,
    scheduler: Arc<dyn Scheduler>,
    extractor: RenderableExtractor,
    renderables: Vec<RenderableData>,
    batcher: Batcher,
    recorder: CommandRecorder,
    stats: DrawPassStats,
    last_report: Instant,
}

impl DrawPass {
    pub fn new(config: DrawPassConfig, scheduler: Arc<dyn Scheduler>) -> Result<Self, ConfigError> {
        config.validate()?;

        let extractor = RenderableExtractor::new(config.pass_mask, config.draw_distance, config.extract);

        tracing::debug!(
            "Created draw pass '{}' (mask {:?}, draw distance {}, {} workers)",
            config.name,
            config.pass_mask,
            config.draw_distance,
            scheduler.worker_count()
        );

        Ok(Self {
            config,
            scheduler,
            extractor,
            renderables: Vec::new(),
            batcher: Batcher::new(),
            recorder: CommandRecorder::new(),
            stats: DrawPassStats::default(),
            last_report: Instant::now(),
        })
    }

    /// Cull `draw_list` against `view` and rebuild this frame's batches.
    ///
    /// Everything produced by the previous call is discarded first. Blocks
    /// until extraction has finished on every worker.
    pub fn prepare_render_data(&mut self, draw_list: &Arc<[RenderableData]>, view: &View) {
        profile_function!();

        self.renderables.clear();
        self.extractor
            .extract_into(draw_list, view, self.scheduler.as_ref(), &mut self.renderables);
        self.batcher.rebuild(&self.renderables);

        self.stats = DrawPassStats {
            renderables: self.renderables.len(),
            batches: self.batcher.batches().len(),
            draw_entries: self.batcher.draw_entries(),
            ..Default::default()
        };
    }

    /// Upload `view` into the slot's view buffer.
    pub fn update_view_data(&self, ctx: &dyn RenderContext, slot: &FrameSlot, view: &View) {
        slot.write_view(ctx, &view.gpu_data());
    }

    /// Record this frame's batches into `stream` using `slot`'s indirect buffer.
    ///
    /// # Panics
    ///
    /// Panics if a batched mesh or material has no table entry, or if the
    /// slot's indirect buffer is too small.
    pub fn record_draw_commands(
        &mut self,
        ctx: &dyn RenderContext,
        stream: &mut dyn CommandStream,
        slot: &mut FrameSlot,
        meshes: &MergedMeshTable,
        materials: &MaterialTable,
    ) -> DrawPassStats {
        let RecordStats {
            draw_entries,
            draw_calls,
            pipeline_binds,
        } = self.recorder.record(
            ctx,
            stream,
            slot,
            &self.renderables,
            self.batcher.batches(),
            meshes,
            materials,
        );

        self.stats.draw_entries = draw_entries;
        self.stats.draw_calls = draw_calls;
        self.stats.pipeline_binds = pipeline_binds;

        tracing::debug!(
            "Pass '{}' recorded {} draw calls for {} entries (slot {})",
            self.config.name,
            draw_calls,
            draw_entries,
            slot.index()
        );
        self.report_periodically();

        self.stats
    }

    fn report_periodically(&mut self) {
        if self.last_report.elapsed() < STATS_REPORT_INTERVAL {
            return;
        }
        self.last_report = Instant::now();

        tracing::trace!(
            "Pass '{}': {} renderables, {} batches, {} draw calls, {} pipeline binds",
            self.config.name,
            self.stats.renderables,
            self.stats.batches,
            self.stats.draw_calls,
            self.stats.pipeline_binds
        );
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &DrawPassConfig {
        &self.config
    }

    /// This frame's extracted renderables, in draw-list order.
    pub fn renderables(&self) -> &[RenderableData] {
        &self.renderables
    }

    pub fn batches(&self) -> &[InstancedBatch] {
        self.batcher.batches()
    }

    pub fn stats(&self) -> DrawPassStats {
        self.stats
    }
}
