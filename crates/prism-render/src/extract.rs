//! Parallel visibility culling of the world's renderable list.
//!
//! The list is split into fixed-size partitions, one job per partition. Every
//! job writes into its own output slot and the slots are concatenated in
//! partition order after the join, so the extracted list keeps the input
//! order no matter how many workers ran or in which order they finished.

use std::sync::Arc;

use parking_lot::Mutex;
use prism_core::profiling::profile_function;

use crate::config::ExtractConfig;
use crate::renderable::{PassMask, RenderableData};
use crate::scheduler::{Job, Scheduler};
use crate::view::View;

/// Culling predicates of one draw pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableExtractor {
    pass_mask: PassMask,
    draw_distance: f32,
    partition_size: usize,
}

impl RenderableExtractor {
    /// # Panics
    ///
    /// Panics if `config.partition_size` is zero.
    pub fn new(pass_mask: PassMask, draw_distance: f32, config: ExtractConfig) -> Self {
        assert!(
            config.partition_size > 0,
            "Extraction partition size must be greater than zero"
        );
        Self {
            pass_mask,
            draw_distance,
            partition_size: config.partition_size,
        }
    }

    pub fn pass_mask(&self) -> PassMask {
        self.pass_mask
    }

    pub fn draw_distance(&self) -> f32 {
        self.draw_distance
    }

    pub fn partition_size(&self) -> usize {
        self.partition_size
    }

    /// Whether `data` survives distance, pass mask and frustum culling.
    #[inline]
    pub fn accepts(&self, view: &View, data: &RenderableData) -> bool {
        view.position().distance(data.position) <= self.draw_distance
            && data.pass_mask.overlaps(self.pass_mask)
            && view.is_visible(&data.aabb)
    }

    /// Append every accepted renderable of `draw_list` to `out`, in input order.
    ///
    /// Blocks until all extraction jobs have finished.
    pub fn extract_into(
        &self,
        draw_list: &Arc<[RenderableData]>,
        view: &View,
        scheduler: &dyn Scheduler,
        out: &mut Vec<RenderableData>,
    ) {
        profile_function!();

        let partitions = draw_list.len().div_ceil(self.partition_size);
        if partitions <= 1 {
            out.extend(draw_list.iter().filter(|d| self.accepts(view, d)).cloned());
            return;
        }

        let slots: Arc<[Mutex<Vec<RenderableData>>]> =
            (0..partitions).map(|_| Mutex::new(Vec::new())).collect();

        let jobs: Vec<Job> = (0..partitions)
            .map(|partition| {
                let draw_list = draw_list.clone();
                let slots = slots.clone();
                let view = *view;
                let extractor = *self;
                Box::new(move || {
                    let start = partition * extractor.partition_size;
                    let end = (start + extractor.partition_size).min(draw_list.len());
                    let passed: Vec<RenderableData> = draw_list[start..end]
                        .iter()
                        .filter(|d| extractor.accepts(&view, d))
                        .cloned()
                        .collect();
                    *slots[partition].lock() = passed;
                }) as Job
            })
            .collect();

        scheduler.run_and_wait(jobs);

        for slot in slots.iter() {
            out.append(&mut slot.lock());
        }

        tracing::trace!(
            "Extracted {} of {} renderables across {} partitions",
            out.len(),
            draw_list.len(),
            partitions
        );
    }

    /// Convenience wrapper returning a fresh list.
    pub fn extract(
        &self,
        draw_list: &Arc<[RenderableData]>,
        view: &View,
        scheduler: &dyn Scheduler,
    ) -> Vec<RenderableData> {
        let mut out = Vec::new();
        self.extract_into(draw_list, view, scheduler, &mut out);
        out
    }
}
