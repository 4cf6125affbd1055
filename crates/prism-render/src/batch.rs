//! Greedy grouping of extracted renderables by material.

use prism_core::profiling::profile_function;

use crate::renderable::{MaterialHandle, MeshHandle, RenderableData};

/// Draw entries sharing one material, recorded as a single indirect draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstancedBatch {
    pub material: MaterialHandle,
    /// Indices into the frame's extracted list, one per draw entry.
    pub renderable_indices: Vec<u32>,
    /// Mesh of each draw entry, parallel to `renderable_indices`.
    pub meshes: Vec<MeshHandle>,
    pub count: u32,
    /// Linear draw entry index at which this batch was opened.
    pub first_instance: u32,
}

impl InstancedBatch {
    fn open(material: MaterialHandle, renderable: u32, mesh: MeshHandle, first_instance: u32) -> Self {
        Self {
            material,
            renderable_indices: vec![renderable],
            meshes: vec![mesh],
            count: 1,
            first_instance,
        }
    }

    fn push(&mut self, renderable: u32, mesh: MeshHandle) {
        self.renderable_indices.push(renderable);
        self.meshes.push(mesh);
        self.count += 1;
    }

    /// Iterate `(renderable_index, mesh)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, MeshHandle)> + '_ {
        self.renderable_indices
            .iter()
            .copied()
            .zip(self.meshes.iter().copied())
    }
}

/// Builds the frame's batch list.
///
/// Batches are found by linear search, so the cost is O(entries x batches).
#[derive(Debug, Default)]
pub struct Batcher {
    batches: Vec<InstancedBatch>,
    draw_entries: usize,
}

impl Batcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the batch list with one built from `renderables`.
    ///
    /// Batches appear in order of first appearance of their material, and
    /// entries within a batch keep the order they were visited in.
    pub fn rebuild(&mut self, renderables: &[RenderableData]) {
        profile_function!();

        self.clear();

        for (index, renderable) in renderables.iter().enumerate() {
            let index = index as u32;
            for pair in &renderable.mesh_material_pairs {
                let linear = self.draw_entries as u32;
                match self.batches.iter_mut().find(|b| b.material == pair.material) {
                    Some(batch) => batch.push(index, pair.mesh),
                    None => self
                        .batches
                        .push(InstancedBatch::open(pair.material, index, pair.mesh, linear)),
                }
                self.draw_entries += 1;
            }
        }

        tracing::trace!(
            "Batched {} draw entries into {} batches",
            self.draw_entries,
            self.batches.len()
        );
    }

    pub fn clear(&mut self) {
        self.batches.clear();
        self.draw_entries = 0;
    }

    pub fn batches(&self) -> &[InstancedBatch] {
        &self.batches
    }

    /// Total draw entries routed into batches by the last rebuild.
    pub fn draw_entries(&self) -> usize {
        self.draw_entries
    }
}
