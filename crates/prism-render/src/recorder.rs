//! Turns batches into indirect commands and a bind/draw call sequence.
//!
//! Every draw entry becomes one single-instance [`DrawIndexedIndirect`]
//! whose `first_instance` carries the renderable's object data index. All
//! commands of a pass are uploaded with one write, then each batch is drawn
//! with one multi-draw over its contiguous command range.

use prism_core::profiling::profile_function;
use prism_test_utils::{CommandStream, RenderContext};

use crate::batch::InstancedBatch;
use crate::frame::FrameSlot;
use crate::indirect::{DrawIndexedIndirect, IndirectCommand};
use crate::material::MaterialTable;
use crate::mesh::MergedMeshTable;
use crate::renderable::{MaterialHandle, RenderableData};

/// Counters of one recording.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordStats {
    pub draw_entries: usize,
    pub draw_calls: usize,
    pub pipeline_binds: usize,
}

/// Records a pass's batches into a command stream.
///
/// Keeps its command scratch buffer between frames.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawIndexedIndirect>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload the commands of `batches` into `slot` and issue one draw per batch.
    ///
    /// `renderables` must be the list the batches were built from.
    ///
    /// # Panics
    ///
    /// Panics if a mesh or material is missing from its table, or if the
    /// commands do not fit into the slot's indirect buffer.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &mut self,
        ctx: &dyn RenderContext,
        stream: &mut dyn CommandStream,
        slot: &mut FrameSlot,
        renderables: &[RenderableData],
        batches: &[InstancedBatch],
        meshes: &MergedMeshTable,
        materials: &MaterialTable,
    ) -> RecordStats {
        profile_function!();

        if batches.is_empty() {
            return RecordStats::default();
        }

        self.commands.clear();
        for batch in batches {
            for (renderable, mesh) in batch.entries() {
                let entry = meshes.entry(mesh);
                let object = renderables[renderable as usize].object_data_index;
                self.commands.push(DrawIndexedIndirect::single(
                    entry.index_count,
                    entry.first_index,
                    entry.vertex_offset,
                    object,
                ));
            }
        }

        let base = slot.push_commands(ctx, &self.commands);
        let stride = DrawIndexedIndirect::SIZE as u32;

        let mut stats = RecordStats {
            draw_entries: self.commands.len(),
            ..Default::default()
        };
        let mut last_material: Option<MaterialHandle> = None;
        let mut first = base;

        for batch in batches {
            let binding = materials.binding(batch.material);

            if last_material != Some(batch.material) {
                stream.bind_pipeline(binding.pipeline);
                last_material = Some(batch.material);
                stats.pipeline_binds += 1;
            }
            stream.bind_descriptor(binding.descriptor(slot.index()));

            let offset = slot.indirect().offset_of(first);
            stream.draw_indexed_indirect(slot.indirect().buffer(), offset, batch.count, stride);
            stats.draw_calls += 1;

            first += batch.count as usize;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Batcher;
    use crate::config::RendererConfig;
    use crate::frame::FrameSlots;
    use crate::material::MaterialBinding;
    use crate::renderable::{MeshHandle, MeshMaterialPair, PassMask};
    use glam::Vec3;
    use prism_test_utils::{
        DescriptorSetHandle, MockCommandStream, MockRenderContext, PipelineHandle, StreamCall,
    };

    struct Fixture {
        ctx: MockRenderContext,
        frames: FrameSlots,
        meshes: MergedMeshTable,
        materials: MaterialTable,
    }

    fn fixture(material_count: u32, max_draw_entries: usize) -> Fixture {
        let ctx = MockRenderContext::new();
        let frames = FrameSlots::new(
            &ctx,
            &RendererConfig {
                frames_in_flight: 2,
                max_draw_entries,
            },
        )
        .unwrap();

        let mut meshes = MergedMeshTable::new();
        meshes.append(36, 24);
        meshes.append(6, 4);

        let mut materials = MaterialTable::new();
        for m in 0..material_count {
            materials.insert(
                MaterialHandle(m),
                MaterialBinding::new(
                    PipelineHandle(100 + m),
                    vec![DescriptorSetHandle(m * 2), DescriptorSetHandle(m * 2 + 1)],
                ),
            );
        }

        Fixture {
            ctx,
            frames,
            meshes,
            materials,
        }
    }

    fn renderables(count: u32, material_of: impl Fn(u32) -> u32) -> Vec<RenderableData> {
        (0..count)
            .map(|i| {
                RenderableData::new(
                    Vec3::ZERO,
                    Vec3::ONE,
                    PassMask::OPAQUE,
                    vec![MeshMaterialPair::new(MeshHandle(i % 2), MaterialHandle(material_of(i)))],
                    1000 + i,
                )
            })
            .collect()
    }

    fn record(
        fx: &mut Fixture,
        stream: &mut MockCommandStream,
        list: &[RenderableData],
    ) -> (RecordStats, Vec<InstancedBatch>) {
        let mut batcher = Batcher::new();
        batcher.rebuild(list);
        let batches = batcher.batches().to_vec();
        let stats = CommandRecorder::new().record(
            &fx.ctx,
            stream,
            fx.frames.current_mut(),
            list,
            &batches,
            &fx.meshes,
            &fx.materials,
        );
        (stats, batches)
    }

    #[test]
    fn test_three_materials_three_draws() {
        let mut fx = fixture(3, 256);
        let mut stream = MockCommandStream::new();
        let list = renderables(100, |i| i % 3);

        let (stats, batches) = record(&mut fx, &mut stream, &list);

        assert_eq!(stream.count_draws(), 3);
        assert_eq!(stats.draw_calls, 3);
        assert_eq!(stats.draw_entries, 100);
        assert_eq!(
            stream.draws(),
            vec![(0, batches[0].count), (34 * 20, batches[1].count), (67 * 20, batches[2].count)]
        );
        assert_eq!(batches.iter().map(|b| b.count).sum::<u32>(), 100);
    }

    #[test]
    fn test_unique_materials_one_draw_each() {
        let mut fx = fixture(100, 256);
        let mut stream = MockCommandStream::new();
        let list = renderables(100, |i| i);

        let (stats, _) = record(&mut fx, &mut stream, &list);

        assert_eq!(stream.count_draws(), 100);
        assert_eq!(stats.pipeline_binds, 100);
        assert!(stream.draws().iter().all(|&(_, count)| count == 1));
    }

    #[test]
    fn test_empty_batches_record_nothing() {
        let mut fx = fixture(1, 16);
        let mut stream = MockCommandStream::new();
        let writes_before = fx.ctx.count_buffer_writes();

        let (stats, _) = record(&mut fx, &mut stream, &[]);

        assert_eq!(stats, RecordStats::default());
        assert!(stream.calls().is_empty());
        assert_eq!(fx.ctx.count_buffer_writes(), writes_before);
    }

    #[test]
    fn test_single_upload_with_mesh_and_object_data() {
        let mut fx = fixture(2, 16);
        let mut stream = MockCommandStream::new();
        let list = renderables(4, |i| i % 2);

        record(&mut fx, &mut stream, &list);

        let buffer = fx.frames.current().indirect().buffer().clone();
        assert_eq!(fx.ctx.count_writes_to(&buffer), 1);

        // Batch order: material 0 holds renderables 0 and 2, material 1 holds 1 and 3.
        let commands: Vec<DrawIndexedIndirect> = fx.ctx.read_buffer(&buffer, 4);
        assert_eq!(commands[0], DrawIndexedIndirect::single(36, 0, 0, 1000));
        assert_eq!(commands[1], DrawIndexedIndirect::single(36, 0, 0, 1002));
        assert_eq!(commands[2], DrawIndexedIndirect::single(6, 36, 24, 1001));
        assert_eq!(commands[3], DrawIndexedIndirect::single(6, 36, 24, 1003));
    }

    #[test]
    fn test_mixed_meshes_share_one_draw() {
        let mut fx = fixture(1, 16);
        let mut stream = MockCommandStream::new();
        // Material 0 on alternating cube and quad meshes.
        let mut list = renderables(4, |_| 0);
        list[3].mesh_material_pairs.push(MeshMaterialPair::new(MeshHandle(0), MaterialHandle(0)));

        let (stats, batches) = record(&mut fx, &mut stream, &list);

        assert_eq!(batches.len(), 1);
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stream.draws(), vec![(0, 5)]);

        let commands: Vec<DrawIndexedIndirect> =
            fx.ctx.read_buffer(fx.frames.current().indirect().buffer(), 5);
        assert_eq!(
            commands,
            vec![
                DrawIndexedIndirect::single(36, 0, 0, 1000),
                DrawIndexedIndirect::single(6, 36, 24, 1001),
                DrawIndexedIndirect::single(36, 0, 0, 1002),
                DrawIndexedIndirect::single(6, 36, 24, 1003),
                DrawIndexedIndirect::single(36, 0, 0, 1003),
            ]
        );
    }

    #[test]
    fn test_bind_sequence_uses_slot_descriptor() {
        let mut fx = fixture(2, 16);
        fx.frames.advance();
        let mut stream = MockCommandStream::new();
        let list = renderables(2, |i| i);

        record(&mut fx, &mut stream, &list);

        let buffer_id = fx.frames.current().indirect().buffer().mock_id().unwrap();
        assert_eq!(
            stream.calls(),
            &[
                StreamCall::BindPipeline(PipelineHandle(100)),
                StreamCall::BindDescriptor(DescriptorSetHandle(1)),
                StreamCall::DrawIndexedIndirect {
                    buffer_id,
                    offset: 0,
                    count: 1,
                    stride: 20
                },
                StreamCall::BindPipeline(PipelineHandle(101)),
                StreamCall::BindDescriptor(DescriptorSetHandle(3)),
                StreamCall::DrawIndexedIndirect {
                    buffer_id,
                    offset: 20,
                    count: 1,
                    stride: 20
                },
            ]
        );
    }

    #[test]
    fn test_draws_follow_commands_of_earlier_pass() {
        let mut fx = fixture(1, 16);
        let mut stream = MockCommandStream::new();
        let list = renderables(3, |_| 0);

        record(&mut fx, &mut stream, &list);
        stream.clear();
        record(&mut fx, &mut stream, &list);

        assert_eq!(stream.draws(), vec![(3 * 20, 3)]);
        assert_eq!(fx.frames.current().commands_written(), 6);
    }

    #[test]
    #[should_panic(expected = "not present in the merged mesh table")]
    fn test_missing_mesh_panics() {
        let mut fx = fixture(1, 16);
        let mut stream = MockCommandStream::new();
        let list = vec![RenderableData::new(
            Vec3::ZERO,
            Vec3::ONE,
            PassMask::OPAQUE,
            vec![MeshMaterialPair::new(MeshHandle(42), MaterialHandle(0))],
            0,
        )];

        record(&mut fx, &mut stream, &list);
    }

    #[test]
    #[should_panic(expected = "has no GPU binding")]
    fn test_missing_material_panics() {
        let mut fx = fixture(1, 16);
        let mut stream = MockCommandStream::new();
        let list = renderables(2, |i| i + 5);

        record(&mut fx, &mut stream, &list);
    }

    #[test]
    #[should_panic(expected = "exceed capacity")]
    fn test_overflow_panics() {
        let mut fx = fixture(1, 8);
        let mut stream = MockCommandStream::new();
        let list = renderables(9, |_| 0);

        record(&mut fx, &mut stream, &list);
    }
}
