//! Recording implementation of [`CommandStream`] for tests.

use crate::{
    command_stream::CommandStream,
    gpu_types::{DescriptorSetHandle, GpuBuffer, PipelineHandle},
};

/// A command recorded by [`MockCommandStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCall {
    BindPipeline(PipelineHandle),
    BindDescriptor(DescriptorSetHandle),
    DrawIndexedIndirect {
        buffer_id: usize,
        offset: u64,
        count: u32,
        stride: u32,
    },
}

/// Command stream that only records what it was asked to do.
///
/// ```rust
/// use prism_test_utils::*;
///
/// let mut stream = MockCommandStream::new();
/// stream.bind_pipeline(PipelineHandle(1));
/// stream.draw_indexed_indirect(&GpuBuffer::mock(0, 40), 20, 1, 20);
///
/// assert_eq!(stream.count_draws(), 1);
/// assert_eq!(stream.draws(), vec![(20, 1)]);
/// ```
#[derive(Debug, Default)]
pub struct MockCommandStream {
    calls: Vec<StreamCall>,
}

impl MockCommandStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[StreamCall] {
        &self.calls
    }

    pub fn count_draws(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, StreamCall::DrawIndexedIndirect { .. }))
            .count()
    }

    pub fn count_pipeline_binds(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, StreamCall::BindPipeline(_)))
            .count()
    }

    pub fn count_descriptor_binds(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, StreamCall::BindDescriptor(_)))
            .count()
    }

    /// `(byte offset, command count)` of every indirect draw, in order.
    pub fn draws(&self) -> Vec<(u64, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                StreamCall::DrawIndexedIndirect { offset, count, .. } => Some((*offset, *count)),
                _ => None,
            })
            .collect()
    }

    /// Pipelines in the order they were bound.
    pub fn bound_pipelines(&self) -> Vec<PipelineHandle> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                StreamCall::BindPipeline(pipeline) => Some(*pipeline),
                _ => None,
            })
            .collect()
    }

    /// Descriptor sets in the order they were bound.
    pub fn bound_descriptors(&self) -> Vec<DescriptorSetHandle> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                StreamCall::BindDescriptor(set) => Some(*set),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl CommandStream for MockCommandStream {
    fn bind_pipeline(&mut self, pipeline: PipelineHandle) {
        self.calls.push(StreamCall::BindPipeline(pipeline));
    }

    fn bind_descriptor(&mut self, set: DescriptorSetHandle) {
        self.calls.push(StreamCall::BindDescriptor(set));
    }

    fn draw_indexed_indirect(&mut self, buffer: &GpuBuffer, offset: u64, count: u32, stride: u32) {
        self.calls.push(StreamCall::DrawIndexedIndirect {
            buffer_id: buffer.mock_id().unwrap_or(usize::MAX),
            offset,
            count,
            stride,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let mut stream = MockCommandStream::new();
        let buffer = GpuBuffer::mock(4, 100);

        stream.bind_pipeline(PipelineHandle(2));
        stream.bind_descriptor(DescriptorSetHandle(9));
        stream.draw_indexed_indirect(&buffer, 0, 3, 20);

        assert_eq!(
            stream.calls(),
            &[
                StreamCall::BindPipeline(PipelineHandle(2)),
                StreamCall::BindDescriptor(DescriptorSetHandle(9)),
                StreamCall::DrawIndexedIndirect {
                    buffer_id: 4,
                    offset: 0,
                    count: 3,
                    stride: 20,
                },
            ]
        );
    }

    #[test]
    fn test_counters_and_clear() {
        let mut stream = MockCommandStream::new();
        let buffer = GpuBuffer::mock(0, 100);

        stream.bind_pipeline(PipelineHandle(0));
        stream.draw_indexed_indirect(&buffer, 0, 1, 20);
        stream.draw_indexed_indirect(&buffer, 20, 2, 20);

        assert_eq!(stream.count_pipeline_binds(), 1);
        assert_eq!(stream.count_descriptor_binds(), 0);
        assert_eq!(stream.draws(), vec![(0, 1), (20, 2)]);

        stream.clear();
        assert!(stream.calls().is_empty());
    }
}
