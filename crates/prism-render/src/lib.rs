//! Prism draw passes
//!
//! Turns the world's per-frame list of renderables into a small set of
//! indexed-indirect draw calls:
//!
//! 1. **Extraction** culls the list against the view's distance, pass mask
//!    and frustum, in parallel, keeping input order.
//! 2. **Batching** groups the surviving draw entries by material.
//! 3. **Recording** uploads one indirect command per draw entry into the
//!    current frame slot and issues one multi-draw per batch.
//!
//! Buffers are written through [`RenderContext`] and commands go to a
//! [`CommandStream`], so the whole pipeline runs against wgpu
//! ([`GraphicsContext`], [`WgpuCommandStream`]) or against the recording
//! mocks of `prism-test-utils`.

mod batch;
mod config;
mod context;
mod context_impl;
mod draw_pass;
mod extract;
mod frame;
mod indirect;
mod material;
mod mesh;
mod recorder;
mod renderable;
mod renderer;
mod scheduler;
mod task_pool;
mod view;
mod wgpu_stream;

pub use batch::*;
pub use config::*;
pub use context::*;
pub use draw_pass::*;
pub use extract::*;
pub use frame::*;
pub use indirect::*;
pub use material::*;
pub use mesh::*;
pub use recorder::*;
pub use renderable::*;
pub use renderer::*;
pub use scheduler::*;
pub use task_pool::*;
pub use view::*;
pub use wgpu_stream::*;

pub use prism_test_utils::{
    CommandStream, DescriptorSetHandle, GpuBuffer, PipelineHandle, RenderContext,
};
