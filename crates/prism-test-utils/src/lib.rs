//! GPU abstraction traits and test utilities for Prism.
//!
//! The draw-pass pipeline never talks to a device directly. It writes buffers
//! through [`RenderContext`] and issues binds and draws through
//! [`CommandStream`], so the same code runs against wgpu or against the mocks
//! in this crate.
//!
//! # Overview
//!
//! - [`RenderContext`] - buffer creation and uploads
//! - [`CommandStream`] - the bind/draw command surface
//! - [`GpuBuffer`] and the handle types - opaque, can be real or mock
//! - `MockRenderContext` / `MockCommandStream` - recording mocks (requires `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use prism_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//! let buffer = mock.create_buffer(&BufferDescriptor {
//!     label: Some("test_buffer"),
//!     size: 64,
//!     usage: BufferUsages::INDIRECT,
//!     mapped_at_creation: false,
//! });
//! mock.write_buffer(&buffer, 0, &[1u8; 16]);
//!
//! assert_eq!(mock.count_buffer_writes(), 1);
//! assert_eq!(&mock.buffer_contents(&buffer)[..16], &[1u8; 16]);
//! # }
//! ```
//!
//! # Design Philosophy
//!
//! All wrapper types are owned and reference counted, so no lifetimes leak
//! into the pipeline. Both traits are object safe.

pub mod command_stream;
pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
#[cfg(feature = "mock")]
pub mod mock_stream;
pub mod render_context;

// Re-export main types at crate root
pub use command_stream::*;
pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
#[cfg(feature = "mock")]
pub use mock_stream::*;
pub use render_context::*;
