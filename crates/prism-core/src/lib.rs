//! Prism Core
//!
//! This crate contains the shared utilities for the Prism renderer: logging,
//! profiling, math re-exports, and the geometry used for visibility tests.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
