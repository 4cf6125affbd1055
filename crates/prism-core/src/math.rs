//! Math types used across Prism, re-exported from `glam`.

/// SIMD-accelerated `glam` types.
///
/// This module re-exports all types and functions from the [`glam`] crate.
///
/// ```
/// use prism_core::math::{Mat4, Vec3};
///
/// let translation = Vec3::new(0.0, 0.0, -5.0);
/// let transform = Mat4::from_translation(translation);
/// assert_eq!(transform.w_axis.z, -5.0);
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}

pub use fast::*;
