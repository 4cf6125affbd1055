//! Camera state a draw pass culls and renders against.
//!
//! A [`View`] is recalculated once per frame, before extraction, and is then
//! read-only for the rest of the frame. It is `Copy` so extraction jobs can
//! carry their own copy onto worker threads.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use prism_core::geometry::Aabb;
//! use prism_render::View;
//!
//! let view = View::perspective(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 60.0, 16.0 / 9.0, 0.1, 100.0);
//! assert!(view.is_visible(&Aabb::from_center(Vec3::new(0.0, 0.0, -5.0), Vec3::ONE)));
//! assert!(!view.is_visible(&Aabb::from_center(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE)));
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use prism_core::geometry::{Aabb, Frustum};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    position: Vec3,
    view: Mat4,
    proj: Mat4,
    view_proj: Mat4,
    near: f32,
    far: f32,
    frustum: Frustum,
}

impl View {
    pub fn new(position: Vec3, view: Mat4, proj: Mat4, near: f32, far: f32) -> Self {
        let view_proj = proj * view;
        Self {
            position,
            view,
            proj,
            view_proj,
            near,
            far,
            frustum: Frustum::from_view_projection(&view_proj),
        }
    }

    /// Right-handed perspective view looking from `eye` at `target`.
    pub fn perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_degrees: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let view = Mat4::look_at_rh(eye, target, up);
        let proj = Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect_ratio, near, far);
        Self::new(eye, view, proj, near, far)
    }

    /// Refresh camera state for a new frame. Clip distances are kept.
    pub fn tick(&mut self, position: Vec3, view: Mat4, proj: Mat4) {
        *self = Self::new(position, view, proj, self.near, self.far);
    }

    /// Conservative frustum test.
    #[inline]
    pub fn is_visible(&self, aabb: &Aabb) -> bool {
        self.frustum.intersects_aabb(aabb)
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn proj(&self) -> Mat4 {
        self.proj
    }

    #[inline]
    pub fn view_proj(&self) -> Mat4 {
        self.view_proj
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Uniform block uploaded into the frame slot's view buffer.
    pub fn gpu_data(&self) -> GpuViewData {
        GpuViewData {
            view: self.view.to_cols_array_2d(),
            proj: self.proj.to_cols_array_2d(),
            view_proj: self.view_proj.to_cols_array_2d(),
            camera_position: self.position.extend(1.0).to_array(),
            near_far: [self.near, self.far, 0.0, 0.0],
        }
    }
}

/// Per-view uniform data, laid out for a WGSL uniform block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuViewData {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// `x` = near, `y` = far, `zw` = padding.
    pub near_far: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<GpuViewData>() % 16, 0);

impl GpuViewData {
    /// Size of the block in bytes.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;
}
