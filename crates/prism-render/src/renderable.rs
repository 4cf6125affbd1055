//! Per-frame renderable records supplied by the world.

use bitflags::bitflags;
use glam::Vec3;
use prism_core::geometry::Aabb;

bitflags! {
    /// Render passes a renderable participates in.
    ///
    /// A draw pass accepts a renderable when the two masks share any bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PassMask: u32 {
        const OPAQUE = 1 << 0;
        const TRANSPARENT = 1 << 1;
        const SHADOW = 1 << 2;
        const DEPTH_PREPASS = 1 << 3;
    }
}

impl PassMask {
    /// Any-bit overlap test used by extraction.
    #[inline]
    pub fn overlaps(self, pass: PassMask) -> bool {
        self.intersects(pass)
    }
}

/// Key into the merged mesh table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// Material identity. Batches are keyed on this alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u32);

/// One draw entry of a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshMaterialPair {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
}

impl MeshMaterialPair {
    pub const fn new(mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self { mesh, material }
    }
}

/// A drawable record produced by the world every frame.
///
/// The draw pass only reads these; it never keeps one past the frame that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableData {
    pub position: Vec3,
    pub aabb: Aabb,
    pub pass_mask: PassMask,
    /// Drawn in order, one draw entry per pair.
    pub mesh_material_pairs: Vec<MeshMaterialPair>,
    /// Slot of this object in the externally owned per-object GPU buffer.
    pub object_data_index: u32,
}

impl RenderableData {
    /// A renderable whose bounds are a box of `half_extents` around `position`.
    pub fn new(
        position: Vec3,
        half_extents: Vec3,
        pass_mask: PassMask,
        mesh_material_pairs: Vec<MeshMaterialPair>,
        object_data_index: u32,
    ) -> Self {
        Self {
            position,
            aabb: Aabb::from_center(position, half_extents),
            pass_mask,
            mesh_material_pairs,
            object_data_index,
        }
    }

    /// Number of draw entries this renderable contributes.
    pub fn draw_entry_count(&self) -> usize {
        self.mesh_material_pairs.len()
    }
}
