//! Lookup of where each mesh lives inside the merged vertex and index buffers.
//!
//! All meshes drawn by a pass share one vertex buffer and one index buffer.
//! An indirect command addresses a mesh by its index range and vertex base,
//! which is what lets a single multi-draw cover different meshes.

use prism_core::alloc::HashMap;

use crate::renderable::MeshHandle;

/// Location of one mesh inside the merged buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MergedMeshEntry {
    pub index_count: u32,
    pub first_index: u32,
    pub vertex_offset: i32,
}

impl MergedMeshEntry {
    pub const fn new(index_count: u32, first_index: u32, vertex_offset: i32) -> Self {
        Self {
            index_count,
            first_index,
            vertex_offset,
        }
    }
}

/// Mesh handle to merged-buffer location.
#[derive(Debug, Default, Clone)]
pub struct MergedMeshTable {
    entries: HashMap<MeshHandle, MergedMeshEntry>,
    next_handle: u32,
    total_indices: u32,
    total_vertices: u32,
}

impl MergedMeshTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve space for a mesh at the end of the merged buffers.
    ///
    /// Returns the new handle and the entry describing where the mesh's
    /// indices and vertices must be uploaded.
    pub fn append(&mut self, index_count: u32, vertex_count: u32) -> (MeshHandle, MergedMeshEntry) {
        let handle = MeshHandle(self.next_handle);
        let entry = MergedMeshEntry::new(index_count, self.total_indices, self.total_vertices as i32);

        self.next_handle += 1;
        self.total_indices += index_count;
        self.total_vertices += vertex_count;
        self.entries.insert(handle, entry);

        (handle, entry)
    }

    /// Register a mesh at an explicit location.
    pub fn insert(&mut self, handle: MeshHandle, entry: MergedMeshEntry) -> Option<MergedMeshEntry> {
        self.next_handle = self.next_handle.max(handle.0 + 1);
        self.entries.insert(handle, entry)
    }

    pub fn remove(&mut self, handle: MeshHandle) -> Option<MergedMeshEntry> {
        self.entries.remove(&handle)
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&MergedMeshEntry> {
        self.entries.get(&handle)
    }

    /// Look up a mesh that must exist.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was never registered.
    pub fn entry(&self, handle: MeshHandle) -> &MergedMeshEntry {
        match self.entries.get(&handle) {
            Some(entry) => entry,
            None => panic!("Mesh {:?} is not present in the merged mesh table", handle),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices reserved through [`append`](Self::append).
    pub fn total_indices(&self) -> u32 {
        self.total_indices
    }

    /// Vertices reserved through [`append`](Self::append).
    pub fn total_vertices(&self) -> u32 {
        self.total_vertices
    }
}
