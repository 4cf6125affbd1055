//! GPU bindings of materials.

use prism_core::alloc::HashMap;
use prism_test_utils::{DescriptorSetHandle, PipelineHandle};

use crate::renderable::MaterialHandle;

/// Pipeline and per-frame-slot descriptor sets of a material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialBinding {
    pub pipeline: PipelineHandle,
    /// One descriptor set per frame in flight, indexed by slot.
    pub descriptor_sets: Vec<DescriptorSetHandle>,
}

impl MaterialBinding {
    pub fn new(pipeline: PipelineHandle, descriptor_sets: Vec<DescriptorSetHandle>) -> Self {
        Self {
            pipeline,
            descriptor_sets,
        }
    }

    /// Descriptor set for a frame slot.
    ///
    /// # Panics
    ///
    /// Panics if the material has no set for `slot`.
    pub fn descriptor(&self, slot: usize) -> DescriptorSetHandle {
        match self.descriptor_sets.get(slot) {
            Some(set) => *set,
            None => panic!(
                "Material has {} descriptor sets, frame slot {} requested",
                self.descriptor_sets.len(),
                slot
            ),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MaterialTable {
    bindings: HashMap<MaterialHandle, MaterialBinding>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: MaterialHandle, binding: MaterialBinding) -> Option<MaterialBinding> {
        self.bindings.insert(material, binding)
    }

    pub fn remove(&mut self, material: MaterialHandle) -> Option<MaterialBinding> {
        self.bindings.remove(&material)
    }

    pub fn get(&self, material: MaterialHandle) -> Option<&MaterialBinding> {
        self.bindings.get(&material)
    }

    /// # Panics
    ///
    /// Panics if `material` was never registered.
    pub fn binding(&self, material: MaterialHandle) -> &MaterialBinding {
        match self.bindings.get(&material) {
            Some(binding) => binding,
            None => panic!("Material {:?} has no GPU binding", material),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
