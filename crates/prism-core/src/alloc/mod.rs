//! Optimized collection types for Prism.
//!
//! Re-exports hash collections backed by AHash, used for the per-frame lookup
//! tables (merged meshes, material bindings).

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
