//! Profiling utilities based on the `puffin` crate.
//!
//! Scopes are compiled in unconditionally and cost a single atomic load while
//! profiling is switched off.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Turn scope collection on or off.
///
/// # Example
/// ```no_run
/// use prism_core::profiling::set_enabled;
///
/// set_enabled(true);
/// ```
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
    tracing::debug!("Puffin scopes {}", if enabled { "enabled" } else { "disabled" });
}

/// Whether scope collection is currently on.
#[inline]
pub fn is_enabled() -> bool {
    puffin::are_scopes_on()
}

/// Mark the start of a new frame for profiling.
///
/// Call this once per frame in your main loop to organize profiling data by frame.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
