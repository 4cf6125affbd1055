//! Configuration for draw passes, extraction, and frame rotation.
//!
//! Configuration is validated once at construction. Nothing in the per-frame
//! path returns an error.

use crate::renderable::PassMask;

/// Smallest number of frames that may be in flight.
pub const MIN_FRAMES_IN_FLIGHT: usize = 2;
/// Largest number of frames that may be in flight.
pub const MAX_FRAMES_IN_FLIGHT: usize = 3;

/// Invalid configuration detected at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Frames in flight outside `MIN_FRAMES_IN_FLIGHT..=MAX_FRAMES_IN_FLIGHT`
    FramesInFlight(usize),
    /// Indirect buffers must hold at least one command
    ZeroDrawEntries,
    /// Extraction partitions must contain at least one renderable
    ZeroPartitionSize,
    /// Draw distance is negative or NaN
    InvalidDrawDistance(f32),
    /// Pass mask selects no pass at all
    EmptyPassMask,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FramesInFlight(n) => write!(
                f,
                "frames in flight must be between {} and {}, got {}",
                MIN_FRAMES_IN_FLIGHT, MAX_FRAMES_IN_FLIGHT, n
            ),
            Self::ZeroDrawEntries => write!(f, "max draw entries must be greater than zero"),
            Self::ZeroPartitionSize => write!(f, "extraction partition size must be greater than zero"),
            Self::InvalidDrawDistance(d) => write!(f, "invalid draw distance: {}", d),
            Self::EmptyPassMask => write!(f, "pass mask must select at least one pass"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for parallel extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Number of renderables handed to each extraction job.
    pub partition_size: usize,
}

impl ExtractConfig {
    pub const DEFAULT_PARTITION_SIZE: usize = 256;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partition_size == 0 {
            return Err(ConfigError::ZeroPartitionSize);
        }
        Ok(())
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            partition_size: Self::DEFAULT_PARTITION_SIZE,
        }
    }
}

/// Per-pass configuration surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPassConfig {
    /// Debug name used in logs and profiler scopes.
    pub name: String,
    /// Passes this draw pass accepts renderables from.
    pub pass_mask: PassMask,
    /// Renderables further than this from the view are culled.
    pub draw_distance: f32,
    pub extract: ExtractConfig,
}

impl DrawPassConfig {
    pub const DEFAULT_DRAW_DISTANCE: f32 = 1000.0;

    pub fn new(name: impl Into<String>, pass_mask: PassMask, draw_distance: f32) -> Self {
        Self {
            name: name.into(),
            pass_mask,
            draw_distance,
            extract: ExtractConfig::default(),
        }
    }

    /// The default opaque pass.
    pub fn opaque() -> Self {
        Self::new("opaque", PassMask::OPAQUE, Self::DEFAULT_DRAW_DISTANCE)
    }

    pub fn with_extract(mut self, extract: ExtractConfig) -> Self {
        self.extract = extract;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.draw_distance.is_nan() || self.draw_distance < 0.0 {
            return Err(ConfigError::InvalidDrawDistance(self.draw_distance));
        }
        if self.pass_mask.is_empty() {
            return Err(ConfigError::EmptyPassMask);
        }
        self.extract.validate()
    }
}

/// Renderer-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererConfig {
    /// Number of rotating frame slots.
    pub frames_in_flight: usize,
    /// Capacity of each slot's indirect buffer, in draw commands.
    pub max_draw_entries: usize,
}

impl RendererConfig {
    pub const DEFAULT_MAX_DRAW_ENTRIES: usize = 4096;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FRAMES_IN_FLIGHT..=MAX_FRAMES_IN_FLIGHT).contains(&self.frames_in_flight) {
            return Err(ConfigError::FramesInFlight(self.frames_in_flight));
        }
        if self.max_draw_entries == 0 {
            return Err(ConfigError::ZeroDrawEntries);
        }
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: MIN_FRAMES_IN_FLIGHT,
            max_draw_entries: Self::DEFAULT_MAX_DRAW_ENTRIES,
        }
    }
}
