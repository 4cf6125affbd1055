use std::sync::Arc;

/// Features every context must enable for indirect draw pass recording.
///
/// Indirect commands carry the object data index in `first_instance`.
pub const REQUIRED_FEATURES: wgpu::Features = wgpu::Features::INDIRECT_FIRST_INSTANCE;

/// Failure to bring up a graphics context.
#[derive(Debug)]
pub enum GraphicsError {
    /// No adapter matched the requested options
    NoAdapter(wgpu::RequestAdapterError),
    /// The adapter lacks some of the listed features
    MissingFeatures(wgpu::Features),
    /// The adapter cannot execute indirect draws
    IndirectExecutionUnsupported,
    /// Device creation failed
    DeviceCreation(wgpu::RequestDeviceError),
}

impl std::fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAdapter(e) => write!(f, "no suitable GPU adapter: {}", e),
            Self::MissingFeatures(features) => {
                write!(f, "GPU adapter is missing required features: {:?}", features)
            }
            Self::IndirectExecutionUnsupported => {
                write!(f, "GPU adapter does not support indirect execution")
            }
            Self::DeviceCreation(e) => write!(f, "failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoAdapter(e) => Some(e),
            Self::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

/// A shared wgpu device and queue.
///
/// # Ownership Pattern
///
/// ```rust,no_run
/// use prism_render::GraphicsContext;
///
/// let ctx = GraphicsContext::new_owned_sync().expect("no GPU");
/// let ctx2 = ctx.clone(); // Cheap clone (Arc)
/// ```
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GraphicsContext {
    /// Creates a new graphics context with default settings.
    pub async fn new_owned() -> Result<Arc<Self>, GraphicsError> {
        Self::new_owned_with_descriptor(GraphicsContextDescriptor::default()).await
    }

    /// Creates a new graphics context synchronously.
    ///
    /// This blocks the current thread until the context is created.
    pub fn new_owned_sync() -> Result<Arc<Self>, GraphicsError> {
        pollster::block_on(Self::new_owned())
    }

    /// Creates a new graphics context with a custom descriptor.
    pub async fn new_owned_with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, GraphicsError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: descriptor.power_preference,
                compatible_surface: None,
                force_fallback_adapter: descriptor.force_fallback_adapter,
            })
            .await
            .map_err(GraphicsError::NoAdapter)?;

        if !adapter.features().contains(REQUIRED_FEATURES) {
            return Err(GraphicsError::MissingFeatures(REQUIRED_FEATURES));
        }
        if !adapter
            .get_downlevel_capabilities()
            .flags
            .contains(wgpu::DownlevelFlags::INDIRECT_EXECUTION)
        {
            return Err(GraphicsError::IndirectExecutionUnsupported);
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: REQUIRED_FEATURES | descriptor.additional_features,
                required_limits: descriptor.limits.clone(),
                label: descriptor.label,
                ..Default::default()
            })
            .await
            .map_err(GraphicsError::DeviceCreation)?;

        tracing::info!(
            "Created graphics context on {} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        Ok(Arc::new(Self {
            instance,
            adapter,
            device,
            queue,
        }))
    }

    /// Get the device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Get the queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Get device info
    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Get device limits
    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }
}

/// Descriptor for configuring graphics context creation.
pub struct GraphicsContextDescriptor {
    /// GPU backends to use
    pub backends: wgpu::Backends,
    /// Power preference for adapter selection
    pub power_preference: wgpu::PowerPreference,
    /// Whether to force fallback adapter
    pub force_fallback_adapter: bool,
    /// Features enabled on top of [`REQUIRED_FEATURES`] (must be supported)
    pub additional_features: wgpu::Features,
    /// Required device limits
    pub limits: wgpu::Limits,
    /// Optional label for debugging
    pub label: Option<&'static str>,
}

impl Default for GraphicsContextDescriptor {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            additional_features: wgpu::Features::empty(),
            limits: wgpu::Limits::default(),
            label: None,
        }
    }
}

impl GraphicsContextDescriptor {
    /// Create a new descriptor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set additional wgpu features.
    pub fn with_features(mut self, features: wgpu::Features) -> Self {
        self.additional_features = features;
        self
    }

    /// Set the power preference.
    pub fn power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.power_preference = preference;
        self
    }

    /// Set the backends to use.
    pub fn backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    /// Set the device limits.
    pub fn limits(mut self, limits: wgpu::Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the debug label.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_features() {
        assert!(REQUIRED_FEATURES.contains(wgpu::Features::INDIRECT_FIRST_INSTANCE));
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = GraphicsContextDescriptor::new()
            .backends(wgpu::Backends::VULKAN)
            .power_preference(wgpu::PowerPreference::LowPower)
            .label("draw passes");

        assert_eq!(descriptor.backends, wgpu::Backends::VULKAN);
        assert_eq!(descriptor.power_preference, wgpu::PowerPreference::LowPower);
        assert_eq!(descriptor.label, Some("draw passes"));
        assert_eq!(descriptor.additional_features, wgpu::Features::empty());
    }

    #[test]
    fn test_error_display() {
        let err = GraphicsError::MissingFeatures(wgpu::Features::INDIRECT_FIRST_INSTANCE);
        assert!(err.to_string().contains("missing required features"));
        assert_eq!(
            GraphicsError::IndirectExecutionUnsupported.to_string(),
            "GPU adapter does not support indirect execution"
        );
    }
}
