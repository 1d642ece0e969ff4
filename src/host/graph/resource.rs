//! Virtual resources for the frame graph

/// Unique identifier for a frame graph resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub(crate) u32);

/// Texture format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    Rgba8Unorm,
    #[default]
    Rgba8UnormSrgb,
    Bgra8UnormSrgb,
    Rgba16Float,
}

/// Transient texture descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Resource type enumeration
#[derive(Debug, Clone)]
pub enum ResourceKind {
    /// Owned outside the graph. The backbuffer is the pipeline's final output.
    Imported { backbuffer: bool },
    /// Created and discarded within one frame
    Transient(TextureDesc),
}

/// Virtual texture resource in the frame graph
#[derive(Debug, Clone)]
pub struct VirtualResource {
    pub id: ResourceId,
    pub name: String,
    pub kind: ResourceKind,
}

impl VirtualResource {
    pub fn is_imported(&self) -> bool {
        matches!(self.kind, ResourceKind::Imported { .. })
    }

    pub fn is_backbuffer(&self) -> bool {
        matches!(self.kind, ResourceKind::Imported { backbuffer: true })
    }
}

/// How a pass uses a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Sampled texture
    Read,
    /// Write-only color attachment; previous contents are kept
    Write,
}

/// Resource access declaration for a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceAccess {
    pub resource: ResourceId,
    pub mode: AccessMode,
}

/// Texture handles the pipeline exposes to passes for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResources {
    pub active_color_texture: ResourceId,
    pub backbuffer: ResourceId,
}

impl FrameResources {
    /// Whether the camera is rendering straight into the final output surface
    pub fn is_active_target_back_buffer(&self) -> bool {
        self.active_color_texture == self.backbuffer
    }
}
