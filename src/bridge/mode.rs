//! Pipeline execution model detection

use crate::error::{BridgeError, BridgeResult};
use crate::host::{GraphicsSettings, PipelineKind};

/// Execution model the bridge integrates with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineMode {
    /// Command buffers attached to camera events
    Legacy,
    /// Scriptable passes executed immediately
    Compatibility,
    /// Scriptable passes recorded into a frame graph
    FrameGraph,
}

impl std::fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Compatibility => write!(f, "compatibility"),
            Self::FrameGraph => write!(f, "frame graph"),
        }
    }
}

/// Pure query of the active graphics settings
pub struct PipelineModeDetector;

impl PipelineModeDetector {
    pub fn detect(settings: &GraphicsSettings) -> BridgeResult<PipelineMode> {
        let Some(asset) = settings.active_pipeline() else {
            return Ok(PipelineMode::Legacy);
        };

        match &asset.kind {
            PipelineKind::Custom(name) => Err(BridgeError::configuration(format!(
                "pipeline '{}' of type '{}' has no supported extension point",
                asset.name, name
            ))),
            PipelineKind::Scriptable { compatibility_mode } => {
                if asset.renderer_data_list.is_none() {
                    return Err(BridgeError::configuration(format!(
                        "pipeline '{}' has no renderer data list",
                        asset.name
                    )));
                }
                Ok(if *compatibility_mode {
                    PipelineMode::Compatibility
                } else {
                    PipelineMode::FrameGraph
                })
            }
        }
    }
}
