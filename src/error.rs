//! Bridge error types.

use thiserror::Error;

use crate::host::HostError;

/// Errors surfaced synchronously to the caller of an activation-time operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A required external resource (camera, registration hook, renderer data)
    /// could not be resolved.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A registered backend resource is absent or malformed.
    #[error("resource error: {0}")]
    Resource(String),
    /// The host rejected an operation.
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl BridgeError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

/// A previously valid resource became invalid while the bridge was running.
///
/// Degradations are absorbed by the per-frame tick: the bridge logs a warning and
/// deactivates itself. They are reported back through [`crate::FrameStatus`] but
/// never as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// The bound camera was destroyed and no replacement could be resolved.
    CameraLost,
    /// The host pipeline configuration stopped being usable.
    PipelineUnavailable(String),
    /// A deferred reload failed to re-activate the bridge.
    ReloadFailed(String),
    /// The input platform disappeared from an active bridge.
    PlatformLost,
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CameraLost => write!(f, "bound camera lost"),
            Self::PipelineUnavailable(msg) => write!(f, "pipeline unavailable: {msg}"),
            Self::ReloadFailed(msg) => write!(f, "reload failed: {msg}"),
            Self::PlatformLost => write!(f, "input platform lost"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BridgeError::configuration("no camera");
        assert_eq!(err.to_string(), "configuration error: no camera");

        let err = BridgeError::resource("renderer data list is empty");
        assert_eq!(err.to_string(), "resource error: renderer data list is empty");
    }

    #[test]
    fn test_degradation_display() {
        assert_eq!(Degradation::CameraLost.to_string(), "bound camera lost");
        assert_eq!(
            Degradation::ReloadFailed("x".into()).to_string(),
            "reload failed: x"
        );
    }
}
