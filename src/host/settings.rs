//! Global pipeline configuration as seen by the host

use std::sync::Arc;

use super::scriptable::RendererFeature;

/// Kind of scriptable pipeline described by an asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineKind {
    /// Feature-based scriptable pipeline. In compatibility mode passes are executed
    /// directly; otherwise they are recorded into a frame graph.
    Scriptable { compatibility_mode: bool },
    /// A pipeline with its own extension model
    Custom(String),
}

/// Per-renderer configuration holding installed renderer features
#[derive(Clone, Default)]
pub struct RendererData {
    pub name: String,
    pub features: Vec<Arc<dyn RendererFeature>>,
}

impl RendererData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: Arc<dyn RendererFeature>) -> Self {
        self.features.push(feature);
        self
    }
}

impl std::fmt::Debug for RendererData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererData")
            .field("name", &self.name)
            .field(
                "features",
                &self.features.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A scriptable pipeline asset
#[derive(Debug, Clone)]
pub struct PipelineAsset {
    pub name: String,
    pub kind: PipelineKind,
    pub renderer_data_list: Option<Vec<RendererData>>,
}

impl PipelineAsset {
    pub fn scriptable(name: impl Into<String>, compatibility_mode: bool) -> Self {
        Self {
            name: name.into(),
            kind: PipelineKind::Scriptable { compatibility_mode },
            renderer_data_list: Some(Vec::new()),
        }
    }

    pub fn with_renderer_data(mut self, data: RendererData) -> Self {
        self.renderer_data_list.get_or_insert_with(Vec::new).push(data);
        self
    }
}

/// Process graphics settings. No asset at all means the built-in legacy pipeline.
#[derive(Debug, Clone, Default)]
pub struct GraphicsSettings {
    /// Quality-level override
    pub current_pipeline: Option<Arc<PipelineAsset>>,
    pub default_pipeline: Option<Arc<PipelineAsset>>,
}

impl GraphicsSettings {
    pub fn legacy() -> Self {
        Self::default()
    }

    pub fn with_pipeline(asset: PipelineAsset) -> Self {
        Self {
            current_pipeline: None,
            default_pipeline: Some(Arc::new(asset)),
        }
    }

    /// The asset in effect: the current override, else the default
    pub fn active_pipeline(&self) -> Option<&Arc<PipelineAsset>> {
        self.current_pipeline
            .as_ref()
            .or(self.default_pipeline.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_overrides_default() {
        let mut settings = GraphicsSettings::with_pipeline(PipelineAsset::scriptable("default", false));
        assert_eq!(settings.active_pipeline().unwrap().name, "default");

        settings.current_pipeline = Some(Arc::new(PipelineAsset::scriptable("quality", true)));
        assert_eq!(settings.active_pipeline().unwrap().name, "quality");
    }

    #[test]
    fn test_legacy_has_no_asset() {
        assert!(GraphicsSettings::legacy().active_pipeline().is_none());
    }
}
