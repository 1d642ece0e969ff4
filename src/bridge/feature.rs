//! Renderer feature the host application installs for the overlay

use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;

use super::camera::CameraBinding;
use crate::error::{BridgeError, BridgeResult};
use crate::host::{CameraData, GraphicsSettings, PassQueue, RendererFeature, ScriptableRenderPass};

/// Name under which the overlay is recorded and submitted in every mode
pub const OVERLAY_PASS_NAME: &str = "GUI Overlay";

struct Registration {
    binding: CameraBinding,
    pass: Arc<dyn ScriptableRenderPass>,
}

/// Registration point for the GUI overlay in a scriptable pipeline.
///
/// The feature lives in the pipeline's renderer data for as long as the host
/// keeps it. A bridge binds its pass on activation and unbinds on teardown; in
/// between, the pass is enqueued for every frame whose camera matches the
/// binding.
pub struct OverlayFeature {
    name: String,
    registration: RwLock<Option<Registration>>,
}

impl OverlayFeature {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            name: "GuiOverlayFeature".to_string(),
            registration: RwLock::new(None),
        })
    }

    /// Locate the overlay feature in the renderer data used by `renderer_index`.
    pub fn find(settings: &GraphicsSettings, renderer_index: usize) -> BridgeResult<Arc<Self>> {
        let asset = settings
            .active_pipeline()
            .ok_or_else(|| BridgeError::configuration("no scriptable pipeline is active"))?;
        let list = asset.renderer_data_list.as_ref().ok_or_else(|| {
            BridgeError::configuration(format!(
                "pipeline '{}' has no renderer data list",
                asset.name
            ))
        })?;
        if list.is_empty() {
            return Err(BridgeError::resource(format!(
                "renderer data list of pipeline '{}' is empty",
                asset.name
            )));
        }
        let data = list.get(renderer_index).ok_or_else(|| {
            BridgeError::resource(format!(
                "pipeline '{}' has no renderer data at index {}",
                asset.name, renderer_index
            ))
        })?;

        data.features
            .iter()
            .find_map(|feature| feature.clone().as_any_arc().downcast::<Self>().ok())
            .ok_or_else(|| {
                BridgeError::configuration(format!(
                    "renderer '{}' has no GUI overlay feature installed",
                    data.name
                ))
            })
    }

    pub(crate) fn bind(
        &self,
        binding: CameraBinding,
        pass: Arc<dyn ScriptableRenderPass>,
    ) -> BridgeResult<()> {
        let mut registration = self.registration.write();
        if registration.is_some() {
            return Err(BridgeError::configuration(
                "GUI overlay feature is already bound to another bridge",
            ));
        }
        *registration = Some(Registration { binding, pass });
        Ok(())
    }

    pub(crate) fn unbind(&self) -> bool {
        self.registration.write().take().is_some()
    }

    pub fn is_bound(&self) -> bool {
        self.registration.read().is_some()
    }
}

impl RendererFeature for OverlayFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_render_passes(&self, queue: &mut PassQueue, camera: &CameraData) {
        let registration = self.registration.read();
        let Some(registration) = registration.as_ref() else {
            return;
        };
        if registration.binding.matches(camera.camera) {
            queue.enqueue_pass(registration.pass.clone());
        } else {
            log::trace!("Skipping GUI overlay for unbound camera {:?}", camera.camera);
        }
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{
        Camera, CameraTarget, Cameras, ExecutionContext, FrameData, FrameGraph, PipelineAsset,
        PixelRect, RendererData,
    };

    struct Marker;

    impl ScriptableRenderPass for Marker {
        fn name(&self) -> &str {
            "marker"
        }

        fn execute(&self, _context: &mut ExecutionContext, _camera: &CameraData) {}

        fn record_render_graph(&self, _graph: &mut FrameGraph, _frame: &FrameData) {}
    }

    fn camera_data(camera: crate::host::CameraId) -> CameraData {
        CameraData {
            camera,
            pixel_rect: PixelRect::new(0.0, 0.0, 100.0, 100.0),
            target: CameraTarget::Intermediate,
        }
    }

    #[test]
    fn test_find_by_downcast() {
        let feature = OverlayFeature::new();
        let asset = PipelineAsset::scriptable("urp", false)
            .with_renderer_data(RendererData::new("forward").with_feature(feature.clone()));
        let settings = GraphicsSettings::with_pipeline(asset);

        let found = OverlayFeature::find(&settings, 0).unwrap();
        assert!(Arc::ptr_eq(&found, &feature));
    }

    #[test]
    fn test_find_errors() {
        let settings = GraphicsSettings::with_pipeline(PipelineAsset::scriptable("urp", false));
        assert!(matches!(
            OverlayFeature::find(&settings, 0),
            Err(BridgeError::Resource(_))
        ));

        let settings = GraphicsSettings::with_pipeline(
            PipelineAsset::scriptable("urp", false).with_renderer_data(RendererData::new("forward")),
        );
        assert!(matches!(
            OverlayFeature::find(&settings, 0),
            Err(BridgeError::Configuration(_))
        ));

        assert!(matches!(
            OverlayFeature::find(&GraphicsSettings::legacy(), 0),
            Err(BridgeError::Configuration(_))
        ));
    }

    #[test]
    fn test_enqueue_gated_by_camera() {
        let mut cameras = Cameras::new();
        let a = cameras.spawn(Camera::new("a", 100.0, 100.0));
        let b = cameras.spawn(Camera::new("b", 100.0, 100.0));

        let feature = OverlayFeature::new();
        let binding = CameraBinding::new();
        binding.set(a);
        feature.bind(binding, Arc::new(Marker)).unwrap();

        let mut queue = PassQueue::new();
        feature.add_render_passes(&mut queue, &camera_data(b));
        assert!(queue.is_empty());
        feature.add_render_passes(&mut queue, &camera_data(a));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_single_binding() {
        let feature = OverlayFeature::new();
        feature.bind(CameraBinding::new(), Arc::new(Marker)).unwrap();
        assert!(feature
            .bind(CameraBinding::new(), Arc::new(Marker))
            .is_err());

        assert!(feature.unbind());
        assert!(!feature.unbind());
        assert!(!feature.is_bound());
    }
}
