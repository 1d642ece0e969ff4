//! Host render pipeline model
//!
//! The bridge integrates into a host engine that may run one of three execution
//! models. This module models that host: cameras with legacy command buffer
//! attachments, pipeline settings with installed renderer features, and a frame
//! graph. [`RenderHost::render_camera`] runs one camera frame the way the
//! configured pipeline would.

pub mod camera;
pub mod command;
pub mod graph;
pub mod scriptable;
pub mod settings;

pub use camera::*;
pub use command::*;
pub use graph::{
    FrameGraph, FrameGraphExecutor, FrameResources, GraphError, RasterContext, ResourceId,
    TextureDesc, TextureFormat,
};
pub use scriptable::*;
pub use settings::*;

use std::sync::Arc;

use thiserror::Error;

/// Host error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("unknown camera")]
    UnknownCamera,
    #[error("pipeline has no renderer data at index {0}")]
    MissingRendererData(usize),
    #[error("frame graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type HostResult<T> = Result<T, HostError>;

/// Execution model implied by the active graphics settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionModel {
    /// Fixed camera command buffers, no pipeline asset
    Legacy,
    Compatibility,
    FrameGraph,
    /// A pipeline this host cannot extend
    Unsupported(String),
}

/// Pass names recorded by the host itself
pub const OPAQUE_PASS: &str = "DrawOpaqueObjects";
pub const FINAL_BLIT_PASS: &str = "FinalBlit";

/// Everything observable about one rendered camera frame
#[derive(Debug)]
pub struct FrameReport {
    pub camera: CameraId,
    pub frame_index: u64,
    pub model: ExecutionModel,
    /// Scriptable passes enqueued by features, in execution order
    pub enqueued: Vec<String>,
    /// Frame graph passes as recorded, before culling
    pub recorded_passes: Vec<String>,
    /// Frame graph passes in executed order
    pub executed_passes: Vec<String>,
    pub context: ExecutionContext,
}

impl FrameReport {
    fn new(camera: CameraId, frame_index: u64, model: ExecutionModel) -> Self {
        Self {
            camera,
            frame_index,
            model,
            enqueued: Vec::new(),
            recorded_passes: Vec::new(),
            executed_passes: Vec::new(),
            context: ExecutionContext::new(),
        }
    }

    /// Indexed draws submitted under `label`
    pub fn draw_count_for(&self, label: &str) -> usize {
        self.context
            .submissions_named(label)
            .map(Submission::draw_count)
            .sum()
    }

    pub fn was_recorded(&self, pass: &str) -> bool {
        self.recorded_passes.iter().any(|p| p == pass)
    }
}

/// The host engine: settings, cameras and per-camera frame execution
pub struct RenderHost {
    settings: GraphicsSettings,
    cameras: Cameras,
    executor: FrameGraphExecutor,
    frame_index: u64,
    clear_color: [f32; 4],
}

impl RenderHost {
    pub fn new(settings: GraphicsSettings) -> Self {
        Self {
            settings,
            cameras: Cameras::new(),
            executor: FrameGraphExecutor::new(),
            frame_index: 0,
            clear_color: [0.1, 0.1, 0.12, 1.0],
        }
    }

    pub fn settings(&self) -> &GraphicsSettings {
        &self.settings
    }

    /// Replace pipeline settings, e.g. when a quality level switches pipelines
    pub fn settings_mut(&mut self) -> &mut GraphicsSettings {
        &mut self.settings
    }

    pub fn cameras(&self) -> &Cameras {
        &self.cameras
    }

    pub fn cameras_mut(&mut self) -> &mut Cameras {
        &mut self.cameras
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn execution_model(&self) -> ExecutionModel {
        match self.settings.active_pipeline().map(|asset| &asset.kind) {
            None => ExecutionModel::Legacy,
            Some(PipelineKind::Scriptable {
                compatibility_mode: true,
            }) => ExecutionModel::Compatibility,
            Some(PipelineKind::Scriptable {
                compatibility_mode: false,
            }) => ExecutionModel::FrameGraph,
            Some(PipelineKind::Custom(name)) => ExecutionModel::Unsupported(name.clone()),
        }
    }

    /// Render one frame of `camera`
    pub fn render_camera(&mut self, camera_id: CameraId) -> HostResult<FrameReport> {
        let camera = self
            .cameras
            .get(camera_id)
            .ok_or(HostError::UnknownCamera)?;
        let camera_data = CameraData {
            camera: camera_id,
            pixel_rect: camera.pixel_rect,
            target: camera.target,
        };

        self.frame_index += 1;
        let model = self.execution_model();
        let mut report = FrameReport::new(camera_id, self.frame_index, model.clone());

        match model {
            ExecutionModel::Legacy => {
                for event in CameraEvent::ORDER {
                    for buffer in camera.command_buffers(event) {
                        report.context.execute_command_buffer(&buffer.lock());
                    }
                }
            }
            ExecutionModel::Compatibility => {
                let passes = self.gather_passes(camera.renderer_index, &camera_data)?;
                for pass in passes {
                    report.enqueued.push(pass.name().to_string());
                    pass.execute(&mut report.context, &camera_data);
                }
            }
            ExecutionModel::FrameGraph => {
                let passes = self.gather_passes(camera.renderer_index, &camera_data)?;
                report.enqueued = passes.iter().map(|p| p.name().to_string()).collect();

                let (graph, compiled) = self.build_frame_graph(&passes, camera_data)?;
                report.recorded_passes = graph.pass_nodes().iter().map(|n| n.name.clone()).collect();
                report.executed_passes = compiled
                    .pass_order
                    .iter()
                    .filter_map(|id| graph.get_pass_node(*id).map(|n| n.name.clone()))
                    .collect();

                self.executor.execute(graph, &compiled, &mut report.context);
            }
            ExecutionModel::Unsupported(name) => {
                log::trace!("Pipeline '{}' has no extension point; nothing to run", name);
            }
        }

        Ok(report)
    }

    fn gather_passes(
        &self,
        renderer_index: usize,
        camera: &CameraData,
    ) -> HostResult<Vec<Arc<dyn ScriptableRenderPass>>> {
        let data = self
            .settings
            .active_pipeline()
            .and_then(|asset| asset.renderer_data_list.as_ref())
            .and_then(|list| list.get(renderer_index))
            .ok_or(HostError::MissingRendererData(renderer_index))?;

        let mut queue = PassQueue::new();
        for feature in &data.features {
            feature.add_render_passes(&mut queue, camera);
        }
        Ok(queue.into_sorted())
    }

    fn build_frame_graph(
        &self,
        passes: &[Arc<dyn ScriptableRenderPass>],
        camera: CameraData,
    ) -> HostResult<(FrameGraph, graph::CompiledGraph)> {
        let mut graph = FrameGraph::new();
        let backbuffer = graph.import_texture("Backbuffer", true);
        let active_color_texture = match camera.target {
            CameraTarget::Backbuffer => backbuffer,
            CameraTarget::Intermediate => graph.create_texture(
                "CameraColorAttachment",
                TextureDesc {
                    width: camera.pixel_rect.width.max(1.0) as u32,
                    height: camera.pixel_rect.height.max(1.0) as u32,
                    format: TextureFormat::Rgba16Float,
                },
            ),
        };

        let clear_color = self.clear_color;
        graph.add_raster_pass::<(), _>(OPAQUE_PASS, |builder| {
            builder.set_render_attachment(active_color_texture, 0);
            builder.set_render_func(move |_, ctx| ctx.cmd.push(Command::ClearColor(clear_color)));
        });

        let frame = FrameData {
            camera,
            resources: FrameResources {
                active_color_texture,
                backbuffer,
            },
        };
        for pass in passes {
            pass.record_render_graph(&mut graph, &frame);
        }

        if active_color_texture != backbuffer {
            graph.add_raster_pass::<(), _>(FINAL_BLIT_PASS, |builder| {
                builder.read_texture(active_color_texture);
                builder.set_render_attachment(backbuffer, 0);
                builder.set_render_func(|_, ctx| {
                    ctx.cmd.push(Command::BindShader("Hidden/FinalBlit".into()));
                    ctx.cmd.draw_indexed(0, 3, 0);
                });
            });
        }

        let compiled = graph.compile()?;
        Ok((graph, compiled))
    }
}
