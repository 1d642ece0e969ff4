//! Raster pass definitions for the frame graph

use crate::host::command::CommandBuffer;
use super::resource::{AccessMode, ResourceAccess, ResourceId};

/// Unique identifier for a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassId(pub(crate) u32);

/// Context handed to a pass's render function during execution
pub struct RasterContext<'a> {
    pub cmd: &'a mut CommandBuffer,
    pub pass: PassId,
}

/// Type-erased deferred render function with its pass data captured
pub(crate) type RenderFunc = Box<dyn FnOnce(&mut RasterContext<'_>)>;

type TypedRenderFunc<D> = Box<dyn FnOnce(&D, &mut RasterContext<'_>)>;

/// Builder handed to the recording closure of [`FrameGraph::add_raster_pass`].
///
/// [`FrameGraph::add_raster_pass`]: super::FrameGraph::add_raster_pass
pub struct RasterPassBuilder<D> {
    pub(crate) data: D,
    pub(crate) accesses: Vec<ResourceAccess>,
    pub(crate) color_attachments: Vec<(u32, ResourceId)>,
    pub(crate) render_func: Option<TypedRenderFunc<D>>,
}

impl<D: 'static> RasterPassBuilder<D> {
    pub(crate) fn new(data: D) -> Self {
        Self {
            data,
            accesses: Vec::new(),
            color_attachments: Vec::new(),
            render_func: None,
        }
    }

    /// Per-pass data, moved into the render function when the pass executes
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// Bind `resource` as the color attachment at `index` (write-only)
    pub fn set_render_attachment(&mut self, resource: ResourceId, index: u32) {
        self.color_attachments.push((index, resource));
        self.accesses.push(ResourceAccess {
            resource,
            mode: AccessMode::Write,
        });
    }

    /// Declare that this pass samples `resource`
    pub fn read_texture(&mut self, resource: ResourceId) {
        self.accesses.push(ResourceAccess {
            resource,
            mode: AccessMode::Read,
        });
    }

    /// Set the function run in the graph's execution phase
    pub fn set_render_func<F>(&mut self, func: F)
    where
        F: FnOnce(&D, &mut RasterContext<'_>) + 'static,
    {
        self.render_func = Some(Box::new(func));
    }

    pub(crate) fn finish(self) -> (Vec<ResourceAccess>, Vec<(u32, ResourceId)>, Option<RenderFunc>) {
        let Self {
            data,
            accesses,
            color_attachments,
            render_func,
        } = self;

        let render_func = render_func.map(|func| {
            let erased: RenderFunc = Box::new(move |ctx| func(&data, ctx));
            erased
        });

        (accesses, color_attachments, render_func)
    }
}

/// Metadata about a pass in the graph
#[derive(Debug, Clone)]
pub struct PassNode {
    pub id: PassId,
    pub name: String,
    pub accesses: Vec<ResourceAccess>,
    pub color_attachments: Vec<(u32, ResourceId)>,
    pub has_render_func: bool,
}

impl PassNode {
    pub fn reads_resource(&self, resource: ResourceId) -> bool {
        self.accesses
            .iter()
            .any(|a| a.resource == resource && a.mode == AccessMode::Read)
    }

    pub fn writes_resource(&self, resource: ResourceId) -> bool {
        self.accesses
            .iter()
            .any(|a| a.resource == resource && a.mode == AccessMode::Write)
    }

    pub fn has_writes(&self) -> bool {
        self.accesses.iter().any(|a| a.mode == AccessMode::Write)
    }

    pub fn touches(&self, resource: ResourceId) -> bool {
        self.accesses.iter().any(|a| a.resource == resource)
    }
}
