//! Frame graph definition and compilation

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

use crate::host::graph::pass::*;
use crate::host::graph::resource::*;

/// Frame graph compilation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("pass '{pass}' references unknown resource {resource:?}")]
    UnknownResource { pass: String, resource: ResourceId },
    #[error("pass '{pass}' binds two color attachments at index {index}")]
    DuplicateAttachment { pass: String, index: u32 },
}

/// Declarative description of one frame's passes and the textures they touch
pub struct FrameGraph {
    resources: Vec<VirtualResource>,
    pass_nodes: Vec<PassNode>,
    render_funcs: Vec<Option<RenderFunc>>,
    next_pass_id: u32,
    next_resource_id: u32,
}

impl FrameGraph {
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            pass_nodes: Vec::new(),
            render_funcs: Vec::new(),
            next_pass_id: 0,
            next_resource_id: 0,
        }
    }

    fn push_resource(&mut self, name: &str, kind: ResourceKind) -> ResourceId {
        let id = ResourceId(self.next_resource_id);
        self.next_resource_id += 1;
        self.resources.push(VirtualResource {
            id,
            name: name.to_string(),
            kind,
        });
        id
    }

    /// Import a texture owned outside the graph
    pub fn import_texture(&mut self, name: &str, backbuffer: bool) -> ResourceId {
        self.push_resource(name, ResourceKind::Imported { backbuffer })
    }

    /// Create a texture that lives for this frame only
    pub fn create_texture(&mut self, name: &str, desc: TextureDesc) -> ResourceId {
        self.push_resource(name, ResourceKind::Transient(desc))
    }

    /// Record a raster pass. `record` declares attachments and sets the deferred
    /// render function; nothing is executed until [`FrameGraphExecutor::execute`].
    ///
    /// [`FrameGraphExecutor::execute`]: super::FrameGraphExecutor::execute
    pub fn add_raster_pass<D, F>(&mut self, name: &str, record: F) -> PassId
    where
        D: Default + 'static,
        F: FnOnce(&mut RasterPassBuilder<D>),
    {
        let id = PassId(self.next_pass_id);
        self.next_pass_id += 1;

        let mut builder = RasterPassBuilder::new(D::default());
        record(&mut builder);
        let (accesses, color_attachments, render_func) = builder.finish();

        self.pass_nodes.push(PassNode {
            id,
            name: name.to_string(),
            accesses,
            color_attachments,
            has_render_func: render_func.is_some(),
        });
        self.render_funcs.push(render_func);

        id
    }

    /// Validate, cull and order the recorded passes.
    ///
    /// A pass is culled when it writes nothing or has no render function. A
    /// pass runs after every earlier pass that writes a resource it touches.
    pub fn compile(&self) -> Result<CompiledGraph, GraphError> {
        let known: HashSet<ResourceId> = self.resources.iter().map(|r| r.id).collect();

        for node in &self.pass_nodes {
            if let Some(access) = node.accesses.iter().find(|a| !known.contains(&a.resource)) {
                return Err(GraphError::UnknownResource {
                    pass: node.name.clone(),
                    resource: access.resource,
                });
            }

            let mut indices = HashSet::new();
            for (index, _) in &node.color_attachments {
                if !indices.insert(*index) {
                    return Err(GraphError::DuplicateAttachment {
                        pass: node.name.clone(),
                        index: *index,
                    });
                }
            }
        }

        let mut culled = Vec::new();
        let live: Vec<&PassNode> = self
            .pass_nodes
            .iter()
            .filter(|node| {
                let keep = node.has_render_func && node.has_writes();
                if !keep {
                    log::debug!("Culling frame graph pass '{}'", node.name);
                    culled.push(node.id);
                }
                keep
            })
            .collect();

        // Build dependency graph
        let mut dependencies: HashMap<PassId, HashSet<PassId>> = HashMap::new();
        for (i, node) in live.iter().enumerate() {
            let deps = dependencies.entry(node.id).or_default();
            for earlier in &live[..i] {
                let depends = node
                    .accesses
                    .iter()
                    .any(|access| earlier.writes_resource(access.resource));
                if depends {
                    deps.insert(earlier.id);
                }
            }
        }

        // Topological sort using Kahn's algorithm, lowest id first
        let mut in_degree: HashMap<PassId, usize> = dependencies
            .iter()
            .map(|(&id, deps)| (id, deps.len()))
            .collect();

        let mut ready: BTreeSet<PassId> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&id, _)| id)
            .collect();

        let mut pass_order = Vec::with_capacity(live.len());

        while let Some(pass_id) = ready.pop_first() {
            pass_order.push(pass_id);

            for node in &live {
                if dependencies[&node.id].contains(&pass_id) {
                    if let Some(degree) = in_degree.get_mut(&node.id) {
                        *degree -= 1;
                        if *degree == 0 {
                            ready.insert(node.id);
                        }
                    }
                }
            }
        }

        // Determine resource lifetimes
        let mut resource_lifetimes: HashMap<ResourceId, ResourceLifetime> = HashMap::new();
        for (order, pass_id) in pass_order.iter().enumerate() {
            let Some(node) = self.get_pass_node(*pass_id) else {
                continue;
            };
            for access in &node.accesses {
                let lifetime = resource_lifetimes
                    .entry(access.resource)
                    .or_insert(ResourceLifetime {
                        first_use: order,
                        last_use: order,
                    });
                lifetime.last_use = order;
            }
        }

        Ok(CompiledGraph {
            pass_order,
            culled,
            resource_lifetimes,
        })
    }

    /// Get pass nodes (metadata)
    pub fn pass_nodes(&self) -> &[PassNode] {
        &self.pass_nodes
    }

    /// Get all resources
    pub fn resources(&self) -> &[VirtualResource] {
        &self.resources
    }

    pub fn get_resource(&self, id: ResourceId) -> Option<&VirtualResource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Get pass node by ID
    pub fn get_pass_node(&self, id: PassId) -> Option<&PassNode> {
        self.pass_nodes.iter().find(|n| n.id == id)
    }

    /// Find a pass by name
    pub fn find_pass(&self, name: &str) -> Option<&PassNode> {
        self.pass_nodes.iter().find(|n| n.name == name)
    }

    pub(crate) fn take_render_func(&mut self, id: PassId) -> Option<RenderFunc> {
        let index = self.pass_nodes.iter().position(|n| n.id == id)?;
        self.render_funcs[index].take()
    }
}

impl Default for FrameGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Resource lifetime in terms of pass execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLifetime {
    pub first_use: usize,
    pub last_use: usize,
}

/// Compiled frame graph with execution order and resource lifetimes
#[derive(Debug)]
pub struct CompiledGraph {
    pub pass_order: Vec<PassId>,
    pub culled: Vec<PassId>,
    pub resource_lifetimes: HashMap<ResourceId, ResourceLifetime>,
}

impl CompiledGraph {
    /// Check if a resource is alive at a given execution step
    pub fn is_resource_alive(&self, resource: ResourceId, step: usize) -> bool {
        self.resource_lifetimes
            .get(&resource)
            .is_some_and(|lifetime| step >= lifetime.first_use && step <= lifetime.last_use)
    }
}
