//! Frame graph executor

use crate::host::command::{CommandBuffer, ExecutionContext};
use crate::host::graph::graph::*;
use crate::host::graph::pass::*;

/// Counters from one executed graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub passes_executed: usize,
    pub passes_culled: usize,
}

/// Runs the deferred render functions of a compiled frame graph
#[derive(Debug, Default)]
pub struct FrameGraphExecutor {
    last_stats: ExecutionStats,
}

impl FrameGraphExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute passes in compiled order. Each pass records into its own command
    /// buffer, which is submitted when it is not empty.
    pub fn execute(
        &mut self,
        mut graph: FrameGraph,
        compiled: &CompiledGraph,
        context: &mut ExecutionContext,
    ) -> ExecutionStats {
        let mut stats = ExecutionStats {
            passes_culled: compiled.culled.len(),
            ..Default::default()
        };

        for &pass_id in &compiled.pass_order {
            let Some(name) = graph.get_pass_node(pass_id).map(|n| n.name.clone()) else {
                continue;
            };
            let Some(render_func) = graph.take_render_func(pass_id) else {
                continue;
            };

            let mut cmd = CommandBuffer::new(name);
            {
                let mut ctx = RasterContext {
                    cmd: &mut cmd,
                    pass: pass_id,
                };
                render_func(&mut ctx);
            }
            stats.passes_executed += 1;

            if !cmd.is_empty() {
                context.execute_command_buffer(&cmd);
            }
        }

        self.last_stats = stats;
        stats
    }

    pub fn last_stats(&self) -> ExecutionStats {
        self.last_stats
    }
}
