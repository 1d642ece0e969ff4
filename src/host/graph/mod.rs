//! Frame Graph
//!
//! A declarative per-frame model: passes declare the textures they read and
//! write while recording, and their render functions run later, in dependency
//! order, when the graph is executed.

pub mod executor;
pub mod graph;
pub mod pass;
pub mod resource;

pub use executor::*;
pub use graph::*;
pub use pass::*;
pub use resource::*;
