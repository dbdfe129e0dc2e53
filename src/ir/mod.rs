//! Workflow graph: the normalized node/edge model shared by the transformer
//! and the layout engine.

pub mod types;
pub mod validate;

pub use types::*;
pub use validate::{validate_graph, ValidationError};
