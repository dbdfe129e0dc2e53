pub mod analyze;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod parse;
pub mod pipeline;
pub mod transform;
pub mod wasm;
