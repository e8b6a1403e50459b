pub mod color;
pub mod config;
pub mod export;
pub mod fetch;
pub mod label;
pub mod legend;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod tooltip;
pub mod treemap;

pub use color::*;
pub use config::*;
pub use fetch::*;
pub use model::*;
pub use pipeline::Orchestrator;
