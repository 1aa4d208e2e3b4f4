pub mod config;
pub mod errors;
pub mod model;
pub mod pipeline;
pub mod sentiment;
pub mod sink;
pub mod source;
pub mod telemetry;
pub mod transform;

pub use config::{PipelineConfig, WriteMode};
pub use errors::{PipelineError, Result};
pub use pipeline::Pipeline;
pub use telemetry::RunSummary;
