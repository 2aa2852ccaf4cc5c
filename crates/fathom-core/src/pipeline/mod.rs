pub mod batch;
pub mod config;
mod types;

pub use batch::{BlockProcessor, BlockResult};
pub use types::{NoOpReporter, PipelineStage, ProgressReporter};
