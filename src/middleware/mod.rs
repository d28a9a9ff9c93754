//! Turning matched reactions into GitHub issues, once per message.

mod error;
mod pipeline;
mod registry;


pub use error::PipelineError;
pub use pipeline::Middleware;
pub use registry::{InFlightGuard, InFlightRegistry, PipelineState};
