pub mod pipeline;
pub mod services;
pub mod system;
pub mod utils;

pub use pipeline::{FanoutPolicy, PipelineConfig};
pub use services::{ApiEndpoints, AuthConfig, ServiceConfig};
pub use system::{Stage, SystemConfig};
