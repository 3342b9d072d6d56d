pub mod config;
pub mod group;
pub mod project;
pub mod task;

pub use config::*;
pub use group::*;
pub use project::*;
pub use task::*;
