pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use error::{Result, SandboxError};
