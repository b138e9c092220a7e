#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod types;
pub mod config;
pub mod context;
pub mod security;

pub use types::*;
pub use crate::config::Config;
pub use security::{Deployment, Verifier};

// Only the binary reports through these.
use eyre as _;
use tracing_subscriber as _;
