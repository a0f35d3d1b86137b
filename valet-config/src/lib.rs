//! Configuration management for the valet platform services.
//!
//! Provides environment detection, configuration loading from YAML files,
//! secret handling, and shared configuration types used by the control-plane
//! API and its companion binaries.

mod environment;
mod load;
mod secret;
pub mod shared;

pub use environment::*;
pub use load::*;
pub use secret::*;
