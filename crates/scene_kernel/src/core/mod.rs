//! # Core Module
//!
//! Shared abstractions used throughout the kernel.
//!
//! ## Organization
//!
//! - **Config**: Kernel defaults and the file-backed `Config` trait
//! - **Foundation**: Low-level utilities (math aliases, ids, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{BoundsPolicy, Config, ConfigError, KernelConfig};
