//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the kernel:
//! - Math type aliases and scalar helpers
//! - Identity counters and UUIDs
//! - Logging utilities

pub mod math;
pub mod ids;
pub mod logging;
