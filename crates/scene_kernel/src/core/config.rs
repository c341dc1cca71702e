//! # Kernel Configuration
//!
//! Defaults applied to newly created nodes and geometries, loadable from TOML
//! or RON files. This only covers kernel behaviour; scenes themselves are
//! never persisted.

use serde::{Deserialize, Serialize};

use crate::math::{RotationOrder, Vec3};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// When cached geometry bounds are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Callers recompute bounds themselves. Merging leaves stale caches in
    /// place and transforms only refresh caches that already exist.
    Explicit,
    /// Any mutation of the vertex set drops the cached box and sphere;
    /// transforms refresh caches that already exist.
    #[default]
    InvalidateOnMutation,
}

/// Defaults for nodes and geometries created by a [`crate::scene::Scene`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Up vector given to new nodes
    pub default_up: Vec3,
    /// Whether new nodes recompose their local matrix on every world update
    pub default_matrix_auto_update: bool,
    /// Euler order used when a node's rotation is read back as angles
    pub default_rotation_order: RotationOrder,
    /// Bounding volume cache policy for geometries
    pub bounds_policy: BoundsPolicy,
}

impl KernelConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default up vector
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.default_up = up;
        self
    }

    /// Set whether nodes update their local matrix automatically
    pub fn with_matrix_auto_update(mut self, enabled: bool) -> Self {
        self.default_matrix_auto_update = enabled;
        self
    }

    /// Set the default rotation order
    pub fn with_rotation_order(mut self, order: RotationOrder) -> Self {
        self.default_rotation_order = order;
        self
    }

    /// Set the bounds cache policy
    pub fn with_bounds_policy(mut self, policy: BoundsPolicy) -> Self {
        self.bounds_policy = policy;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_up.norm_squared() == 0.0 {
            return Err("Default up vector cannot be zero".to_string());
        }
        if !self.default_up.iter().all(|v| v.is_finite()) {
            return Err("Default up vector must be finite".to_string());
        }
        Ok(())
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            default_up: Vec3::new(0.0, 1.0, 0.0),
            default_matrix_auto_update: true,
            default_rotation_order: RotationOrder::Xyz,
            bounds_policy: BoundsPolicy::InvalidateOnMutation,
        }
    }
}

impl Config for KernelConfig {}
