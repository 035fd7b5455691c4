//! Engine configuration
//!
//! Serde-backed configuration structs with builder-style setters. Loadable
//! from RON files; every subsystem receives its section by value at
//! construction time rather than reading ambient global state.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::Vec3;

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// File contents failed to parse
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Physics subsystem configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity vector applied by the external solver
    pub gravity: Vec3,
}

impl PhysicsConfig {
    /// Create the default physics configuration
    pub fn new() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }

    /// Set the gravity vector
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Asset loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Base directory for assets
    pub assets_dir: String,
}

impl AssetConfig {
    /// Create the default asset configuration
    pub fn new() -> Self {
        Self {
            assets_dir: "resources".to_string(),
        }
    }

    /// Set the assets directory
    pub fn with_assets_dir(mut self, dir: impl Into<String>) -> Self {
        self.assets_dir = dir.into();
        self
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Log level filter (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Physics subsystem section
    pub physics: PhysicsConfig,
    /// Asset loading section
    pub assets: AssetConfig,
}

impl EngineConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            physics: PhysicsConfig::default(),
            assets: AssetConfig::default(),
        }
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the physics section
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Set the assets section
    pub fn with_assets(mut self, assets: AssetConfig) -> Self {
        self.assets = assets;
        self
    }

    /// Load a configuration from a RON file
    pub fn from_ron_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
