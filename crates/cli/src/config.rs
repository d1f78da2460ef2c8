//! `datapoints.toml` loading
//!
//! The config file is one options layer: every key is optional and uses
//! the snake_case option names, plus a `[seeder]` table.
//!
//! ```toml
//! controller_type = "api"
//! namespace = "App\\Domain"
//! additional_files = ["policy", "provider"]
//!
//! [seeder]
//! count = 25
//! class = "DemoSeeder"
//! ```

use anyhow::Context;
use datapoints_core::ScaffoldError;
use datapoints_ir::OptionOverrides;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "datapoints.toml";

/// Parsed `datapoints.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub options: OptionOverrides,
    pub seeder: SeederConfig,
}

/// The `[seeder]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeederConfig {
    /// Rows per entity
    pub count: Option<u32>,
    /// Aggregate seeder class name
    pub class: Option<String>,
}

impl ConfigFile {
    pub fn from_toml(src: &str) -> Result<Self, ScaffoldError> {
        toml::from_str(src).map_err(|e| ScaffoldError::InvalidConfig(e.to_string()))
    }

    /// Load the config layer
    ///
    /// An explicit path must exist. Without one, `datapoints.toml` in `dir`
    /// is used when present and an empty layer otherwise.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        let path: PathBuf = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let src = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config =
            Self::from_toml(&src).with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
