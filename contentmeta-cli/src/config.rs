//! Configuration loading from `.contentmeta.toml`.
//!
//! The file lives in the content root (the `--root` directory) and is
//! optional. Every section falls back to defaults, and command-line flags
//! take precedence over anything set here.
//!
//! # Example Configuration
//!
//! ```toml
//! [scan]
//! exclude = ["archive/**", "**/draft_*"]
//!
//! [generate]
//! strict = true
//!
//! [output]
//! format = "json"
//! color = false
//! ```

use serde::Deserialize;
use std::path::Path;

/// Name of the config file looked up in the content root.
pub const CONFIG_FILE: &str = ".contentmeta.toml";

/// Root configuration structure loaded from `.contentmeta.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct MetaConfig {
    /// File selection settings.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Generation behavior.
    #[serde(default)]
    pub generate: GenerateConfig,

    /// Run summary preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// File selection settings.
#[derive(Debug, Deserialize, Default)]
pub struct ScanConfig {
    /// Glob patterns (root-relative) for files that never get a sidecar.
    ///
    /// # Example
    /// ```toml
    /// exclude = ["archive/**", "*.bak"]
    /// ```
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Generation behavior.
#[derive(Debug, Deserialize, Default)]
pub struct GenerateConfig {
    /// Treat content-id collisions as errors. `--strict` also enables this.
    #[serde(default)]
    pub strict: bool,
}

/// Run summary preferences.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default summary format: `table` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Force colored output on or off.
    #[serde(default)]
    pub color: Option<bool>,
}

impl MetaConfig {
    /// Load configuration from `.contentmeta.toml` in `root`.
    ///
    /// A missing file yields defaults. A file that cannot be read or parsed
    /// is reported as a warning and also yields defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.scan.exclude
    }

    pub fn strict(&self) -> bool {
        self.generate.strict
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
