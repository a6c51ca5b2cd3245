//! Export configuration (`meshpress.toml`)

use anyhow::{Context, Result};
use meshpress_codec::CodecOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up next to the working directory
pub const CONFIG_FILE_NAME: &str = "meshpress.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub codec: CodecSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// Codec tuning section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecSection {
    /// Pack vertices on the rayon pool.
    /// Default: true
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Meshes smaller than this pack sequentially.
    /// Default: 4096
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

/// Output naming section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    /// Appended to the mesh name.
    /// Default: "_Optimized"
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Container file extension.
    /// Default: "mpmesh"
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Output directory. Default: next to the source asset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_parallel_threshold() -> usize {
    CodecOptions::default().parallel_threshold
}

fn default_suffix() -> String {
    "_Optimized".to_string()
}

fn default_extension() -> String {
    "mpmesh".to_string()
}

impl Default for CodecSection {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            extension: default_extension(),
            directory: None,
        }
    }
}

impl CodecSection {
    pub fn options(&self) -> CodecOptions {
        CodecOptions {
            parallel: self.parallel,
            parallel_threshold: self.parallel_threshold,
        }
    }
}

/// Load configuration from `path`
pub fn load_config(path: &Path) -> Result<ExportConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Load `path` if given, else `meshpress.toml` in the working directory if
/// present, else defaults
pub fn resolve_config(path: Option<&Path>) -> Result<ExportConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let local = Path::new(CONFIG_FILE_NAME);
            if local.is_file() {
                tracing::info!("Using {}", local.display());
                load_config(local)
            } else {
                Ok(ExportConfig::default())
            }
        }
    }
}
