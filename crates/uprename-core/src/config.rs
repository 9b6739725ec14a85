//! Relocation policy and its TOML config file under the XDG config dir.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::renamer::{validate_target, RenameError};

/// Target value meaning "keep the file where it is, only rename it".
pub const MIRROR_SOURCE: &str = "*";

/// Relocation policy, loadable from `~/.config/uprename/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameOptions {
    /// Target file path or directory. `None` or `"*"` mirrors the source location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    /// Use the client-supplied upload name as the target filename.
    pub use_upload_name: bool,
    /// Replace a file that already exists at the target path.
    pub overwrite: bool,
    /// Append a unique suffix to the target filename stem.
    pub randomize: bool,
}

impl RenameOptions {
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_use_upload_name(mut self, flag: bool) -> Self {
        self.use_upload_name = flag;
        self
    }

    pub fn with_overwrite(mut self, flag: bool) -> Self {
        self.overwrite = flag;
        self
    }

    pub fn with_randomize(mut self, flag: bool) -> Self {
        self.randomize = flag;
        self
    }

    /// True when the target is unset or the `*` wildcard.
    pub fn mirrors_source(&self) -> bool {
        match &self.target {
            None => true,
            Some(t) => t.as_os_str() == MIRROR_SOURCE,
        }
    }

    /// Reject a target that `UploadRenamer::set_target` would reject.
    pub fn validate(&self) -> std::result::Result<(), RenameError> {
        match &self.target {
            Some(t) => validate_target(t),
            None => Ok(()),
        }
    }

    /// Parse options from TOML text. Missing keys fall back to defaults.
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let opts: RenameOptions = toml::from_str(data).context("invalid rename options")?;
        opts.validate().context("invalid rename options")?;
        Ok(opts)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("uprename")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load options from a specific TOML file.
pub fn load_from(path: &Path) -> Result<RenameOptions> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    RenameOptions::from_toml_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

/// Load options from `path`, writing the defaults there first if the file is missing.
pub fn load_or_init_at(path: &Path) -> Result<RenameOptions> {
    if !path.exists() {
        let default_opts = RenameOptions::default();
        let toml = toml::to_string_pretty(&default_opts)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_opts);
    }
    load_from(path)
}

/// Load options from the XDG config dir, creating a default file if none exists.
pub fn load_or_init() -> Result<RenameOptions> {
    load_or_init_at(&config_path()?)
}
