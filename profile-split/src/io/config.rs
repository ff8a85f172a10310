//! Splitter configuration stored in `profile-split.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::conflict::ConflictPolicy;
use crate::core::layout::{DEFAULT_MARKER_TEMPLATE, PathLayout};
use crate::io::sink::SinkOptions;

pub const CONFIG_FILE_NAME: &str = "profile-split.toml";

const MAX_INDENT: usize = 16;

/// Splitter configuration (TOML).
///
/// Missing fields default to the layout the tool has always produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SplitConfig {
    /// Directory under which `<profile name>/` is created.
    pub output_root: PathBuf,

    /// minijinja template for the marker document path.
    pub marker_template: String,

    pub conflict_policy: ConflictPolicy,

    /// Spaces per indentation level in written JSON.
    pub indent: usize,

    /// Write independent object folders concurrently.
    pub parallel: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("profile"),
            marker_template: DEFAULT_MARKER_TEMPLATE.to_string(),
            conflict_policy: ConflictPolicy::default(),
            indent: 4,
            parallel: true,
        }
    }
}

impl SplitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.output_root.as_os_str().is_empty() {
            return Err(anyhow!("output_root must not be empty"));
        }
        if self.marker_template.trim().is_empty() {
            return Err(anyhow!("marker_template must not be empty"));
        }
        if self.indent == 0 || self.indent > MAX_INDENT {
            return Err(anyhow!("indent must be between 1 and {MAX_INDENT}"));
        }
        Ok(())
    }

    pub fn layout(&self) -> PathLayout {
        PathLayout::new(self.marker_template.clone())
    }

    pub fn sink_options(&self) -> SinkOptions {
        SinkOptions {
            indent: self.indent,
            parallel: self.parallel,
        }
    }

    /// Directory that receives the tree for `profile_name`.
    pub fn profile_dir(&self, base: &Path, profile_name: &str) -> PathBuf {
        base.join(&self.output_root).join(profile_name)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SplitConfig::default()`.
pub fn load_config(path: &Path) -> Result<SplitConfig> {
    if !path.exists() {
        let cfg = SplitConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SplitConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &SplitConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
