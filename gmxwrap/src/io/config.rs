//! Configuration stored in `gmxwrap.toml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::redirect::RedirectionSpec;
use crate::error::{GmxError, Result};
use crate::events::EventSink;
use crate::io::scratch::DEFAULT_IDENTITY_VAR;
use crate::tool::AdapterOptions;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "gmxwrap.toml";

/// Wrapper configuration (TOML).
///
/// Every field is optional; a missing file behaves like an empty one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GmxConfig {
    /// Environment variable holding the scratch-directory identity prefix.
    pub identity_var: String,

    /// Parent directory for scratch areas. Defaults to the system temp dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_root: Option<PathBuf>,

    /// Redirection applied to every adapter built from this config.
    pub redirect: RedirectionSpec,

    /// Tools runnable by name with `gmxwrap run <name>`.
    pub tools: BTreeMap<String, ToolDefinition>,
}

/// A tool binding described in config rather than code.
///
/// `pattern`, `field` and `default_output` may be left out while a
/// definition is being written; such a tool cannot be run until they are
/// filled in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolDefinition {
    pub executable: String,
    #[serde(default = "default_output_flag")]
    pub output_flag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

fn default_output_flag() -> String {
    "o".to_string()
}

impl Default for GmxConfig {
    fn default() -> Self {
        Self {
            identity_var: DEFAULT_IDENTITY_VAR.to_string(),
            scratch_root: None,
            redirect: RedirectionSpec::default(),
            tools: BTreeMap::new(),
        }
    }
}

impl GmxConfig {
    pub fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |reason: String| GmxError::Config {
            path: path.to_path_buf(),
            reason,
        };
        if self.identity_var.trim().is_empty() {
            return Err(invalid("identity_var must be non-empty".to_string()));
        }
        for (name, tool) in &self.tools {
            if tool.executable.trim().is_empty() {
                return Err(invalid(format!("tools.{name}.executable must be non-empty")));
            }
            if tool.output_flag.trim().is_empty() {
                return Err(invalid(format!("tools.{name}.output_flag must be non-empty")));
            }
        }
        Ok(())
    }

    /// Adapter options reflecting this config, reporting into `sink`.
    pub fn adapter_options(&self, sink: Arc<dyn EventSink>) -> AdapterOptions {
        AdapterOptions {
            identity: None,
            identity_var: self.identity_var.clone(),
            scratch_root: self.scratch_root.clone(),
            redirection: self.redirect.clone(),
            sink,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `GmxConfig::default()`.
pub fn load_config(path: &Path) -> Result<GmxConfig> {
    if !path.exists() {
        let cfg = GmxConfig::default();
        cfg.validate(path)?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| GmxError::io(format!("read {}", path.display()), e))?;
    let cfg: GmxConfig = toml::from_str(&contents).map_err(|e| GmxError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    cfg.validate(path)?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &GmxConfig) -> Result<()> {
    cfg.validate(path)?;
    let mut buf = toml::to_string_pretty(cfg).map_err(|e| GmxError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| GmxError::io(format!("create directory {}", parent.display()), e))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .map_err(|e| GmxError::io(format!("write temp config {}", tmp_path.display()), e))?;
    fs::rename(&tmp_path, path)
        .map_err(|e| GmxError::io(format!("replace config {}", path.display()), e))?;
    Ok(())
}
