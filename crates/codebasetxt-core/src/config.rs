//! Walk configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::policy::ExclusionPolicy;
use crate::DEFAULT_RULES_FILE;

/// Configuration for a walk.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Root directory to walk.
    pub root: PathBuf,

    /// Rules file (gitignore syntax). Defaults to `<root>/.gitignore`.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub rules_file: Option<PathBuf>,

    /// Follow symbolic links, breaking cycles.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Visit siblings in file-name order instead of listing order.
    #[builder(default = "false")]
    #[serde(default)]
    pub sort_entries: bool,

    /// Built-in exclusion lists.
    #[builder(default)]
    #[serde(default)]
    pub policy: ExclusionPolicy,
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Create a simple config for walking a path with default rules.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            rules_file: None,
            follow_symlinks: false,
            sort_entries: false,
            policy: ExclusionPolicy::default(),
        }
    }

    /// Rules file to load, falling back to `<root>/.gitignore`.
    pub fn rules_path(&self) -> PathBuf {
        self.rules_file
            .clone()
            .unwrap_or_else(|| self.root.join(DEFAULT_RULES_FILE))
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
