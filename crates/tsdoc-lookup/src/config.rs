//! Lookup configuration.
//!
//! Values come from three layers, lowest precedence first: built-in
//! defaults, the environment (`TSDOC_LIB_DIR`), and explicit overrides from
//! the command line.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tsdoc_common::limits::{MAX_MODULE_EXPORTS, MAX_TYPE_MEMBERS, SUMMARY_WIDTH};

/// Environment variable naming the TypeScript `lib` directory.
pub const LIB_DIR_ENV: &str = "TSDOC_LIB_DIR";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Directory packages and local files are searched from.
    pub cwd: PathBuf,
    /// Explicit standard library directory; skips discovery when set.
    pub lib_dir: Option<PathBuf>,
    pub max_members: usize,
    pub max_exports: usize,
    /// Character budget of one-line doc excerpts.
    pub summary_width: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            cwd: PathBuf::from("."),
            lib_dir: None,
            max_members: MAX_TYPE_MEMBERS,
            max_exports: MAX_MODULE_EXPORTS,
            summary_width: SUMMARY_WIDTH,
        }
    }
}

impl LookupConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = LookupConfig::default();
        if let Some(dir) = std::env::var_os(LIB_DIR_ENV).filter(|v| !v.is_empty()) {
            config.lib_dir = Some(PathBuf::from(dir));
        }
        config
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_lib_dir(mut self, lib_dir: impl Into<PathBuf>) -> Self {
        self.lib_dir = Some(lib_dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: LookupConfig =
            serde_json::from_str(r#"{ "max_members": 5, "lib_dir": "/opt/ts/lib" }"#)
                .expect("valid config");
        assert_eq!(config.max_members, 5);
        assert_eq!(config.max_exports, MAX_MODULE_EXPORTS);
        assert_eq!(config.lib_dir, Some(PathBuf::from("/opt/ts/lib")));
        assert_eq!(config.cwd, PathBuf::from("."));
    }

    #[test]
    fn test_builder_overrides() {
        let config = LookupConfig::default().with_cwd("/work").with_lib_dir("/lib");
        assert_eq!(config.cwd, PathBuf::from("/work"));
        assert_eq!(config.lib_dir, Some(PathBuf::from("/lib")));
        assert_eq!(config.summary_width, SUMMARY_WIDTH);
    }
}
