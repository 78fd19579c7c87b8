//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/teamtree/teamtree.toml`
//! 3. Local config: `<dir>/.teamtree.toml` (working directory by default)
//! 4. Environment variables: `TEAMTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::NamePolicy;
use crate::util::path::{expand_env_vars, resolve_against};

/// Tree rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeConfig {
    /// Levels shown below the organization, roots included
    pub max_depth: usize,
    /// Upper bound on browsed nodes, roots excepted
    pub max_nodes: usize,
    /// Append the informational child count to team labels
    pub show_child_count: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 16,
            max_nodes: 10_000,
            show_child_count: true,
        }
    }
}

/// Raw tree config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTreeConfig {
    pub max_depth: Option<usize>,
    pub max_nodes: Option<usize>,
    pub show_child_count: Option<bool>,
}

impl TreeConfig {
    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawTreeConfig) -> Self {
        Self {
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            max_nodes: overlay.max_nodes.unwrap_or(self.max_nodes),
            show_child_count: overlay.show_child_count.unwrap_or(self.show_child_count),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub organization: Option<String>,
    pub seed_file: Option<PathBuf>,
    pub strict_names: Option<bool>,
    #[serde(default)]
    pub tree: RawTreeConfig,
}

/// Unified configuration for teamtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Organization passed as context to insert/remove
    pub organization: String,
    /// Initial snapshot loaded at session start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
    /// Reject empty team names
    pub strict_names: bool,
    pub tree: TreeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organization: "default".into(),
            seed_file: None,
            strict_names: false,
            tree: TreeConfig::default(),
        }
    }
}

/// Get the XDG config directory for teamtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "teamtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("teamtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".teamtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Store policy derived from `strict_names`.
    pub fn name_policy(&self) -> NamePolicy {
        if self.strict_names {
            NamePolicy::Strict
        } else {
            NamePolicy::Permissive
        }
    }

    /// Overlay a config file layer onto self.
    ///
    /// A relative `seed_file` is resolved against `file_dir`, the directory
    /// holding that config file.
    fn merge_with(&self, overlay: &RawSettings, file_dir: &Path) -> Self {
        Self {
            organization: overlay
                .organization
                .clone()
                .unwrap_or_else(|| self.organization.clone()),
            seed_file: overlay
                .seed_file
                .as_deref()
                .map(|p| resolve_against(p, file_dir))
                .or_else(|| self.seed_file.clone()),
            strict_names: overlay.strict_names.unwrap_or(self.strict_names),
            tree: self.tree.merge(&overlay.tree),
        }
    }

    fn merge_file(self, path: &Path) -> Result<Self, ApplicationError> {
        if !path.exists() {
            return Ok(self);
        }
        debug!("merging config file {}", path.display());
        let raw = load_raw_settings(path)?;
        let dir = path.parent().unwrap_or(Path::new("."));
        Ok(self.merge_with(&raw, dir))
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.teamtree.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/teamtree/teamtree.toml`
    /// 3. Local config: `<local_dir>/.teamtree.toml`
    /// 4. Environment variables: `TEAMTREE_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        let mut current = Self::merge_files(global.as_deref(), local_dir)?;
        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Load the file layers only, with an explicit global config path.
    ///
    /// Environment variables are not consulted.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::merge_files(global_path, local_dir)?;
        current.expand_paths();
        Ok(current)
    }

    fn merge_files(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();
        if let Some(global) = global_path {
            current = current.merge_file(global)?;
        }
        if let Some(dir) = local_dir {
            current = current.merge_file(&local_config_path(dir))?;
        }
        Ok(current)
    }

    /// Apply TEAMTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TEAMTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(config.get_string("organization"))? {
            settings.organization = val;
        }
        if let Some(val) = env_value(config.get_string("seed_file"))? {
            settings.seed_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env_value(config.get_bool("strict_names"))? {
            settings.strict_names = val;
        }
        if let Some(val) = env_value(config.get_int("tree.max_depth"))? {
            settings.tree.max_depth = non_negative("tree.max_depth", val)?;
        }
        if let Some(val) = env_value(config.get_int("tree.max_nodes"))? {
            settings.tree.max_nodes = non_negative("tree.max_nodes", val)?;
        }
        if let Some(val) = env_value(config.get_bool("tree.show_child_count"))? {
            settings.tree.show_child_count = val;
        }

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(seed) = &self.seed_file {
            self.seed_file = Some(PathBuf::from(expand_env_vars(&seed.to_string_lossy())));
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# teamtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/teamtree/teamtree.toml
#   Local:  <dir>/.teamtree.toml
#   Env:    TEAMTREE_* environment variables (TEAMTREE_TREE__MAX_DEPTH=4)

# Organization passed along with every add/remove
# organization = "default"

# Initial snapshot, relative paths resolve against this file's directory
# seed_file = "teams.toml"

# Reject empty team names
# strict_names = false

[tree]
# Levels shown below the organization
# max_depth = 16

# Stop expanding once this many teams are shown (duplicate names repeat subtrees)
# max_nodes = 10000

# Show the informational child count next to each team
# show_child_count = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// An unset variable is `None`; a value of the wrong type is an error.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn non_negative(key: &str, val: i64) -> Result<usize, ApplicationError> {
    usize::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("{key} must not be negative: {val}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_files_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, None).expect("load defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.organization, "default");
        assert_eq!(settings.name_policy(), NamePolicy::Permissive);
    }

    #[test]
    fn given_strict_names_when_deriving_policy_then_is_strict() {
        let settings = Settings {
            strict_names: true,
            ..Settings::default()
        };
        assert_eq!(settings.name_policy(), NamePolicy::Strict);
    }

    #[test]
    fn given_tilde_in_seed_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            seed_file: Some(PathBuf::from("~/teams.toml")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let seed = settings.seed_file.unwrap();
        assert!(seed.to_string_lossy().starts_with(&home));
        assert!(!seed.to_string_lossy().contains('~'));
    }

    #[test]
    fn given_partial_overlay_when_merging_tree_config_then_keeps_base_values() {
        let base = TreeConfig::default();
        let overlay = RawTreeConfig {
            max_depth: Some(3),
            max_nodes: None,
            show_child_count: None,
        };

        let merged = base.merge(&overlay);

        assert_eq!(merged.max_depth, 3);
        assert_eq!(merged.max_nodes, 10_000);
        assert!(merged.show_child_count);
    }

    #[test]
    fn given_template_when_parsing_then_yields_empty_overlay() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.organization.is_none());
        assert!(raw.tree.max_depth.is_none());
        assert!(raw.tree.max_nodes.is_none());
    }

    #[test]
    fn given_non_numeric_value_when_reading_env_then_returns_config_error() {
        let parsed: Result<i64, ConfigError> = Err(ConfigError::Message("invalid digit".into()));
        assert!(matches!(env_value(parsed), Err(ApplicationError::Config { .. })));
        let unset: Result<i64, ConfigError> = Err(ConfigError::NotFound("tree.max_depth".into()));
        assert_eq!(env_value(unset).unwrap(), None);
    }

    #[test]
    fn given_negative_value_when_converting_then_names_the_key() {
        let err = non_negative("tree.max_nodes", -1).unwrap_err();
        assert!(err.to_string().contains("tree.max_nodes"));
        assert_eq!(non_negative("tree.max_nodes", 5).unwrap(), 5);
    }

    #[test]
    fn given_settings_when_serializing_then_roundtrips_through_toml() {
        let settings = Settings {
            organization: "acme".into(),
            ..Settings::default()
        };
        let toml = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, settings);
    }
}
