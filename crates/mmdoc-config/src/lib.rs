//! Configuration management for mmdoc.
//!
//! Parses `mmdoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `output.dir`
//! - `renderer.command`
//! - `targets.file`
//! - `targets.image_base`
//!
//! ## Targets
//!
//! Each `[[targets]]` entry ties a markdown document to the prefix of its
//! rendered images. When no targets are configured, the built-in table
//! ([`BUILTIN_TARGETS`]) is used.

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory for `.mmd` and `.png` files.
    pub output_dir: Option<PathBuf>,
    /// Override renderer command.
    pub renderer_command: Option<String>,
    /// Override renderer timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mmdoc.toml";

/// Default output directory, relative to the project root.
const DEFAULT_OUTPUT_DIR: &str = "docs/images/diagrams";

/// Image base used by documents nested six levels below the project root.
const NESTED_IMAGE_BASE: &str = "../../../../../../docs/images/diagrams";

/// Built-in target table: `(file, prefix, image_base)`.
pub const BUILTIN_TARGETS: &[(&str, &str, &str)] = &[
    ("ARCHITECTURE.md", "architecture", DEFAULT_OUTPUT_DIR),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/NPC/README.md",
        "npc",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/FleaMarket/README.md",
        "fleamarket",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/Database/README.md",
        "database",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/BookSystem/README.md",
        "booksystem",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/Economy/README.md",
        "economy",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/AdvancedLandClaiming/README.md",
        "advancedland",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/VillageMerchant/README.md",
        "villagemerchant",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/Command/README.md",
        "command",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/MyLand/README.md",
        "myland",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/Items/README.md",
        "items",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/FishMerchant/README.md",
        "fishmerchant",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/Roulette/README.md",
        "roulette",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/FarmVillage/README.md",
        "farmvillage",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/ChatSystem/README.md",
        "chatsystem",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/PlayTime/README.md",
        "playtime",
        NESTED_IMAGE_BASE,
    ),
    (
        "src/main/kotlin/com/lukehemmin/lukeVanilla/System/MultiServer/README.md",
        "multiserver",
        NESTED_IMAGE_BASE,
    ),
];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// External renderer configuration.
    pub renderer: RendererConfig,
    /// Target documents as parsed from TOML.
    targets: Vec<TargetConfigRaw>,

    /// Project root (directory of the config file, or cwd).
    #[serde(skip)]
    pub project_dir: PathBuf,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Resolved targets in table order (set after loading).
    #[serde(skip)]
    pub targets_resolved: Vec<TargetConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory receiving `.mmd` sources and rendered `.png` images.
    pub dir: PathBuf,
}

/// External renderer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Renderer program (default: `mmdc`).
    pub command: String,
    /// Arguments placed before the input/output arguments.
    pub args: Vec<String>,
    /// Background color passed with `-b`.
    pub background: String,
    /// Scale factor passed with `--scale`.
    pub scale: u32,
    /// Per-invocation timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: "mmdc".to_owned(),
            args: Vec::new(),
            background: "transparent".to_owned(),
            scale: 2,
            timeout_secs: 60,
        }
    }
}

impl RendererConfig {
    /// Per-invocation timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Raw target entry as parsed from TOML.
#[derive(Debug, Deserialize)]
struct TargetConfigRaw {
    file: String,
    prefix: String,
    image_base: Option<String>,
}

/// Resolved target entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// Markdown document path.
    pub path: PathBuf,
    /// Identifying prefix of the document's images.
    pub prefix: String,
    /// Path prefix written into image links.
    pub image_base: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`renderer.command`").
        field: String,
        /// Error message (e.g., "${`MMDC_BIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a prefix to be usable as a single filename component.
fn require_valid_prefix(prefix: &str) -> Result<(), ConfigError> {
    require_non_empty(prefix, "targets.prefix")?;
    if prefix
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_whitespace())
    {
        return Err(ConfigError::Validation(format!(
            "targets.prefix '{prefix}' cannot contain path separators or whitespace"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mmdoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate_renderer()?;
        }

        for (short, long) in config.overlapping_prefixes() {
            tracing::warn!(
                prefix = %short,
                other = %long,
                "Image listing for '{short}-*' also matches images of '{long}'"
            );
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(output_dir);
        }
        if let Some(command) = &settings.renderer_command {
            self.renderer.command.clone_from(command);
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.renderer.timeout_secs = timeout_secs;
        }
    }

    /// Pairs of prefixes where listing `{short}-*` also picks up `{long}` images.
    ///
    /// Such pairs break the order-preserving block-to-image mapping, so they
    /// are reported when the configuration loads.
    #[must_use]
    pub fn overlapping_prefixes(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for short in &self.targets_resolved {
            let needle = format!("{}-", short.prefix);
            for long in &self.targets_resolved {
                if long.prefix.starts_with(&needle) {
                    pairs.push((short.prefix.clone(), long.prefix.clone()));
                }
            }
        }
        pairs
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            output: OutputConfigRaw::default(),
            renderer: RendererConfig::default(),
            targets: Vec::new(),
            project_dir: base.to_path_buf(),
            output_resolved: OutputConfig {
                dir: base.join(DEFAULT_OUTPUT_DIR),
            },
            targets_resolved: builtin_targets(base),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_renderer()?;
        self.validate_targets()?;
        Ok(())
    }

    /// Validate renderer configuration.
    fn validate_renderer(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.renderer.command, "renderer.command")?;
        require_non_empty(&self.renderer.background, "renderer.background")?;

        if self.renderer.scale == 0 {
            return Err(ConfigError::Validation(
                "renderer.scale must be greater than 0".to_owned(),
            ));
        }
        if self.renderer.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "renderer.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate target entries.
    fn validate_targets(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for target in &self.targets_resolved {
            require_valid_prefix(&target.prefix)?;
            if !seen.insert(target.prefix.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "targets.prefix '{}' is used more than once",
                    target.prefix
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }

        self.renderer.command = expand::expand_env(&self.renderer.command, "renderer.command")?;

        for target in &mut self.targets {
            target.file = expand::expand_env(&target.file, "targets.file")?;
            if let Some(ref base) = target.image_base {
                target.image_base = Some(expand::expand_env(base, "targets.image_base")?);
            }
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// Targets without `image_base` link to the output directory as written
    /// in the config.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let output_dir = self.output.dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);

        self.project_dir = config_dir.to_path_buf();
        self.output_resolved = OutputConfig {
            dir: config_dir.join(output_dir),
        };

        self.targets_resolved = if self.targets.is_empty() {
            builtin_targets(config_dir)
        } else {
            self.targets
                .iter()
                .map(|raw| TargetConfig {
                    path: config_dir.join(&raw.file),
                    prefix: raw.prefix.clone(),
                    image_base: raw
                        .image_base
                        .clone()
                        .unwrap_or_else(|| output_dir.to_owned()),
                })
                .collect()
        };
    }
}

/// Built-in target table resolved against `base`.
fn builtin_targets(base: &Path) -> Vec<TargetConfig> {
    BUILTIN_TARGETS
        .iter()
        .map(|(file, prefix, image_base)| TargetConfig {
            path: base.join(file),
            prefix: (*prefix).to_owned(),
            image_base: (*image_base).to_owned(),
        })
        .collect()
}
