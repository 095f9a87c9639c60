//! Configuration management for appgraph.
//!
//! Parses `appgraph.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every setting has a
//! default, so running without a config file is normal.
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
//! - `repository.owner`, `repository.name`, `repository.branch`
//! - `manifest.path`
//! - `readme.path`, `readme.section`
//! - `diagrams.kroki_url`, `diagrams.output_dir`
//! - `diff.graph_path`
//!
//! ## Path Resolution
//!
//! `manifest.path`, `readme.path` and `diagrams.output_dir` are resolved
//! against the directory holding the config file, or the workspace directory
//! when no file was found. `diff.graph_path` stays repository-relative since
//! it names a path inside a git tree.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
/// Paths are used as given; callers resolve them against the workspace.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override repository owner.
    pub repo_owner: Option<String>,
    /// Override repository name.
    pub repo_name: Option<String>,
    /// Override branch used in source links.
    pub branch: Option<String>,
    /// Override Bicep manifest path.
    pub manifest: Option<PathBuf>,
    /// Override README path.
    pub readme: Option<PathBuf>,
    /// Override detailed label mode.
    pub detailed: Option<bool>,
    /// Override Kroki URL for image rendering.
    pub kroki_url: Option<String>,
    /// Override image output directory.
    pub output_dir: Option<PathBuf>,
    /// Override image format.
    pub format: Option<String>,
    /// Override the repository path of the committed graph.
    pub graph_path: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "appgraph.toml";

/// Image formats accepted by `diagrams.format`.
pub const IMAGE_FORMATS: &[&str] = &["svg", "png", "dot"];

const DEFAULT_MANIFEST: &str = "app.bicep";
const DEFAULT_README: &str = "README.md";
const DEFAULT_SECTION: &str = "Architecture";
const DEFAULT_KROKI_URL: &str = "https://kroki.io";
const DEFAULT_OUTPUT_DIR: &str = "docs";
const DEFAULT_FORMAT: &str = "svg";
const DEFAULT_GRAPH_PATH: &str = ".radius/app-graph.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub repository used for links.
    pub repository: RepositoryConfig,
    /// Manifest configuration (path is a relative string from TOML).
    manifest: ManifestConfigRaw,
    /// README configuration (path is a relative string from TOML).
    readme: ReadmeConfigRaw,
    /// Diagram configuration (output directory is a relative string from TOML).
    diagrams: DiagramsConfigRaw,
    /// Diff report configuration.
    pub diff: DiffConfig,

    /// Resolved manifest path (set after loading).
    #[serde(skip)]
    pub manifest_path: PathBuf,
    /// Resolved README configuration (set after loading).
    #[serde(skip)]
    pub readme_resolved: ReadmeConfig,
    /// Resolved diagrams configuration (set after loading).
    #[serde(skip)]
    pub diagrams_resolved: DiagramsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// GitHub repository coordinates.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub owner: String,
    pub name: String,
    /// Branch that README links point at.
    pub branch: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            name: String::new(),
            branch: "main".to_owned(),
        }
    }
}

impl RepositoryConfig {
    /// Validate that links can be built from these coordinates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if owner, name or branch is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.owner, "repository.owner")?;
        require_non_empty(&self.name, "repository.name")?;
        require_non_empty(&self.branch, "repository.branch")?;
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ManifestConfigRaw {
    path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ReadmeConfigRaw {
    path: Option<String>,
    section: Option<String>,
}

/// Resolved README configuration.
#[derive(Debug, Default)]
pub struct ReadmeConfig {
    /// README file to patch.
    pub path: PathBuf,
    /// Level-2 heading whose section holds the diagram.
    pub section: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DiagramsConfigRaw {
    detailed: Option<bool>,
    kroki_url: Option<String>,
    output_dir: Option<String>,
    format: Option<String>,
}

/// Resolved diagram configuration.
#[derive(Debug, Default)]
pub struct DiagramsConfig {
    /// Show `image:tag` on container nodes.
    pub detailed: bool,
    /// Kroki server URL for image rendering.
    pub kroki_url: String,
    /// Directory the rendered image is written to.
    pub output_dir: PathBuf,
    /// Image format (`svg`, `png` or `dot`).
    pub format: String,
}

/// Diff report configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Repository path of the committed graph on the base branch.
    pub graph_path: String,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            graph_path: DEFAULT_GRAPH_PATH.to_owned(),
        }
    }
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
        /// Config field path (e.g., "`repository.owner`").
        field: String,
        /// Error message (e.g., "${`REPO_OWNER`} not set").
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

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `appgraph.toml` in `workspace` and its parents, falling back to
    /// defaults relative to `workspace`.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged
    /// configuration is validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        workspace: &Path,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config(workspace) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_base(workspace)
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(owner) = &settings.repo_owner {
            self.repository.owner.clone_from(owner);
        }
        if let Some(name) = &settings.repo_name {
            self.repository.name.clone_from(name);
        }
        if let Some(branch) = &settings.branch {
            self.repository.branch.clone_from(branch);
        }
        if let Some(manifest) = &settings.manifest {
            self.manifest_path.clone_from(manifest);
        }
        if let Some(readme) = &settings.readme {
            self.readme_resolved.path.clone_from(readme);
        }
        if let Some(detailed) = settings.detailed {
            self.diagrams_resolved.detailed = detailed;
        }
        if let Some(kroki_url) = &settings.kroki_url {
            self.diagrams_resolved.kroki_url.clone_from(kroki_url);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.diagrams_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(format) = &settings.format {
            self.diagrams_resolved.format.clone_from(format);
        }
        if let Some(graph_path) = &settings.graph_path {
            self.diff.graph_path.clone_from(graph_path);
        }
    }

    /// Get validated repository coordinates.
    ///
    /// Use this instead of accessing the `repository` field directly when
    /// building links.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if owner, name or branch is empty.
    pub fn require_repository(&self) -> Result<&RepositoryConfig, ConfigError> {
        self.repository.validate()?;
        Ok(&self.repository)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = std::path::absolute(start).ok()?;
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

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            repository: RepositoryConfig::default(),
            manifest: ManifestConfigRaw::default(),
            readme: ReadmeConfigRaw::default(),
            diagrams: DiagramsConfigRaw::default(),
            diff: DiffConfig::default(),
            manifest_path: base.join(DEFAULT_MANIFEST),
            readme_resolved: ReadmeConfig {
                path: base.join(DEFAULT_README),
                section: DEFAULT_SECTION.to_owned(),
            },
            diagrams_resolved: DiagramsConfig {
                detailed: false,
                kroki_url: DEFAULT_KROKI_URL.to_owned(),
                output_dir: base.join(DEFAULT_OUTPUT_DIR),
                format: DEFAULT_FORMAT.to_owned(),
            },
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

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Repository coordinates are only checked by [`Config::require_repository`]
    /// since commands can run without links.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_readme()?;
        self.validate_diagrams()?;
        self.validate_diff()?;
        Ok(())
    }

    fn validate_readme(&self) -> Result<(), ConfigError> {
        require_non_empty(self.readme_resolved.section.trim(), "readme.section")
    }

    fn validate_diagrams(&self) -> Result<(), ConfigError> {
        let diagrams = &self.diagrams_resolved;
        require_non_empty(&diagrams.kroki_url, "diagrams.kroki_url")?;
        require_http_url(&diagrams.kroki_url, "diagrams.kroki_url")?;

        if !IMAGE_FORMATS.contains(&diagrams.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "diagrams.format must be one of {}, got '{}'",
                IMAGE_FORMATS.join(", "),
                diagrams.format
            )));
        }

        Ok(())
    }

    fn validate_diff(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.diff.graph_path, "diff.graph_path")?;
        if Path::new(&self.diff.graph_path).is_absolute() {
            return Err(ConfigError::Validation(
                "diff.graph_path must be relative to the repository root".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let repository = &mut self.repository;
        repository.owner = expand::expand_env(&repository.owner, "repository.owner")?;
        repository.name = expand::expand_env(&repository.name, "repository.name")?;
        repository.branch = expand::expand_env(&repository.branch, "repository.branch")?;

        expand::expand_opt(&mut self.manifest.path, "manifest.path")?;
        expand::expand_opt(&mut self.readme.path, "readme.path")?;
        expand::expand_opt(&mut self.readme.section, "readme.section")?;
        expand::expand_opt(&mut self.diagrams.kroki_url, "diagrams.kroki_url")?;
        expand::expand_opt(&mut self.diagrams.output_dir, "diagrams.output_dir")?;

        self.diff.graph_path = expand::expand_env(&self.diff.graph_path, "diff.graph_path")?;

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.manifest_path = resolve(self.manifest.path.as_deref(), DEFAULT_MANIFEST);
        self.readme_resolved = ReadmeConfig {
            path: resolve(self.readme.path.as_deref(), DEFAULT_README),
            section: self
                .readme
                .section
                .clone()
                .unwrap_or_else(|| DEFAULT_SECTION.to_owned()),
        };
        self.diagrams_resolved = DiagramsConfig {
            detailed: self.diagrams.detailed.unwrap_or(false),
            kroki_url: self
                .diagrams
                .kroki_url
                .clone()
                .unwrap_or_else(|| DEFAULT_KROKI_URL.to_owned()),
            output_dir: resolve(self.diagrams.output_dir.as_deref(), DEFAULT_OUTPUT_DIR),
            format: self
                .diagrams
                .format
                .clone()
                .unwrap_or_else(|| DEFAULT_FORMAT.to_owned()),
        };
    }
}
