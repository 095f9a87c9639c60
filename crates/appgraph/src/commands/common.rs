//! Arguments and steps shared by the commands.

use std::path::{Path, PathBuf};

use appgraph_bicep::{ImageDefaults, parse_manifest};
use appgraph_config::{CliSettings, Config};
use appgraph_diagrams::{Diagram, LabelMode, Repository};
use appgraph_graph::parse_graph_file;
use appgraph_model::ParsedApp;
use appgraph_report::patch_section;
use clap::Args;
use clap::builder::BoolishValueParser;

use crate::error::CliError;
use crate::output::Output;

/// Workspace, configuration and repository arguments.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Repository checkout directory.
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// Path to configuration file (default: auto-discover appgraph.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// GitHub repository owner used in links (overrides config).
    #[arg(long, env = "REPO_OWNER")]
    repo_owner: Option<String>,

    /// GitHub repository name used in links (overrides config).
    #[arg(long, env = "REPO_NAME")]
    repo_name: Option<String>,

    /// Branch that source links point at (overrides config, default: main).
    #[arg(long, env = "REPO_BRANCH")]
    branch: Option<String>,

    /// Show image:tag on container nodes.
    #[arg(long, env = "DETAILED", value_parser = BoolishValueParser::new())]
    detailed: bool,
}

impl CommonArgs {
    /// Overrides shared by every command.
    pub(crate) fn cli_settings(&self) -> CliSettings {
        CliSettings {
            repo_owner: self.repo_owner.clone(),
            repo_name: self.repo_name.clone(),
            branch: self.branch.clone(),
            detailed: self.detailed.then_some(true),
            ..CliSettings::default()
        }
    }

    /// Resolve a workspace-relative path.
    pub(crate) fn resolve(&self, path: &Path) -> PathBuf {
        self.workspace.join(path)
    }

    pub(crate) fn load_config(&self, settings: &CliSettings) -> Result<Config, CliError> {
        Ok(Config::load(
            self.config.as_deref(),
            &self.workspace,
            Some(settings),
        )?)
    }
}

/// Inputs of the README diagram commands.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Bicep manifest, relative to the workspace (overrides config, default: app.bicep).
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// `rad app graph` JSON output; the manifest is parsed when absent or invalid.
    #[arg(long, env = "RAD_GRAPH_OUTPUT")]
    graph: Option<PathBuf>,

    /// README to update, relative to the workspace (overrides config).
    #[arg(long)]
    readme: Option<PathBuf>,
}

impl SourceArgs {
    /// Add manifest and README overrides to `settings`.
    pub(crate) fn apply(&self, common: &CommonArgs, settings: &mut CliSettings) {
        settings.manifest = self.manifest.as_deref().map(|p| common.resolve(p));
        settings.readme = self.readme.as_deref().map(|p| common.resolve(p));
    }

    /// Load the application model.
    ///
    /// Graph output is preferred; the Bicep manifest is parsed when no graph
    /// is given or it cannot be read. In detailed mode, images of graph
    /// resources are completed from the manifest's parameter defaults.
    pub(crate) fn load_app(
        &self,
        common: &CommonArgs,
        config: &Config,
        output: &Output,
    ) -> Result<ParsedApp, CliError> {
        let manifest = &config.manifest_path;
        let manifest_name = repo_relative(manifest, &common.workspace);

        let mut app = match self.graph.as_deref().map(|p| common.resolve(p)) {
            Some(path) if path.exists() => {
                output.info(&format!("Reading rad app graph output from {}", path.display()));
                match parse_graph_file(&path) {
                    Ok(app) => Some(app),
                    Err(err) => {
                        output.warning(&format!("Ignoring graph output: {err}"));
                        None
                    }
                }
            }
            Some(path) => {
                output.warning(&format!("Graph output not found: {}", path.display()));
                None
            }
            None => None,
        };

        if let Some(app) = &mut app {
            if let Some(file) = &app.source_file {
                output.info(&format!("Using manifest filename from graph output: {file}"));
            }
            if config.diagrams_resolved.detailed && manifest.exists() {
                match ImageDefaults::load(manifest) {
                    Ok(defaults) => {
                        let updated = defaults.apply(app);
                        tracing::info!(updated, "Resolved images from parameter defaults");
                    }
                    Err(err) => output.warning(&format!("Image defaults unavailable: {err}")),
                }
            }
        }

        let mut app = match app {
            Some(app) => app,
            None => {
                if !manifest.exists() {
                    return Err(CliError::MissingInput(format!(
                        "{} not found",
                        manifest.display()
                    )));
                }
                output.info(&format!("Parsing {}", manifest.display()));
                let source = read_file(manifest)?;
                parse_manifest(&source, &manifest_name)?
            }
        };
        if app.source_file.is_none() {
            app.source_file = Some(manifest_name);
        }

        output.info(&format!(
            "Found {} resources and {} connections",
            app.resources.len(),
            app.connections().len()
        ));
        for resource in &app.resources {
            tracing::info!(
                resource = %resource.display_name,
                category = resource.category.as_str(),
                line = resource.source_line,
                "Resource"
            );
        }
        for conn in app.connections() {
            tracing::info!(from = %conn.from, to = %conn.to, "Connection");
        }

        Ok(app)
    }
}

/// Repository coordinates for source links, if configured.
pub(crate) fn repository(config: &Config, output: &Output) -> Option<Repository> {
    match config.require_repository() {
        Ok(repo) => Some(Repository {
            owner: repo.owner.clone(),
            name: repo.name.clone(),
            branch: repo.branch.clone(),
        }),
        Err(err) => {
            output.warning(&format!("Source links disabled: {err}"));
            None
        }
    }
}

/// Architecture diagram of `app` with nodes linking to their declarations.
pub(crate) fn build_diagram(
    app: &ParsedApp,
    mode: LabelMode,
    repository: Option<&Repository>,
) -> Diagram {
    let manifest = app.source_file.as_deref();
    Diagram::from_app(
        app,
        |resource| mode.label(resource),
        |resource| repository.and_then(|repo| repo.source_link(resource, manifest)),
    )
}

/// Replace the README section with `body`, creating the file if needed.
pub(crate) fn update_readme(path: &Path, section: &str, body: &str) -> Result<(), CliError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(CliError::File {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let patched = patch_section(&content, section, body);
    std::fs::write(path, patched).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// `path` relative to `base` with `/` separators, or its file name when it
/// lies outside `base`.
pub(crate) fn repo_relative(path: &Path, base: &Path) -> String {
    let relative = path
        .strip_prefix(base)
        .ok()
        .map(Path::to_path_buf)
        .or_else(|| {
            let base = std::path::absolute(base).ok()?;
            let path = std::path::absolute(path).ok()?;
            path.strip_prefix(&base).ok().map(Path::to_path_buf)
        })
        .unwrap_or_else(|| path.file_name().map(PathBuf::from).unwrap_or_default());
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
