//! `appgraph render` command implementation.

use std::path::{Path, PathBuf};

use appgraph_config::ConfigError;
use appgraph_diagrams::kroki::DEFAULT_TIMEOUT;
use appgraph_diagrams::{DiagramFormat, KrokiClient, LabelMode, Theme, dot};
use clap::Args;

use super::common::{CommonArgs, SourceArgs, build_diagram, repo_relative, repository, update_readme};
use crate::error::CliError;
use crate::output::Output;

/// Base name of the rendered image.
const IMAGE_NAME: &str = "architecture";

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    source: SourceArgs,

    /// Image format: svg, png or dot (overrides config, default: svg).
    #[arg(long)]
    format: Option<String>,

    /// Directory for the image, relative to the workspace (overrides config, default: docs).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Kroki server URL (overrides config, default: https://kroki.io).
    #[arg(long, env = "KROKI_URL")]
    kroki_url: Option<String>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if no input can be read, Kroki rendering fails, or
    /// the image or README cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let mut settings = self.common.cli_settings();
        self.source.apply(&self.common, &mut settings);
        settings.format = self.format;
        settings.output_dir = self.output_dir.as_deref().map(|p| self.common.resolve(p));
        settings.kroki_url = self.kroki_url;
        let config = self.common.load_config(&settings)?;

        let diagrams = &config.diagrams_resolved;
        let format = DiagramFormat::parse(&diagrams.format).ok_or_else(|| {
            ConfigError::Validation(format!("unknown image format '{}'", diagrams.format))
        })?;

        let app = self.source.load_app(&self.common, &config, &output)?;
        let repo = repository(&config, &output);
        let mode = LabelMode::from_detailed(diagrams.detailed);
        let diagram = build_diagram(&app, mode, repo.as_ref());
        let source = dot::render(&diagram, &Theme::README);

        let data = if format.needs_rendering() {
            output.info(&format!("Rendering {} via {}", format.as_str(), diagrams.kroki_url));
            KrokiClient::new(&diagrams.kroki_url, DEFAULT_TIMEOUT).render(&source, format)?
        } else {
            source.into_bytes()
        };

        let image_path = diagrams
            .output_dir
            .join(format!("{IMAGE_NAME}.{}", format.extension()));
        write_image(&image_path, &data)?;
        output.success(&format!(
            "Wrote {} ({} bytes)",
            image_path.display(),
            data.len()
        ));

        let readme = &config.readme_resolved;
        let readme_dir = readme.path.parent().unwrap_or(Path::new(""));
        let reference = repo_relative(&image_path, readme_dir);
        let manifest = app.source_file.as_deref().unwrap_or_default();
        output.highlight(&format!(
            "Updating '{}' section of {}",
            readme.section,
            readme.path.display()
        ));
        update_readme(
            &readme.path,
            &readme.section,
            &readme_body(manifest, &reference, format),
        )?;

        Ok(())
    }
}

fn write_image(path: &Path, data: &[u8]) -> Result<(), CliError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).map_err(|source| CliError::File {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, data).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// README section body referencing the image at `reference`.
///
/// SVG keeps node links when opened directly, so the image links to itself.
fn readme_body(manifest: &str, reference: &str, format: DiagramFormat) -> String {
    match format {
        DiagramFormat::Svg => format!(
            "> *Auto-generated from `{manifest}` \u{2014} open the image to click through to the source.*\n\n[![Architecture]({reference})]({reference})\n"
        ),
        DiagramFormat::Png => {
            format!("> *Auto-generated from `{manifest}`.*\n\n![Architecture]({reference})\n")
        }
        DiagramFormat::Dot => format!(
            "> *Auto-generated from `{manifest}`.*\n\n[Architecture (Graphviz source)]({reference})\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_readme_body_svg() {
        assert_eq!(
            readme_body("app.bicep", "docs/architecture.svg", DiagramFormat::Svg),
            "> *Auto-generated from `app.bicep` \u{2014} open the image to click through to the source.*\n\n[![Architecture](docs/architecture.svg)](docs/architecture.svg)\n"
        );
    }

    #[test]
    fn test_readme_body_png_and_dot() {
        assert_eq!(
            readme_body("app.bicep", "docs/architecture.png", DiagramFormat::Png),
            "> *Auto-generated from `app.bicep`.*\n\n![Architecture](docs/architecture.png)\n"
        );
        assert_eq!(
            readme_body("app.bicep", "docs/architecture.dot", DiagramFormat::Dot),
            "> *Auto-generated from `app.bicep`.*\n\n[Architecture (Graphviz source)](docs/architecture.dot)\n"
        );
    }

    #[test]
    fn test_write_image_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs/architecture.dot");
        write_image(&path, b"digraph {}").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"digraph {}");
    }
}
