//! `appgraph generate` command implementation.

use appgraph_diagrams::{LabelMode, Theme, mermaid};
use clap::Args;

use super::common::{CommonArgs, SourceArgs, build_diagram, repository, update_readme};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    source: SourceArgs,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if no input can be read or the README cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let mut settings = self.common.cli_settings();
        self.source.apply(&self.common, &mut settings);
        let config = self.common.load_config(&settings)?;

        let app = self.source.load_app(&self.common, &config, &output)?;
        let repo = repository(&config, &output);
        let mode = LabelMode::from_detailed(config.diagrams_resolved.detailed);
        let diagram = build_diagram(&app, mode, repo.as_ref());
        let mermaid = mermaid::render(&diagram, &Theme::README);

        let manifest = app.source_file.as_deref().unwrap_or_default();
        let body = readme_body(manifest, &mermaid);

        let readme = &config.readme_resolved;
        output.highlight(&format!(
            "Updating '{}' section of {}",
            readme.section,
            readme.path.display()
        ));
        update_readme(&readme.path, &readme.section, &body)?;
        output.success(&format!(
            "Diagram written with {} nodes and {} edges",
            diagram.nodes().len(),
            diagram.edges().len()
        ));

        Ok(())
    }
}

/// README section body: provenance note plus the fenced Mermaid block.
fn readme_body(manifest: &str, mermaid: &str) -> String {
    format!(
        "> *Auto-generated from `{manifest}` \u{2014} click any node to jump to its definition in the source.*\n\n```mermaid\n{}\n```\n",
        mermaid.trim_end()
    )
}
