//! `appgraph diff` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use appgraph_bicep::ImageDefaults;
use appgraph_config::Config;
use appgraph_diagrams::{LabelMode, PullRequest};
use appgraph_graph::{Graph, diff};
use appgraph_report::{
    NodeLabels, ReportOptions, render_full_comment, render_no_changes, render_section,
};
use clap::Args;

use super::common::{CommonArgs, repository};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the diff command.
#[derive(Args)]
pub(crate) struct DiffArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Base commit of the pull request.
    #[arg(long, env = "BASE_SHA")]
    base_sha: Option<String>,

    /// Graph generated for the pull request head (default: the base graph path in the workspace).
    #[arg(long, env = "HEAD_GRAPH")]
    head_graph: Option<PathBuf>,

    /// Report destination (default: stdout).
    #[arg(short, long, env = "DIFF_OUTPUT")]
    output: Option<PathBuf>,

    /// Pull request number for diff links; 0 disables them.
    #[arg(long, env = "PR_NUMBER", default_value = "0")]
    pr_number: String,

    /// Repository path of the committed graph (overrides config, default: .radius/app-graph.json).
    #[arg(long)]
    base_graph_path: Option<String>,

    /// Bicep manifest whose parameter defaults complete images in detailed mode.
    #[arg(long, env = "BICEP_FILE")]
    bicep_file: Option<PathBuf>,
}

impl DiffArgs {
    /// Execute the diff command.
    ///
    /// # Errors
    ///
    /// Returns an error if the base commit is missing, configuration fails,
    /// or the report cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let base_sha = self
            .base_sha
            .as_deref()
            .map(str::trim)
            .filter(|sha| !sha.is_empty())
            .ok_or_else(|| CliError::MissingInput("BASE_SHA is required".to_owned()))?;

        let mut settings = self.common.cli_settings();
        settings.graph_path.clone_from(&self.base_graph_path);
        settings.manifest = self.bicep_file.as_deref().map(|p| self.common.resolve(p));
        let config = self.common.load_config(&settings)?;

        let graph_path = config.diff.graph_path.as_str();
        let head_path = self
            .head_graph
            .as_deref()
            .map_or_else(|| self.common.resolve(Path::new(graph_path)), |p| self.common.resolve(p));

        output.info(&format!("Comparing {graph_path} at {base_sha} with {}", head_path.display()));
        let base_raw = read_base(&self.common.workspace, base_sha, graph_path, &output);
        let head_raw = read_head(&head_path, &output)?;

        let pull_request = self.pull_request(&config, &output);
        let report = build_report(
            &config,
            base_raw.as_deref(),
            head_raw.as_deref(),
            pull_request.as_ref(),
            &output,
        );

        match &self.output {
            Some(path) => {
                let path = self.common.resolve(path);
                std::fs::write(&path, &report).map_err(|source| CliError::File {
                    path: path.clone(),
                    source,
                })?;
                output.success(&format!("Report written to {}", path.display()));
            }
            None => std::io::stdout().lock().write_all(report.as_bytes())?,
        }

        Ok(())
    }

    /// Pull request for diff links, when a number and repository are known.
    fn pull_request(&self, config: &Config, output: &Output) -> Option<PullRequest> {
        let number = self.pr_number.trim();
        if number.is_empty() || number == "0" {
            return None;
        }
        let repo = repository(config, output)?;
        Some(PullRequest {
            owner: repo.owner,
            name: repo.name,
            number: number.to_owned(),
        })
    }
}

/// Pull request comment comparing the base and head graph documents.
///
/// Missing graphs on both sides, or unreadable JSON on either side, give the
/// no-changes comment.
fn build_report(
    config: &Config,
    base_raw: Option<&str>,
    head_raw: Option<&str>,
    pull_request: Option<&PullRequest>,
    output: &Output,
) -> String {
    if base_raw.is_none() && head_raw.is_none() {
        output.warning("No graph on either side");
        return render_no_changes();
    }

    let graphs = Graph::parse(base_raw).and_then(|base| Ok((base, Graph::parse(head_raw)?)));
    let (base, head) = match graphs {
        Ok(graphs) => graphs,
        Err(err) => {
            output.warning(&format!("Unreadable graph output: {err}"));
            return render_no_changes();
        }
    };

    let changes = diff(&base, &head);
    output.info(&format!(
        "{} added, {} removed, {} modified, {} unchanged; {} connections added, {} removed",
        changes.added.len(),
        changes.removed.len(),
        changes.modified.len(),
        changes.unchanged.len(),
        changes.added_conns.len(),
        changes.removed_conns.len()
    ));

    let detailed = config.diagrams_resolved.detailed;
    let image_defaults = if detailed {
        load_image_defaults(&config.manifest_path, output)
    } else {
        None
    };
    let options = ReportOptions {
        pull_request,
        labels: NodeLabels {
            mode: LabelMode::from_detailed(detailed),
            image_defaults: image_defaults.as_ref(),
        },
    };

    let section = render_section(config.diff.graph_path.as_str(), &base, &head, &changes, &options);
    render_full_comment(&[section])
}

/// Graph committed at the base revision. Git failures count as no graph.
fn read_base(workspace: &Path, rev: &str, path: &str, output: &Output) -> Option<String> {
    match appgraph_vcs::read_file_at(workspace, rev, path) {
        Ok(Some(content)) => Some(content),
        Ok(None) => {
            output.info(&format!("No {path} at {rev}"));
            None
        }
        Err(err) => {
            output.warning(&format!("Base graph unavailable: {err}"));
            None
        }
    }
}

fn read_head(path: &Path, output: &Output) -> Result<Option<String>, CliError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            output.info(&format!("No head graph at {}", path.display()));
            Ok(None)
        }
        Err(source) => Err(CliError::File {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn load_image_defaults(manifest: &Path, output: &Output) -> Option<ImageDefaults> {
    if !manifest.exists() {
        tracing::debug!(path = %manifest.display(), "No manifest for image defaults");
        return None;
    }
    match ImageDefaults::load(manifest) {
        Ok(defaults) => Some(defaults),
        Err(err) => {
            output.warning(&format!("Image defaults unavailable: {err}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::process::Command;

    const GRAPH_PATH: &str = ".radius/app-graph.json";

    const BASE: &str = r#"{
  "resources": [
    { "id": "/c/frontend", "name": "frontend", "type": "Applications.Core/containers" },
    { "id": "/d/cache", "name": "cache", "type": "Applications.Datastores/redisCaches" }
  ],
  "connections": [
    { "sourceId": "/c/frontend", "targetId": "/d/cache", "type": "connection" }
  ]
}"#;

    const HEAD: &str = r#"{
  "resources": [
    { "id": "/c/frontend", "name": "frontend", "type": "Applications.Core/containers" },
    { "id": "/d/db", "name": "db", "type": "Applications.Datastores/sqlDatabases" }
  ],
  "connections": [
    { "sourceId": "/c/frontend", "targetId": "/d/db", "type": "connection" }
  ]
}"#;

    fn git(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(output.status.success(), "git {args:?} failed");
        String::from_utf8(output.stdout).unwrap().trim().to_owned()
    }

    /// Repository with `base` committed at the graph path; returns the commit.
    fn repository_with_graph(base: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        git(root, &["init", "--quiet"]);
        std::fs::create_dir(root.join(".radius")).unwrap();
        std::fs::write(root.join(GRAPH_PATH), base).unwrap();
        git(root, &["add", "."]);
        git(root, &["commit", "--quiet", "-m", "base"]);
        let sha = git(root, &["rev-parse", "HEAD"]);
        (dir, sha)
    }

    /// Report for the committed base graph against `head` in the working tree.
    fn report(base: &str, head: &str) -> String {
        let (dir, sha) = repository_with_graph(base);
        let root = dir.path();
        std::fs::write(root.join(GRAPH_PATH), head).unwrap();

        let output = Output::new();
        let config = Config::load(None, root, None).unwrap();
        let base_raw = read_base(root, &sha, GRAPH_PATH, &output);
        let head_raw = read_head(&root.join(GRAPH_PATH), &output).unwrap();
        build_report(&config, base_raw.as_deref(), head_raw.as_deref(), None, &output)
    }

    #[test]
    fn test_report_with_changes() {
        let comment = report(BASE, HEAD);

        assert!(comment.starts_with("## \u{1f500} Architecture Changes\n\n### \u{1f4e6} `(root)`\n"));
        for heading in ["#### Diff", "#### Resources", "#### Connections"] {
            assert!(comment.contains(heading), "missing {heading}");
        }
        assert!(comment.contains("**db**"));
        assert!(comment.contains("**cache**"));
        assert!(comment.contains("*Resources: +1 added, -1 removed, 1 unchanged*"));
        assert!(comment.ends_with("---\n*Powered by [Radius](https://radapp.io/)*\n"));
    }

    #[test]
    fn test_report_unchanged_graph() {
        let comment = report(BASE, BASE);
        assert!(comment.contains("> No resource or connection changes.\n"));
        assert!(!comment.contains("#### Diff"));
    }

    #[test]
    fn test_report_malformed_base_is_no_changes() {
        assert_eq!(report("{ not json", HEAD), render_no_changes());
    }

    #[test]
    fn test_report_without_graphs_is_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let output = Output::new();
        let config = Config::load(None, dir.path(), None).unwrap();
        assert_eq!(build_report(&config, None, None, None, &output), render_no_changes());
    }

    #[test]
    fn test_report_missing_base_counts_as_additions() {
        let (dir, sha) = repository_with_graph("{}");
        let root = dir.path();
        let output = Output::new();
        assert_eq!(read_base(root, &sha, "other/graph.json", &output), None);

        let config = Config::load(None, root, None).unwrap();
        let comment = build_report(&config, None, Some(HEAD), None, &output);
        assert!(comment.contains("*Resources: +2 added*"));
    }

    #[test]
    fn test_read_head_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let output = Output::new();
        assert_eq!(read_head(&dir.path().join("graph.json"), &output).unwrap(), None);
    }

    #[test]
    fn test_read_head() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, "{\"resources\": []}").unwrap();
        let output = Output::new();
        assert_eq!(
            read_head(&path, &output).unwrap().as_deref(),
            Some("{\"resources\": []}")
        );
    }

    #[test]
    fn test_read_base_outside_repository_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let output = Output::new();
        assert_eq!(
            read_base(dir.path(), "HEAD", ".radius/app-graph.json", &output),
            None
        );
    }
}
