//! Markdown pull request comment.

use std::fmt::Write;

use appgraph_diagrams::{DiffSide, PullRequest, Theme, mermaid};
use appgraph_graph::{Graph, GraphDiff, GraphResource};

use crate::views::{NodeLabels, side_diagram, unified_diagram};

const COMMENT_HEADING: &str = "## \u{1f500} Architecture Changes";
const FOOTER: &str = "*Powered by [Radius](https://radapp.io/)*";
const GRAPH_FILE: &str = ".radius/app-graph.json";

/// Rendering options shared by every section of a comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions<'a> {
    /// Pull request whose files view resources link to. Without one,
    /// locations are shown as plain text and diagram nodes are not clickable.
    pub pull_request: Option<&'a PullRequest>,
    pub labels: NodeLabels<'a>,
}

/// Application label for a graph path: the directory holding
/// `.radius/app-graph.json`, or `(root)`.
#[must_use]
pub fn app_label(graph_path: &str) -> &str {
    let label = graph_path
        .strip_suffix(GRAPH_FILE)
        .map_or(graph_path, |dir| dir.strip_suffix('/').unwrap_or(dir));
    if label.is_empty() { "(root)" } else { label }
}

/// Markdown section for one application's graph comparison.
#[must_use]
pub fn render_section(
    graph_path: &str,
    base: &Graph,
    head: &Graph,
    diff: &GraphDiff,
    options: &ReportOptions<'_>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### \u{1f4e6} `{}`\n", app_label(graph_path));

    if !diff.has_changes() {
        out.push_str("> No resource or connection changes.\n");
        return out;
    }

    let base_diagram = mermaid::render(&side_diagram(base, &options.labels), &Theme::COMPACT);
    let head_diagram = mermaid::render(&side_diagram(head, &options.labels), &Theme::COMPACT);
    out.push_str("<table>\n");
    out.push_str("<tr><th>\u{1f4cc} main</th><th>\u{1f500} This PR</th></tr>\n");
    let _ = writeln!(out, "<tr><td>\n\n```mermaid\n{base_diagram}\n```\n\n</td><td>\n");
    let _ = writeln!(out, "```mermaid\n{head_diagram}\n```\n\n</td></tr>");
    out.push_str("</table>\n\n");

    let unified = unified_diagram(base, head, diff, &options.labels, options.pull_request);
    out.push_str("#### Diff\n\n");
    out.push_str("\u{1f7e2} Added  \u{1f7e1} Modified  \u{1f534} Removed\n\n");
    let _ = writeln!(out, "```mermaid\n{}\n```\n", mermaid::render(&unified, &Theme::DIFF));

    if diff.has_resource_changes() {
        out.push_str("#### Resources\n\n");
        out.push_str("| Status | Resource |\n");
        out.push_str("|--------|----------|\n");
        let rows = [
            ("\u{1f7e2} Added", &diff.added, head, DiffSide::Right),
            ("\u{1f534} Removed", &diff.removed, base, DiffSide::Left),
            ("\u{1f7e1} Modified", &diff.modified, head, DiffSide::Right),
        ];
        for (status, ids, graph, side) in rows {
            for id in ids {
                if let Some(resource) = graph.resources.get(id) {
                    let cell = resource_cell(resource, options.pull_request, side);
                    let _ = writeln!(out, "| {status} | {cell} |");
                }
            }
        }
        out.push('\n');
    }

    if diff.has_connection_changes() {
        let resolver = Graph::merged(base, head).resolver();
        out.push_str("#### Connections\n\n");
        out.push_str("| Status | Connection |\n");
        out.push_str("|--------|------------|\n");
        let rows = [
            ("\u{1f7e2} Added", &diff.added_conns),
            ("\u{1f534} Removed", &diff.removed_conns),
        ];
        for (status, connections) in rows {
            for (source, target) in connections {
                let _ = writeln!(
                    out,
                    "| {status} | {} \u{2192} {} |",
                    resolver.label(source),
                    resolver.label(target)
                );
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "*Resources: {}*", summary(diff));
    out
}

/// One-line description: bold name, short type, source location.
///
/// The location links to the pull request's files view when one is given.
fn resource_cell(
    resource: &GraphResource,
    pull_request: Option<&PullRequest>,
    side: DiffSide,
) -> String {
    let short_type = resource
        .resource_type()
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let mut parts = vec![format!("**{}**", resource.name()), format!("`{short_type}`")];

    if let Some(file) = resource.source_file() {
        let line = resource.source_line();
        let display = if line > 0 {
            format!("{file}:{line}")
        } else {
            file.to_owned()
        };
        parts.push(match pull_request {
            Some(pr) => format!("[{display}]({})", pr.diff_url(file, side, line)),
            None => display,
        });
    }

    parts.join(" \u{2014} ")
}

fn summary(diff: &GraphDiff) -> String {
    let mut parts = Vec::new();
    if !diff.added.is_empty() {
        parts.push(format!("+{} added", diff.added.len()));
    }
    if !diff.removed.is_empty() {
        parts.push(format!("-{} removed", diff.removed.len()));
    }
    if !diff.modified.is_empty() {
        parts.push(format!("~{} modified", diff.modified.len()));
    }
    if !diff.unchanged.is_empty() {
        parts.push(format!("{} unchanged", diff.unchanged.len()));
    }
    parts.join(", ")
}

/// Comment posted when neither side has a graph.
#[must_use]
pub fn render_no_changes() -> String {
    format!("{COMMENT_HEADING}\n\n> No architecture changes detected in this PR.\n\n---\n{FOOTER}\n")
}

/// Wrap rendered sections with the comment heading and footer.
#[must_use]
pub fn render_full_comment(sections: &[String]) -> String {
    format!(
        "{COMMENT_HEADING}\n\n{}\n---\n{FOOTER}\n",
        sections.join("\n")
    )
}
