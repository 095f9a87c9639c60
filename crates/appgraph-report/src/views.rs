//! Diagrams shown in a diff report.
//!
//! Both views key nodes by resource name and resolve connection endpoints
//! with the same [`Resolver`] labels used in the tables, so an edge only
//! appears when both of its endpoints are drawn.

use appgraph_bicep::ImageDefaults;
use appgraph_diagrams::{Diagram, DiffSide, EdgeStyle, Label, LabelMode, Link, Node, PullRequest};
use appgraph_graph::{ConnectionKey, Graph, GraphDiff, GraphResource, ResourceStatus, Resolver};
use appgraph_model::{Category, ResourceRecord};

/// How report diagrams label their nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeLabels<'a> {
    pub mode: LabelMode,
    /// Parameter defaults for containers whose image is an expression.
    pub image_defaults: Option<&'a ImageDefaults>,
}

impl NodeLabels<'_> {
    /// Plain name, or the detailed label in detailed mode.
    #[must_use]
    pub fn label(&self, resource: &GraphResource) -> Label {
        match self.mode {
            LabelMode::Standard => Label::plain(resource.name()),
            LabelMode::Detailed => LabelMode::Detailed.label(&self.record(resource)),
        }
    }

    fn record(&self, resource: &GraphResource) -> ResourceRecord {
        let mut record = resource.to_record();
        if record.image.is_none()
            && let Some(defaults) = self.image_defaults
            && let Some(image) = defaults.lookup(&record.symbolic_name, &record.display_name)
        {
            record.image = Some(image.to_owned());
        }
        record
    }
}

fn is_application(graph: &Graph, id: &str) -> bool {
    graph
        .resources
        .get(id)
        .is_some_and(|r| r.category() == Category::Application)
}

fn add_edges<'a>(
    diagram: &mut Diagram,
    graph: &Graph,
    resolver: &Resolver,
    connections: impl IntoIterator<Item = &'a ConnectionKey>,
    style: impl Fn(&ConnectionKey) -> EdgeStyle,
) {
    for conn in connections {
        let (source, target) = conn;
        if is_application(graph, source) || is_application(graph, target) {
            continue;
        }
        let from = resolver.label(source);
        let to = resolver.label(target);
        if !diagram.add_edge(&from, &to, style(conn)) {
            tracing::debug!(from = %from, to = %to, "Skipping edge");
        }
    }
}

/// Diagram of one side of the comparison, without click targets.
#[must_use]
pub fn side_diagram(graph: &Graph, labels: &NodeLabels<'_>) -> Diagram {
    let mut diagram = Diagram::new();
    for resource in graph.resources.values() {
        let category = resource.category();
        if !category.is_drawn() {
            continue;
        }
        diagram.add_node(Node {
            id: resource.name().to_owned(),
            label: labels.label(resource),
            class: category.as_str().to_owned(),
            link: None,
        });
    }

    add_edges(
        &mut diagram,
        graph,
        &graph.resolver(),
        &graph.connections,
        |_| EdgeStyle::Normal,
    );
    diagram
}

/// Unified diagram: the union of both graphs, colored by change status.
///
/// With a pull request, nodes link to their declaration in the PR's files
/// view: the base side for removed resources, the head side otherwise.
#[must_use]
pub fn unified_diagram(
    base: &Graph,
    head: &Graph,
    diff: &GraphDiff,
    labels: &NodeLabels<'_>,
    pull_request: Option<&PullRequest>,
) -> Diagram {
    let merged = Graph::merged(base, head);
    let mut diagram = Diagram::new();

    for (id, resource) in &merged.resources {
        if !resource.category().is_drawn() {
            continue;
        }
        let status = diff.status(id);
        diagram.add_node(Node {
            id: resource.name().to_owned(),
            label: labels.label(resource).prefixed(status.prefix()),
            class: status.as_str().to_owned(),
            link: pull_request.and_then(|pr| diff_link(pr, resource, status)),
        });
    }

    let mut connections: Vec<&ConnectionKey> = merged.connections.iter().collect();
    connections.sort();
    connections.dedup();
    add_edges(
        &mut diagram,
        &merged,
        &merged.resolver(),
        connections,
        |conn| {
            if diff.added_conns.contains(conn) {
                EdgeStyle::Added
            } else if diff.removed_conns.contains(conn) {
                EdgeStyle::Removed
            } else {
                EdgeStyle::Normal
            }
        },
    );
    diagram
}

fn diff_link(pr: &PullRequest, resource: &GraphResource, status: ResourceStatus) -> Option<Link> {
    let file = resource.source_file()?;
    let line = resource.source_line();
    let side = if status == ResourceStatus::Removed {
        DiffSide::Left
    } else {
        DiffSide::Right
    };
    let name = resource.name();
    let tooltip = if line > 0 {
        format!("{name} \u{2014} {file} line {line}")
    } else {
        format!("View diff for {name}")
    };
    Some(Link {
        url: pr.diff_url(file, side, line),
        tooltip,
    })
}
