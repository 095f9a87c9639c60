//! Backend-neutral diagram model.
//!
//! A [`Diagram`] is built once and rendered by either backend. Edges are only
//! accepted between nodes already present, so every rendered edge has both
//! endpoints drawn.

use std::collections::{HashMap, HashSet};

use appgraph_model::{ParsedApp, ResourceRecord};

/// How an edge is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeStyle {
    #[default]
    Normal,
    /// Present only in the head graph.
    Added,
    /// Present only in the base graph.
    Removed,
}

/// Secondary label line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelLine {
    Plain(String),
    /// Rendered in a muted color.
    Muted(String),
}

/// Node label: a title plus optional detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Label {
    pub title: String,
    /// Render the title in bold.
    pub bold: bool,
    pub lines: Vec<LabelLine>,
}

impl Label {
    /// Plain single-line label.
    #[must_use]
    pub fn plain(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bold: false,
            lines: Vec::new(),
        }
    }

    /// Bold title.
    #[must_use]
    pub fn bold(title: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(title)
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LabelLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Prepend `prefix` to the title.
    #[must_use]
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.title.insert_str(0, prefix);
        self
    }
}

/// Click target of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Raw identifier; backends sanitize it.
    pub id: String,
    pub label: Label,
    /// Theme class name (`container`, `added`, ...).
    pub class: String,
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagram {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Diagram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a diagram with one node per drawn resource and one edge per
    /// connection between drawn resources.
    pub fn from_app(
        app: &ParsedApp,
        label: impl Fn(&ResourceRecord) -> Label,
        link: impl Fn(&ResourceRecord) -> Option<Link>,
    ) -> Self {
        let mut diagram = Self::new();

        for resource in app.resources.iter().filter(|r| r.category.is_drawn()) {
            diagram.add_node(Node {
                id: resource.symbolic_name.clone(),
                label: label(resource),
                class: resource.category.as_str().to_owned(),
                link: link(resource),
            });
        }

        for conn in app.connections() {
            if !diagram.add_edge(&conn.from, &conn.to, EdgeStyle::Normal) {
                tracing::debug!(from = %conn.from, to = %conn.to, "Edge endpoint not drawn");
            }
        }

        diagram
    }

    /// Add a node. Returns `false` if a node with the same id exists.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.contains(&node.id) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Add an edge between existing nodes.
    ///
    /// Returns `false` (and adds nothing) for self-loops, duplicates, and
    /// edges with an endpoint that is not a node. Edges between the same
    /// nodes with different styles are kept side by side, so a connection
    /// removed under one identifier and added under another shows both.
    pub fn add_edge(&mut self, from: &str, to: &str, style: EdgeStyle) -> bool {
        if from == to
            || !self.contains(from)
            || !self.contains(to)
            || self
                .edges
                .iter()
                .any(|e| e.from == from && e.to == to && e.style == style)
        {
            return false;
        }
        self.edges.push(Edge {
            from: from.to_owned(),
            to: to.to_owned(),
            style,
        });
        true
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Keywords of Mermaid flowcharts and DOT that cannot name a node.
const RESERVED_IDS: [&str; 14] = [
    "end", "graph", "flowchart", "subgraph", "direction", "click", "class", "classdef", "style",
    "linkstyle", "node", "edge", "digraph", "strict",
];

/// Identifier safe for Mermaid and DOT.
///
/// `-` and `.` become `_`, and reserved words get a trailing `_`.
#[must_use]
pub fn node_id(id: &str) -> String {
    let mut sanitized = id.replace(['-', '.'], "_");
    if RESERVED_IDS.contains(&sanitized.to_lowercase().as_str()) {
        sanitized.push('_');
    }
    sanitized
}

/// Rendered identifiers of a diagram's nodes.
///
/// Raw ids that sanitize to the same identifier (`a-b` and `a.b`) are told
/// apart with a numeric suffix, assigned in node order.
#[derive(Debug, Clone, Default)]
pub struct NodeIds {
    ids: HashMap<String, String>,
}

impl NodeIds {
    #[must_use]
    pub fn new(diagram: &Diagram) -> Self {
        let mut taken = HashSet::new();
        let mut ids = HashMap::new();
        for node in diagram.nodes() {
            let base = node_id(&node.id);
            let mut candidate = base.clone();
            let mut n = 2;
            while !taken.insert(candidate.clone()) {
                candidate = format!("{base}_{n}");
                n += 1;
            }
            ids.insert(node.id.clone(), candidate);
        }
        Self { ids }
    }

    /// Rendered identifier of a node id.
    #[must_use]
    pub fn get(&self, id: &str) -> String {
        self.ids.get(id).cloned().unwrap_or_else(|| node_id(id))
    }
}
