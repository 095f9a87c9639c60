//! Base/head graph comparison.

use std::collections::{BTreeMap, BTreeSet};

use crate::document::{GraphDocument, GraphResource};
use crate::error::GraphError;
use crate::resolve::Resolver;

/// `(source_id, target_id)` as written in the graph.
pub type ConnectionKey = (String, String);

/// One side of a comparison: resources keyed by id and non-`dependsOn`
/// connections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub resources: BTreeMap<String, GraphResource>,
    pub connections: Vec<ConnectionKey>,
}

impl Graph {
    /// Decode graph output. `None` (a file absent on one side) is an empty graph.
    pub fn parse(raw: Option<&str>) -> Result<Self, GraphError> {
        match raw {
            Some(raw) if !raw.trim().is_empty() => Ok(Self::from(GraphDocument::parse(raw)?)),
            _ => Ok(Self::default()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.connections.is_empty()
    }

    /// Resolver over this graph's resources.
    #[must_use]
    pub fn resolver(&self) -> Resolver {
        Resolver::new(
            self.resources
                .iter()
                .map(|(id, resource)| (id.as_str(), resource.name())),
        )
    }

    /// Resources of both graphs, head entries replacing base entries.
    #[must_use]
    pub fn merged(base: &Self, head: &Self) -> Self {
        let mut merged = base.clone();
        merged
            .resources
            .extend(head.resources.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged.connections.extend(head.connections.iter().cloned());
        merged
    }
}

impl From<GraphDocument> for Graph {
    fn from(doc: GraphDocument) -> Self {
        let connections = doc
            .connections
            .iter()
            .filter(|c| !c.is_dependency())
            .map(|c| (c.source_id.clone(), c.target_id.clone()))
            .collect();
        let resources = doc
            .resources
            .into_iter()
            .map(|r| (r.key().to_owned(), r))
            .collect();
        Self {
            resources,
            connections,
        }
    }
}

/// Change status of a resource id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceStatus {
    Added,
    Removed,
    Modified,
    Unchanged,
}

impl ResourceStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Unchanged => "unchanged",
        }
    }

    /// Label prefix in the unified diagram.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Added => "+ ",
            Self::Removed => "- ",
            Self::Modified => "~ ",
            Self::Unchanged => "",
        }
    }
}

/// Set differences between two graphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub unchanged: BTreeSet<String>,
    pub added_conns: BTreeSet<ConnectionKey>,
    pub removed_conns: BTreeSet<ConnectionKey>,
}

impl GraphDiff {
    /// Whether any resource or connection differs.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty()
            && self.removed.is_empty()
            && self.modified.is_empty()
            && self.added_conns.is_empty()
            && self.removed_conns.is_empty())
    }

    #[must_use]
    pub fn has_resource_changes(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty())
    }

    #[must_use]
    pub fn has_connection_changes(&self) -> bool {
        !(self.added_conns.is_empty() && self.removed_conns.is_empty())
    }

    /// Status of a resource id present in either graph.
    #[must_use]
    pub fn status(&self, id: &str) -> ResourceStatus {
        if self.added.contains(id) {
            ResourceStatus::Added
        } else if self.removed.contains(id) {
            ResourceStatus::Removed
        } else if self.modified.contains(id) {
            ResourceStatus::Modified
        } else {
            ResourceStatus::Unchanged
        }
    }
}

/// Compare two graphs by resource id and exact connection pairs.
///
/// A resource present on both sides is modified when any of its fields
/// differ. An id change shows up as one removal plus one addition.
#[must_use]
pub fn diff(base: &Graph, head: &Graph) -> GraphDiff {
    let base_ids: BTreeSet<&String> = base.resources.keys().collect();
    let head_ids: BTreeSet<&String> = head.resources.keys().collect();

    let mut result = GraphDiff {
        added: head_ids.difference(&base_ids).map(|id| (*id).clone()).collect(),
        removed: base_ids.difference(&head_ids).map(|id| (*id).clone()).collect(),
        ..GraphDiff::default()
    };

    for id in base_ids.intersection(&head_ids) {
        if base.resources[*id] == head.resources[*id] {
            result.unchanged.insert((*id).clone());
        } else {
            result.modified.insert((*id).clone());
        }
    }

    let base_conns: BTreeSet<&ConnectionKey> = base.connections.iter().collect();
    let head_conns: BTreeSet<&ConnectionKey> = head.connections.iter().collect();
    result.added_conns = head_conns
        .difference(&base_conns)
        .map(|c| (*c).clone())
        .collect();
    result.removed_conns = base_conns
        .difference(&head_conns)
        .map(|c| (*c).clone())
        .collect();

    tracing::debug!(
        added = result.added.len(),
        removed = result.removed.len(),
        modified = result.modified.len(),
        unchanged = result.unchanged.len(),
        added_conns = result.added_conns.len(),
        removed_conns = result.removed_conns.len(),
        "Computed graph diff"
    );
    result
}
