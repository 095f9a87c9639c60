//! Resource categories.

use std::fmt;

use serde::Serialize;

/// Type-name fragments that mark a datastore resource.
const DATASTORE_MARKERS: [&str; 3] = ["rediscaches", "sqldatabases", "mongodatabases"];

/// Category of a declared resource.
///
/// Drives node styling and edge filtering. Application resources are the
/// top-level grouping and never appear as diagram nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Container,
    Datastore,
    Application,
    Other,
}

impl Category {
    /// Classify a declared resource type such as `Applications.Core/containers@2023-10-01-preview`.
    ///
    /// Matching is case-insensitive and substring based; the first matching
    /// rule wins, so `Applications.Core/containers` is a container rather
    /// than an application.
    #[must_use]
    pub fn classify(declared_type: &str) -> Self {
        let lower = declared_type.to_lowercase();

        if lower.contains("containers") {
            Self::Container
        } else if DATASTORE_MARKERS.iter().any(|m| lower.contains(m)) {
            Self::Datastore
        } else if lower.contains("applications") {
            Self::Application
        } else {
            Self::Other
        }
    }

    /// Lowercase tag used in class names and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Datastore => "datastore",
            Self::Application => "application",
            Self::Other => "other",
        }
    }

    /// Whether resources of this category are drawn as diagram nodes.
    #[must_use]
    pub fn is_drawn(self) -> bool {
        self != Self::Application
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
