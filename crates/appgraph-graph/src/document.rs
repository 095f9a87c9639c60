//! `rad app graph` JSON document.
//!
//! Resources keep their whole JSON object, so two resources compare equal
//! only when every field matches (`null` and a missing key differ). Fields
//! appgraph reads are looked up on demand, and a value of an unexpected
//! type reads as absent instead of failing the document.

use std::path::Path;

use appgraph_model::{Category, ResourceRecord};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::GraphError;

/// Connection type that only expresses deployment ordering.
pub const DEPENDS_ON: &str = "dependsOn";

/// Top-level graph document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    #[serde(default)]
    pub metadata: GraphMetadata,
    #[serde(default)]
    pub resources: Vec<GraphResource>,
    #[serde(default)]
    pub connections: Vec<GraphConnection>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct GraphMetadata {
    pub source_files: Vec<String>,
}

impl From<Value> for GraphMetadata {
    fn from(value: Value) -> Self {
        let source_files = value
            .get("sourceFiles")
            .and_then(Value::as_array)
            .map(|files| {
                files
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        Self { source_files }
    }
}

/// A resource entry, kept as written.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct GraphResource {
    fields: Map<String, Value>,
}

impl From<Value> for GraphResource {
    fn from(value: Value) -> Self {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                tracing::warn!(value = %other, "Ignoring non-object resource entry");
                Map::new()
            }
        };
        Self { fields }
    }
}

/// A directed connection between two resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct GraphConnection {
    pub source_id: String,
    /// Resource id, URL or template expression.
    pub target_id: String,
    pub kind: String,
}

impl From<Value> for GraphConnection {
    fn from(value: Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        Self {
            source_id: field("sourceId"),
            target_id: field("targetId"),
            kind: field("type"),
        }
    }
}

impl GraphConnection {
    /// Whether this connection only orders deployment (`dependsOn`).
    #[must_use]
    pub fn is_dependency(&self) -> bool {
        self.kind == DEPENDS_ON
    }
}

impl GraphDocument {
    /// Decode graph output, skipping any status lines printed before the JSON.
    pub fn parse(raw: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(strip_non_json_prefix(raw))?)
    }

    /// Read and decode a graph file.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let raw = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// Manifest the graph was built from.
    ///
    /// Taken from `metadata.sourceFiles`, else from the first resource that
    /// records a source file.
    #[must_use]
    pub fn manifest_file(&self) -> Option<&str> {
        self.metadata
            .source_files
            .iter()
            .map(String::as_str)
            .find(|f| !f.is_empty())
            .or_else(|| self.resources.iter().find_map(GraphResource::source_file))
    }
}

impl GraphResource {
    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key)?.as_str()
    }

    fn source_location(&self) -> Option<&Map<String, Value>> {
        self.fields.get("sourceLocation")?.as_object()
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// Identity used when diffing: `id`, else `name`.
    #[must_use]
    pub fn key(&self) -> &str {
        self.id()
            .or_else(|| self.str_field("name"))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.str_field("name").unwrap_or("unknown")
    }

    #[must_use]
    pub fn resource_type(&self) -> &str {
        self.str_field("type").unwrap_or_default()
    }

    #[must_use]
    pub fn category(&self) -> Category {
        Category::classify(self.resource_type())
    }

    #[must_use]
    pub fn source_file(&self) -> Option<&str> {
        self.source_location()?
            .get("file")?
            .as_str()
            .filter(|f| !f.is_empty())
    }

    /// Declaration line, 0 when unknown. Numeric strings are accepted.
    #[must_use]
    pub fn source_line(&self) -> u32 {
        let line = match self.source_location().and_then(|loc| loc.get("line")) {
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        line.unwrap_or(0)
    }

    fn container(&self) -> Option<&Map<String, Value>> {
        self.fields.get("properties")?.get("container")?.as_object()
    }
    /// Literal container image. Template expressions (`[parameters('x')]`)
    /// are not images and yield `None`.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.container()?
            .get("image")?
            .as_str()
            .filter(|image| !is_template_expression(image))
    }

    /// First literal `containerPort` under `properties.container.ports`.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        let ports = self.container()?.get("ports")?.as_object()?;
        ports.values().find_map(|entry| match entry.get("containerPort")? {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) if !is_template_expression(s) => s.parse().ok(),
            _ => None,
        })
    }

    /// Normalize into a [`ResourceRecord`] keyed by resource name.
    #[must_use]
    pub fn to_record(&self) -> ResourceRecord {
        ResourceRecord::new(self.name(), self.resource_type())
            .with_image(self.image().map(str::to_owned))
            .with_port(self.port())
            .at(self.source_file().unwrap_or_default(), self.source_line())
    }
}

/// ARM template expression such as `[reference('db').id]`.
pub(crate) fn is_template_expression(value: &str) -> bool {
    value.starts_with('[')
}

/// Drop anything before the first `{` (CLI status lines).
pub fn strip_non_json_prefix(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.find('{') {
        Some(start) if start > 0 => {
            tracing::warn!(bytes = start, "Skipping non-JSON prefix in graph output");
            &raw[start..]
        }
        _ => raw,
    }
}
