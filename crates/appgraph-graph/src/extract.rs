//! [`ParsedApp`] construction from graph documents.

use std::path::Path;

use appgraph_model::{Connection, ParsedApp};

use crate::diff::Graph;
use crate::document::{GraphDocument, GraphResource};
use crate::error::GraphError;
use crate::resolve::{Resolution, Resolver};

/// Decode `rad app graph` output and normalize it.
pub fn parse_graph_output(raw: &str) -> Result<ParsedApp, GraphError> {
    Ok(GraphDocument::parse(raw)?.to_app())
}

/// Read, decode and normalize a graph file.
pub fn parse_graph_file(path: &Path) -> Result<ParsedApp, GraphError> {
    Ok(GraphDocument::load(path)?.to_app())
}

impl GraphDocument {
    /// Resolver over every resource that has an id.
    #[must_use]
    pub fn resolver(&self) -> Resolver {
        Resolver::new(
            self.resources
                .iter()
                .filter_map(|r| Some((r.id()?, r.name()))),
        )
    }

    /// Normalize into a [`ParsedApp`] keyed by resource name.
    ///
    /// `dependsOn` connections are dropped. Connections whose source matches
    /// no resource are dropped; unknown targets keep their fallback name.
    #[must_use]
    pub fn to_app(&self) -> ParsedApp {
        let mut app = ParsedApp::new();
        app.source_file = self.manifest_file().map(str::to_owned);
        app.resources = self.resources.iter().map(GraphResource::to_record).collect();

        let resolver = self.resolver();
        for conn in self.connections.iter().filter(|c| !c.is_dependency()) {
            let Some(from) = resolver.resolve_source(&conn.source_id) else {
                tracing::warn!(source_id = %conn.source_id, "Unknown connection source");
                continue;
            };
            let to = match resolver.resolve_target(&conn.target_id) {
                Resolution::Known(name) => name,
                Resolution::Fallback(name) => {
                    tracing::warn!(
                        target_id = %conn.target_id,
                        fallback = %name,
                        "Connection target matches no resource"
                    );
                    name
                }
            };
            app.add_connection(Connection::new(from, to));
        }

        tracing::info!(
            resources = app.resources.len(),
            connections = app.connections().len(),
            manifest = app.source_file.as_deref().unwrap_or("-"),
            "Parsed graph output"
        );
        app
    }
}

impl Graph {
    /// Normalize one side of a comparison into a [`ParsedApp`].
    ///
    /// Both connection endpoints go through [`Resolver::label`], so unknown
    /// endpoints keep their fallback names.
    #[must_use]
    pub fn to_app(&self) -> ParsedApp {
        let mut app = ParsedApp::new();
        app.resources = self.resources.values().map(GraphResource::to_record).collect();

        let resolver = self.resolver();
        for (source, target) in &self.connections {
            app.add_connection(Connection::new(
                resolver.label(source),
                resolver.label(target),
            ));
        }
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appgraph_model::Category;
    use pretty_assertions::assert_eq;

    const GRAPH: &str = r#"Building app.bicep...
{
  "metadata": { "sourceFiles": ["app.bicep"] },
  "resources": [
    {
      "id": "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/applications/demo",
      "name": "demo",
      "type": "Applications.Core/applications",
      "sourceLocation": { "file": "app.bicep", "line": 3 }
    },
    {
      "id": "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/containers/frontend",
      "name": "frontend",
      "type": "Applications.Core/containers",
      "sourceLocation": { "file": "app.bicep", "line": 10 },
      "properties": { "container": { "image": "nginx:alpine" } }
    },
    {
      "id": "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/containers/backend",
      "name": "backend",
      "type": "Applications.Core/containers",
      "sourceLocation": { "file": "app.bicep", "line": 25 }
    },
    {
      "id": "/planes/radius/local/resourceGroups/rg/providers/Applications.Datastores/redisCaches/cache",
      "name": "cache",
      "type": "Applications.Datastores/redisCaches",
      "sourceLocation": { "file": "app.bicep", "line": 40 }
    }
  ],
  "connections": [
    { "sourceId": "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/containers/frontend", "targetId": "http://backend:3000", "type": "connection" },
    { "sourceId": "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/containers/frontend", "targetId": "http://unknownhost:9999", "type": "connection" },
    { "sourceId": "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/containers/backend", "targetId": "[reference('cache').id]", "type": "connection" },
    { "sourceId": "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/containers/backend", "targetId": "http://backend:3000", "type": "connection" },
    { "sourceId": "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/containers/frontend", "targetId": "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/applications/demo", "type": "dependsOn" },
    { "sourceId": "/nowhere/ghost", "targetId": "http://backend:3000", "type": "connection" }
  ]
}"#;

    #[test]
    fn test_resources() {
        let app = parse_graph_output(GRAPH).unwrap();
        assert_eq!(app.source_file.as_deref(), Some("app.bicep"));
        let names: Vec<_> = app
            .resources
            .iter()
            .map(|r| (r.symbolic_name.as_str(), r.category))
            .collect();
        assert_eq!(
            names,
            vec![
                ("demo", Category::Application),
                ("frontend", Category::Container),
                ("backend", Category::Container),
                ("cache", Category::Datastore),
            ]
        );
        assert_eq!(app.resources[1].image.as_deref(), Some("nginx:alpine"));
        assert_eq!(app.resources[3].source_line, 40);
    }

    #[test]
    fn test_connections() {
        let app = parse_graph_output(GRAPH).unwrap();
        assert_eq!(
            app.connections(),
            &[
                Connection::new("frontend", "backend"),
                Connection::new("frontend", "unknownhost"),
                Connection::new("backend", "cache"),
            ]
        );
    }

    #[test]
    fn test_malformed_output() {
        assert!(matches!(
            parse_graph_output("Error: could not build graph"),
            Err(GraphError::Json(_))
        ));
    }

    #[test]
    fn test_graph_to_app() {
        let graph = Graph::parse(Some(GRAPH)).unwrap();
        let app = graph.to_app();
        let names: Vec<_> = app
            .resources
            .iter()
            .map(|r| r.symbolic_name.as_str())
            .collect();
        assert_eq!(names, vec!["demo", "backend", "frontend", "cache"]);
        assert_eq!(
            app.connections(),
            &[
                Connection::new("frontend", "backend"),
                Connection::new("frontend", "unknownhost"),
                Connection::new("backend", "cache"),
                Connection::new("ghost", "backend"),
            ]
        );
    }

    #[test]
    fn test_parse_graph_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, GRAPH).unwrap();
        assert_eq!(parse_graph_file(&path).unwrap().resources.len(), 4);
    }
}
