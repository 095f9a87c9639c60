//! Parsed application: resources plus resolved connections.

use crate::resource::{Connection, ResourceRecord};

/// Result of parsing one manifest or graph document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedApp {
    /// Resources in declaration order.
    pub resources: Vec<ResourceRecord>,
    /// Connections in insertion order, without self-loops or duplicates.
    connections: Vec<Connection>,
    /// Manifest filename inferred from the input, if any.
    pub source_file: Option<String>,
}

impl ParsedApp {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection, skipping self-loops and duplicates.
    ///
    /// Returns `true` if the connection was added.
    pub fn add_connection(&mut self, connection: Connection) -> bool {
        if connection.is_self_loop() || self.connections.contains(&connection) {
            return false;
        }
        self.connections.push(connection);
        true
    }

    /// Connections in insertion order.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Look up a resource by symbolic name.
    #[must_use]
    pub fn resource(&self, symbolic_name: &str) -> Option<&ResourceRecord> {
        self.resources
            .iter()
            .find(|r| r.symbolic_name == symbolic_name)
    }

    /// Look up a resource by display name.
    #[must_use]
    pub fn resource_by_display_name(&self, display_name: &str) -> Option<&ResourceRecord> {
        self.resources
            .iter()
            .find(|r| r.display_name == display_name)
    }

    /// Whether the app has no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_connection_deduplicates() {
        let mut app = ParsedApp::new();
        assert!(app.add_connection(Connection::new("a", "b")));
        assert!(!app.add_connection(Connection::new("a", "b")));
        assert!(app.add_connection(Connection::new("b", "a")));
        assert_eq!(app.connections().len(), 2);
    }

    #[test]
    fn test_add_connection_drops_self_loops() {
        let mut app = ParsedApp::new();
        assert!(!app.add_connection(Connection::new("a", "a")));
        assert!(app.connections().is_empty());
    }

    #[test]
    fn test_connections_keep_insertion_order() {
        let mut app = ParsedApp::new();
        app.add_connection(Connection::new("c", "d"));
        app.add_connection(Connection::new("a", "b"));
        assert_eq!(
            app.connections(),
            &[Connection::new("c", "d"), Connection::new("a", "b")]
        );
    }

    #[test]
    fn test_lookup() {
        let mut app = ParsedApp::new();
        app.resources.push(
            ResourceRecord::new("backend", "Applications.Core/containers")
                .with_display_name("http-back-ctnr"),
        );

        assert!(app.resource("backend").is_some());
        assert!(app.resource("http-back-ctnr").is_none());
        assert_eq!(
            app.resource_by_display_name("http-back-ctnr")
                .map(|r| r.symbolic_name.as_str()),
            Some("backend")
        );
        assert!(!app.is_empty());
    }
}
