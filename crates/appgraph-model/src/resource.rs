//! Resource records and connections.

use serde::Serialize;

use crate::category::Category;

/// A declared resource, normalized across input formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    /// Identifier unique within one parse (Bicep symbolic name or graph resource name).
    pub symbolic_name: String,
    /// Human-facing name (the resource's `name` property).
    pub display_name: String,
    /// Declared type string, e.g. `Applications.Core/containers@2023-10-01-preview`.
    pub declared_type: String,
    /// Category derived from `declared_type`.
    pub category: Category,
    /// Container image, when declared as a literal.
    pub image: Option<String>,
    /// First declared container port.
    pub port: Option<u16>,
    /// File the resource was declared in (empty when unknown).
    pub source_file: String,
    /// 1-based declaration line (0 when unknown).
    pub source_line: u32,
}

impl ResourceRecord {
    /// Create a record with the category derived from `declared_type`.
    ///
    /// Display name defaults to the symbolic name.
    #[must_use]
    pub fn new(symbolic_name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let symbolic_name = symbolic_name.into();
        let declared_type = declared_type.into();
        Self {
            display_name: symbolic_name.clone(),
            category: Category::classify(&declared_type),
            symbolic_name,
            declared_type,
            image: None,
            port: None,
            source_file: String::new(),
            source_line: 0,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Set the declaration location.
    #[must_use]
    pub fn at(mut self, source_file: impl Into<String>, source_line: u32) -> Self {
        self.source_file = source_file.into();
        self.source_line = source_line;
        self
    }

    /// Last segment of the declared type without the API version
    /// (`containers` for `Applications.Core/containers@2023-10-01-preview`).
    #[must_use]
    pub fn short_type(&self) -> &str {
        let without_version = self
            .declared_type
            .split_once('@')
            .map_or(self.declared_type.as_str(), |(ty, _)| ty);
        without_version
            .rsplit_once('/')
            .map_or(without_version, |(_, last)| last)
    }
}

/// Directed connection between two resources, by symbolic name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

impl Connection {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Whether both ends name the same resource.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}
