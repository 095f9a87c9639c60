//! Connection endpoint resolution.
//!
//! Graph connections name their target by resource id, by URL
//! (`http://backend:3000`) or by ARM template expression
//! (`[reference('database').id]`). [`Resolver`] maps all of these to a
//! resource name, falling back to a best-effort literal when nothing matches.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::is_template_expression;

static REFERENCE_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[reference\('(\w+)'\)").unwrap());

static URL_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://([^:/]+)").unwrap());

/// Outcome of resolving a connection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Matched a known resource.
    Known(String),
    /// No resource matched; a literal derived from the raw value.
    Fallback(String),
}

impl Resolution {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Known(name) | Self::Fallback(name) => name,
        }
    }

    #[must_use]
    pub fn into_name(self) -> String {
        match self {
            Self::Known(name) | Self::Fallback(name) => name,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

/// Resolves connection endpoints against the resources of one graph.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    /// `(id, name)` in insertion order; suffix matches take the first hit.
    entries: Vec<(String, String)>,
    by_id: HashMap<String, usize>,
}

impl Resolver {
    /// Build a resolver from `(id, name)` pairs. Later duplicates of an id
    /// are ignored.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut resolver = Self::default();
        for (id, name) in entries {
            let id = id.into();
            if id.is_empty() || resolver.by_id.contains_key(&id) {
                continue;
            }
            resolver.by_id.insert(id.clone(), resolver.entries.len());
            resolver.entries.push((id, name.into()));
        }
        resolver
    }

    fn exact(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(|&i| self.entries[i].1.as_str())
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, name)| name.as_str())
    }

    fn known_name(&self, name: &str) -> Option<&str> {
        self.names().find(|n| *n == name)
    }

    fn by_suffix(&self, segment: &str) -> Option<&str> {
        let suffix = format!("/{segment}");
        self.entries
            .iter()
            .find(|(id, _)| id.ends_with(&suffix))
            .map(|(_, name)| name.as_str())
    }

    /// Name of a connection's source resource.
    ///
    /// Exact id match, else the first resource whose id ends with the same
    /// last path segment.
    #[must_use]
    pub fn resolve_source(&self, id: &str) -> Option<&str> {
        self.exact(id).or_else(|| self.by_suffix(last_segment(id)))
    }

    /// Name of a connection's target.
    ///
    /// Tried in order: exact id, last path segment of a hierarchical id,
    /// the identifier inside `[reference('x')...]`, then the hostname of a
    /// URL. A hostname prefers a resource of the same name, then one whose
    /// name contains it or is contained in it (`http://backend-svc:80`
    /// labels as `backend`), so table rows show the resource rather than
    /// the service alias.
    ///
    /// Never fails: when no known resource matches, the hostname, the
    /// template identifier or the last path segment is returned as
    /// [`Resolution::Fallback`].
    #[must_use]
    pub fn resolve_target(&self, raw: &str) -> Resolution {
        if let Some(name) = self.exact(raw) {
            return Resolution::Known(name.to_owned());
        }

        let reference = REFERENCE_EXPR.captures(raw);
        let host = URL_HOST.captures(raw);
        let segment = last_segment(raw);

        if reference.is_none()
            && host.is_none()
            && !is_template_expression(raw)
            && let Some(name) = self
                .by_suffix(segment)
                .or_else(|| self.known_name(segment))
        {
            return Resolution::Known(name.to_owned());
        }

        if let Some(caps) = reference {
            let symbol = caps.get(1).map_or("", |m| m.as_str());
            return match self.known_name(symbol) {
                Some(name) => Resolution::Known(name.to_owned()),
                None => Resolution::Fallback(symbol.to_owned()),
            };
        }

        if let Some(caps) = host {
            let host = caps.get(1).map_or("", |m| m.as_str());
            let matched = self.known_name(host).or_else(|| {
                self.names()
                    .find(|name| !name.is_empty() && (host.contains(name) || name.contains(host)))
            });
            return match matched {
                Some(name) => Resolution::Known(name.to_owned()),
                None => Resolution::Fallback(host.to_owned()),
            };
        }

        Resolution::Fallback(segment.to_owned())
    }

    /// Display label for a connection endpoint.
    #[must_use]
    pub fn label(&self, raw: &str) -> String {
        self.resolve_target(raw).into_name()
    }
}

/// Last `/`-separated segment, ignoring a trailing slash.
fn last_segment(id: &str) -> &str {
    let trimmed = id.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FRONTEND: &str = "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/containers/frontend";
    const BACKEND: &str = "/planes/radius/local/resourceGroups/rg/providers/Applications.Core/containers/http-back-ctnr";
    const DATABASE: &str = "/planes/radius/local/resourceGroups/rg/providers/Applications.Datastores/sqlDatabases/database";

    fn resolver() -> Resolver {
        Resolver::new([
            (FRONTEND, "frontend"),
            (BACKEND, "http-back-ctnr"),
            (DATABASE, "database"),
        ])
    }

    #[test]
    fn test_exact_id() {
        assert_eq!(
            resolver().resolve_target(BACKEND),
            Resolution::Known("http-back-ctnr".to_owned())
        );
        assert_eq!(resolver().resolve_source(FRONTEND), Some("frontend"));
    }

    #[test]
    fn test_source_suffix_match() {
        let other_scope = "/planes/radius/local/resourceGroups/other/providers/Applications.Core/containers/frontend";
        assert_eq!(resolver().resolve_source(other_scope), Some("frontend"));
        assert_eq!(resolver().resolve_source("/x/y/unknown"), None);
    }

    #[test]
    fn test_target_suffix_match() {
        assert_eq!(
            resolver().resolve_target("/other/Applications.Datastores/sqlDatabases/database/"),
            Resolution::Known("database".to_owned())
        );
    }

    #[test]
    fn test_reference_expression() {
        assert_eq!(
            resolver().resolve_target("[reference('database').id]"),
            Resolution::Known("database".to_owned())
        );
        assert_eq!(
            resolver().resolve_target("[reference('cache').id]"),
            Resolution::Fallback("cache".to_owned())
        );
    }

    #[test]
    fn test_url_hostname_substring_match() {
        assert_eq!(
            resolver().resolve_target("http://http-back-ctnr:3000"),
            Resolution::Known("http-back-ctnr".to_owned())
        );
        // Hostname contained in a known name.
        assert_eq!(
            resolver().resolve_target("https://back-ctnr/api"),
            Resolution::Known("http-back-ctnr".to_owned())
        );
    }

    #[test]
    fn test_url_hostname_prefers_exact_name() {
        let resolver = Resolver::new([("/c/frontend-api", "frontend-api"), ("/c/api", "api")]);
        assert_eq!(
            resolver.resolve_target("http://api:8080"),
            Resolution::Known("api".to_owned())
        );
    }

    #[test]
    fn test_hierarchical_id_resolves_before_expressions() {
        let resolver = Resolver::new([("/c/reference", "reference"), ("/c/db", "db")]);
        assert_eq!(
            resolver.resolve_target("/other/scope/db"),
            Resolution::Known("db".to_owned())
        );
        assert_eq!(
            resolver.resolve_target("[reference('db').id]"),
            Resolution::Known("db".to_owned())
        );
    }

    #[test]
    fn test_unknown_url_falls_back_to_hostname() {
        let resolution = resolver().resolve_target("http://unknownhost:9999");
        assert_eq!(resolution, Resolution::Fallback("unknownhost".to_owned()));
        assert!(!resolution.is_known());
        assert_eq!(resolution.name(), "unknownhost");
    }

    #[test]
    fn test_plain_name() {
        assert_eq!(
            resolver().resolve_target("frontend"),
            Resolution::Known("frontend".to_owned())
        );
        assert_eq!(
            resolver().resolve_target("/some/path/unknown"),
            Resolution::Fallback("unknown".to_owned())
        );
    }

    #[test]
    fn test_unrecognized_template_expression_is_kept() {
        assert_eq!(
            resolver().resolve_target("[parameters('x')]"),
            Resolution::Fallback("[parameters('x')]".to_owned())
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(resolver().label(DATABASE), "database");
        assert_eq!(resolver().label("http://unknownhost:9999"), "unknownhost");
    }

    #[test]
    fn test_empty_ids_are_ignored() {
        let resolver = Resolver::new([("", "ghost"), (FRONTEND, "frontend")]);
        assert_eq!(resolver.resolve_source(""), None);
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("/a/b/c"), "c");
        assert_eq!(last_segment("/a/b/c/"), "c");
        assert_eq!(last_segment("plain"), "plain");
    }
}
