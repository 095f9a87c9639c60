//! Resource and connection extraction from a parsed manifest.

use std::collections::HashMap;
use std::path::Path;

use appgraph_model::{Connection, ParsedApp, ResourceRecord};

use crate::error::BicepError;
use crate::params::ImageDefaults;
use crate::parser::{Manifest, ResourceDecl, Value};

/// Reference members that point at another resource (`backend.id`).
const REFERENCE_MEMBERS: [&str; 2] = ["id", "connectionString"];

/// Connection target before hostname resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingTarget {
    /// Hostname taken from a `http(s)://` source URL.
    Hostname(String),
    /// Symbolic name (or display name) of another resource.
    Symbol(String),
}

/// Parse Bicep source into resources and resolved connections.
///
/// `file_name` is recorded as each resource's source file.
pub fn parse_manifest(source: &str, file_name: &str) -> Result<ParsedApp, BicepError> {
    let manifest = Manifest::parse(source)?;
    Ok(extract(&manifest, file_name))
}

/// Read and parse a manifest file.
pub fn parse_manifest_file(path: &Path) -> Result<ParsedApp, BicepError> {
    let source = std::fs::read_to_string(path).map_err(|source| BicepError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    parse_manifest(&source, &file_name)
}

/// Build a [`ParsedApp`] from a parsed manifest.
#[must_use]
pub fn extract(manifest: &Manifest, file_name: &str) -> ParsedApp {
    let mut app = ParsedApp::new();
    app.source_file = Some(file_name.to_owned());

    let mut pending: Vec<(String, PendingTarget)> = Vec::new();

    for decl in manifest.resources() {
        let record = extract_record(decl, file_name);
        tracing::debug!(
            resource = %record.symbolic_name,
            category = %record.category,
            line = record.source_line,
            "Extracted resource"
        );
        pending.extend(
            extract_targets(&decl.body)
                .into_iter()
                .map(|target| (decl.symbolic_name.clone(), target)),
        );
        app.resources.push(record);
    }

    // Parameter-backed images are resolved in a second pass.
    let resolved = ImageDefaults::from_manifest(manifest).apply(&mut app);
    if resolved > 0 {
        tracing::debug!(count = resolved, "Resolved images from parameter defaults");
    }

    let by_display_name: HashMap<&str, &str> = app
        .resources
        .iter()
        .map(|r| (r.display_name.as_str(), r.symbolic_name.as_str()))
        .collect();

    let mut connections = Vec::new();
    for (from, target) in pending {
        let resolved = match &target {
            PendingTarget::Hostname(host) => by_display_name.get(host.as_str()).copied(),
            PendingTarget::Symbol(name) => app
                .resource(name)
                .map(|r| r.symbolic_name.as_str())
                .or_else(|| by_display_name.get(name.as_str()).copied()),
        };
        match resolved {
            Some(to) => connections.push(Connection::new(from, to)),
            None => tracing::warn!(
                from = %from,
                target = ?target,
                "Could not resolve connection target"
            ),
        }
    }

    for connection in connections {
        app.add_connection(connection);
    }

    app
}

fn extract_record(decl: &ResourceDecl, file_name: &str) -> ResourceRecord {
    let display_name = decl
        .body
        .property("name")
        .and_then(Value::as_str)
        .unwrap_or(&decl.symbolic_name);

    let image = decl
        .body
        .find("image")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let port = decl.body.find("containerPort").and_then(|v| match v {
        Value::Number(n) => u16::try_from(*n).ok(),
        _ => None,
    });

    ResourceRecord::new(decl.symbolic_name.as_str(), decl.type_string.as_str())
        .with_display_name(display_name)
        .with_image(image)
        .with_port(port)
        .at(file_name, decl.line)
}

/// Connection targets declared in a resource body.
///
/// Entries of the `connections` object come first, in declaration order,
/// followed by any other `source: <resource>.id` reference in the body.
fn extract_targets(body: &Value) -> Vec<PendingTarget> {
    let mut targets = Vec::new();

    if let Some(Value::Object(entries)) = body.find("connections") {
        for entry in entries {
            match entry.value.property("source") {
                Some(Value::String(source)) => {
                    targets.push(match url_hostname(source) {
                        Some(host) => PendingTarget::Hostname(host.to_owned()),
                        None => PendingTarget::Symbol(source.clone()),
                    });
                }
                Some(value) => {
                    if let Some(name) = referenced_resource(value) {
                        targets.push(PendingTarget::Symbol(name.to_owned()));
                    }
                }
                None => {}
            }
        }
    }

    body.walk(&mut |prop| {
        if prop.key != "source" {
            return;
        }
        if let Some(name) = referenced_resource(&prop.value)
            && !targets.iter().any(|t| matches!(t, PendingTarget::Symbol(s) if s == name))
        {
            targets.push(PendingTarget::Symbol(name.to_owned()));
        }
    });

    targets
}

/// `backend` for `backend.id` or `backend.connectionString`.
fn referenced_resource(value: &Value) -> Option<&str> {
    match value {
        Value::Reference(segments) => match segments.as_slice() {
            [name, member] if REFERENCE_MEMBERS.contains(&member.as_str()) => Some(name.as_str()),
            _ => None,
        },
        _ => None,
    }
}

/// Hostname of an `http://` or `https://` URL.
pub(crate) fn url_hostname(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))?;
    let end = rest.find([':', '/']).unwrap_or(rest.len());
    let host = &rest[..end];
    (!host.is_empty()).then_some(host)
}
