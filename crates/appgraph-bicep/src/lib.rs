//! Bicep manifest parsing for appgraph.
//!
//! Turns a Radius Bicep manifest into a [`ParsedApp`](appgraph_model::ParsedApp):
//!
//! - A tokenizer that tracks line numbers and keeps newlines significant
//! - A recursive-descent parser producing a small declaration AST ([`Manifest`])
//! - Resource extraction ([`parse_manifest`]): display name, image, first
//!   container port, declaration line and connections
//! - Parameter-default image resolution ([`ImageDefaults`]), also used to
//!   patch images into resources parsed from graph JSON
//!
//! Connections come from two places: entries of a `connections` object
//! (`source: 'http://backend:3000'` resolves by hostname against display names,
//! any other string is taken as a symbolic name) and `source: <resource>.id`
//! references anywhere in the resource body. Targets that resolve to no known
//! resource are logged and dropped.
//!
//! # Example
//!
//! ```
//! use appgraph_bicep::parse_manifest;
//!
//! let source = "\
//! resource web 'Applications.Core/containers@2023-10-01-preview' = {
//!   name: 'web'
//!   properties: {
//!     container: {
//!       image: 'nginx:alpine'
//!     }
//!   }
//! }
//! ";
//! let app = parse_manifest(source, "app.bicep").unwrap();
//! assert_eq!(app.resources[0].image.as_deref(), Some("nginx:alpine"));
//! ```

mod error;
mod extract;
mod lexer;
mod params;
mod parser;

pub use error::BicepError;
pub use extract::{extract, parse_manifest, parse_manifest_file};
pub use params::ImageDefaults;
pub use parser::{Manifest, ParamDecl, Property, ResourceDecl, Statement, Value};
