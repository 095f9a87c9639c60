//! `rad app graph` output for appgraph.
//!
//! - [`document`]: typed view of the graph JSON ([`GraphDocument`])
//! - [`extract`]: normalization into a [`ParsedApp`](appgraph_model::ParsedApp)
//! - [`resolve`]: connection endpoint resolution ([`Resolver`])
//! - [`diff`]: base/head comparison ([`Graph`], [`GraphDiff`])

pub mod diff;
pub mod document;
mod error;
pub mod extract;
pub mod resolve;

pub use diff::{ConnectionKey, Graph, GraphDiff, ResourceStatus, diff};
pub use document::{GraphConnection, GraphDocument, GraphMetadata, GraphResource};
pub use error::GraphError;
pub use extract::{parse_graph_file, parse_graph_output};
pub use resolve::{Resolution, Resolver};
