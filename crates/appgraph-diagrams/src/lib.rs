//! Architecture diagrams for appgraph.
//!
//! A [`Diagram`] is built once from a [`ParsedApp`](appgraph_model::ParsedApp)
//! (or node by node for diff views) and rendered by one of two backends:
//!
//! - [`mermaid`]: flowchart embedded in Markdown
//! - [`dot`]: Graphviz source, turned into SVG/PNG by [`kroki`]
//!
//! Styling comes from a [`Theme`]; node labels from [`LabelMode`]; click
//! targets from [`links`].

pub mod diagram;
pub mod dot;
pub mod kroki;
pub mod label;
pub mod links;
pub mod mermaid;
pub mod theme;

pub use diagram::{Diagram, Edge, EdgeStyle, Label, LabelLine, Link, Node, NodeIds, node_id};
pub use kroki::{DiagramFormat, KrokiClient, KrokiError};
pub use label::LabelMode;
pub use links::{DiffSide, PullRequest, Repository, file_diff_anchor};
pub use theme::Theme;
