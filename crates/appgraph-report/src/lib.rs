//! Markdown output for appgraph.
//!
//! - [`report`]: pull request comment comparing two `rad app graph` outputs
//! - [`views`]: side-by-side and unified diagrams for that comment
//! - [`patch`]: README section replacement

pub mod patch;
pub mod report;
pub mod views;

pub use patch::patch_section;
pub use report::{
    ReportOptions, app_label, render_full_comment, render_no_changes, render_section,
};
pub use views::{NodeLabels, side_diagram, unified_diagram};
