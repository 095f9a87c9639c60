//! Shared data model for appgraph.
//!
//! Every parser in the workspace produces a [`ParsedApp`]: a list of
//! [`ResourceRecord`]s plus the [`Connection`]s between them, keyed by
//! symbolic name. Renderers consume the same structure regardless of whether
//! it came from a Bicep manifest or from `rad app graph` JSON.
//!
//! - [`category`]: closed resource taxonomy ([`Category`])
//! - [`image`]: container image reference splitting ([`ImageRef`])
//! - [`resource`]: [`ResourceRecord`] and [`Connection`]
//! - [`app`]: [`ParsedApp`] with connection deduplication

mod app;
mod category;
mod image;
mod resource;

pub use app::ParsedApp;
pub use category::Category;
pub use image::{DEFAULT_TAG, ImageRef};
pub use resource::{Connection, ResourceRecord};
