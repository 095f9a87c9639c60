//! CLI command implementations.

mod common;
pub(crate) mod diff;
pub(crate) mod generate;
pub(crate) mod render;

pub(crate) use diff::DiffArgs;
pub(crate) use generate::GenerateArgs;
pub(crate) use render::RenderArgs;
