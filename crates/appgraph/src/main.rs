//! appgraph CLI - architecture diagrams for Radius applications.
//!
//! Provides commands for:
//! - `generate`: Mermaid diagram in the README's Architecture section
//! - `render`: Graphviz image via Kroki, referenced from the README
//! - `diff`: Markdown pull request comment comparing base and head graphs

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DiffArgs, GenerateArgs, RenderArgs};
use output::Output;

/// appgraph - architecture diagrams for Radius applications.
#[derive(Parser)]
#[command(name = "appgraph", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a Mermaid architecture diagram into the README.
    Generate(GenerateArgs),
    /// Render a Graphviz architecture image and reference it from the README.
    Render(RenderArgs),
    /// Produce a Markdown report of architecture changes in a pull request.
    Diff(DiffArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate(args) => args.execute(),
        Commands::Render(args) => args.execute(),
        Commands::Diff(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
///
/// An unparsable `RUST_LOG` also falls back to WARN.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(false, None).to_string(), "warn");
        assert_eq!(log_filter(false, Some("")).to_string(), "warn");
        assert_eq!(log_filter(false, Some("appgraph=loud")).to_string(), "warn");
    }

    #[test]
    fn test_log_filter_verbose_and_env() {
        assert_eq!(log_filter(true, Some("debug")).to_string(), "info");
        assert_eq!(log_filter(false, Some("debug")).to_string(), "debug");
    }
}
