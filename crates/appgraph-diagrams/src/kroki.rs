//! Graphviz image rendering via a Kroki server.
//!
//! DOT source is POSTed to `{server}/graphviz/{format}`; the response body is
//! the rendered image. One request per invocation, no retries.

use std::time::Duration;

use ureq::Agent;

/// Kroki endpoint for DOT sources.
const GRAPHVIZ_ENDPOINT: &str = "graphviz";

/// PNG file signature.
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Output format of the Graphviz diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramFormat {
    /// SVG image (clickable nodes).
    #[default]
    Svg,
    /// PNG image.
    Png,
    /// DOT source, written without rendering.
    Dot,
}

impl DiagramFormat {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "dot" => Some(Self::Dot),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Dot => "dot",
        }
    }

    /// File extension, same as the format name.
    #[must_use]
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Whether producing this format requires a Kroki request.
    #[must_use]
    pub fn needs_rendering(self) -> bool {
        self != Self::Dot
    }
}

/// Kroki rendering error.
#[derive(Debug, thiserror::Error)]
pub enum KrokiError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("I/O error: {0}")]
    Io(String),
    #[error("invalid PNG data")]
    InvalidPng,
    #[error("invalid UTF-8 in SVG: {0}")]
    InvalidSvg(#[from] std::str::Utf8Error),
    #[error("format '{0}' is not rendered by Kroki")]
    Unsupported(&'static str),
}

/// Create HTTP agent with the specified timeout.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Client for one Kroki server.
#[derive(Debug, Clone)]
pub struct KrokiClient {
    agent: Agent,
    server_url: String,
}

impl KrokiClient {
    #[must_use]
    pub fn new(server_url: &str, timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
            server_url: server_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Request URL for a format.
    #[must_use]
    pub fn url(&self, format: DiagramFormat) -> String {
        format!(
            "{}/{GRAPHVIZ_ENDPOINT}/{}",
            self.server_url,
            format.as_str()
        )
    }

    /// Render DOT source to an SVG or PNG image.
    pub fn render(&self, dot: &str, format: DiagramFormat) -> Result<Vec<u8>, KrokiError> {
        if !format.needs_rendering() {
            return Err(KrokiError::Unsupported(format.as_str()));
        }

        let url = self.url(format);
        tracing::info!(url = %url, bytes = dot.len(), "Rendering diagram via Kroki");

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(dot.as_bytes())
            .map_err(|e| KrokiError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(KrokiError::Status { status, body });
        }

        let data = body
            .read_to_vec()
            .map_err(|e| KrokiError::Io(e.to_string()))?;
        validate(&data, format)?;
        Ok(data)
    }
}

fn validate(data: &[u8], format: DiagramFormat) -> Result<(), KrokiError> {
    match format {
        DiagramFormat::Png if !data.starts_with(PNG_SIGNATURE) => Err(KrokiError::InvalidPng),
        DiagramFormat::Svg => {
            std::str::from_utf8(data)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
