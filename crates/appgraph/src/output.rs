//! Progress messages on stderr.
//!
//! Reports go to stdout, so everything meant for a human reading the CI log
//! is written here instead.

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Green.
    pub(crate) fn success(&self, msg: &str) {
        self.styled(&Style::new().green(), msg);
    }

    /// Yellow, for degraded but non-fatal paths.
    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&Style::new().yellow(), msg);
    }

    /// Red.
    pub(crate) fn error(&self, msg: &str) {
        self.styled(&Style::new().red(), msg);
    }

    /// Cyan bold, for the file a command is about to change.
    pub(crate) fn highlight(&self, msg: &str) {
        self.styled(&Style::new().cyan().bold(), msg);
    }
}
