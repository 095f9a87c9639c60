//! GitHub links from diagram nodes back to source.

use appgraph_model::ResourceRecord;
use sha2::{Digest, Sha256};

use crate::diagram::Link;

/// A GitHub repository at a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

impl Repository {
    /// `https://github.com/{owner}/{repo}/blob/{branch}/{file}#L{line}`.
    #[must_use]
    pub fn blob_url(&self, file: &str, line: u32) -> String {
        format!(
            "https://github.com/{}/{}/blob/{}/{file}#L{line}",
            self.owner, self.name, self.branch
        )
    }

    /// Click target for a resource's declaration.
    ///
    /// The resource's own source file wins over `manifest`. Returns `None`
    /// when neither names a file.
    #[must_use]
    pub fn source_link(&self, resource: &ResourceRecord, manifest: Option<&str>) -> Option<Link> {
        let file = Some(resource.source_file.as_str())
            .filter(|f| !f.is_empty())
            .or(manifest)?;
        Some(Link {
            url: self.blob_url(file, resource.source_line),
            tooltip: format!("{file}:{}", resource.source_line),
        })
    }
}

/// Side of a pull request's split diff view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    /// Base revision.
    Left,
    /// Head revision.
    Right,
}

impl DiffSide {
    fn marker(self) -> char {
        match self {
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }
}

/// A pull request's "Files changed" view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub owner: String,
    pub name: String,
    pub number: String,
}

impl PullRequest {
    #[must_use]
    pub fn files_url(&self) -> String {
        format!(
            "https://github.com/{}/{}/pull/{}/files",
            self.owner, self.name, self.number
        )
    }

    /// Link to a file (and line, when non-zero) in the PR diff.
    #[must_use]
    pub fn diff_url(&self, file: &str, side: DiffSide, line: u32) -> String {
        let mut url = format!("{}#diff-{}", self.files_url(), file_diff_anchor(file));
        if line > 0 {
            url.push(side.marker());
            url.push_str(&line.to_string());
        }
        url
    }
}

/// GitHub's diff anchor for a file: hex SHA-256 of its repository path.
#[must_use]
pub fn file_diff_anchor(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hex::encode(hasher.finalize())
}
