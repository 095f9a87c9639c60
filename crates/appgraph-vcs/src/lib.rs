//! Git access for appgraph.
//!
//! Diff reports compare the graph committed on the base branch with the one
//! generated for the pull request. [`Repository::read_file`] reads the base
//! side straight from the object database, so no checkout is needed.

use std::path::{Path, PathBuf};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Git access error.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    /// No repository at or above the directory.
    #[error("no git repository found at {}: {source}", path.display())]
    Discover {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    /// Revision does not name an object in the repository.
    #[error("revision '{rev}' not found: {source}")]
    Revision {
        rev: String,
        #[source]
        source: BoxError,
    },
    /// Object lookup failed.
    #[error("failed to read {path} at {rev}: {source}")]
    Object {
        rev: String,
        path: String,
        #[source]
        source: BoxError,
    },
    /// File content is not UTF-8.
    #[error("{path} at {rev} is not valid UTF-8")]
    Utf8 { rev: String, path: String },
}

/// A git repository opened for reading.
pub struct Repository {
    inner: gix::Repository,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("git_dir", &self.inner.git_dir())
            .finish()
    }
}

impl Repository {
    /// Open the repository containing `dir`.
    pub fn discover(dir: &Path) -> Result<Self, VcsError> {
        let inner = gix::discover(dir).map_err(|e| VcsError::Discover {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
        tracing::debug!(git_dir = %inner.git_dir().display(), "Opened repository");
        Ok(Self { inner })
    }

    /// Contents of `path` (relative to the repository root) at `rev`.
    ///
    /// Returns `Ok(None)` when the revision exists but has no such file, or
    /// the path names a directory.
    pub fn read_file(&self, rev: &str, path: &str) -> Result<Option<String>, VcsError> {
        let commit = self
            .inner
            .rev_parse_single(rev)
            .map_err(|e| VcsError::Revision {
                rev: rev.to_owned(),
                source: Box::new(e),
            })?;

        let spec = format!("{commit}:{}", path.trim_start_matches("./"));
        let Ok(id) = self.inner.rev_parse_single(spec.as_str()) else {
            tracing::debug!(rev, path, "File not present at revision");
            return Ok(None);
        };

        let object = id
            .object()
            .map_err(|e| VcsError::Object {
                rev: rev.to_owned(),
                path: path.to_owned(),
                source: Box::new(e),
            })?
            .detach();
        if object.kind != gix::object::Kind::Blob {
            tracing::debug!(rev, path, kind = %object.kind, "Path is not a file");
            return Ok(None);
        }

        String::from_utf8(object.data)
            .map(Some)
            .map_err(|_| VcsError::Utf8 {
                rev: rev.to_owned(),
                path: path.to_owned(),
            })
    }
}

/// Read `path` at `rev` from the repository containing `dir`.
pub fn read_file_at(dir: &Path, rev: &str, path: &str) -> Result<Option<String>, VcsError> {
    Repository::discover(dir)?.read_file(rev, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn git(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(output.status.success(), "git {args:?} failed");
        String::from_utf8(output.stdout).unwrap().trim().to_owned()
    }

    /// Repository with two commits of `.radius/app-graph.json`.
    fn fixture() -> (tempfile::TempDir, String, String) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        git(root, &["init", "--quiet"]);
        std::fs::create_dir(root.join(".radius")).unwrap();

        std::fs::write(root.join(".radius/app-graph.json"), "{\"resources\": []}\n").unwrap();
        git(root, &["add", "."]);
        git(root, &["commit", "--quiet", "-m", "first"]);
        let first = git(root, &["rev-parse", "HEAD"]);

        std::fs::write(
            root.join(".radius/app-graph.json"),
            "{\"resources\": [{\"id\": \"/a\"}]}\n",
        )
        .unwrap();
        git(root, &["commit", "--quiet", "-am", "second"]);
        let second = git(root, &["rev-parse", "HEAD"]);

        (dir, first, second)
    }

    #[test]
    fn test_read_file_at_revision() {
        let (dir, first, second) = fixture();
        let repo = Repository::discover(dir.path()).unwrap();

        assert_eq!(
            repo.read_file(&first, ".radius/app-graph.json").unwrap().as_deref(),
            Some("{\"resources\": []}\n")
        );
        assert_eq!(
            repo.read_file(&second, ".radius/app-graph.json").unwrap().as_deref(),
            Some("{\"resources\": [{\"id\": \"/a\"}]}\n")
        );
    }

    #[test]
    fn test_short_sha_and_leading_dot_slash() {
        let (dir, first, _) = fixture();
        let content = read_file_at(dir.path(), &first[..10], "./.radius/app-graph.json").unwrap();
        assert_eq!(content.as_deref(), Some("{\"resources\": []}\n"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let (dir, first, _) = fixture();
        let repo = Repository::discover(dir.path()).unwrap();
        assert!(repo.read_file(&first, "app.bicep").unwrap().is_none());
    }

    #[test]
    fn test_directory_is_none() {
        let (dir, first, _) = fixture();
        let repo = Repository::discover(dir.path()).unwrap();
        assert!(repo.read_file(&first, ".radius").unwrap().is_none());
    }

    #[test]
    fn test_unknown_revision() {
        let (dir, _, _) = fixture();
        let repo = Repository::discover(dir.path()).unwrap();
        let err = repo
            .read_file("no-such-branch", "app.bicep")
            .unwrap_err();
        assert!(matches!(err, VcsError::Revision { .. }));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let (dir, first, _) = fixture();
        let content = read_file_at(&dir.path().join(".radius"), &first, ".radius/app-graph.json")
            .unwrap();
        assert!(content.is_some());
    }
}
