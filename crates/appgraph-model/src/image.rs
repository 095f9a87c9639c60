//! Container image references.

use std::fmt;

/// Tag used when an image reference carries no explicit tag.
pub const DEFAULT_TAG: &str = "latest";

/// A container image split into repository and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Image repository, including any registry prefix.
    pub name: String,
    /// Image tag.
    pub tag: String,
}

impl ImageRef {
    /// Split an image reference on its last colon.
    ///
    /// A colon followed by a path segment is a registry port, not a tag
    /// (`localhost:5000/app` has no tag).
    ///
    /// # Examples
    ///
    /// ```
    /// use appgraph_model::ImageRef;
    ///
    /// let image = ImageRef::parse("nginx:alpine");
    /// assert_eq!(image.name, "nginx");
    /// assert_eq!(image.tag, "alpine");
    /// ```
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        match reference.rsplit_once(':') {
            Some((name, tag)) if !tag.contains('/') && !name.is_empty() => Self {
                name: name.to_owned(),
                tag: tag.to_owned(),
            },
            _ => Self::untagged(reference),
        }
    }

    /// Image reference with the default tag.
    #[must_use]
    pub fn untagged(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            tag: DEFAULT_TAG.to_owned(),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explicit_tag() {
        let image = ImageRef::parse("nginx:alpine");
        assert_eq!(image.name, "nginx");
        assert_eq!(image.tag, "alpine");
    }

    #[test]
    fn test_parse_registry_path_with_tag() {
        let image = ImageRef::parse("ghcr.io/image-registry/magpie:v1.2");
        assert_eq!(image.name, "ghcr.io/image-registry/magpie");
        assert_eq!(image.tag, "v1.2");
    }

    #[test]
    fn test_parse_without_tag_defaults_to_latest() {
        let image = ImageRef::parse("redis");
        assert_eq!(image.name, "redis");
        assert_eq!(image.tag, DEFAULT_TAG);
    }

    #[test]
    fn test_parse_registry_port_is_not_a_tag() {
        let image = ImageRef::parse("localhost:5000/app");
        assert_eq!(image.name, "localhost:5000/app");
        assert_eq!(image.tag, "latest");

        let tagged = ImageRef::parse("localhost:5000/app:1.0");
        assert_eq!(tagged.name, "localhost:5000/app");
        assert_eq!(tagged.tag, "1.0");
    }

    #[test]
    fn test_display() {
        assert_eq!(ImageRef::parse("nginx:alpine").to_string(), "nginx:alpine");
        assert_eq!(ImageRef::parse("nginx").to_string(), "nginx:latest");
    }
}
