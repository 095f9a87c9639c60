//! Node labels for resources.

use appgraph_model::{Category, ImageRef, ResourceRecord};

use crate::diagram::{Label, LabelLine};

/// How much detail a node label carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    /// Bold name, image and `:port` on separate lines.
    #[default]
    Standard,
    /// Bold name plus `image:tag` for containers.
    Detailed,
}

impl LabelMode {
    #[must_use]
    pub fn from_detailed(detailed: bool) -> Self {
        if detailed {
            Self::Detailed
        } else {
            Self::Standard
        }
    }

    #[must_use]
    pub fn label(self, resource: &ResourceRecord) -> Label {
        match self {
            Self::Standard => standard(resource),
            Self::Detailed => detailed(resource),
        }
    }
}

/// Bold display name, then the image and `:port` when known.
#[must_use]
pub fn standard(resource: &ResourceRecord) -> Label {
    let mut label = Label::bold(&resource.display_name);
    if let Some(image) = &resource.image {
        label = label.with_line(LabelLine::Plain(image.clone()));
    }
    if let Some(port) = resource.port {
        label = label.with_line(LabelLine::Plain(format!(":{port}")));
    }
    label
}

/// Bold display name; containers add a muted `image:tag` line.
///
/// A container without a known image is shown as `<name>:latest`.
#[must_use]
pub fn detailed(resource: &ResourceRecord) -> Label {
    let label = Label::bold(&resource.display_name);
    if resource.category != Category::Container {
        return label;
    }
    let image = resource
        .image
        .as_deref()
        .map_or_else(|| ImageRef::untagged(&resource.display_name), ImageRef::parse);
    label.with_line(LabelLine::Muted(image.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn container() -> ResourceRecord {
        ResourceRecord::new("frontend", "Applications.Core/containers@2023-10-01-preview")
    }

    #[test]
    fn test_standard_label() {
        let record = container()
            .with_image(Some("nginx:alpine".to_owned()))
            .with_port(Some(80));
        assert_eq!(
            standard(&record),
            Label::bold("frontend")
                .with_line(LabelLine::Plain("nginx:alpine".to_owned()))
                .with_line(LabelLine::Plain(":80".to_owned()))
        );
    }

    #[test]
    fn test_standard_label_name_only() {
        assert_eq!(standard(&container()), Label::bold("frontend"));
    }

    #[test]
    fn test_detailed_label_explicit_tag() {
        let record = container().with_image(Some("nginx:alpine".to_owned()));
        assert_eq!(
            detailed(&record).lines,
            vec![LabelLine::Muted("nginx:alpine".to_owned())]
        );
    }

    #[test]
    fn test_detailed_label_default_tag() {
        let record = container().with_image(Some("ghcr.io/org/magpie".to_owned()));
        assert_eq!(
            detailed(&record).lines,
            vec![LabelLine::Muted("ghcr.io/org/magpie:latest".to_owned())]
        );
    }

    #[test]
    fn test_detailed_label_falls_back_to_name() {
        assert_eq!(
            detailed(&container()).lines,
            vec![LabelLine::Muted("frontend:latest".to_owned())]
        );
    }

    #[test]
    fn test_detailed_label_non_container() {
        let record =
            ResourceRecord::new("cache", "Applications.Datastores/redisCaches@2023-10-01-preview");
        assert_eq!(detailed(&record), Label::bold("cache"));
    }

    #[test]
    fn test_mode() {
        assert_eq!(LabelMode::from_detailed(true), LabelMode::Detailed);
        assert_eq!(
            LabelMode::Standard.label(&container()),
            standard(&container())
        );
    }
}
