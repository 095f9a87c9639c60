//! Image resolution through parameter defaults.
//!
//! Container images are often declared as `image: magpieimage` with
//! `param magpieimage string = 'ghcr.io/...:latest'`. Structured graph output
//! only carries the ARM placeholder (`[parameters('magpieimage')]`), so the
//! default has to be recovered from the manifest itself.

use std::collections::HashMap;
use std::path::Path;

use appgraph_model::{Category, ParsedApp};

use crate::error::BicepError;
use crate::parser::{Manifest, Value};

/// Resolved images for resources whose `image` references a parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDefaults {
    by_symbolic_name: HashMap<String, String>,
    by_display_name: HashMap<String, String>,
}

impl ImageDefaults {
    /// Collect parameter-backed images from a parsed manifest.
    #[must_use]
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut defaults = Self::default();

        for resource in manifest.resources() {
            let Some(Value::Reference(segments)) = resource.body.find("image") else {
                continue;
            };
            let [param] = segments.as_slice() else {
                continue;
            };
            let Some(image) = manifest.string_param_default(param) else {
                tracing::debug!(
                    resource = %resource.symbolic_name,
                    param = %param,
                    "Image parameter has no string default"
                );
                continue;
            };

            defaults
                .by_symbolic_name
                .insert(resource.symbolic_name.clone(), image.to_owned());
            if let Some(name) = resource.body.property("name").and_then(Value::as_str) {
                defaults
                    .by_display_name
                    .insert(name.to_owned(), image.to_owned());
            }
        }

        defaults
    }

    /// Parse `source` and collect parameter-backed images.
    pub fn from_source(source: &str) -> Result<Self, BicepError> {
        Ok(Self::from_manifest(&Manifest::parse(source)?))
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, BicepError> {
        let source = std::fs::read_to_string(path).map_err(|source| BicepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(&source)
    }

    /// Image for a resource, matched by symbolic name first, then display name.
    #[must_use]
    pub fn lookup(&self, symbolic_name: &str, display_name: &str) -> Option<&str> {
        self.by_symbolic_name
            .get(symbolic_name)
            .or_else(|| self.by_display_name.get(display_name))
            .map(String::as_str)
    }

    /// Fill in missing container images.
    ///
    /// Returns the number of resources updated.
    pub fn apply(&self, app: &mut ParsedApp) -> usize {
        let mut updated = 0;
        for resource in &mut app.resources {
            if resource.category != Category::Container || resource.image.is_some() {
                continue;
            }
            if let Some(image) = self.lookup(&resource.symbolic_name, &resource.display_name) {
                resource.image = Some(image.to_owned());
                updated += 1;
            }
        }
        updated
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_symbolic_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appgraph_model::ResourceRecord;

    const MANIFEST: &str = "\
param magpieimage string = 'ghcr.io/image-registry/magpie:latest'
param port int = 3000

resource backend 'Applications.Core/containers@2023-10-01-preview' = {
  name: 'http-back-ctnr'
  properties: {
    container: {
      image: magpieimage
    }
  }
}

resource frontend 'Applications.Core/containers@2023-10-01-preview' = {
  name: 'frontend'
  properties: {
    container: {
      image: 'nginx:alpine'
    }
  }
}

resource other 'Applications.Core/containers@2023-10-01-preview' = {
  name: 'other'
  properties: {
    container: {
      image: port
    }
  }
}
";

    #[test]
    fn test_lookup_by_symbolic_name() {
        let defaults = ImageDefaults::from_source(MANIFEST).unwrap();
        assert_eq!(
            defaults.lookup("backend", "unrelated"),
            Some("ghcr.io/image-registry/magpie:latest")
        );
    }

    #[test]
    fn test_lookup_by_display_name() {
        let defaults = ImageDefaults::from_source(MANIFEST).unwrap();
        assert_eq!(
            defaults.lookup("http-back-ctnr", "http-back-ctnr"),
            Some("ghcr.io/image-registry/magpie:latest")
        );
    }

    #[test]
    fn test_literal_images_and_non_string_params_are_ignored() {
        let defaults = ImageDefaults::from_source(MANIFEST).unwrap();
        assert_eq!(defaults.lookup("frontend", "frontend"), None);
        assert_eq!(defaults.lookup("other", "other"), None);
    }

    #[test]
    fn test_apply_fills_missing_container_images() {
        let defaults = ImageDefaults::from_source(MANIFEST).unwrap();
        let mut app = ParsedApp::new();
        app.resources.push(ResourceRecord::new(
            "http-back-ctnr",
            "Applications.Core/containers@2023-10-01-preview",
        ));
        app.resources.push(
            ResourceRecord::new("frontend", "Applications.Core/containers@2023-10-01-preview")
                .with_image(Some("nginx:alpine".to_owned())),
        );

        assert_eq!(defaults.apply(&mut app), 1);
        assert_eq!(
            app.resources[0].image.as_deref(),
            Some("ghcr.io/image-registry/magpie:latest")
        );
        assert_eq!(app.resources[1].image.as_deref(), Some("nginx:alpine"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ImageDefaults::load(Path::new("/nonexistent/app.bicep")).unwrap_err();
        assert!(matches!(err, BicepError::Io { .. }));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.bicep");
        std::fs::write(&path, MANIFEST).unwrap();

        let defaults = ImageDefaults::load(&path).unwrap();
        assert!(!defaults.is_empty());
    }
}
