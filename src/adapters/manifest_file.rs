//! Manifest source backed by a JSON document on disk.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{AppError, FieldCatalog, FieldMetadata, Manifest};
use crate::ports::ManifestSource;

/// Manifest revision plus provider field metadata, keyed by object name.
#[derive(Debug, Clone, Deserialize)]
struct ManifestDocument {
    #[serde(flatten)]
    manifest: Manifest,
    #[serde(default)]
    fields: BTreeMap<String, BTreeMap<String, FieldMetadata>>,
}

#[derive(Debug, Clone)]
pub struct FileManifestSource {
    document: ManifestDocument,
}

impl FileManifestSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let document = Self::parse_document(&contents, path)?;
        tracing::debug!(
            path = %path.display(),
            objects = document.manifest.read.objects.len(),
            "loaded manifest"
        );
        Ok(Self { document })
    }

    pub fn from_json(contents: &str) -> Result<Self, AppError> {
        let document = Self::parse_document(contents, Path::new("<inline>"))?;
        Ok(Self { document })
    }

    fn parse_document(contents: &str, path: &Path) -> Result<ManifestDocument, AppError> {
        serde_json::from_str(contents).map_err(|e| AppError::ParseError {
            what: format!("manifest {}", path.display()),
            details: e.to_string(),
        })
    }
}

impl ManifestSource for FileManifestSource {
    fn manifest(&self) -> Result<Manifest, AppError> {
        Ok(self.document.manifest.clone())
    }

    fn field_catalog(&self, object: &str) -> Result<FieldCatalog, AppError> {
        Ok(self
            .document
            .fields
            .get(object)
            .cloned()
            .map(FieldCatalog::from_metadata)
            .unwrap_or_default())
    }
}
