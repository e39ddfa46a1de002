use crate::domain::{AppError, FieldCatalog, Manifest};

/// Source of the integration manifest and provider field metadata.
pub trait ManifestSource {
    fn manifest(&self) -> Result<Manifest, AppError>;

    /// Field catalog for `object`. Unknown objects yield an empty catalog.
    fn field_catalog(&self, object: &str) -> Result<FieldCatalog, AppError>;
}
