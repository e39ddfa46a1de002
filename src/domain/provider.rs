//! Provider-side metadata: the integration manifest and per-object field catalogs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field exposed by the connected provider for one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderField {
    pub field_name: String,
    pub display_name: String,
    #[serde(default)]
    pub read_only: bool,
}

/// Metadata shape as published by the platform, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

/// Field catalog for the currently selected provider object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCatalog {
    fields: BTreeMap<String, ProviderField>,
}

impl FieldCatalog {
    pub fn new(fields: impl IntoIterator<Item = ProviderField>) -> Self {
        Self { fields: fields.into_iter().map(|f| (f.field_name.clone(), f)).collect() }
    }

    /// Build from the `fieldName -> { displayName, readOnly }` map.
    pub fn from_metadata(metadata: BTreeMap<String, FieldMetadata>) -> Self {
        Self::new(metadata.into_iter().map(|(name, meta)| ProviderField {
            display_name: meta.display_name.unwrap_or_else(|| name.clone()),
            field_name: name,
            read_only: meta.read_only,
        }))
    }

    pub fn get(&self, field_name: &str) -> Option<&ProviderField> {
        self.fields.get(field_name)
    }

    /// `Some(true)` only for fields the provider marks read-only.
    pub fn is_read_only(&self, field_name: &str) -> Option<bool> {
        self.get(field_name).map(|f| f.read_only)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Field the integration always reads, regardless of user mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredField {
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub map_to_name: Option<String>,
}

/// Object declared in the read section of the integration manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationObject {
    pub object_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub required_fields: Vec<RequiredField>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRead {
    #[serde(default)]
    pub objects: Vec<IntegrationObject>,
}

/// Integration manifest (the published revision content).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub provider: String,
    #[serde(default)]
    pub read: ManifestRead,
}

impl Manifest {
    pub fn object(&self, object_name: &str) -> Option<&IntegrationObject> {
        self.read.objects.iter().find(|o| o.object_name == object_name)
    }

    /// First read object, the default selection.
    pub fn first_object(&self) -> Option<&IntegrationObject> {
        self.read.objects.first()
    }
}
