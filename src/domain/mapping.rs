//! Mapping rows and the dynamic field catalog they are derived from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Entry in the internal, fixed schema that users map from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicField {
    pub label: String,
    pub key: String,
}

impl DynamicField {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self { label: label.into(), key: key.into() }
    }
}

/// The billing address catalog shipped with the demo integration.
pub fn default_dynamic_fields() -> Vec<DynamicField> {
    vec![
        DynamicField::new("Billing Country", "billingCountry"),
        DynamicField::new("Billing State/Province", "billingState"),
        DynamicField::new("Billing Zip/Postal Code", "billingZip"),
    ]
}

/// Read-only vs read-and-write classification of a mapped field pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappingDirection {
    #[default]
    Read,
    ReadAndWrite,
}

impl MappingDirection {
    /// Arrow used in table output.
    pub fn arrow(&self) -> &'static str {
        match self {
            MappingDirection::Read => "<-",
            MappingDirection::ReadAndWrite => "<->",
        }
    }
}

/// How writes to the provider field behave on create and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpdateMode {
    /// Write only when the provider record is created.
    #[serde(rename = "Auto-fill")]
    AutoFill,
    /// Write whenever the provider record is updated.
    Overwrite,
    /// Never write.
    #[default]
    Skip,
}

impl UpdateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateMode::AutoFill => "Auto-fill",
            UpdateMode::Overwrite => "Overwrite",
            UpdateMode::Skip => "Skip",
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto-fill" | "autofill" => Ok(UpdateMode::AutoFill),
            "overwrite" => Ok(UpdateMode::Overwrite),
            "skip" => Ok(UpdateMode::Skip),
            _ => Err(AppError::ParseError {
                what: "update mode".into(),
                details: format!("'{}' is not one of Auto-fill, Overwrite, Skip", s),
            }),
        }
    }
}

/// Local, editable unit of mapping state.
///
/// `direction` is derived from the bound provider field and is only ever
/// recomputed by the reconciler, never set by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRow {
    pub id: String,
    pub dynamic_field: String,
    pub salesforce_field: String,
    pub direction: MappingDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub update_mode: UpdateMode,
}

impl MappingRow {
    /// Row for catalog position `index` with no provider binding.
    pub fn unbound(index: usize, dynamic_field: impl Into<String>) -> Self {
        Self {
            id: row_id(index),
            dynamic_field: dynamic_field.into(),
            salesforce_field: String::new(),
            direction: MappingDirection::Read,
            default_value: None,
            update_mode: UpdateMode::Skip,
        }
    }

    pub fn is_bound(&self) -> bool {
        !self.salesforce_field.is_empty()
    }
}

/// Row identifiers are 1-based catalog positions.
pub fn row_id(index: usize) -> String {
    (index + 1).to_string()
}
