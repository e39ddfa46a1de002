//! Serializable installation configuration, as exchanged with the platform.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whether the integration writes a field on create or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicy {
    Always,
    #[default]
    Never,
}

impl WritePolicy {
    pub fn from_flag(always: bool) -> Self {
        if always { WritePolicy::Always } else { WritePolicy::Never }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, WritePolicy::Always)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

/// Write-side settings for a single provider field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(default)]
    pub write_on_create: WritePolicy,
    #[serde(default)]
    pub write_on_update: WritePolicy,
}

impl FieldSettings {
    pub fn default_string(&self) -> Option<&str> {
        self.default.as_ref().and_then(|d| d.string_value.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadObjectConfig {
    pub object_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default)]
    pub selected_fields: BTreeMap<String, bool>,
    /// Dynamic field key -> provider field name.
    #[serde(default)]
    pub selected_field_mappings: BTreeMap<String, String>,
}

impl ReadObjectConfig {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            schedule: None,
            destination: None,
            selected_fields: BTreeMap::new(),
            selected_field_mappings: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteObjectConfig {
    pub object_name: String,
    #[serde(default)]
    pub selected_field_settings: BTreeMap<String, FieldSettings>,
}

impl WriteObjectConfig {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self { object_name: object_name.into(), selected_field_settings: BTreeMap::new() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadConfig {
    #[serde(default)]
    pub objects: BTreeMap<String, ReadObjectConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteConfig {
    #[serde(default)]
    pub objects: BTreeMap<String, WriteObjectConfig>,
}

impl WriteConfig {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Full installation configuration content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigContent {
    pub provider: String,
    #[serde(default)]
    pub read: ReadConfig,
    #[serde(default, skip_serializing_if = "WriteConfig::is_empty")]
    pub write: WriteConfig,
}

impl ConfigContent {
    pub fn empty(provider: impl Into<String>) -> Self {
        Self { provider: provider.into(), ..Default::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,
    pub content: ConfigContent,
}

/// Persisted record of a configured integration instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    pub config: InstallationConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_platform_shape() {
        let mut content = ConfigContent::empty("salesforce");
        let mut read = ReadObjectConfig::new("account");
        read.selected_field_mappings.insert("billingCountry".into(), "BillingCountry".into());
        content.read.objects.insert("account".into(), read);

        let mut write = WriteObjectConfig::new("account");
        write.selected_field_settings.insert(
            "BillingCountry".into(),
            FieldSettings {
                default: Some(DefaultValue { string_value: Some("US".into()) }),
                write_on_create: WritePolicy::Never,
                write_on_update: WritePolicy::Always,
            },
        );
        content.write.objects.insert("account".into(), write);

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(
            json["read"]["objects"]["account"]["selectedFieldMappings"]["billingCountry"],
            "BillingCountry"
        );
        let settings = &json["write"]["objects"]["account"]["selectedFieldSettings"]["BillingCountry"];
        assert_eq!(settings["default"]["stringValue"], "US");
        assert_eq!(settings["writeOnUpdate"], "always");
        assert_eq!(settings["writeOnCreate"], "never");
    }

    #[test]
    fn empty_write_section_is_omitted() {
        let json = serde_json::to_value(ConfigContent::empty("salesforce")).unwrap();
        assert!(json.get("write").is_none());
    }

    #[test]
    fn missing_policies_default_to_never() {
        let settings: FieldSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.write_on_update, WritePolicy::Never);
        assert_eq!(settings.default_string(), None);
    }
}
