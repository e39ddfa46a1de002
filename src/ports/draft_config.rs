//! Draft configuration port.
//!
//! The draft is the system of record for pending installation settings. The
//! reconciler only reads and writes it through this trait.

use crate::domain::{ConfigContent, FieldSettings};

/// Read-side binding of a provider field to a dynamic field key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Provider field name.
    pub field_name: String,
    /// Dynamic field key the provider field is delivered as.
    pub map_to_name: String,
}

/// Accessor contract every configuration backend must satisfy.
pub trait DraftConfig {
    /// Provider field bound to `dynamic_key` on the read side of `object`.
    fn read_mapping(&self, object: &str, dynamic_key: &str) -> Option<String>;

    /// Bind `mapping.field_name` to `mapping.map_to_name` on the read side of `object`.
    fn set_read_mapping(&mut self, object: &str, mapping: FieldMapping);

    /// Remove any binding for `dynamic_key` on the read side of `object`.
    fn clear_read_mapping(&mut self, object: &str, dynamic_key: &str);

    /// Write-side settings for `field_name` on `object`.
    fn write_settings(&self, object: &str, field_name: &str) -> Option<FieldSettings>;

    /// Replace write-side settings for `field_name` on `object`.
    fn set_write_settings(&mut self, object: &str, field_name: &str, settings: FieldSettings);

    /// Remove write-side settings for `field_name` on `object`.
    fn clear_write_settings(&mut self, object: &str, field_name: &str);

    /// Enable writes for `object`.
    fn enable_write(&mut self, object: &str);

    /// Object name recorded as the write target for `object`, if writes are enabled.
    fn write_target(&self, object: &str) -> Option<String>;

    /// Full draft content as it would be submitted.
    fn snapshot(&self) -> ConfigContent;

    /// Discard local changes and return to the last synced server state.
    fn reset(&mut self);

    /// Replace both the draft and the synced state with server content.
    fn sync(&mut self, persisted: Option<ConfigContent>);

    /// Whether writes are enabled with `object` as its own write target.
    fn is_write_enabled(&self, object: &str) -> bool {
        self.write_target(object).is_some_and(|target| target == object)
    }
}
