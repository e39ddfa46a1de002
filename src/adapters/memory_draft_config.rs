use std::collections::BTreeMap;

use crate::domain::{
    ConfigContent, FieldSettings, IntegrationObject, Manifest, ReadObjectConfig, WriteObjectConfig,
};
use crate::ports::{DraftConfig, FieldMapping};

/// In-memory draft configuration with a synced server snapshot for reset.
#[derive(Debug, Clone)]
pub struct MemoryDraftConfig {
    provider: String,
    draft: ConfigContent,
    persisted: Option<ConfigContent>,
    // Manifest objects used to seed schedule, destination and required fields.
    objects: BTreeMap<String, IntegrationObject>,
}

impl MemoryDraftConfig {
    pub fn new(provider: impl Into<String>) -> Self {
        let provider = provider.into();
        Self {
            draft: ConfigContent::empty(provider.clone()),
            provider,
            persisted: None,
            objects: BTreeMap::new(),
        }
    }

    /// Empty draft that seeds new read objects from `manifest`.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut config = Self::new(manifest.provider.clone());
        config.objects =
            manifest.read.objects.iter().map(|o| (o.object_name.clone(), o.clone())).collect();
        config
    }

    /// Whether the draft differs from the synced state.
    pub fn has_changes(&self) -> bool {
        match &self.persisted {
            Some(persisted) => persisted != &self.draft,
            None => self.draft != ConfigContent::empty(self.provider.clone()),
        }
    }

    fn empty_content(&self) -> ConfigContent {
        ConfigContent::empty(self.provider.clone())
    }

    fn read_object_mut(&mut self, object: &str) -> &mut ReadObjectConfig {
        let seed = self.objects.get(object);
        self.draft.read.objects.entry(object.to_string()).or_insert_with(|| {
            let mut read = ReadObjectConfig::new(object);
            if let Some(seed) = seed {
                read.schedule = seed.schedule.clone();
                read.destination = seed.destination.clone();
                read.selected_fields = seed
                    .required_fields
                    .iter()
                    .filter_map(|f| f.field_name.clone())
                    .map(|name| (name, true))
                    .collect();
            }
            read
        })
    }
}

impl DraftConfig for MemoryDraftConfig {
    fn read_mapping(&self, object: &str, dynamic_key: &str) -> Option<String> {
        self.draft
            .read
            .objects
            .get(object)
            .and_then(|o| o.selected_field_mappings.get(dynamic_key))
            .filter(|name| !name.is_empty())
            .cloned()
    }

    fn set_read_mapping(&mut self, object: &str, mapping: FieldMapping) {
        let read = self.read_object_mut(object);
        read.selected_field_mappings.insert(mapping.map_to_name, mapping.field_name);
    }

    fn clear_read_mapping(&mut self, object: &str, dynamic_key: &str) {
        if let Some(read) = self.draft.read.objects.get_mut(object) {
            read.selected_field_mappings.remove(dynamic_key);
        }
    }

    fn write_settings(&self, object: &str, field_name: &str) -> Option<FieldSettings> {
        self.draft
            .write
            .objects
            .get(object)
            .and_then(|o| o.selected_field_settings.get(field_name))
            .cloned()
    }

    fn set_write_settings(&mut self, object: &str, field_name: &str, settings: FieldSettings) {
        self.draft
            .write
            .objects
            .entry(object.to_string())
            .or_insert_with(|| WriteObjectConfig::new(object))
            .selected_field_settings
            .insert(field_name.to_string(), settings);
    }

    fn clear_write_settings(&mut self, object: &str, field_name: &str) {
        if let Some(write) = self.draft.write.objects.get_mut(object) {
            write.selected_field_settings.remove(field_name);
        }
    }

    fn enable_write(&mut self, object: &str) {
        self.draft
            .write
            .objects
            .entry(object.to_string())
            .or_insert_with(|| WriteObjectConfig::new(object));
    }

    fn write_target(&self, object: &str) -> Option<String> {
        self.draft.write.objects.get(object).map(|o| o.object_name.clone())
    }

    fn snapshot(&self) -> ConfigContent {
        self.draft.clone()
    }

    fn reset(&mut self) {
        self.draft = self.persisted.clone().unwrap_or_else(|| self.empty_content());
    }

    fn sync(&mut self, persisted: Option<ConfigContent>) {
        self.draft = persisted.clone().unwrap_or_else(|| self.empty_content());
        self.persisted = persisted;
    }
}
