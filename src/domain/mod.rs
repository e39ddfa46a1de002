pub mod config_content;
pub mod error;
pub mod mapping;
pub mod provider;
pub mod settings;

pub use config_content::{
    ConfigContent, DefaultValue, FieldSettings, Installation, InstallationConfig, ReadObjectConfig,
    WriteObjectConfig, WritePolicy,
};
pub use error::AppError;
pub use mapping::{
    DynamicField, MappingDirection, MappingRow, UpdateMode, default_dynamic_fields, row_id,
};
pub use provider::{FieldCatalog, FieldMetadata, IntegrationObject, Manifest, ProviderField};
pub use settings::AmpSettings;
