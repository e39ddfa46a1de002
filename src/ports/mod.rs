mod draft_config;
mod installation_client;
mod manifest_source;

pub use draft_config::{DraftConfig, FieldMapping};
pub use installation_client::InstallationClient;
pub use manifest_source::ManifestSource;
