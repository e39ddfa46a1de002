pub mod installation_client_http;
pub mod installation_client_mock;
pub mod manifest_file;
pub mod memory_draft_config;

pub use installation_client_http::HttpInstallationClient;
pub use installation_client_mock::MockInstallationClient;
pub use manifest_file::FileManifestSource;
pub use memory_draft_config::MemoryDraftConfig;
