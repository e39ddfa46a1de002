mod fake_installation_client;

pub use fake_installation_client::{FakeInstallationClient, RecordedCall, installation};
