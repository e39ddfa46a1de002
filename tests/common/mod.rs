//! Shared testing utilities for fieldmap tests.

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Path to the checked-in Salesforce manifest fixture.
#[allow(dead_code)]
pub fn manifest_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/salesforce_manifest.json")
}

/// Isolated environment for CLI invocations.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        Self { root: TempDir::new().expect("Failed to create temp directory for tests") }
    }

    /// Build a command for the compiled `fieldmap` binary with a clean AMP_* environment.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("fieldmap").expect("Failed to locate fieldmap binary");
        cmd.current_dir(self.root.path());
        for name in [
            "AMP_API_KEY",
            "AMP_PROJECT_ID",
            "AMP_INTEGRATION",
            "AMP_PROVIDER",
            "AMP_CONSUMER_REF",
            "AMP_GROUP_REF",
            "AMP_API_URL",
            "AMP_TIMEOUT_SECS",
        ] {
            cmd.env_remove(name);
        }
        cmd
    }

    /// CLI command wired to an installation API served at `api_url`.
    pub fn cli_against(&self, api_url: &str) -> Command {
        let mut cmd = self.cli();
        cmd.env("AMP_API_KEY", "test-key")
            .env("AMP_PROJECT_ID", "proj")
            .env("AMP_INTEGRATION", "billing-sync")
            .env("AMP_API_URL", api_url);
        cmd
    }

    /// Write a settings file into the temp dir and return its path.
    pub fn write_settings(&self, contents: &str) -> PathBuf {
        let path = self.root.path().join("fieldmap.toml");
        std::fs::write(&path, contents).expect("Failed to write settings file");
        path
    }
}
