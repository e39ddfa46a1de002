//! Platform connection settings, resolved once at startup.

use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::domain::AppError;

pub const ENV_API_KEY: &str = "AMP_API_KEY";
pub const ENV_PROJECT_ID: &str = "AMP_PROJECT_ID";
pub const ENV_INTEGRATION: &str = "AMP_INTEGRATION";
pub const ENV_PROVIDER: &str = "AMP_PROVIDER";
pub const ENV_CONSUMER_REF: &str = "AMP_CONSUMER_REF";
pub const ENV_GROUP_REF: &str = "AMP_GROUP_REF";
pub const ENV_API_URL: &str = "AMP_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "AMP_TIMEOUT_SECS";

/// Resolved settings for talking to the integration platform.
#[derive(Clone, PartialEq, Eq)]
pub struct AmpSettings {
    pub api_key: String,
    pub project_id: String,
    pub integration: String,
    pub provider: String,
    pub consumer_ref: String,
    pub group_ref: String,
    pub api_url: Url,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AmpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmpSettings")
            .field("project_id", &self.project_id)
            .field("integration", &self.integration)
            .field("provider", &self.provider)
            .field("consumer_ref", &self.consumer_ref)
            .field("group_ref", &self.group_ref)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// `[amp]` table of the optional settings file. Every key may be overridden by env.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    amp: FileSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSection {
    api_key: Option<String>,
    project_id: Option<String>,
    integration: Option<String>,
    provider: Option<String>,
    consumer_ref: Option<String>,
    group_ref: Option<String>,
    api_url: Option<String>,
    timeout_secs: Option<u64>,
}

fn default_api_url() -> &'static str {
    "https://api.withampersand.com/v1"
}

fn default_provider() -> &'static str {
    "salesforce"
}

fn default_consumer_ref() -> &'static str {
    "consumer-test-1"
}

fn default_group_ref() -> &'static str {
    "group-test-1"
}

fn default_timeout() -> u64 {
    30
}

impl AmpSettings {
    /// Load from an optional TOML file, then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let contents = match path {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => None,
        };
        Self::from_sources(contents.as_deref(), |name| std::env::var(name).ok())
    }

    /// Resolve from file contents and an environment lookup.
    ///
    /// Fails on the first missing required value instead of carrying on with
    /// an empty credential.
    pub fn from_sources<F>(file: Option<&str>, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: SettingsFile = match file {
            Some(contents) => toml::from_str(contents)?,
            None => SettingsFile::default(),
        };
        let section = file.amp;

        let pick = |name: &str, from_file: Option<String>| -> Option<String> {
            env(name).filter(|v| !v.trim().is_empty()).or(from_file.filter(|v| !v.trim().is_empty()))
        };
        let required = |name: &str, from_file: Option<String>| -> Result<String, AppError> {
            pick(name, from_file).ok_or_else(|| AppError::EnvironmentVariableMissing(name.into()))
        };

        let api_key = required(ENV_API_KEY, section.api_key)?;
        let project_id = required(ENV_PROJECT_ID, section.project_id)?;
        let integration = required(ENV_INTEGRATION, section.integration)?;
        let provider =
            pick(ENV_PROVIDER, section.provider).unwrap_or_else(|| default_provider().into());
        let consumer_ref = pick(ENV_CONSUMER_REF, section.consumer_ref)
            .unwrap_or_else(|| default_consumer_ref().into());
        let group_ref =
            pick(ENV_GROUP_REF, section.group_ref).unwrap_or_else(|| default_group_ref().into());

        let raw_url =
            pick(ENV_API_URL, section.api_url).unwrap_or_else(|| default_api_url().into());
        let api_url = Url::parse(&raw_url).map_err(|e| AppError::ParseError {
            what: ENV_API_URL.into(),
            details: format!("'{}': {}", raw_url, e),
        })?;

        let timeout_secs = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| AppError::ParseError {
                what: ENV_TIMEOUT_SECS.into(),
                details: format!("'{}': {}", raw, e),
            })?,
            None => section.timeout_secs.unwrap_or_else(default_timeout),
        };
        if timeout_secs == 0 {
            return Err(AppError::config_error("timeout_secs must be greater than zero"));
        }

        Ok(Self {
            api_key,
            project_id,
            integration,
            provider,
            consumer_ref,
            group_ref,
            api_url,
            timeout_secs,
        })
    }

    /// Base URL for the integration's installation collection.
    pub fn installations_url(&self) -> Result<Url, AppError> {
        let base = self.api_url.as_str().trim_end_matches('/');
        let raw = format!(
            "{}/projects/{}/integrations/{}/installations",
            base, self.project_id, self.integration
        );
        Url::parse(&raw).map_err(|e| AppError::ParseError {
            what: "installations URL".into(),
            details: format!("'{}': {}", raw, e),
        })
    }
}
