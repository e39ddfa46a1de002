//! Installation API client implementation using reqwest.

use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::{AmpSettings, AppError, ConfigContent, Installation};
use crate::ports::InstallationClient;

const X_API_KEY: &str = "X-Api-Key";
const DEFAULT_STATUS_MESSAGE: &str = "Installation API request failed";
const CONFIG_CONTENT_MASK: &str = "config.content";

/// HTTP transport for the installation API.
///
/// One request per call. Failures are surfaced as `ExternalMutation` and never retried.
#[derive(Clone)]
pub struct HttpInstallationClient {
    api_key: String,
    installations_url: Url,
    group_ref: String,
    consumer_ref: String,
    client: Client,
}

impl std::fmt::Debug for HttpInstallationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpInstallationClient")
            .field("installations_url", &self.installations_url)
            .field("group_ref", &self.group_ref)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpInstallationClient {
    pub fn new(settings: &AmpSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::ExternalMutation {
                message: format!("Failed to create HTTP client: {}", e),
                status: None,
            })?;

        Ok(Self {
            api_key: settings.api_key.clone(),
            installations_url: settings.installations_url()?,
            group_ref: settings.group_ref.clone(),
            consumer_ref: settings.consumer_ref.clone(),
            client,
        })
    }

    fn installation_url(&self, id: &str) -> Result<Url, AppError> {
        let raw = format!("{}/{}", self.installations_url.as_str().trim_end_matches('/'), id);
        Url::parse(&raw).map_err(|e| AppError::ParseError {
            what: "installation URL".into(),
            details: format!("'{}': {}", raw, e),
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(X_API_KEY, &self.api_key)
            .header(ACCEPT, "application/json")
    }

    fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<R, AppError> {
        let request =
            self.request(method, url).header(CONTENT_TYPE, "application/json").json(body);
        let text = self.execute(request)?;
        parse_body(&text)
    }

    fn execute(&self, request: RequestBuilder) -> Result<String, AppError> {
        let response = request.send().map_err(|e| AppError::ExternalMutation {
            message: format!("HTTP request failed: {}", e),
            status: None,
        })?;

        let status = response.status();
        let body_text = response.text().unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "installation API responded");

        if status.is_success() {
            return Ok(body_text);
        }

        let message = extract_error_message(&body_text).unwrap_or_else(|| {
            if !body_text.trim().is_empty() {
                body_text.clone()
            } else if status.as_u16() == 429 {
                "Rate limited".to_string()
            } else if status.is_server_error() {
                "Server error".to_string()
            } else {
                DEFAULT_STATUS_MESSAGE.to_string()
            }
        });

        Err(AppError::ExternalMutation { message, status: Some(status.as_u16()) })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequest<'a> {
    group_ref: &'a str,
    consumer_ref: &'a str,
    config: ConfigPayload<'a>,
}

#[derive(Debug, Serialize)]
struct ConfigPayload<'a> {
    content: &'a ConfigContent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    update_mask: [&'static str; 1],
    installation: UpdateInstallation<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateInstallation<'a> {
    config: ConfigPayload<'a>,
}

fn parse_body<R: DeserializeOwned>(text: &str) -> Result<R, AppError> {
    serde_json::from_str(text).map_err(|e| AppError::ExternalMutation {
        message: format!("Failed to parse response: {}", e),
        status: None,
    })
}

fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;

    if let Some(msg) = parsed
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
    {
        return Some(msg.to_string());
    }

    ["detail", "message"]
        .iter()
        .find_map(|key| parsed.get(*key).and_then(|value| value.as_str()))
        .map(ToOwned::to_owned)
}

impl InstallationClient for HttpInstallationClient {
    fn get_installation(&self) -> Result<Option<Installation>, AppError> {
        let mut url = self.installations_url.clone();
        url.query_pairs_mut().append_pair("groupRef", &self.group_ref);

        let text = self.execute(self.request(Method::GET, url))?;
        let installations: Vec<Installation> = parse_body(&text)?;
        Ok(installations.into_iter().next())
    }

    fn create_installation(&self, config: &ConfigContent) -> Result<Installation, AppError> {
        let body = CreateRequest {
            group_ref: &self.group_ref,
            consumer_ref: &self.consumer_ref,
            config: ConfigPayload { content: config },
        };
        self.send_json(Method::POST, self.installations_url.clone(), &body)
    }

    fn update_installation(
        &self,
        id: &str,
        config: &ConfigContent,
    ) -> Result<Installation, AppError> {
        let body = UpdateRequest {
            update_mask: [CONFIG_CONTENT_MASK],
            installation: UpdateInstallation { config: ConfigPayload { content: config } },
        };
        self.send_json(Method::PATCH, self.installation_url(id)?, &body)
    }

    fn delete_installation(&self, id: &str) -> Result<(), AppError> {
        self.execute(self.request(Method::DELETE, self.installation_url(id)?))?;
        Ok(())
    }
}
