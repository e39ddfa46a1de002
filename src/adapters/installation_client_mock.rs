use std::sync::Mutex;

use crate::domain::{AppError, ConfigContent, Installation, InstallationConfig};
use crate::ports::InstallationClient;

/// Offline client for dry runs without API calls.
///
/// Keeps at most one installation in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MockInstallationClient {
    installation: Mutex<Option<Installation>>,
}

impl MockInstallationClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, installation: Option<Installation>) -> Result<(), AppError> {
        let mut slot = self
            .installation
            .lock()
            .map_err(|_| AppError::config_error("mock installation store poisoned"))?;
        *slot = installation;
        Ok(())
    }

    fn current(&self) -> Result<Option<Installation>, AppError> {
        self.installation
            .lock()
            .map(|slot| slot.clone())
            .map_err(|_| AppError::config_error("mock installation store poisoned"))
    }
}

impl InstallationClient for MockInstallationClient {
    fn get_installation(&self) -> Result<Option<Installation>, AppError> {
        self.current()
    }

    fn create_installation(&self, config: &ConfigContent) -> Result<Installation, AppError> {
        let now = chrono::Utc::now();
        let installation = Installation {
            id: format!("mock-{}", now.timestamp()),
            group_ref: None,
            consumer_ref: None,
            create_time: Some(now.to_rfc3339()),
            config: InstallationConfig { revision_id: None, content: config.clone() },
        };
        tracing::info!(id = %installation.id, "mock: would create installation");
        self.store(Some(installation.clone()))?;
        Ok(installation)
    }

    fn update_installation(
        &self,
        id: &str,
        config: &ConfigContent,
    ) -> Result<Installation, AppError> {
        let mut installation = self
            .current()?
            .filter(|existing| existing.id == id)
            .ok_or(AppError::NoInstallation)?;
        installation.config.content = config.clone();
        tracing::info!(id, "mock: would update installation");
        self.store(Some(installation.clone()))?;
        Ok(installation)
    }

    fn delete_installation(&self, id: &str) -> Result<(), AppError> {
        if self.current()?.is_none_or(|existing| existing.id != id) {
            return Err(AppError::NoInstallation);
        }
        tracing::info!(id, "mock: would delete installation");
        self.store(None)
    }
}
