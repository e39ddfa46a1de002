use std::sync::{Arc, Mutex};

use crate::domain::{AppError, ConfigContent, Installation, InstallationConfig};
use crate::ports::InstallationClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Get,
    Create(ConfigContent),
    Update(String, ConfigContent),
    Delete(String),
}

/// Installation client double that records every call.
///
/// Clones share state, so a test can keep a handle while a session owns another.
#[derive(Clone, Default)]
pub struct FakeInstallationClient {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    pub existing: Arc<Mutex<Option<Installation>>>,
    pub fail_with: Arc<Mutex<Option<(String, u16)>>>,
}

impl FakeInstallationClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_installation(id: &str, content: ConfigContent) -> Self {
        let fake = Self::new();
        *fake.existing.lock().unwrap() = Some(installation(id, content));
        fake
    }

    pub fn fail_next(&self, message: &str, status: u16) {
        *self.fail_with.lock().unwrap() = Some((message.to_string(), status));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|c| !matches!(c, RecordedCall::Get)).count()
    }

    fn record(&self, call: RecordedCall) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with.lock().unwrap().take() {
            Some((message, status)) => {
                Err(AppError::ExternalMutation { message, status: Some(status) })
            }
            None => Ok(()),
        }
    }
}

pub fn installation(id: &str, content: ConfigContent) -> Installation {
    Installation {
        id: id.to_string(),
        group_ref: Some("group-test-1".into()),
        consumer_ref: Some("consumer-test-1".into()),
        create_time: None,
        config: InstallationConfig { revision_id: None, content },
    }
}

impl InstallationClient for FakeInstallationClient {
    fn get_installation(&self) -> Result<Option<Installation>, AppError> {
        self.record(RecordedCall::Get)?;
        Ok(self.existing.lock().unwrap().clone())
    }

    fn create_installation(&self, config: &ConfigContent) -> Result<Installation, AppError> {
        self.record(RecordedCall::Create(config.clone()))?;
        let created = installation("inst-1", config.clone());
        *self.existing.lock().unwrap() = Some(created.clone());
        Ok(created)
    }

    fn update_installation(
        &self,
        id: &str,
        config: &ConfigContent,
    ) -> Result<Installation, AppError> {
        self.record(RecordedCall::Update(id.to_string(), config.clone()))?;
        let updated = installation(id, config.clone());
        *self.existing.lock().unwrap() = Some(updated.clone());
        Ok(updated)
    }

    fn delete_installation(&self, id: &str) -> Result<(), AppError> {
        self.record(RecordedCall::Delete(id.to_string()))?;
        *self.existing.lock().unwrap() = None;
        Ok(())
    }
}
