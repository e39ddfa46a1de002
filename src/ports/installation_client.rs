//! Installation API port definition.

use crate::domain::{AppError, ConfigContent, Installation};

/// Port for installation lifecycle operations on the integration platform.
///
/// Every call is a single request; implementations must not retry.
pub trait InstallationClient {
    /// Existing installation for the configured group, if any.
    fn get_installation(&self) -> Result<Option<Installation>, AppError>;

    /// Create a new installation with `config`.
    fn create_installation(&self, config: &ConfigContent) -> Result<Installation, AppError>;

    /// Replace the configuration of installation `id`.
    fn update_installation(&self, id: &str, config: &ConfigContent)
    -> Result<Installation, AppError>;

    /// Delete installation `id`.
    fn delete_installation(&self, id: &str) -> Result<(), AppError>;
}

impl<T: InstallationClient + ?Sized> InstallationClient for Box<T> {
    fn get_installation(&self) -> Result<Option<Installation>, AppError> {
        (**self).get_installation()
    }

    fn create_installation(&self, config: &ConfigContent) -> Result<Installation, AppError> {
        (**self).create_installation(config)
    }

    fn update_installation(
        &self,
        id: &str,
        config: &ConfigContent,
    ) -> Result<Installation, AppError> {
        (**self).update_installation(id, config)
    }

    fn delete_installation(&self, id: &str) -> Result<(), AppError> {
        (**self).delete_installation(id)
    }
}
