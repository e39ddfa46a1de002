use crate::ports::{DraftConfig, InstallationClient};

/// Application context holding the collaborators a mapping session drives.
pub struct AppContext<C: DraftConfig, I: InstallationClient> {
    config: C,
    client: I,
}

impl<C: DraftConfig, I: InstallationClient> AppContext<C, I> {
    /// Create a new application context.
    pub fn new(config: C, client: I) -> Self {
        Self { config, client }
    }

    /// Get a reference to the draft configuration.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Get a mutable reference to the draft configuration.
    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }

    /// Get a reference to the installation client.
    pub fn client(&self) -> &I {
        &self.client
    }
}
