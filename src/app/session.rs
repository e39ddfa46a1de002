//! Row-editing session: local rows, the selected object, and the submit lifecycle.
//!
//! Edits are staged on the rows and only reach the draft configuration when a
//! submit commits them.

use crate::app::AppContext;
use crate::app::reconciler::{commit_rows_to_config, hydrate_from_config, on_select_provider_field};
use crate::domain::{
    AppError, ConfigContent, DynamicField, FieldCatalog, Installation, Manifest, MappingRow,
    UpdateMode,
};
use crate::ports::{DraftConfig, InstallationClient, ManifestSource};

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Rows mirror the draft configuration.
    Hydrated,
    /// Local edits are staged and not yet submitted.
    Dirty,
    /// A create or update is in flight.
    Submitting,
}

/// External mutation currently pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update(String),
}

/// Submit that has been committed locally and awaits the installation API.
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    pub mutation: Mutation,
    pub config: ConfigContent,
}

pub struct MappingSession<C: DraftConfig, I: InstallationClient> {
    ctx: AppContext<C, I>,
    manifest: Manifest,
    dynamic_fields: Vec<DynamicField>,
    selected_object: Option<String>,
    provider_fields: FieldCatalog,
    rows: Vec<MappingRow>,
    installation: Option<Installation>,
    state: SessionState,
    in_flight: Option<Mutation>,
}

impl<C: DraftConfig, I: InstallationClient> MappingSession<C, I> {
    /// Fetch the existing installation, sync the draft from it and hydrate rows.
    ///
    /// `object` defaults to the manifest's first read object.
    pub fn open<M: ManifestSource>(
        mut ctx: AppContext<C, I>,
        source: &M,
        dynamic_fields: Vec<DynamicField>,
        object: Option<&str>,
    ) -> Result<Self, AppError> {
        let manifest = source.manifest()?;
        let selected_object = match object {
            Some(name) => Some(
                manifest
                    .object(name)
                    .ok_or_else(|| AppError::ObjectNotFound(name.to_string()))?
                    .object_name
                    .clone(),
            ),
            None => manifest.first_object().map(|o| o.object_name.clone()),
        };
        let provider_fields = match &selected_object {
            Some(name) => source.field_catalog(name)?,
            None => FieldCatalog::default(),
        };

        let installation = ctx.client().get_installation()?;
        ctx.config_mut().sync(installation.as_ref().map(|i| i.config.content.clone()));
        tracing::info!(
            object = selected_object.as_deref().unwrap_or("<none>"),
            installed = installation.is_some(),
            "opened mapping session"
        );

        let mut session = Self {
            ctx,
            manifest,
            dynamic_fields,
            selected_object,
            provider_fields,
            rows: Vec::new(),
            installation,
            state: SessionState::Hydrated,
            in_flight: None,
        };
        session.rehydrate();
        Ok(session)
    }

    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selected_object(&self) -> Option<&str> {
        self.selected_object.as_deref()
    }

    pub fn provider_fields(&self) -> &FieldCatalog {
        &self.provider_fields
    }

    pub fn dynamic_fields(&self) -> &[DynamicField] {
        &self.dynamic_fields
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn installation(&self) -> Option<&Installation> {
        self.installation.as_ref()
    }

    pub fn config(&self) -> &C {
        self.ctx.config()
    }

    /// Whether any external mutation is pending. Submit controls stay disabled while true.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn rehydrate(&mut self) {
        self.rows = hydrate_from_config(
            self.selected_object.as_deref(),
            Some(self.ctx.config()),
            &self.dynamic_fields,
            &self.provider_fields,
        );
        self.state = SessionState::Hydrated;
    }

    fn ensure_idle(&self) -> Result<(), AppError> {
        if self.is_busy() { Err(AppError::MutationInFlight) } else { Ok(()) }
    }

    fn row_mut(&mut self, row_id: &str) -> Result<&mut MappingRow, AppError> {
        self.rows
            .iter_mut()
            .find(|row| row.id == row_id)
            .ok_or_else(|| AppError::RowNotFound(row_id.to_string()))
    }

    /// Find a row by dynamic field key.
    pub fn row_for(&self, dynamic_key: &str) -> Option<&MappingRow> {
        self.rows.iter().find(|row| row.dynamic_field == dynamic_key)
    }

    /// Switch the selected object. All bindings are re-derived for the new object.
    pub fn select_object(
        &mut self,
        object: &str,
        provider_fields: FieldCatalog,
    ) -> Result<&[MappingRow], AppError> {
        self.ensure_idle()?;
        if self.manifest.object(object).is_none() {
            return Err(AppError::ObjectNotFound(object.to_string()));
        }
        self.selected_object = Some(object.to_string());
        self.provider_fields = provider_fields;
        self.rehydrate();
        Ok(&self.rows)
    }

    /// Bind a provider field to a row; direction follows the field's metadata.
    pub fn select_provider_field(&mut self, row_id: &str, field_name: &str) -> Result<(), AppError> {
        self.ensure_idle()?;
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == row_id)
            .ok_or_else(|| AppError::RowNotFound(row_id.to_string()))?;
        *row = on_select_provider_field(row, field_name, &self.provider_fields);
        self.state = SessionState::Dirty;
        Ok(())
    }

    /// Set or clear the default value written for a row.
    pub fn set_default_value(&mut self, row_id: &str, value: Option<String>) -> Result<(), AppError> {
        self.ensure_idle()?;
        self.row_mut(row_id)?.default_value = value;
        self.state = SessionState::Dirty;
        Ok(())
    }

    pub fn set_update_mode(&mut self, row_id: &str, mode: UpdateMode) -> Result<(), AppError> {
        self.ensure_idle()?;
        self.row_mut(row_id)?.update_mode = mode;
        self.state = SessionState::Dirty;
        Ok(())
    }

    /// Commit rows into the draft and mark the matching mutation as in flight.
    ///
    /// Fails with `MutationInFlight` while a previous mutation is pending; no
    /// external call is made in that case.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, AppError> {
        self.ensure_idle()?;
        commit_rows_to_config(self.selected_object.as_deref(), &self.rows, self.ctx.config_mut())?;

        let mutation = match &self.installation {
            Some(existing) => Mutation::Update(existing.id.clone()),
            None => Mutation::Create,
        };
        self.in_flight = Some(mutation.clone());
        self.state = SessionState::Submitting;
        Ok(PendingSubmit { mutation, config: self.ctx.config().snapshot() })
    }

    /// Resolve a pending submit. Failure keeps the rows as edited.
    ///
    /// Fails with `NoPendingSubmit`, leaving the session untouched, unless
    /// `begin_submit` started a create or update.
    pub fn finish_submit(
        &mut self,
        outcome: Result<Installation, AppError>,
    ) -> Result<Installation, AppError> {
        if self.in_flight.take().is_none() {
            return Err(AppError::NoPendingSubmit);
        }
        match outcome {
            Ok(installation) => {
                tracing::info!(id = %installation.id, "installation saved");
                self.ctx.config_mut().sync(Some(installation.config.content.clone()));
                self.installation = Some(installation.clone());
                self.rehydrate();
                Ok(installation)
            }
            Err(err) => {
                tracing::warn!(error = %err, "installation submit failed");
                self.state = SessionState::Dirty;
                Err(err)
            }
        }
    }

    /// Commit and issue exactly one create or update, depending on whether an
    /// installation already exists.
    pub fn submit(&mut self) -> Result<Installation, AppError> {
        let pending = self.begin_submit()?;
        let outcome = match &pending.mutation {
            Mutation::Update(id) => self.ctx.client().update_installation(id, &pending.config),
            Mutation::Create => self.ctx.client().create_installation(&pending.config),
        };
        self.finish_submit(outcome)
    }

    /// Discard staged edits and uncommitted draft changes.
    pub fn reset(&mut self) -> Result<&[MappingRow], AppError> {
        self.ensure_idle()?;
        self.ctx.config_mut().reset();
        self.rehydrate();
        Ok(&self.rows)
    }

    /// Re-fetch the installation from the server, then reset to it.
    pub fn refresh(&mut self) -> Result<&[MappingRow], AppError> {
        self.ensure_idle()?;
        let installation = self.ctx.client().get_installation()?;
        self.ctx.config_mut().sync(installation.as_ref().map(|i| i.config.content.clone()));
        self.installation = installation;
        self.rehydrate();
        Ok(&self.rows)
    }

    /// Delete the existing installation and start over from an empty draft.
    pub fn uninstall(&mut self) -> Result<(), AppError> {
        self.ensure_idle()?;
        let id = self.installation.as_ref().map(|i| i.id.clone()).ok_or(AppError::NoInstallation)?;

        if let Err(err) = self.ctx.client().delete_installation(&id) {
            tracing::warn!(error = %err, id = %id, "installation delete failed");
            return Err(err);
        }

        tracing::info!(id = %id, "installation deleted");
        self.installation = None;
        self.ctx.config_mut().sync(None);
        self.rehydrate();
        Ok(())
    }
}
