//! fieldmap: map dynamic fields onto provider fields and manage the installation.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;

use adapters::{FileManifestSource, HttpInstallationClient, MemoryDraftConfig, MockInstallationClient};
use app::reconciler::build_config_content;
use app::{AppContext, MappingSession, apply_edits, render::render_rows};
use ports::{InstallationClient, ManifestSource};

pub use app::{RowEdit, SessionState, parse_assignment};
pub use domain::{
    AmpSettings, AppError, ConfigContent, DynamicField, Installation, MappingDirection, MappingRow,
    UpdateMode, default_dynamic_fields,
};

/// Shared inputs for commands that open a mapping session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// JSON manifest with field metadata.
    pub manifest: PathBuf,
    /// Provider object; defaults to the manifest's first read object.
    pub object: Option<String>,
    /// Optional TOML settings file; environment variables take precedence.
    pub settings: Option<PathBuf>,
    /// Use the offline client instead of the installation API.
    pub mock: bool,
}

type Session = MappingSession<MemoryDraftConfig, Box<dyn InstallationClient>>;

fn open_session(options: &SessionOptions) -> Result<Session, AppError> {
    let source = FileManifestSource::open(&options.manifest)?;
    let manifest = source.manifest()?;

    let client: Box<dyn InstallationClient> = if options.mock {
        Box::new(MockInstallationClient::new())
    } else {
        let settings = AmpSettings::load(options.settings.as_deref())?;
        tracing::debug!(?settings, "resolved settings");
        if settings.provider != manifest.provider {
            return Err(AppError::config_error(format!(
                "Manifest provider '{}' does not match configured provider '{}'",
                manifest.provider, settings.provider
            )));
        }
        Box::new(HttpInstallationClient::new(&settings)?)
    };

    let ctx = AppContext::new(MemoryDraftConfig::from_manifest(&manifest), client);
    MappingSession::open(ctx, &source, default_dynamic_fields(), options.object.as_deref())
}

// =============================================================================
// Mapping API
// =============================================================================

/// Hydrate the mapping rows from the existing installation (or an empty draft).
pub fn show(options: &SessionOptions) -> Result<Vec<MappingRow>, AppError> {
    let session = open_session(options)?;
    match session.installation() {
        Some(installation) => println!("Installation ID: {}", installation.id),
        None => println!("No installation found"),
    }
    println!(
        "{}",
        render_rows(session.rows(), session.dynamic_fields(), session.provider_fields())
    );
    Ok(session.rows().to_vec())
}

/// Apply edits and submit, creating the installation or updating the existing one.
pub fn map(options: &SessionOptions, edits: &[RowEdit]) -> Result<Installation, AppError> {
    let mut session = open_session(options)?;
    let updating = session.installation().is_some();
    apply_edits(&mut session, edits)?;

    let installation = session.submit()?;
    if updating {
        println!("✅ Updated installation {}", installation.id);
    } else {
        println!("✅ Created installation {}", installation.id);
    }
    println!(
        "{}",
        render_rows(session.rows(), session.dynamic_fields(), session.provider_fields())
    );
    Ok(installation)
}

// =============================================================================
// Offline API
// =============================================================================

/// Build the configuration that `map` would submit, without contacting the API.
///
/// With `read_only`, only the read section is built straight from the manifest.
pub fn preview(
    manifest: PathBuf,
    object: Option<String>,
    edits: &[RowEdit],
    read_only: bool,
) -> Result<ConfigContent, AppError> {
    let options = SessionOptions { manifest, object, settings: None, mock: true };
    let mut session = open_session(&options)?;
    apply_edits(&mut session, edits)?;

    if read_only {
        let object = session.selected_object().ok_or(AppError::MissingSelection)?.to_string();
        return build_config_content(session.manifest(), &object, session.rows());
    }

    let pending = session.begin_submit()?;
    Ok(pending.config)
}

// =============================================================================
// Lifecycle API
// =============================================================================

/// Delete the existing installation. Returns its id.
pub fn uninstall(options: &SessionOptions) -> Result<String, AppError> {
    let mut session = open_session(options)?;
    let id = session.installation().map(|i| i.id.clone()).ok_or(AppError::NoInstallation)?;
    session.uninstall()?;
    println!("✅ Deleted installation {}", id);
    Ok(id)
}
