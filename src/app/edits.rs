//! Row edits addressed by dynamic field key, as given on the command line.

use crate::app::MappingSession;
use crate::domain::{AppError, UpdateMode};
use crate::ports::{DraftConfig, InstallationClient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEdit {
    /// Bind a provider field; an empty field name clears the binding.
    Bind { dynamic_field: String, field_name: String },
    Default { dynamic_field: String, value: String },
    Mode { dynamic_field: String, mode: UpdateMode },
}

impl RowEdit {
    pub fn dynamic_field(&self) -> &str {
        match self {
            RowEdit::Bind { dynamic_field, .. }
            | RowEdit::Default { dynamic_field, .. }
            | RowEdit::Mode { dynamic_field, .. } => dynamic_field,
        }
    }

    // Bindings first so direction is known before defaults and modes land.
    fn order(&self) -> u8 {
        match self {
            RowEdit::Bind { .. } => 0,
            RowEdit::Default { .. } => 1,
            RowEdit::Mode { .. } => 2,
        }
    }
}

/// Split `key=value`. The value may be empty, the key may not.
pub fn parse_assignment(raw: &str) -> Result<(String, String), AppError> {
    let (key, value) = raw.split_once('=').ok_or_else(|| AppError::ParseError {
        what: "assignment".into(),
        details: format!("'{}' is not in key=value form", raw),
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::ParseError {
            what: "assignment".into(),
            details: format!("'{}' has an empty key", raw),
        });
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Apply edits to a session, resolving dynamic field keys to row ids.
pub fn apply_edits<C: DraftConfig, I: InstallationClient>(
    session: &mut MappingSession<C, I>,
    edits: &[RowEdit],
) -> Result<(), AppError> {
    let mut ordered: Vec<&RowEdit> = edits.iter().collect();
    ordered.sort_by_key(|edit| edit.order());

    for edit in ordered {
        let row_id = session
            .row_for(edit.dynamic_field())
            .map(|row| row.id.clone())
            .ok_or_else(|| AppError::RowNotFound(edit.dynamic_field().to_string()))?;

        match edit {
            RowEdit::Bind { field_name, .. } => session.select_provider_field(&row_id, field_name)?,
            RowEdit::Default { value, .. } => {
                let value = if value.is_empty() { None } else { Some(value.clone()) };
                session.set_default_value(&row_id, value)?
            }
            RowEdit::Mode { mode, .. } => session.set_update_mode(&row_id, *mode)?,
        }
    }
    Ok(())
}
