//! Conversion between the draft configuration and local mapping rows.
//!
//! `hydrate_from_config` pulls rows out of a draft; `commit_rows_to_config`
//! pushes them back. Committing and then hydrating reproduces the rows.

use std::collections::BTreeMap;

use crate::domain::{
    AppError, ConfigContent, DefaultValue, DynamicField, FieldCatalog, FieldSettings, Manifest,
    MappingDirection, MappingRow, ReadObjectConfig, UpdateMode, WritePolicy, row_id,
};
use crate::ports::{DraftConfig, FieldMapping};

/// Derive one row per dynamic field, in catalog order, from `config`.
///
/// Returns an empty list when no object is selected. Without a config every
/// row is unbound.
pub fn hydrate_from_config<C: DraftConfig + ?Sized>(
    selected_object: Option<&str>,
    config: Option<&C>,
    dynamic_fields: &[DynamicField],
    provider_fields: &FieldCatalog,
) -> Vec<MappingRow> {
    let Some(object) = selected_object else {
        return Vec::new();
    };

    dynamic_fields
        .iter()
        .enumerate()
        .map(|(index, field)| match config {
            Some(config) => hydrate_row(index, field, object, config, provider_fields),
            None => MappingRow::unbound(index, field.key.clone()),
        })
        .collect()
}

fn hydrate_row<C: DraftConfig + ?Sized>(
    index: usize,
    field: &DynamicField,
    object: &str,
    config: &C,
    provider_fields: &FieldCatalog,
) -> MappingRow {
    let salesforce_field = config.read_mapping(object, &field.key).unwrap_or_default();
    if salesforce_field.is_empty() {
        return MappingRow::unbound(index, field.key.clone());
    }

    let settings = config.write_settings(object, &salesforce_field).unwrap_or_default();
    let writable = config.is_write_enabled(object)
        && provider_fields.is_read_only(&salesforce_field) != Some(true);

    MappingRow {
        id: row_id(index),
        dynamic_field: field.key.clone(),
        direction: if writable { MappingDirection::ReadAndWrite } else { MappingDirection::Read },
        default_value: settings.default_string().map(ToOwned::to_owned),
        update_mode: update_mode_from_settings(&settings),
        salesforce_field,
    }
}

/// `Overwrite` wins over `Auto-fill` when both policies are set.
pub fn update_mode_from_settings(settings: &FieldSettings) -> UpdateMode {
    if settings.write_on_update.is_always() {
        UpdateMode::Overwrite
    } else if settings.write_on_create.is_always() {
        UpdateMode::AutoFill
    } else {
        UpdateMode::Skip
    }
}

/// Field settings a row commits for its provider field.
pub fn settings_for_row(row: &MappingRow) -> FieldSettings {
    FieldSettings {
        default: row
            .default_value
            .as_ref()
            .map(|value| DefaultValue { string_value: Some(value.clone()) }),
        write_on_update: WritePolicy::from_flag(row.update_mode == UpdateMode::Overwrite),
        write_on_create: WritePolicy::from_flag(row.update_mode == UpdateMode::AutoFill),
    }
}

/// Bind `new_field_name` to `row` and recompute its direction.
///
/// Fields missing from the catalog are treated as writable. An empty name
/// clears the binding and the row falls back to `read`.
pub fn on_select_provider_field(
    row: &MappingRow,
    new_field_name: &str,
    provider_fields: &FieldCatalog,
) -> MappingRow {
    let read_only =
        new_field_name.is_empty() || provider_fields.is_read_only(new_field_name) == Some(true);
    MappingRow {
        salesforce_field: new_field_name.to_string(),
        direction: if read_only { MappingDirection::Read } else { MappingDirection::ReadAndWrite },
        ..row.clone()
    }
}

/// Reject row lists that bind the same provider field more than once.
pub fn validate_unique_bindings(rows: &[MappingRow]) -> Result<(), AppError> {
    let mut seen: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.is_bound()) {
        seen.entry(row.salesforce_field.as_str()).or_default().push(row.id.clone());
    }

    match seen.into_iter().find(|(_, ids)| ids.len() > 1) {
        Some((field, rows)) => Err(AppError::DuplicateBinding { field: field.to_string(), rows }),
        None => Ok(()),
    }
}

/// Write every row into `config` for `selected_object`.
///
/// Validation happens before the first mutation, so on error the draft is
/// untouched. Write is enabled on the object for every bound row, whatever
/// the row's direction. Write settings of provider fields that a row bound
/// before this commit and no row binds after it are removed.
pub fn commit_rows_to_config<C: DraftConfig + ?Sized>(
    selected_object: Option<&str>,
    rows: &[MappingRow],
    config: &mut C,
) -> Result<(), AppError> {
    let object = selected_object.ok_or(AppError::MissingSelection)?;
    validate_unique_bindings(rows)?;

    let previously_bound: Vec<String> =
        rows.iter().filter_map(|row| config.read_mapping(object, &row.dynamic_field)).collect();

    for row in rows {
        if !row.is_bound() {
            config.clear_read_mapping(object, &row.dynamic_field);
            continue;
        }

        config.set_read_mapping(
            object,
            FieldMapping {
                field_name: row.salesforce_field.clone(),
                map_to_name: row.dynamic_field.clone(),
            },
        );
        // TODO: gate on row.direction once read-only rows should stop enabling writes.
        config.enable_write(object);
        config.set_write_settings(object, &row.salesforce_field, settings_for_row(row));
    }

    for field in previously_bound {
        if !rows.iter().any(|row| row.is_bound() && row.salesforce_field == field) {
            config.clear_write_settings(object, &field);
        }
    }

    tracing::debug!(object, rows = rows.len(), "committed mapping rows to draft");
    Ok(())
}

/// Build a standalone read configuration from the manifest, without a draft.
///
/// Required fields are always selected; bound rows become field mappings.
pub fn build_config_content(
    manifest: &Manifest,
    selected_object: &str,
    rows: &[MappingRow],
) -> Result<ConfigContent, AppError> {
    let object = manifest
        .object(selected_object)
        .ok_or_else(|| AppError::ObjectNotFound(selected_object.to_string()))?;

    let mut read = ReadObjectConfig::new(object.object_name.clone());
    read.schedule = object.schedule.clone();
    read.destination = object.destination.clone();
    read.selected_fields = object
        .required_fields
        .iter()
        .filter_map(|field| field.field_name.clone())
        .map(|name| (name, true))
        .collect();
    read.selected_field_mappings = rows
        .iter()
        .filter(|row| row.is_bound())
        .map(|row| (row.dynamic_field.clone(), row.salesforce_field.clone()))
        .collect();

    let mut content = ConfigContent::empty(manifest.provider.clone());
    content.read.objects.insert(object.object_name.clone(), read);
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryDraftConfig;
    use crate::domain::provider::{ManifestRead, RequiredField};
    use crate::domain::{IntegrationObject, ProviderField, default_dynamic_fields};

    const ACCOUNT: &str = "account";

    fn catalog() -> FieldCatalog {
        FieldCatalog::new([
            ProviderField {
                field_name: "BillingCountry".into(),
                display_name: "Billing Country".into(),
                read_only: false,
            },
            ProviderField {
                field_name: "BillingState".into(),
                display_name: "Billing State".into(),
                read_only: false,
            },
            ProviderField {
                field_name: "CountryCode".into(),
                display_name: "Country Code".into(),
                read_only: true,
            },
        ])
    }

    fn hydrate(config: &MemoryDraftConfig) -> Vec<MappingRow> {
        hydrate_from_config(Some(ACCOUNT), Some(config), &default_dynamic_fields(), &catalog())
    }

    #[test]
    fn empty_config_yields_unbound_read_rows() {
        let rows = hydrate(&MemoryDraftConfig::new("salesforce"));

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.dynamic_field.as_str()).collect::<Vec<_>>(),
            ["billingCountry", "billingState", "billingZip"]
        );
        assert_eq!(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), ["1", "2", "3"]);
        for row in &rows {
            assert!(row.salesforce_field.is_empty());
            assert_eq!(row.direction, MappingDirection::Read);
            assert_eq!(row.update_mode, UpdateMode::Skip);
        }
    }

    #[test]
    fn no_selection_yields_no_rows() {
        let config = MemoryDraftConfig::new("salesforce");
        let rows = hydrate_from_config(None, Some(&config), &default_dynamic_fields(), &catalog());
        assert!(rows.is_empty());
    }

    #[test]
    fn missing_config_yields_unbound_rows() {
        let rows = hydrate_from_config::<MemoryDraftConfig>(
            Some(ACCOUNT),
            None,
            &default_dynamic_fields(),
            &catalog(),
        );
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| !r.is_bound()));
    }

    #[test]
    fn selecting_read_only_field_sets_read_direction() {
        let row = MappingRow::unbound(0, "billingCountry");
        let row = on_select_provider_field(&row, "CountryCode", &catalog());
        assert_eq!(row.salesforce_field, "CountryCode");
        assert_eq!(row.direction, MappingDirection::Read);

        let row = on_select_provider_field(&row, "BillingCountry", &catalog());
        assert_eq!(row.direction, MappingDirection::ReadAndWrite);
    }

    #[test]
    fn selecting_unknown_field_defaults_to_writable() {
        let row = on_select_provider_field(&MappingRow::unbound(0, "billingZip"), "Gone__c", &catalog());
        assert_eq!(row.direction, MappingDirection::ReadAndWrite);
    }

    #[test]
    fn commit_without_selection_does_not_mutate() {
        let mut config = MemoryDraftConfig::new("salesforce");
        let rows = vec![on_select_provider_field(
            &MappingRow::unbound(0, "billingCountry"),
            "BillingCountry",
            &catalog(),
        )];

        let err = commit_rows_to_config(None, &rows, &mut config).unwrap_err();
        assert!(matches!(err, AppError::MissingSelection));
        assert_eq!(config.snapshot(), ConfigContent::empty("salesforce"));
    }

    #[test]
    fn duplicate_binding_rejected_before_mutation() {
        let mut config = MemoryDraftConfig::new("salesforce");
        let rows: Vec<_> = default_dynamic_fields()
            .iter()
            .enumerate()
            .map(|(i, f)| {
                on_select_provider_field(&MappingRow::unbound(i, f.key.clone()), "BillingCountry", &catalog())
            })
            .collect();

        let err = commit_rows_to_config(Some(ACCOUNT), &rows, &mut config).unwrap_err();
        match err {
            AppError::DuplicateBinding { field, rows } => {
                assert_eq!(field, "BillingCountry");
                assert_eq!(rows, ["1", "2", "3"]);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(config.snapshot(), ConfigContent::empty("salesforce"));
    }

    #[test]
    fn commit_translates_update_modes() {
        let mut config = MemoryDraftConfig::new("salesforce");
        let mut rows = hydrate(&config);
        rows[0] = on_select_provider_field(&rows[0], "BillingCountry", &catalog());
        rows[0].update_mode = UpdateMode::Overwrite;
        rows[0].default_value = Some("US".into());
        rows[1] = on_select_provider_field(&rows[1], "BillingState", &catalog());
        rows[1].update_mode = UpdateMode::AutoFill;

        commit_rows_to_config(Some(ACCOUNT), &rows, &mut config).unwrap();

        let country = config.write_settings(ACCOUNT, "BillingCountry").unwrap();
        assert_eq!(country.write_on_update, WritePolicy::Always);
        assert_eq!(country.write_on_create, WritePolicy::Never);
        assert_eq!(country.default_string(), Some("US"));

        let state = config.write_settings(ACCOUNT, "BillingState").unwrap();
        assert_eq!(state.write_on_update, WritePolicy::Never);
        assert_eq!(state.write_on_create, WritePolicy::Always);

        assert_eq!(config.read_mapping(ACCOUNT, "billingZip"), None);
        assert!(config.is_write_enabled(ACCOUNT));
    }

    #[test]
    fn commit_then_hydrate_round_trips() {
        let mut config = MemoryDraftConfig::new("salesforce");
        let mut rows = hydrate(&config);
        rows[0] = on_select_provider_field(&rows[0], "CountryCode", &catalog());
        rows[0].update_mode = UpdateMode::AutoFill;
        rows[2] = on_select_provider_field(&rows[2], "BillingState", &catalog());
        rows[2].update_mode = UpdateMode::Overwrite;
        rows[2].default_value = Some(String::new());

        commit_rows_to_config(Some(ACCOUNT), &rows, &mut config).unwrap();
        assert_eq!(hydrate(&config), rows);
    }

    #[test]
    fn rebinding_clears_previous_mapping() {
        let mut config = MemoryDraftConfig::new("salesforce");
        let mut rows = hydrate(&config);
        rows[0] = on_select_provider_field(&rows[0], "BillingCountry", &catalog());
        commit_rows_to_config(Some(ACCOUNT), &rows, &mut config).unwrap();

        rows[0] = on_select_provider_field(&rows[0], "", &catalog());
        assert_eq!(rows[0].direction, MappingDirection::Read);
        commit_rows_to_config(Some(ACCOUNT), &rows, &mut config).unwrap();
        assert_eq!(hydrate(&config), rows);
        assert_eq!(config.write_settings(ACCOUNT, "BillingCountry"), None);
    }

    #[test]
    fn rebinding_drops_settings_of_the_old_field() {
        let mut config = MemoryDraftConfig::new("salesforce");
        let mut rows = hydrate(&config);
        rows[0] = on_select_provider_field(&rows[0], "BillingCountry", &catalog());
        rows[0].update_mode = UpdateMode::Overwrite;
        commit_rows_to_config(Some(ACCOUNT), &rows, &mut config).unwrap();

        rows[0] = on_select_provider_field(&rows[0], "BillingState", &catalog());
        commit_rows_to_config(Some(ACCOUNT), &rows, &mut config).unwrap();

        let write = &config.snapshot().write.objects[ACCOUNT];
        assert_eq!(write.selected_field_settings.keys().collect::<Vec<_>>(), ["BillingState"]);
    }

    #[test]
    fn swapped_bindings_keep_both_settings() {
        let mut config = MemoryDraftConfig::new("salesforce");
        let mut rows = hydrate(&config);
        rows[0] = on_select_provider_field(&rows[0], "BillingCountry", &catalog());
        rows[1] = on_select_provider_field(&rows[1], "BillingState", &catalog());
        commit_rows_to_config(Some(ACCOUNT), &rows, &mut config).unwrap();

        rows[0] = on_select_provider_field(&rows[0], "BillingState", &catalog());
        rows[1] = on_select_provider_field(&rows[1], "BillingCountry", &catalog());
        commit_rows_to_config(Some(ACCOUNT), &rows, &mut config).unwrap();

        assert!(config.write_settings(ACCOUNT, "BillingCountry").is_some());
        assert!(config.write_settings(ACCOUNT, "BillingState").is_some());
        assert_eq!(hydrate(&config), rows);
    }

    #[test]
    fn write_disabled_object_hydrates_as_read() {
        let mut config = MemoryDraftConfig::new("salesforce");
        config.set_read_mapping(
            ACCOUNT,
            FieldMapping { field_name: "BillingCountry".into(), map_to_name: "billingCountry".into() },
        );
        let rows = hydrate(&config);
        assert_eq!(rows[0].salesforce_field, "BillingCountry");
        assert_eq!(rows[0].direction, MappingDirection::Read);
    }

    #[test]
    fn overwrite_takes_precedence_over_auto_fill() {
        let settings = FieldSettings {
            default: None,
            write_on_create: WritePolicy::Always,
            write_on_update: WritePolicy::Always,
        };
        assert_eq!(update_mode_from_settings(&settings), UpdateMode::Overwrite);
    }

    #[test]
    fn build_config_content_uses_manifest_object() {
        let manifest = Manifest {
            provider: "salesforce".into(),
            read: ManifestRead {
                objects: vec![IntegrationObject {
                    object_name: ACCOUNT.into(),
                    display_name: None,
                    required_fields: vec![
                        RequiredField { field_name: Some("Name".into()), map_to_name: None },
                        RequiredField { field_name: None, map_to_name: Some("owner".into()) },
                    ],
                    schedule: Some("*/30 * * * *".into()),
                    destination: Some("accountWebhook".into()),
                }],
            },
        };
        let mut rows = hydrate(&MemoryDraftConfig::new("salesforce"));
        rows[1] = on_select_provider_field(&rows[1], "BillingState", &catalog());

        let content = build_config_content(&manifest, ACCOUNT, &rows).unwrap();
        let read = &content.read.objects[ACCOUNT];
        assert_eq!(content.provider, "salesforce");
        assert_eq!(read.schedule.as_deref(), Some("*/30 * * * *"));
        assert_eq!(read.selected_fields.len(), 1);
        assert_eq!(read.selected_field_mappings.len(), 1);
        assert_eq!(read.selected_field_mappings["billingState"], "BillingState");

        let err = build_config_content(&manifest, "contact", &rows).unwrap_err();
        assert!(matches!(err, AppError::ObjectNotFound(name) if name == "contact"));
    }
}
