use crate::domain::{DynamicField, FieldCatalog, MappingDirection, MappingRow};

/// Plain-text table of mapping rows, one line per row.
pub fn render_rows(rows: &[MappingRow], dynamic_fields: &[DynamicField], catalog: &FieldCatalog) -> String {
    let mut lines = vec![format!(
        "{:<4} {:<26} {:<4} {:<28} {:<14} {}",
        "ID", "DYNAMIC FIELD", "", "SALESFORCE FIELD", "DEFAULT", "UPDATE"
    )];

    for row in rows {
        let label = dynamic_fields
            .iter()
            .find(|f| f.key == row.dynamic_field)
            .map(|f| f.label.as_str())
            .unwrap_or(&row.dynamic_field);
        let provider = if row.is_bound() {
            catalog
                .get(&row.salesforce_field)
                .map(|f| format!("{} ({})", f.display_name, f.field_name))
                .unwrap_or_else(|| row.salesforce_field.clone())
        } else {
            "-".to_string()
        };
        // Defaults only apply to writable rows.
        let default = match (row.direction, row.default_value.as_deref()) {
            (MappingDirection::ReadAndWrite, Some(value)) => value,
            _ => "",
        };
        lines.push(format!(
            "{:<4} {:<26} {:<4} {:<28} {:<14} {}",
            row.id,
            label,
            row.direction.arrow(),
            provider,
            default,
            row.update_mode
        ));
    }

    lines.join("\n")
}
