use pms_core::enums::TargetType;
use pms_core::schema::{FieldKind, field_schema};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::FieldsArgs;
use crate::commands::shared::parse::parse_enum;
use crate::output::table::{Column, Table, col, flex};
use crate::output::{Tabular, output};

#[derive(Debug, Serialize, PartialEq, Eq)]
struct FieldRow {
    path: String,
    label: &'static str,
    kind: FieldKind,
}

/// Handle `pms fields`.
pub fn handle(args: &FieldsArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let target_type = parse_enum::<TargetType>(&args.target_type, "target type")?;
    output(&field_rows(target_type), flags.format)
}

impl Tabular for Vec<FieldRow> {
    fn tables(&self) -> Vec<Table> {
        const COLUMNS: &[Column] = &[col("path"), flex("label"), col("kind")];
        vec![Table::new(COLUMNS).with_rows(self.iter().map(|row| {
            vec![
                row.path.as_str().into(),
                row.label.into(),
                row.kind.as_str().into(),
            ]
        }))]
    }
}

fn field_rows(target_type: TargetType) -> Vec<FieldRow> {
    field_schema(target_type)
        .iter()
        .map(|spec| FieldRow {
            path: spec.path().to_string(),
            label: spec.label,
            kind: spec.kind,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pms_core::enums::TargetType;
    use pms_core::schema::FieldKind;

    use super::{FieldRow, field_rows};
    use crate::output::Tabular;
    use crate::output::table::TableOptions;

    #[test]
    fn nested_fields_use_dotted_paths() {
        let rows = field_rows(TargetType::Component);
        assert!(rows.contains(&FieldRow {
            path: "classificationData.nextSurveyDate".into(),
            label: "Next Survey Date",
            kind: FieldKind::Date,
        }));
        assert_eq!(rows[0].path, "maker");
    }

    #[test]
    fn store_rows_start_with_item_name() {
        let rows = field_rows(TargetType::Store);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].label, "Item Name");
    }

    #[test]
    fn table_lists_path_label_and_kind() {
        let out = field_rows(TargetType::Spare).tables()[0].render(TableOptions {
            max_width: None,
            color: false,
        });
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "path      label          kind");
        assert_eq!(lines[2], "uom       UOM            text");
        assert_eq!(lines[3], "min       Minimum Stock  number");
    }
}
