//! Per-target-type field dictionaries.
//!
//! `field_schema` is a total function over `TargetType`: adding a target type
//! forces a new field table here. Snapshot capture projects records through
//! these tables and the diff engine resolves labels from them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::enums::TargetType;
use crate::errors::CoreError;
use crate::path::FieldPath;
use crate::value::FieldValue;

/// How user input for a field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Bool,
    /// Calendar date, stored as `YYYY-MM-DD` text.
    Date,
}

impl FieldKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Date => "date",
        }
    }

    /// Parse raw user input into a value of this kind.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidValue` if the input does not fit the kind.
    pub fn parse_input(self, field: &str, raw: &str) -> Result<FieldValue, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        };
        match self {
            Self::Text => Ok(FieldValue::Text(raw.to_string())),
            Self::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Number)
                .ok_or_else(|| invalid("expected a number")),
            Self::Bool => parse_bool(raw)
                .map(FieldValue::Bool)
                .ok_or_else(|| invalid("expected true or false")),
            Self::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(|d| FieldValue::Text(d.to_string()))
                .map_err(|_| invalid("expected a date as YYYY-MM-DD")),
        }
    }

    /// Best-effort interpretation for fields outside the schema.
    #[must_use]
    pub fn infer(raw: &str) -> FieldValue {
        if let Some(b) = parse_bool(raw) {
            return FieldValue::Bool(b);
        }
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() && !raw.trim().is_empty() => FieldValue::Number(n),
            _ => FieldValue::Text(raw.to_string()),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

/// One editable field of a target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub group: Option<&'static str>,
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn top(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            group: None,
            key,
            label,
            kind,
        }
    }

    const fn nested(
        group: &'static str,
        key: &'static str,
        label: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            group: Some(group),
            key,
            label,
            kind,
        }
    }

    #[must_use]
    pub fn path(&self) -> FieldPath {
        match self.group {
            Some(group) => FieldPath::nested(group, self.key),
            None => FieldPath::field(self.key),
        }
    }

    #[must_use]
    pub fn matches(&self, path: &FieldPath) -> bool {
        self.key == path.leaf() && self.group == path.group()
    }
}

use FieldKind::{Bool, Date, Number, Text};

const COMPONENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::top("maker", "Maker", Text),
    FieldSpec::top("model", "Model", Text),
    FieldSpec::top("serialNo", "Serial No", Text),
    FieldSpec::top("deptCategory", "Department Category", Text),
    FieldSpec::top("equipmentCategory", "Equipment Category", Text),
    FieldSpec::top("location", "Location", Text),
    FieldSpec::top("commissionedDate", "Commissioned Date", Date),
    FieldSpec::top("critical", "Critical", Bool),
    FieldSpec::top("classItem", "Class Item", Bool),
    FieldSpec::top("componentCode", "Component Code", Text),
    FieldSpec::top("dimensions", "Dimensions", Text),
    FieldSpec::top("notes", "Notes", Text),
    FieldSpec::top("runningHours", "Running Hours", Number),
    FieldSpec::nested("conditionMonitoringMetrics", "metric", "Monitoring Metric", Text),
    FieldSpec::nested(
        "conditionMonitoringMetrics",
        "alertsThresholds",
        "Alerts / Thresholds",
        Text,
    ),
    FieldSpec::nested(
        "classificationData",
        "classificationSociety",
        "Classification Society",
        Text,
    ),
    FieldSpec::nested("classificationData", "certificateNo", "Certificate No", Text),
    FieldSpec::nested("classificationData", "classNotation", "Class Notation", Text),
    FieldSpec::nested("classificationData", "lastSurveyDate", "Last Survey Date", Date),
    FieldSpec::nested("classificationData", "nextSurveyDate", "Next Survey Date", Date),
];

const WORK_ORDER_FIELDS: &[FieldSpec] = &[
    FieldSpec::top("jobTitle", "Job Title", Text),
    FieldSpec::top("frequencyType", "Frequency Type", Text),
    FieldSpec::top("frequencyValue", "Frequency Value", Number),
    FieldSpec::top("frequencyUnit", "Frequency Unit", Text),
    FieldSpec::top("critical", "Critical", Bool),
    FieldSpec::top("assignedTo", "Assigned To", Text),
    FieldSpec::top("instructions", "Instructions", Text),
];

const SPARE_FIELDS: &[FieldSpec] = &[
    FieldSpec::top("uom", "UOM", Text),
    FieldSpec::top("min", "Minimum Stock", Number),
    FieldSpec::top("critical", "Critical", Bool),
    FieldSpec::top("location", "Location", Text),
];

const STORE_FIELDS: &[FieldSpec] = &[
    FieldSpec::top("itemName", "Item Name", Text),
    FieldSpec::top("uom", "UOM", Text),
    FieldSpec::top("min", "Minimum Stock", Number),
    FieldSpec::top("critical", "Critical", Bool),
    FieldSpec::top("location", "Location", Text),
];

/// Editable fields of a target type, in display order.
#[must_use]
pub const fn field_schema(target_type: TargetType) -> &'static [FieldSpec] {
    match target_type {
        TargetType::Component => COMPONENT_FIELDS,
        TargetType::WorkOrder => WORK_ORDER_FIELDS,
        TargetType::Spare => SPARE_FIELDS,
        TargetType::Store => STORE_FIELDS,
    }
}

/// Look up the schema entry for `path`.
#[must_use]
pub fn find_field(target_type: TargetType, path: &FieldPath) -> Option<&'static FieldSpec> {
    field_schema(target_type).iter().find(|spec| spec.matches(path))
}

/// Human-readable label for `path`.
///
/// Paths outside the schema are labelled with their full dotted form, group
/// included: `extras.paintCode` stays `extras.paintCode`, not `paintCode`.
#[must_use]
pub fn label_for(target_type: TargetType, path: &FieldPath) -> String {
    find_field(target_type, path).map_or_else(|| path.to_string(), |spec| spec.label.to_string())
}

/// Parse raw user input for `path`, using the schema kind when known.
///
/// # Errors
///
/// Returns `CoreError::InvalidValue` if the input does not fit a known field's kind.
pub fn parse_field_input(
    target_type: TargetType,
    path: &FieldPath,
    raw: &str,
) -> Result<FieldValue, CoreError> {
    match find_field(target_type, path) {
        Some(spec) => spec.kind.parse_input(&path.to_string(), raw),
        None => Ok(FieldKind::infer(raw)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_target_type_has_fields() {
        for target_type in TargetType::ALL {
            assert!(!field_schema(target_type).is_empty(), "{target_type}");
        }
    }

    #[test]
    fn leaf_keys_are_unique_per_target_type() {
        for target_type in TargetType::ALL {
            let mut seen = HashSet::new();
            for spec in field_schema(target_type) {
                assert!(seen.insert(spec.key), "duplicate leaf {} in {target_type}", spec.key);
            }
        }
    }

    #[test]
    fn item_name_is_store_only() {
        let path = FieldPath::field("itemName");
        assert!(find_field(TargetType::Store, &path).is_some());
        assert!(find_field(TargetType::Spare, &path).is_none());
    }

    #[test]
    fn labels_resolve_nested_and_fallback() {
        assert_eq!(label_for(TargetType::Component, &FieldPath::field("maker")), "Maker");
        assert_eq!(
            label_for(
                TargetType::Component,
                &FieldPath::nested("classificationData", "certificateNo")
            ),
            "Certificate No"
        );
        assert_eq!(
            label_for(TargetType::Component, &FieldPath::field("certificateNo")),
            "certificateNo"
        );
        assert_eq!(
            label_for(TargetType::WorkOrder, &FieldPath::field("paintColour")),
            "paintColour"
        );
        assert_eq!(
            label_for(TargetType::Component, &FieldPath::nested("extras", "paintCode")),
            "extras.paintCode"
        );
    }

    #[test]
    fn parses_input_by_kind() {
        let hours = parse_field_input(
            TargetType::Component,
            &FieldPath::field("runningHours"),
            " 12500 ",
        )
        .unwrap();
        assert_eq!(hours, FieldValue::Number(12500.0));

        let critical =
            parse_field_input(TargetType::Spare, &FieldPath::field("critical"), "yes").unwrap();
        assert_eq!(critical, FieldValue::Bool(true));

        let date = parse_field_input(
            TargetType::Component,
            &FieldPath::field("commissionedDate"),
            "2019-03-01",
        )
        .unwrap();
        assert_eq!(date, FieldValue::Text("2019-03-01".into()));

        let err = parse_field_input(TargetType::Spare, &FieldPath::field("min"), "lots")
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidValue { field, .. } if field == "min"));
    }

    #[test]
    fn infers_unknown_fields() {
        assert_eq!(FieldKind::infer("false"), FieldValue::Bool(false));
        assert_eq!(FieldKind::infer("7"), FieldValue::Number(7.0));
        assert_eq!(FieldKind::infer(""), FieldValue::Text(String::new()));
        assert_eq!(FieldKind::infer("Wartsila"), FieldValue::Text("Wartsila".into()));
    }

    #[test]
    fn text_fields_keep_numeric_looking_input() {
        let value =
            parse_field_input(TargetType::Component, &FieldPath::field("serialNo"), "0042")
                .unwrap();
        assert_eq!(value, FieldValue::Text("0042".into()));
    }
}
