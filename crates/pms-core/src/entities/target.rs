use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TargetType;
use crate::path::FieldPath;
use crate::value::FieldValue;

/// Separator between hierarchy levels in display paths.
pub const PATH_SEPARATOR: &str = " > ";

fn text(value: Option<&String>) -> Option<FieldValue> {
    value.map(|s| FieldValue::Text(s.clone()))
}

fn date(value: Option<NaiveDate>) -> Option<FieldValue> {
    value.map(|d| FieldValue::Text(d.to_string()))
}

fn number(value: Option<u32>) -> Option<FieldValue> {
    value.map(FieldValue::from)
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionMonitoringMetrics {
    pub metric: Option<String>,
    pub alerts_thresholds: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationData {
    pub classification_society: Option<String>,
    pub certificate_no: Option<String>,
    pub class_notation: Option<String>,
    pub last_survey_date: Option<NaiveDate>,
    pub next_survey_date: Option<NaiveDate>,
}

/// A machinery component in the vessel hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub id: String,
    /// Hierarchical code, e.g. `601.002.001`.
    pub component_code: String,
    pub name: String,
    /// Display names of the ancestors, root first.
    #[serde(default)]
    pub path: Vec<String>,
    pub maker: Option<String>,
    pub model: Option<String>,
    pub serial_no: Option<String>,
    pub dept_category: Option<String>,
    pub equipment_category: Option<String>,
    pub location: Option<String>,
    pub commissioned_date: Option<NaiveDate>,
    #[serde(default)]
    pub critical: bool,
    #[serde(default)]
    pub class_item: bool,
    pub dimensions: Option<String>,
    pub notes: Option<String>,
    pub running_hours: Option<u32>,
    pub condition_monitoring_metrics: Option<ConditionMonitoringMetrics>,
    pub classification_data: Option<ClassificationData>,
}

impl ComponentRecord {
    fn field(&self, path: &FieldPath) -> Option<FieldValue> {
        match (path.group(), path.leaf()) {
            (None, "maker") => text(self.maker.as_ref()),
            (None, "model") => text(self.model.as_ref()),
            (None, "serialNo") => text(self.serial_no.as_ref()),
            (None, "deptCategory") => text(self.dept_category.as_ref()),
            (None, "equipmentCategory") => text(self.equipment_category.as_ref()),
            (None, "location") => text(self.location.as_ref()),
            (None, "commissionedDate") => date(self.commissioned_date),
            (None, "critical") => Some(self.critical.into()),
            (None, "classItem") => Some(self.class_item.into()),
            (None, "componentCode") => Some(self.component_code.clone().into()),
            (None, "dimensions") => text(self.dimensions.as_ref()),
            (None, "notes") => text(self.notes.as_ref()),
            (None, "runningHours") => number(self.running_hours),
            (Some("conditionMonitoringMetrics"), key) => {
                let metrics = self.condition_monitoring_metrics.as_ref()?;
                match key {
                    "metric" => text(metrics.metric.as_ref()),
                    "alertsThresholds" => text(metrics.alerts_thresholds.as_ref()),
                    _ => None,
                }
            }
            (Some("classificationData"), key) => {
                let class = self.classification_data.as_ref()?;
                match key {
                    "classificationSociety" => text(class.classification_society.as_ref()),
                    "certificateNo" => text(class.certificate_no.as_ref()),
                    "classNotation" => text(class.class_notation.as_ref()),
                    "lastSurveyDate" => date(class.last_survey_date),
                    "nextSurveyDate" => date(class.next_survey_date),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Work order
// ---------------------------------------------------------------------------

/// A planned maintenance job attached to a component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderRecord {
    pub id: String,
    pub work_order_no: String,
    /// Display path of the owning component, root first.
    #[serde(default)]
    pub component_path: Vec<String>,
    pub job_title: String,
    pub frequency_type: Option<String>,
    pub frequency_value: Option<u32>,
    pub frequency_unit: Option<String>,
    #[serde(default)]
    pub critical: bool,
    pub assigned_to: Option<String>,
    pub instructions: Option<String>,
}

impl WorkOrderRecord {
    fn field(&self, path: &FieldPath) -> Option<FieldValue> {
        if path.group().is_some() {
            return None;
        }
        match path.leaf() {
            "jobTitle" => Some(self.job_title.clone().into()),
            "frequencyType" => text(self.frequency_type.as_ref()),
            "frequencyValue" => number(self.frequency_value),
            "frequencyUnit" => text(self.frequency_unit.as_ref()),
            "critical" => Some(self.critical.into()),
            "assignedTo" => text(self.assigned_to.as_ref()),
            "instructions" => text(self.instructions.as_ref()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Spare / store
// ---------------------------------------------------------------------------

/// A spare part held against a component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpareRecord {
    pub id: String,
    pub part_code: String,
    pub part_name: String,
    #[serde(default)]
    pub component_path: Vec<String>,
    pub uom: Option<String>,
    pub min: Option<u32>,
    #[serde(default)]
    pub critical: bool,
    pub location: Option<String>,
}

/// A general store item not tied to a component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub id: String,
    pub item_code: String,
    pub item_name: String,
    pub uom: Option<String>,
    pub min: Option<u32>,
    #[serde(default)]
    pub critical: bool,
    pub location: Option<String>,
}

fn stock_field(
    path: &FieldPath,
    uom: Option<&String>,
    min: Option<u32>,
    critical: bool,
    location: Option<&String>,
) -> Option<FieldValue> {
    if path.group().is_some() {
        return None;
    }
    match path.leaf() {
        "uom" => text(uom),
        "min" => number(min),
        "critical" => Some(critical.into()),
        "location" => text(location),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// TargetRecord
// ---------------------------------------------------------------------------

/// The full target record as currently stored, tagged by target type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "targetType", rename_all = "snake_case")]
pub enum TargetRecord {
    Component(ComponentRecord),
    WorkOrder(WorkOrderRecord),
    Spare(SpareRecord),
    Store(StoreRecord),
}

impl TargetRecord {
    #[must_use]
    pub const fn target_type(&self) -> TargetType {
        match self {
            Self::Component(_) => TargetType::Component,
            Self::WorkOrder(_) => TargetType::WorkOrder,
            Self::Spare(_) => TargetType::Spare,
            Self::Store(_) => TargetType::Store,
        }
    }

    #[must_use]
    pub fn target_id(&self) -> &str {
        match self {
            Self::Component(r) => &r.id,
            Self::WorkOrder(r) => &r.id,
            Self::Spare(r) => &r.id,
            Self::Store(r) => &r.id,
        }
    }

    #[must_use]
    pub fn display_key(&self) -> &str {
        match self {
            Self::Component(r) => &r.component_code,
            Self::WorkOrder(r) => &r.work_order_no,
            Self::Spare(r) => &r.part_code,
            Self::Store(r) => &r.item_code,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Component(r) => &r.name,
            Self::WorkOrder(r) => &r.job_title,
            Self::Spare(r) => &r.part_name,
            Self::Store(r) => &r.item_name,
        }
    }

    /// Human-readable location of the record.
    ///
    /// Components include their own name after the ancestor chain; work
    /// orders and spares show the owning component; stores show their location.
    #[must_use]
    pub fn display_path(&self) -> String {
        match self {
            Self::Component(r) => r
                .path
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(r.name.as_str()))
                .collect::<Vec<_>>()
                .join(PATH_SEPARATOR),
            Self::WorkOrder(r) => r.component_path.join(PATH_SEPARATOR),
            Self::Spare(r) => r.component_path.join(PATH_SEPARATOR),
            Self::Store(r) => r.location.clone().unwrap_or_default(),
        }
    }

    /// Current value at `path`, or `None` when the record has no value there.
    #[must_use]
    pub fn field(&self, path: &FieldPath) -> Option<FieldValue> {
        match self {
            Self::Component(r) => r.field(path),
            Self::WorkOrder(r) => r.field(path),
            Self::Spare(r) => {
                stock_field(path, r.uom.as_ref(), r.min, r.critical, r.location.as_ref())
            }
            Self::Store(r) => match (path.group(), path.leaf()) {
                (None, "itemName") => Some(r.item_name.clone().into()),
                _ => stock_field(path, r.uom.as_ref(), r.min, r.critical, r.location.as_ref()),
            },
        }
    }
}

/// Destination parent for a component relocation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub code: String,
    pub name: String,
    /// Display names of the node's ancestors, root first.
    #[serde(default)]
    pub path: Vec<String>,
    /// Number of children currently under this node.
    pub child_count: u32,
}

impl HierarchyNode {
    /// Full display path of the node itself.
    #[must_use]
    pub fn display_path(&self) -> String {
        self.path
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR)
    }
}
