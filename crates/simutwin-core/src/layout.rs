//! Layout boundary: turns the editor's loosely-typed canvas objects into
//! strict [`MachineSpec`]s.
//!
//! Every entry is classified as either a machine or something the engine
//! ignores (conveyors, labels, ...). Numeric fields accept JSON numbers or
//! numeric strings; anything else falls back to an explicit default instead
//! of leaking `NaN` into the simulation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SimError;
use crate::id::MachineId;

/// Processing time used when a machine entry has none, or an unusable one.
pub const DEFAULT_PROCESSING_TIME: u32 = 5;

/// The `customType` tag that marks a layout entry as a machine.
pub const MACHINE_TAG: &str = "machine";

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Canvas rectangle of a machine. Only used to place products for display.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Footprint {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    /// Centre point of the rectangle, where a held product is drawn.
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A validated machine definition.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineSpec {
    pub id: MachineId,
    pub name: String,
    /// Free text from the inspector panel. Not used by the engine.
    pub description: String,
    /// Ticks needed to finish one product. Always >= 1.
    pub processing_time: u32,
    pub footprint: Footprint,
}

/// One classified layout object.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEntry {
    Machine(MachineSpec),
    /// Any non-machine object. Carried only so callers can count it.
    Other,
}

/// Something in the layout that was repaired or skipped while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutWarning {
    /// A machine entry had no usable `id` and was skipped.
    MissingId { index: usize },
    /// A machine's processing time was absent or invalid and was defaulted.
    ProcessingTimeDefaulted { machine: MachineId, applied: u32 },
}

impl LayoutEntry {
    /// Classify a single layout object. `index` is its position in the
    /// layout and only used for warnings.
    pub fn parse(
        index: usize,
        value: &Value,
        default_processing_time: u32,
        warnings: &mut Vec<LayoutWarning>,
    ) -> LayoutEntry {
        let Some(obj) = value.as_object() else {
            return LayoutEntry::Other;
        };
        if obj.get("customType").and_then(Value::as_str) != Some(MACHINE_TAG) {
            return LayoutEntry::Other;
        }

        let Some(id) = id_field(obj) else {
            warnings.push(LayoutWarning::MissingId { index });
            return LayoutEntry::Other;
        };

        let processing_time = match processing_time_field(obj) {
            Some(ticks) => ticks,
            None => {
                warnings.push(LayoutWarning::ProcessingTimeDefaulted {
                    machine: id.clone(),
                    applied: default_processing_time,
                });
                default_processing_time
            }
        };

        LayoutEntry::Machine(MachineSpec {
            id,
            name: text_field(obj, "name"),
            description: text_field(obj, "description"),
            processing_time,
            footprint: Footprint {
                left: number_field(obj, "left").unwrap_or(0.0),
                top: number_field(obj, "top").unwrap_or(0.0),
                width: number_field(obj, "width").unwrap_or(0.0),
                height: number_field(obj, "height").unwrap_or(0.0),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// The machine entries of a layout, in the order the client sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub machines: Vec<MachineSpec>,
    pub warnings: Vec<LayoutWarning>,
    /// Number of non-machine entries that were ignored.
    pub ignored: usize,
}

impl Layout {
    /// Parse a `start-simulation` payload. The payload must be an array;
    /// its entries are classified one by one.
    pub fn from_json(value: &Value, default_processing_time: u32) -> Result<Self, SimError> {
        let entries = value.as_array().ok_or_else(|| SimError::InvalidLayout {
            detail: format!("expected an array of layout objects, got {}", type_name(value)),
        })?;
        Ok(Self::from_entries(entries, default_processing_time))
    }

    /// Classify a slice of layout objects.
    pub fn from_entries(entries: &[Value], default_processing_time: u32) -> Self {
        let mut layout = Layout::default();
        for (index, value) in entries.iter().enumerate() {
            match LayoutEntry::parse(index, value, default_processing_time, &mut layout.warnings) {
                LayoutEntry::Machine(spec) => layout.machines.push(spec),
                LayoutEntry::Other => layout.ignored += 1,
            }
        }
        layout
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

fn id_field(obj: &Map<String, Value>) -> Option<MachineId> {
    match obj.get("id")? {
        Value::String(s) if !s.is_empty() => Some(MachineId(s.clone())),
        Value::Number(n) => Some(MachineId(n.to_string())),
        _ => None,
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// A finite number, given either as a JSON number or a numeric string.
fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let n = match obj.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Positive processing time in whole ticks. Fractions round up: a machine
/// can only hand a product over on a tick boundary.
fn processing_time_field(obj: &Map<String, Value>) -> Option<u32> {
    let raw = number_field(obj, "processingTime")?;
    if raw <= 0.0 {
        return None;
    }
    Some(raw.ceil().min(u32::MAX as f64) as u32)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_one(value: Value) -> (LayoutEntry, Vec<LayoutWarning>) {
        let mut warnings = Vec::new();
        let entry = LayoutEntry::parse(0, &value, DEFAULT_PROCESSING_TIME, &mut warnings);
        (entry, warnings)
    }

    fn machine(entry: LayoutEntry) -> MachineSpec {
        match entry {
            LayoutEntry::Machine(spec) => spec,
            LayoutEntry::Other => panic!("expected a machine entry"),
        }
    }

    #[test]
    fn parses_full_machine_entry() {
        let (entry, warnings) = parse_one(json!({
            "id": "M-1",
            "customType": "machine",
            "name": "Lathe",
            "description": "cuts things",
            "left": 100, "top": 50, "width": 80, "height": 40,
            "processingTime": 3
        }));
        let spec = machine(entry);
        assert!(warnings.is_empty());
        assert_eq!(spec.id, MachineId::from("M-1"));
        assert_eq!(spec.name, "Lathe");
        assert_eq!(spec.description, "cuts things");
        assert_eq!(spec.processing_time, 3);
        assert_eq!(spec.footprint.center(), (140.0, 70.0));
    }

    #[test]
    fn non_machine_entries_are_other() {
        let (entry, warnings) = parse_one(json!({"id": "C-1", "customType": "other", "left": 0}));
        assert_eq!(entry, LayoutEntry::Other);
        assert!(warnings.is_empty());

        let (entry, _) = parse_one(json!({"id": "C-2"}));
        assert_eq!(entry, LayoutEntry::Other);

        let (entry, _) = parse_one(json!("not an object"));
        assert_eq!(entry, LayoutEntry::Other);
    }

    #[test]
    fn missing_processing_time_defaults() {
        let (entry, warnings) = parse_one(json!({"id": "M-1", "customType": "machine"}));
        assert_eq!(machine(entry).processing_time, DEFAULT_PROCESSING_TIME);
        assert_eq!(
            warnings,
            vec![LayoutWarning::ProcessingTimeDefaulted {
                machine: MachineId::from("M-1"),
                applied: DEFAULT_PROCESSING_TIME,
            }]
        );
    }

    #[test]
    fn invalid_processing_times_default() {
        for bad in [json!(0), json!(-2), json!("abc"), json!(null), json!(true)] {
            let (entry, warnings) =
                parse_one(json!({"id": "M-1", "customType": "machine", "processingTime": bad}));
            assert_eq!(machine(entry).processing_time, DEFAULT_PROCESSING_TIME, "input {bad}");
            assert_eq!(warnings.len(), 1);
        }
    }

    #[test]
    fn numeric_string_and_fraction_are_coerced() {
        let (entry, _) =
            parse_one(json!({"id": "M-1", "customType": "machine", "processingTime": " 7 "}));
        assert_eq!(machine(entry).processing_time, 7);

        let (entry, _) =
            parse_one(json!({"id": "M-1", "customType": "machine", "processingTime": 2.2}));
        assert_eq!(machine(entry).processing_time, 3);
    }

    #[test]
    fn missing_geometry_defaults_to_zero() {
        let (entry, _) = parse_one(json!({
            "id": "M-1", "customType": "machine", "processingTime": 1, "left": "oops"
        }));
        assert_eq!(machine(entry).footprint, Footprint::default());
    }

    #[test]
    fn machine_without_id_is_skipped() {
        let layout = Layout::from_entries(
            &[json!({"customType": "machine", "processingTime": 2})],
            DEFAULT_PROCESSING_TIME,
        );
        assert!(layout.is_empty());
        assert_eq!(layout.warnings, vec![LayoutWarning::MissingId { index: 0 }]);
    }

    #[test]
    fn layout_keeps_client_order_and_counts_ignored() {
        let layout = Layout::from_json(
            &json!([
                {"id": "M-2", "customType": "machine", "left": 300, "processingTime": 2},
                {"id": "C-1", "customType": "other", "left": 200},
                {"id": "M-1", "customType": "machine", "left": 100, "processingTime": 4},
            ]),
            DEFAULT_PROCESSING_TIME,
        )
        .unwrap();
        let ids: Vec<_> = layout.machines.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["M-2", "M-1"]);
        assert_eq!(layout.ignored, 1);
    }

    #[test]
    fn non_array_payload_is_rejected() {
        let err = Layout::from_json(&json!({"id": "M-1"}), DEFAULT_PROCESSING_TIME).unwrap_err();
        assert!(matches!(err, SimError::InvalidLayout { .. }));
        assert!(err.to_string().contains("an object"));
    }
}
