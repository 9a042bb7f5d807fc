//! Boundary input shapes for measurement payloads
//!
//! Form layers produce measurements in heterogeneous shapes: slot values as
//! numbers or numeric-looking strings (string inputs keep mobile keyboards
//! stable while typing), and custom fields as either a map keyed by stable ID
//! or an editable-list array carrying a `_key` per row.
//!
//! Rather than letting that ambiguity leak into the store, the accepted
//! shapes are modeled here as explicit serde types consumed exclusively by
//! the coercion step. The canonical persisted types in [`crate::types`] never
//! tolerate a string where a number belongs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Slot;

/// A slot value as produced by a form: already numeric, or a string still to
/// be parsed (comma accepted as decimal separator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    /// Already-numeric value
    Number(f64),
    /// Free-form text, e.g. `"15.5"`, `"15,5"` or `""`
    Text(String),
}

impl From<f64> for NumberOrText {
    fn from(n: f64) -> Self {
        NumberOrText::Number(n)
    }
}

impl From<&str> for NumberOrText {
    fn from(s: &str) -> Self {
        NumberOrText::Text(s.to_string())
    }
}

/// One fixed-slot entry as entered in a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryInput {
    /// Raw value, if the field was touched at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<NumberOrText>,
    /// Raw notes text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EntryInput {
    /// Entry with only a value.
    pub fn value(v: impl Into<NumberOrText>) -> Self {
        Self {
            value: Some(v.into()),
            notes: None,
        }
    }
}

/// One custom-field row as entered in a form.
///
/// `_key` is the UI's stable row identity; when present it becomes the
/// persisted map key, so renaming the field does not re-key it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldInput {
    /// Stable row key assigned by the UI, if any
    #[serde(default, rename = "_key", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// User-chosen field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<NumberOrText>,
    /// Raw notes text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Custom fields in either accepted representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomFieldsInput {
    /// Editable-list shape: an ordered array of rows
    List(Vec<CustomFieldInput>),
    /// Canonical map shape, keyed by stable identifier
    Map(BTreeMap<String, CustomFieldInput>),
}

/// A measurements payload in any accepted shape. Every field optional: a
/// patch mentions only what it touches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementsInput {
    /// Chest slot input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<EntryInput>,
    /// Shoulder slot input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoulder: Option<EntryInput>,
    /// Arm length slot input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arm_length: Option<EntryInput>,
    /// Collar slot input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collar: Option<EntryInput>,
    /// Shirt length slot input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shirt_length: Option<EntryInput>,
    /// Waist slot input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<EntryInput>,
    /// Hips slot input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hips: Option<EntryInput>,
    /// Trouser length slot input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trouser_length: Option<EntryInput>,
    /// Inseam slot input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inseam: Option<EntryInput>,
    /// Custom fields in either representation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<CustomFieldsInput>,
}

impl MeasurementsInput {
    /// Borrow the input for a fixed slot.
    pub fn slot(&self, slot: Slot) -> Option<&EntryInput> {
        match slot {
            Slot::Chest => self.chest.as_ref(),
            Slot::Shoulder => self.shoulder.as_ref(),
            Slot::ArmLength => self.arm_length.as_ref(),
            Slot::Collar => self.collar.as_ref(),
            Slot::ShirtLength => self.shirt_length.as_ref(),
            Slot::Waist => self.waist.as_ref(),
            Slot::Hips => self.hips.as_ref(),
            Slot::TrouserLength => self.trouser_length.as_ref(),
            Slot::Inseam => self.inseam.as_ref(),
        }
    }

    /// Set the input for a fixed slot (builder-style helper for callers and
    /// tests).
    pub fn with_slot(mut self, slot: Slot, entry: EntryInput) -> Self {
        let target = match slot {
            Slot::Chest => &mut self.chest,
            Slot::Shoulder => &mut self.shoulder,
            Slot::ArmLength => &mut self.arm_length,
            Slot::Collar => &mut self.collar,
            Slot::ShirtLength => &mut self.shirt_length,
            Slot::Waist => &mut self.waist,
            Slot::Hips => &mut self.hips,
            Slot::TrouserLength => &mut self.trouser_length,
            Slot::Inseam => &mut self.inseam,
        };
        *target = Some(entry);
        self
    }
}
