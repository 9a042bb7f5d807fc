//! Measurement shape coercion
//!
//! Normalizes any accepted boundary shape into the canonical persisted
//! `MeasurementSet`. The governing policy is **absence over empty**: an entry
//! that coerces to nothing (no finite value, no non-empty notes) is omitted
//! entirely rather than stored as an empty object. That is what makes the
//! later deep-merge safe — a patch that did not touch a field literally does
//! not mention it.
//!
//! Dropping a non-coercible value is deliberate, not an error: partial or
//! invalid form input must never corrupt or block a save.

use std::collections::BTreeMap;

use stitchbook_core::{
    CustomField, CustomFieldInput, CustomFieldsInput, EntryInput, MeasurementEntry,
    MeasurementSet, MeasurementsInput, NumberOrText, Slot,
};

/// Coerce a boundary measurements payload into the canonical shape.
///
/// The result mentions only the slots and custom fields that actually
/// coerced to something non-empty; everything else is absent.
pub fn coerce_measurements(input: &MeasurementsInput) -> MeasurementSet {
    let mut out = MeasurementSet::default();

    for slot in Slot::ALL {
        if let Some(entry) = input.slot(slot).and_then(coerce_entry) {
            out.set_slot(slot, entry);
        }
    }

    match &input.custom_fields {
        Some(CustomFieldsInput::List(rows)) => {
            out.custom_fields = coerce_custom_list(rows);
        }
        Some(CustomFieldsInput::Map(map)) => {
            out.custom_fields = coerce_custom_map(map);
        }
        None => {}
    }

    out
}

/// Parse a raw value as a finite number. Commas are accepted as decimal
/// separators; anything non-finite or non-numeric is dropped.
fn coerce_number(raw: &NumberOrText) -> Option<f64> {
    match raw {
        NumberOrText::Number(n) => n.is_finite().then_some(*n),
        NumberOrText::Text(s) => {
            let s = s.trim().replace(',', ".");
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok().filter(|n| n.is_finite())
        }
    }
}

fn coerce_notes(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// Coerce one slot entry; `None` when nothing survives.
fn coerce_entry(input: &EntryInput) -> Option<MeasurementEntry> {
    let value = input.value.as_ref().and_then(coerce_number);
    let notes = coerce_notes(input.notes.as_deref());
    if value.is_none() && notes.is_none() {
        return None;
    }
    Some(MeasurementEntry { value, notes })
}

// Stable key for a list row: the UI's `_key` wins, else a slug of the name,
// else the row's position.
fn custom_key(row: &CustomFieldInput, index: usize) -> String {
    if let Some(key) = row.key.as_deref() {
        if !key.trim().is_empty() {
            return key.to_string();
        }
    }
    let slug = slugify(row.name.as_deref().unwrap_or(""));
    if slug.is_empty() {
        format!("custom_{}", index)
    } else {
        slug
    }
}

// Trimmed, lowercased, non-alphanumeric runs collapsed to '_'.
fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = true;
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

fn coerce_custom_list(rows: &[CustomFieldInput]) -> BTreeMap<String, CustomField> {
    let mut map = BTreeMap::new();
    for (index, row) in rows.iter().enumerate() {
        let name = row.name.as_deref().map(str::trim).unwrap_or("");
        let value = row.value.as_ref().and_then(coerce_number);
        let notes = coerce_notes(row.notes.as_deref());
        // A row with no name and nothing coercible is form noise, skip it
        if name.is_empty() && value.is_none() && notes.is_none() {
            continue;
        }
        map.insert(
            custom_key(row, index),
            CustomField {
                name: name.to_string(),
                value,
                notes,
            },
        );
    }
    map
}

fn coerce_custom_map(input: &BTreeMap<String, CustomFieldInput>) -> BTreeMap<String, CustomField> {
    let mut map = BTreeMap::new();
    for (key, row) in input {
        let value = row.value.as_ref().and_then(coerce_number);
        let notes = coerce_notes(row.notes.as_deref());
        // Name defaults to the map key when the stored name is blank
        let name = match row.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => key.clone(),
        };
        map.insert(key.clone(), CustomField { name, value, notes });
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_coercion() {
        assert_eq!(coerce_number(&NumberOrText::Number(15.5)), Some(15.5));
        assert_eq!(coerce_number(&NumberOrText::Number(f64::NAN)), None);
        assert_eq!(coerce_number(&NumberOrText::Number(f64::INFINITY)), None);
        assert_eq!(coerce_number(&"15.5".into()), Some(15.5));
        assert_eq!(coerce_number(&"15,5".into()), Some(15.5));
        assert_eq!(coerce_number(&" 16 ".into()), Some(16.0));
        assert_eq!(coerce_number(&"".into()), None);
        assert_eq!(coerce_number(&"abc".into()), None);
    }

    #[test]
    fn test_empty_entry_is_absent_not_empty_object() {
        let input = MeasurementsInput::default().with_slot(
            Slot::Chest,
            EntryInput {
                value: Some("".into()),
                notes: Some("".to_string()),
            },
        );
        let out = coerce_measurements(&input);
        assert!(out.slot(Slot::Chest).is_none());
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_notes_survive_without_value() {
        let input = MeasurementsInput::default().with_slot(
            Slot::Waist,
            EntryInput {
                value: Some("not a number".into()),
                notes: Some("  measured over shirt  ".to_string()),
            },
        );
        let out = coerce_measurements(&input);
        let entry = out.slot(Slot::Waist).unwrap();
        assert_eq!(entry.value, None);
        assert_eq!(entry.notes.as_deref(), Some("measured over shirt"));
    }

    #[test]
    fn test_untouched_slots_are_not_mentioned() {
        let input =
            MeasurementsInput::default().with_slot(Slot::Chest, EntryInput::value(40.0));
        let out = coerce_measurements(&input);
        assert!(out.slot(Slot::Chest).is_some());
        assert!(out.slot(Slot::Waist).is_none());
        assert!(out.custom_fields.is_empty());
    }

    #[test]
    fn test_list_key_precedence() {
        let rows = vec![
            CustomFieldInput {
                key: Some("row-1".to_string()),
                name: Some("Sleeve".to_string()),
                value: Some("10".into()),
                notes: None,
            },
            CustomFieldInput {
                key: None,
                name: Some("  Cuff Width ".to_string()),
                value: Some(4.0.into()),
                notes: None,
            },
            CustomFieldInput {
                key: None,
                name: None,
                value: Some(2.0.into()),
                notes: None,
            },
        ];
        let map = coerce_custom_list(&rows);
        assert_eq!(map["row-1"].name, "Sleeve");
        assert_eq!(map["cuff_width"].value, Some(4.0));
        assert_eq!(map["custom_2"].value, Some(2.0));
    }

    #[test]
    fn test_list_skips_rows_with_nothing() {
        let rows = vec![CustomFieldInput {
            key: None,
            name: Some("   ".to_string()),
            value: Some("".into()),
            notes: Some("  ".to_string()),
        }];
        assert!(coerce_custom_list(&rows).is_empty());
    }

    #[test]
    fn test_list_keeps_named_rows_without_value() {
        let rows = vec![CustomFieldInput {
            key: None,
            name: Some("Sleeve".to_string()),
            value: None,
            notes: None,
        }];
        let map = coerce_custom_list(&rows);
        assert_eq!(map["sleeve"].name, "Sleeve");
        assert_eq!(map["sleeve"].value, None);
    }

    #[test]
    fn test_map_name_defaults_to_key() {
        let mut input = BTreeMap::new();
        input.insert(
            "sleeve".to_string(),
            CustomFieldInput {
                key: None,
                name: Some("  ".to_string()),
                value: Some("10".into()),
                notes: None,
            },
        );
        let map = coerce_custom_map(&input);
        assert_eq!(map["sleeve"].name, "sleeve");
        assert_eq!(map["sleeve"].value, Some(10.0));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Cuff Width"), "cuff_width");
        assert_eq!(slugify("  Thigh -- Left  "), "thigh_left");
        assert_eq!(slugify("***"), "");
    }
}
