//! Validation rules for client fields and measurement values
//!
//! Applied by form layers before a record reaches the store; the store itself
//! does not re-validate (a trim producing an empty name is rejected here, not
//! in `add_client`). Rules mirror what the measurement-book UI enforces:
//! bounded string lengths, loose phone/email shape checks, and per-slot
//! plausibility ranges.

use crate::error::{Error, Result};
use crate::types::{ClientFields, Slot};

/// Maximum length of the address field.
pub const MAX_ADDRESS_LEN: usize = 200;
/// Maximum length of the notes field.
pub const MAX_NOTES_LEN: usize = 300;

/// Validate a client-creation payload.
///
/// Collects every violation rather than stopping at the first, so forms can
/// highlight all offending fields at once.
///
/// # Errors
/// Returns `Error::Validation` carrying one message per violated rule.
pub fn validate_client(fields: &ClientFields) -> Result<()> {
    let mut errors = Vec::new();

    let name = fields.name.trim();
    if name.len() < 2 || name.len() > 50 {
        errors.push("name is required and must be 2-50 characters".to_string());
    }
    if let Some(email) = fields.email.as_deref() {
        if !email.trim().is_empty() && !is_plausible_email(email.trim()) {
            errors.push("invalid email format".to_string());
        }
    }
    if let Some(phone) = fields.phone.as_deref() {
        if !phone.trim().is_empty() && !is_plausible_phone(phone.trim()) {
            errors.push("invalid phone number".to_string());
        }
    }
    if let Some(address) = fields.address.as_deref() {
        if address.len() > MAX_ADDRESS_LEN {
            errors.push(format!("address max length is {} characters", MAX_ADDRESS_LEN));
        }
    }
    if let Some(notes) = fields.notes.as_deref() {
        if notes.len() > MAX_NOTES_LEN {
            errors.push(format!("notes max length is {} characters", MAX_NOTES_LEN));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

/// Validate a single measurement value against its slot's plausibility range.
///
/// # Errors
/// Returns `Error::Validation` with a per-field message when the value falls
/// outside the slot's range.
pub fn validate_measurement(slot: Slot, value: f64) -> Result<()> {
    let (min, max) = slot_range(slot);
    if !value.is_finite() || value < min || value > max {
        return Err(Error::Validation(vec![format!(
            "value for {} must be between {} and {}",
            slot, min, max
        )]));
    }
    Ok(())
}

/// Plausible value range for a fixed slot, in inches.
pub fn slot_range(slot: Slot) -> (f64, f64) {
    match slot {
        Slot::Chest => (20.0, 60.0),
        Slot::Shoulder => (10.0, 30.0),
        Slot::ArmLength => (15.0, 40.0),
        Slot::Collar => (10.0, 25.0),
        Slot::ShirtLength => (20.0, 50.0),
        Slot::Waist => (20.0, 60.0),
        Slot::Hips => (25.0, 70.0),
        Slot::TrouserLength => (25.0, 50.0),
        Slot::Inseam => (20.0, 40.0),
    }
}

// `local@domain.tld` with no whitespace; intentionally loose, the backend
// contact actions tolerate anything the mail client does.
fn is_plausible_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = s.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let mut labels = domain.split('.');
    domain.contains('.') && labels.all(|l| !l.is_empty())
}

// Optional leading `+`, then 7-15 digits and nothing else.
fn is_plausible_phone(s: &str) -> bool {
    let digits = s.strip_prefix('+').unwrap_or(s);
    (7..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}
