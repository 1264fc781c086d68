//! Field checks shared by the add and update flows. Each check short-circuits
//! on the first failure, in form order of severity: emptiness, name format,
//! email shape, then the numeric fields.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::models::{ContactDraft, Field, NewContact};

/// Letters (including the accented vowels and ñ) and whitespace only.
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-záéíóúÁÉÍÓÚñÑ\s]+$").expect("valid name regex"));

pub const MAX_AGE_DIGITS: usize = 2;
pub const MAX_NATIONAL_ID_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 10;

/// Validate a draft and convert it into typed values. The duplicate-name check
/// needs the current listing and lives in the controller.
pub fn validate_draft(draft: &ContactDraft) -> Result<NewContact, ValidationError> {
    for field in Field::ALL {
        if draft.value(field).trim().is_empty() {
            return Err(ValidationError::EmptyField(field));
        }
    }

    let name = draft.name.trim();
    if !is_valid_name(name) {
        return Err(ValidationError::InvalidName);
    }

    let email = draft.email.trim();
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    let age = parse_age(draft.age.trim()).ok_or(ValidationError::InvalidAge)?;

    let national_id = draft.national_id.trim();
    if !is_digit_string(national_id, MAX_NATIONAL_ID_DIGITS) {
        return Err(ValidationError::InvalidNationalId);
    }

    let phone = draft.phone.trim();
    if !is_digit_string(phone, MAX_PHONE_DIGITS) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(NewContact {
        name: name.to_string(),
        age,
        national_id: national_id.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    })
}

pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Deliberately permissive: an `@` and a `.` anywhere is enough.
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

fn parse_age(raw: &str) -> Option<u8> {
    if !is_digit_string(raw, MAX_AGE_DIGITS) {
        return None;
    }
    raw.parse::<u8>().ok()
}

fn is_digit_string(raw: &str, max_len: usize) -> bool {
    !raw.is_empty() && raw.len() <= max_len && raw.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ContactDraft {
        ContactDraft::new("Ana", "30", "0102030405", "ana@example.com", "0991234567")
    }

    #[test]
    fn accepts_accented_names_with_spaces() {
        assert!(is_valid_name("María José"));
        assert!(is_valid_name("Ñandú Ávila"));
        assert!(!is_valid_name("John123"));
        assert!(!is_valid_name("O'Brien"));
    }

    #[test]
    fn email_needs_at_and_dot() {
        assert!(!is_valid_email("no-at-symbol.com"));
        assert!(!is_valid_email("a@b"));
        assert!(is_valid_email("a@b.c"));
    }

    #[test]
    fn empty_check_runs_before_format_checks() {
        let mut input = draft();
        input.name = "John123".into();
        input.phone = "   ".into();

        assert_eq!(
            validate_draft(&input),
            Err(ValidationError::EmptyField(Field::Phone))
        );
    }

    #[test]
    fn trims_values_and_parses_age() {
        let mut input = draft();
        input.name = "  Ana  ".into();
        input.age = " 07 ".into();

        let contact = validate_draft(&input).unwrap();
        assert_eq!(contact.name, "Ana");
        assert_eq!(contact.age, 7);
    }

    #[test]
    fn rejects_non_numeric_or_long_digit_fields() {
        let mut input = draft();
        input.age = "100".into();
        assert_eq!(validate_draft(&input), Err(ValidationError::InvalidAge));

        let mut input = draft();
        input.national_id = "12345678901".into();
        assert_eq!(
            validate_draft(&input),
            Err(ValidationError::InvalidNationalId)
        );

        let mut input = draft();
        input.phone = "099-123".into();
        assert_eq!(validate_draft(&input), Err(ValidationError::InvalidPhone));
    }
}
