use crate::validation::{check_text, looks_like_email, ValidationErrors};

use super::domain::{FilterCriteria, MessageDraft, NotaryDraft, Registration};

pub const MAX_FILTERS_PER_USER: usize = 4;
pub const MAX_MESSAGE_LEN: usize = 600;

/// Lower-case the domain part; the local part is kept as typed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

pub(crate) fn check_name(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    check_text(errors, field, value, 150);
    if !value.trim().is_empty() && value.trim().chars().count() < 2 {
        errors.add(field, "Ensure this field has at least 2 characters.");
    }
}

pub(crate) fn check_email(errors: &mut ValidationErrors, value: &str) {
    errors.check(
        looks_like_email(value),
        "email",
        "Enter a valid email address.",
    );
}

pub fn validate_registration(registration: &Registration) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_email(&mut errors, &registration.email);
    check_name(&mut errors, "first_name", &registration.first_name);
    check_name(&mut errors, "last_name", &registration.last_name);
    errors
}

pub fn validate_filter(criteria: &FilterCriteria) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    crate::listings::validation::check_rooms(&mut errors, criteria.rooms);
    if criteria.area_start >= criteria.area_end {
        errors.add("error_area", "area_start >= area_end");
    }
    if criteria.price_start >= criteria.price_end {
        errors.add("error_price", "price_start >= price_end");
    }
    errors
}

pub fn validate_message(draft: &MessageDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "text", &draft.text, MAX_MESSAGE_LEN);
    errors
}

pub fn validate_notary(draft: &NotaryDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_name(&mut errors, "first_name", &draft.first_name);
    check_name(&mut errors, "last_name", &draft.last_name);
    check_text(&mut errors, "phone", &draft.phone, 20);
    check_email(&mut errors, &draft.email);
    errors
}
