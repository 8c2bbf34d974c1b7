use crate::store::Tables;
use crate::validation::{check_text, ValidationErrors};

use super::domain::{AnnouncementDetails, AnnouncementDraft, Purpose};

pub const MIN_AREA: f64 = 10.0;
pub const MAX_AREA: f64 = 10_000.0;
pub const MAX_ADDRESS: usize = 250;

pub(crate) fn check_rooms(errors: &mut ValidationErrors, rooms: u8) {
    errors.check(
        (1..=10).contains(&rooms),
        "rooms",
        "Ensure this value is between 1 and 10.",
    );
}

/// Field rules shared by create and update.
pub fn validate_details(details: &AnnouncementDetails) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    check_text(&mut errors, "address", &details.address, MAX_ADDRESS);
    errors.check(
        details.area.is_finite() && (MIN_AREA..MAX_AREA).contains(&details.area),
        "area",
        format!("Ensure this value is between {MIN_AREA} and {MAX_AREA}."),
    );
    errors.check(
        details.area_kitchen.is_finite() && details.area_kitchen >= 0.0,
        "area_kitchen",
        "Ensure this value is greater than or equal to 0.",
    );
    check_rooms(&mut errors, details.rooms);

    if details.area_kitchen >= details.area {
        errors.add(
            "error_area",
            "Площадь кухни не может превышать общую площадь",
        );
    }

    errors
}

pub fn validate_draft(tables: &Tables, draft: &AnnouncementDraft) -> ValidationErrors {
    let mut errors = validate_details(&draft.details);

    match draft.residential_complex {
        None if draft.purpose == Purpose::Flat => errors.add(
            "required_residential_complex",
            "При выборе квартиры выбор ЖК обязателен",
        ),
        Some(complex) if !tables.complexes.contains_key(&complex) => {
            errors.add("residential_complex", format!("Нет ЖК с id {complex}"))
        }
        _ => {}
    }

    errors
}
