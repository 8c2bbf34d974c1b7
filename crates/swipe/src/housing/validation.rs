use crate::validation::{check_text, ValidationErrors};

use super::domain::{ComplexDetails, DocumentDraft, NewsDraft};

pub fn validate_details(details: &ComplexDetails) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "name", &details.name, 50);
    check_text(&mut errors, "address", &details.address, 250);
    errors.check(
        (2.0..=5.0).contains(&details.ceiling_height),
        "ceiling_height",
        "Ensure this value is between 2.0 and 5.0.",
    );
    errors.check(
        (-90.0..=90.0).contains(&details.map_lat),
        "map_lat",
        "Latitude must be between -90 and 90.",
    );
    errors.check(
        (-180.0..=180.0).contains(&details.map_lon),
        "map_lon",
        "Longitude must be between -180 and 180.",
    );
    errors
}

pub fn validate_news(draft: &NewsDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "title", &draft.title, 100);
    check_text(&mut errors, "text", &draft.text, 5000);
    errors
}

pub fn validate_document(draft: &DocumentDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "name", &draft.name, 100);
    check_text(&mut errors, "file", &draft.file, 500);
    errors
}
