//! Derived rows kept in step with announcements.
//!
//! The listing service calls these right after it inserts or updates an announcement,
//! inside the same write transaction.

use chrono::NaiveDate;

use crate::error::ServiceError;
use crate::store::{AdvertisingId, ApartmentId, Tables};

use super::domain::{Advertising, Announcement, Apartment, PromotionOptions};

pub fn price_to_meter(price: u64, area: f64) -> u64 {
    if area <= 0.0 || !area.is_finite() {
        return 0;
    }
    (price as f64 / area).round() as u64
}

/// Inactive advertising slot for every announcement, apartment row for flats.
pub fn on_created(tables: &mut Tables, announcement: &Announcement, today: NaiveDate) {
    let advertising = AdvertisingId(tables.allocate());
    tables.advertising.insert(
        advertising,
        Advertising {
            id: advertising,
            announcement: announcement.id,
            options: PromotionOptions::default(),
            is_active: false,
            date_start: today,
            date_end: None,
        },
    );

    if announcement.is_flat() {
        let apartment = ApartmentId(tables.allocate());
        tables.apartments.insert(
            apartment,
            Apartment {
                id: apartment,
                announcement: announcement.id,
                number: announcement.id.0,
                floor: None,
                corpus: None,
                section: None,
                is_booked: false,
                price_to_meter: price_to_meter(
                    announcement.details.price,
                    announcement.details.area,
                ),
            },
        );
        tracing::debug!(announcement = %announcement.id, apartment = %apartment, "apartment derived");
    }
}

/// Recompute the flat's price per square meter. The apartment row must exist.
pub fn on_updated(tables: &mut Tables, announcement: &Announcement) -> Result<(), ServiceError> {
    if !announcement.is_flat() {
        return Ok(());
    }

    let apartment = tables
        .apartment_of_mut(announcement.id)
        .ok_or(ServiceError::NotFound("apartment"))?;
    apartment.price_to_meter =
        price_to_meter(announcement.details.price, announcement.details.area);
    Ok(())
}
