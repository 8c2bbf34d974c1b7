use crate::store::Tables;

use super::domain::{
    rooms_label, Announcement, AnnouncementCard, AnnouncementView, Apartment, ApartmentView,
};

pub fn card(tables: &Tables, announcement: &Announcement) -> AnnouncementCard {
    AnnouncementCard {
        id: announcement.id,
        date_created: announcement.date_created,
        address: announcement.details.address.clone(),
        area: announcement.details.area,
        price: announcement.details.price,
        is_moderation_check: announcement.is_moderation_check,
        is_active: announcement.is_active,
        purpose: announcement.purpose,
        purpose_label: announcement.purpose.label(),
        rooms: announcement.details.rooms,
        rooms_label: rooms_label(announcement.details.rooms),
        gallery: tables.gallery_of(announcement.id),
        advertising: tables.advertising_of(announcement.id).cloned(),
    }
}

pub fn detail(tables: &Tables, announcement: &Announcement) -> AnnouncementView {
    AnnouncementView {
        announcement: announcement.clone(),
        purpose_label: announcement.purpose.label(),
        condition_label: announcement.details.condition.label(),
        gallery: tables.gallery_of(announcement.id),
        advertising: tables.advertising_of(announcement.id).cloned(),
        apartment: tables.apartment_of(announcement.id).cloned(),
    }
}

pub fn apartment(
    tables: &Tables,
    apartment: &Apartment,
    announcement: &Announcement,
) -> ApartmentView {
    ApartmentView {
        apartment: apartment.clone(),
        announcement: card(tables, announcement),
    }
}

/// Promoted listings first (turbo, then raise), newest first within each tier.
pub fn feed_rank(tables: &Tables, announcement: &Announcement) -> (u8, std::cmp::Reverse<i64>) {
    let tier = match tables
        .advertising_of(announcement.id)
        .filter(|slot| slot.is_active)
    {
        Some(slot) if slot.options.is_turbo => 0,
        Some(slot) if slot.options.is_raise => 1,
        _ => 2,
    };
    (
        tier,
        std::cmp::Reverse(announcement.date_created.timestamp_micros()),
    )
}
