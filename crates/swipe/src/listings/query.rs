use serde::Deserialize;

use crate::housing::domain::Decoration;
use crate::store::{ComplexId, Tables};

use super::domain::{Announcement, Apartment, PaymentOptions, Purpose};

/// Public feed filters; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedQuery {
    pub price_min: Option<u64>,
    pub price_max: Option<u64>,
    pub area_min: Option<f64>,
    pub area_max: Option<f64>,
    pub purpose: Option<Purpose>,
    pub rooms: Option<u8>,
    pub condition: Option<Decoration>,
    pub payment_options: Option<PaymentOptions>,
    pub is_commissioning: Option<bool>,
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

impl FeedQuery {
    pub fn matches(&self, tables: &Tables, announcement: &Announcement) -> bool {
        let details = &announcement.details;
        if !within(details.price, self.price_min, self.price_max)
            || !within(details.area, self.area_min, self.area_max)
        {
            return false;
        }
        if self.purpose.is_some_and(|purpose| purpose != announcement.purpose)
            || self.rooms.is_some_and(|rooms| rooms != details.rooms)
            || self
                .condition
                .is_some_and(|condition| condition != details.condition)
            || self
                .payment_options
                .is_some_and(|payment| payment != details.payment_options)
        {
            return false;
        }

        match self.is_commissioning {
            None => true,
            Some(wanted) => announcement
                .residential_complex
                .and_then(|complex| tables.complexes.get(&complex))
                .is_some_and(|complex| complex.details.is_commissioning == wanted),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApartmentQuery {
    pub residential_complex: Option<ComplexId>,
    pub price_min: Option<u64>,
    pub price_max: Option<u64>,
    pub area_min: Option<f64>,
    pub area_max: Option<f64>,
    pub price_to_meter_min: Option<u64>,
    pub price_to_meter_max: Option<u64>,
    pub condition: Option<Decoration>,
    pub corpus: Option<u16>,
    pub section: Option<u16>,
    pub is_booked: Option<bool>,
}

impl ApartmentQuery {
    pub fn matches(&self, apartment: &Apartment, announcement: &Announcement) -> bool {
        let details = &announcement.details;
        self.residential_complex
            .map_or(true, |complex| announcement.residential_complex == Some(complex))
            && within(details.price, self.price_min, self.price_max)
            && within(details.area, self.area_min, self.area_max)
            && within(
                apartment.price_to_meter,
                self.price_to_meter_min,
                self.price_to_meter_max,
            )
            && self
                .condition
                .map_or(true, |condition| condition == details.condition)
            && self.corpus.map_or(true, |corpus| apartment.corpus == Some(corpus))
            && self
                .section
                .map_or(true, |section| apartment.section == Some(section))
            && self
                .is_booked
                .map_or(true, |booked| apartment.is_booked == booked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::tests::common::announcement;

    #[test]
    fn price_and_area_ranges_are_inclusive() {
        let tables = Tables::default();
        let listing = announcement(1, Purpose::Office);
        let query = FeedQuery {
            price_min: Some(listing.details.price),
            area_max: Some(listing.details.area),
            ..FeedQuery::default()
        };
        assert!(query.matches(&tables, &listing));

        let query = FeedQuery {
            price_max: Some(listing.details.price - 1),
            ..FeedQuery::default()
        };
        assert!(!query.matches(&tables, &listing));
    }

    #[test]
    fn commissioning_filter_excludes_listings_without_complex() {
        let tables = Tables::default();
        let listing = announcement(1, Purpose::Office);
        let query = FeedQuery {
            is_commissioning: Some(true),
            ..FeedQuery::default()
        };
        assert!(!query.matches(&tables, &listing));
    }
}
