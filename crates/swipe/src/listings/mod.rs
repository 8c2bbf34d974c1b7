//! Announcements and everything derived from them: advertising slots, the apartment
//! inventory of flats, complaints and the moderation gate.

pub mod domain;
pub mod query;
pub mod router;
pub mod service;
pub mod sync;
pub mod validation;
pub mod views;

#[cfg(test)]
pub(crate) mod tests;

pub use query::{ApartmentQuery, FeedQuery};
pub use router::listing_router;
pub use service::{Feed, ListingService};
