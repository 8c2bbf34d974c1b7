//! Residential complexes owned by developer accounts.

pub mod domain;
pub mod router;
pub mod service;
pub mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use router::housing_router;
pub use service::HousingService;
