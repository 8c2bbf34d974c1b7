//! Swipe: real-estate classifieds backend.
//!
//! Members publish announcements that staff moderate, developers manage their residential
//! complexes and apartment inventory, and daily sweeps expire paid promotions and
//! subscriptions.

pub mod access;
pub mod accounts;
pub mod calendar;
mod choices;
pub mod config;
pub mod error;
pub mod housing;
pub mod jobs;
pub mod listings;
pub mod notify;
pub mod payload;
pub mod store;
pub mod telemetry;
pub mod validation;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::Router;

pub use access::{Caller, CALLER_HEADER};
pub use accounts::{account_router, AccountService};
pub use error::{AppError, ServiceError};
pub use housing::{housing_router, HousingService};
pub use listings::{listing_router, ListingService};
pub use store::{EntityStore, StoreError, TableStore};

/// Every `/api/v1` route backed by one shared store.
pub fn api_router<S>(store: Arc<S>) -> Router
where
    S: EntityStore + 'static,
{
    Router::new()
        .merge(account_router(Arc::new(AccountService::new(Arc::clone(&store)))))
        .merge(housing_router(Arc::new(HousingService::new(Arc::clone(&store)))))
        .merge(listing_router(Arc::new(ListingService::new(store))))
}
