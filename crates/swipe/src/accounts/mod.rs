//! User accounts: registration bootstrap, profile, subscription, saved filters,
//! messaging, favorites and staff administration.

pub mod directory;
pub mod domain;
mod favorites;
mod filters;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use directory::{ConversationQuery, UserQuery};
pub use router::account_router;
pub use service::AccountService;
