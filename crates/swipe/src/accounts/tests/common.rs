use std::sync::Arc;

use crate::access::Caller;
use crate::accounts::domain::{FilterCriteria, Registration};
use crate::accounts::AccountService;
use crate::housing::domain::Decoration;
use crate::listings::domain::{PaymentOptions, Purpose};
use crate::store::TableStore;
use crate::test_support::{date, World};

pub(super) fn service(world: &World) -> Arc<AccountService<TableStore>> {
    Arc::new(AccountService::new(Arc::clone(&world.store)))
}

pub(super) fn registration(email: &str, is_developer: bool) -> Registration {
    Registration {
        email: email.to_string(),
        first_name: "Oksana".to_string(),
        last_name: "Bondar".to_string(),
        phone: Some("+380661234567".to_string()),
        is_developer,
    }
}

/// Registers a fresh member so it carries the full set of dependents.
pub(super) fn registered_member(accounts: &AccountService<TableStore>, email: &str) -> Caller {
    let view = accounts
        .register(registration(email, false), date(2024, 1, 10))
        .expect("registered");
    Caller(view.id)
}

pub(super) fn criteria() -> FilterCriteria {
    FilterCriteria {
        status_house: true,
        district: "Primorsky".to_string(),
        microdistrict: "Arcadia".to_string(),
        rooms: 2,
        price_start: 40_000,
        price_end: 90_000,
        area_start: 40,
        area_end: 80,
        type_housing: "new building".to_string(),
        purpose: Purpose::Flat,
        payment_options: PaymentOptions::Other,
        state: Decoration::RoughFinish,
    }
}
