use chrono::NaiveDate;

use crate::notify::{Email, Mailer};
use crate::store::{AdvertisingId, EntityStore, StoreError};

use super::{Job, SweepReport};

pub const ADVERTISING_EXPIRED: &str = "Your advertising has expired";

/// Deactivate promotions whose paid period ended before `today` and tell each creator.
pub fn expire_advertising<S, M>(
    store: &S,
    mailer: &M,
    today: NaiveDate,
) -> Result<SweepReport, StoreError>
where
    S: EntityStore,
    M: Mailer + ?Sized,
{
    let mut report = SweepReport::new(Job::AdvertisingExpiry, today);

    let expired: Vec<(AdvertisingId, Option<String>)> = store.read(|tables| {
        tables
            .advertising
            .values()
            .filter(|slot| slot.is_active && slot.expired_before(today))
            .map(|slot| {
                let creator = tables
                    .announcements
                    .get(&slot.announcement)
                    .and_then(|announcement| tables.users.get(&announcement.creator))
                    .map(|user| user.email.clone());
                (slot.id, creator)
            })
            .collect()
    })?;

    for (id, email) in &expired {
        match email {
            Some(email) => report.notify(mailer, Email::notice(email, ADVERTISING_EXPIRED)),
            None => tracing::warn!(advertising = %id, "expired advertising has no creator"),
        }
    }

    report.processed = store.write(|tables| {
        let mut flipped = 0;
        for (id, _) in &expired {
            if let Some(slot) = tables
                .advertising
                .get_mut(id)
                .filter(|slot| slot.is_active && slot.expired_before(today))
            {
                slot.is_active = false;
                flipped += 1;
            }
        }
        Ok::<_, StoreError>(flipped)
    })?;

    Ok(report.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::tests::RefusingMailer;
    use crate::listings::domain::PromotionOptions;
    use crate::listings::tests::common::{flat_draft, office_draft, service};
    use crate::notify::OutboxMailer;
    use crate::test_support::{date, world, World};

    fn promote(world: &World, ends_on: Option<NaiveDate>, active: bool) -> AdvertisingId {
        let listings = service(world);
        let view = listings
            .create(world.member, office_draft())
            .expect("created");
        let id = view.advertising.expect("slot").id;
        world
            .store
            .write(|tables| {
                if let Some(slot) = tables.advertising.get_mut(&id) {
                    slot.is_active = active;
                    slot.date_end = ends_on;
                }
                Ok::<_, StoreError>(())
            })
            .expect("slot prepared");
        id
    }

    fn is_active(world: &World, id: AdvertisingId) -> bool {
        world
            .store
            .read(|tables| tables.advertising[&id].is_active)
            .expect("read")
    }

    #[test]
    fn expired_slots_are_flipped_and_creators_notified() {
        let world = world();
        let today = date(2024, 5, 10);
        let expired = promote(&world, Some(date(2024, 5, 9)), true);
        let last_day = promote(&world, Some(today), true);
        let never_bought = promote(&world, None, false);
        let outbox = OutboxMailer::default();

        let report = expire_advertising(world.store.as_ref(), &outbox, today).expect("sweep");

        assert_eq!(report.processed, 1);
        assert_eq!(report.notified, 1);
        assert!(!is_active(&world, expired));
        assert!(is_active(&world, last_day));
        assert!(!is_active(&world, never_bought));
        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "member@example.com");
        assert_eq!(sent[0].subject, "SWIPE");
        assert_eq!(sent[0].body, ADVERTISING_EXPIRED);

        let again = expire_advertising(world.store.as_ref(), &outbox, today).expect("sweep");
        assert_eq!(again.processed, 0);
        assert_eq!(outbox.sent().len(), 1);
    }

    #[test]
    fn delivery_failure_still_expires_the_slot() {
        let world = world();
        let id = promote(&world, Some(date(2024, 5, 1)), true);

        let report =
            expire_advertising(world.store.as_ref(), &RefusingMailer, date(2024, 5, 2)).expect("sweep");

        assert_eq!(report.processed, 1);
        assert_eq!(report.notified, 0);
        assert_eq!(report.notification_failures, 1);
        assert!(!is_active(&world, id));
    }

    #[test]
    fn flats_and_offices_share_the_sweep() {
        let world = world();
        let listings = service(&world);
        let flat = listings
            .create(world.member, flat_draft(world.complex))
            .expect("flat")
            .advertising
            .expect("slot")
            .id;
        listings
            .activate_advertising(
                world.member,
                flat,
                PromotionOptions::default(),
                date(2024, 1, 31),
            )
            .expect("activated");

        let still_running =
            expire_advertising(world.store.as_ref(), &OutboxMailer::default(), date(2024, 3, 2))
                .expect("sweep");
        assert_eq!(still_running.processed, 0);

        let ended =
            expire_advertising(world.store.as_ref(), &OutboxMailer::default(), date(2024, 3, 3))
                .expect("sweep");
        assert_eq!(ended.processed, 1);
        assert!(!is_active(&world, flat));
    }
}
