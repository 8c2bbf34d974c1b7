use chrono::NaiveDate;

use crate::calendar;
use crate::notify::{Email, Mailer};
use crate::store::{EntityStore, StoreError, SubscriptionId};

use super::{Job, SweepReport};

pub const SUBSCRIPTION_EXPIRED: &str = "Your subscription has expired";

/// Push every lapsed auto-renewing subscription a month past `today`.
///
/// The active flag is left alone.
pub fn renew_subscriptions<S>(store: &S, today: NaiveDate) -> Result<SweepReport, StoreError>
where
    S: EntityStore,
{
    let mut report = SweepReport::new(Job::SubscriptionRenewal, today);
    let renewed_until = calendar::month_ahead(today);

    report.processed = store.write(|tables| {
        let mut renewed = 0;
        for subscription in tables
            .subscriptions
            .values_mut()
            .filter(|row| row.is_auto_renewal && row.expired_before(today))
        {
            subscription.date_end = Some(renewed_until);
            renewed += 1;
        }
        Ok::<_, StoreError>(renewed)
    })?;

    Ok(report.finish())
}

/// Deactivate lapsed subscriptions without auto-renewal and tell their owners.
pub fn deactivate_subscriptions<S, M>(
    store: &S,
    mailer: &M,
    today: NaiveDate,
) -> Result<SweepReport, StoreError>
where
    S: EntityStore,
    M: Mailer + ?Sized,
{
    let mut report = SweepReport::new(Job::SubscriptionExpiry, today);

    let expired: Vec<(SubscriptionId, Option<String>)> = store.read(|tables| {
        tables
            .subscriptions
            .values()
            .filter(|row| !row.is_auto_renewal && row.is_active && row.expired_before(today))
            .map(|row| {
                let email = tables.users.get(&row.user).map(|user| user.email.clone());
                (row.id, email)
            })
            .collect()
    })?;

    for (id, email) in &expired {
        match email {
            Some(email) => report.notify(mailer, Email::notice(email, SUBSCRIPTION_EXPIRED)),
            None => tracing::warn!(subscription = %id, "expired subscription has no owner"),
        }
    }

    report.processed = store.write(|tables| {
        let mut flipped = 0;
        for (id, _) in &expired {
            if let Some(row) = tables
                .subscriptions
                .get_mut(id)
                .filter(|row| !row.is_auto_renewal && row.is_active && row.expired_before(today))
            {
                row.is_active = false;
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
    use crate::access::Caller;
    use crate::accounts::domain::Subscription;
    use crate::jobs::tests::RefusingMailer;
    use crate::notify::OutboxMailer;
    use crate::test_support::{date, world, World};

    fn subscribe(
        world: &World,
        owner: Caller,
        ends_on: NaiveDate,
        active: bool,
        auto_renewal: bool,
    ) -> SubscriptionId {
        world
            .store
            .write(|tables| {
                let id = SubscriptionId(tables.allocate());
                tables.subscriptions.insert(
                    id,
                    Subscription {
                        id,
                        user: owner.0,
                        date_start: date(2024, 1, 1),
                        date_end: Some(ends_on),
                        is_active: active,
                        is_auto_renewal: auto_renewal,
                    },
                );
                Ok::<_, StoreError>(id)
            })
            .expect("subscription stored")
    }

    fn stored(world: &World, id: SubscriptionId) -> Subscription {
        world
            .store
            .read(|tables| tables.subscriptions[&id].clone())
            .expect("read")
    }

    #[test]
    fn renewal_moves_only_lapsed_auto_renewing_rows() {
        let world = world();
        let today = date(2024, 2, 10);
        let lapsed = subscribe(&world, world.member, date(2024, 2, 9), true, true);
        let running = subscribe(&world, world.neighbour, date(2024, 2, 10), true, true);
        let manual = subscribe(&world, world.developer, date(2024, 2, 1), true, false);

        let report = renew_subscriptions(world.store.as_ref(), today).expect("sweep");

        assert_eq!(report.processed, 1);
        let renewed = stored(&world, lapsed);
        assert_eq!(renewed.date_end, Some(date(2024, 3, 10)));
        assert!(renewed.is_active);
        assert_eq!(stored(&world, running).date_end, Some(date(2024, 2, 10)));
        assert_eq!(stored(&world, manual).date_end, Some(date(2024, 2, 1)));
    }

    #[test]
    fn renewal_keeps_the_active_flag_as_is() {
        let world = world();
        let paused = subscribe(&world, world.member, date(2024, 2, 1), false, true);

        renew_subscriptions(world.store.as_ref(), date(2024, 2, 2)).expect("sweep");

        let row = stored(&world, paused);
        assert!(!row.is_active);
        assert_eq!(row.date_end, Some(date(2024, 3, 2)));
    }

    #[test]
    fn deactivation_mails_and_flips_lapsed_manual_rows() {
        let world = world();
        let today = date(2024, 2, 10);
        let lapsed = subscribe(&world, world.member, date(2024, 2, 9), true, false);
        let auto = subscribe(&world, world.neighbour, date(2024, 2, 9), true, true);
        let outbox = OutboxMailer::default();

        let report = deactivate_subscriptions(world.store.as_ref(), &outbox, today).expect("sweep");

        assert_eq!(report.processed, 1);
        assert_eq!(report.notified, 1);
        assert!(!stored(&world, lapsed).is_active);
        assert!(stored(&world, auto).is_active);
        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "member@example.com");
        assert_eq!(sent[0].body, SUBSCRIPTION_EXPIRED);

        let again = deactivate_subscriptions(world.store.as_ref(), &outbox, today).expect("sweep");
        assert_eq!(again.processed, 0);
        assert_eq!(outbox.sent().len(), 1);
    }

    #[test]
    fn deactivation_survives_mail_failures() {
        let world = world();
        let lapsed = subscribe(&world, world.member, date(2024, 2, 9), true, false);

        let report = deactivate_subscriptions(world.store.as_ref(), &RefusingMailer, date(2024, 2, 10))
            .expect("sweep");

        assert_eq!(report.notification_failures, 1);
        assert_eq!(report.processed, 1);
        assert!(!stored(&world, lapsed).is_active);
    }
}
