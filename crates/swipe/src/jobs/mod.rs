//! Daily expiry sweeps.
//!
//! Each sweep selects its rows in one read transaction, sends mail with the lock released,
//! then flips the rows in one write transaction that re-checks the selection predicate.
//! Running a sweep twice for the same day is a no-op the second time.

mod advertising;
mod subscriptions;

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::notify::{Email, Mailer};
use crate::store::{EntityStore, StoreError};

pub use advertising::expire_advertising;
pub use subscriptions::{deactivate_subscriptions, renew_subscriptions};

/// Outcome of one sweep run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub job: &'static str,
    pub today: Option<NaiveDate>,
    pub processed: usize,
    pub notified: usize,
    pub notification_failures: usize,
}

impl SweepReport {
    fn new(job: Job, today: NaiveDate) -> Self {
        Self {
            job: job.name(),
            today: Some(today),
            ..Self::default()
        }
    }

    /// Deliver `email`, counting the failure instead of aborting the batch.
    fn notify<M: Mailer + ?Sized>(&mut self, mailer: &M, email: Email) {
        let to = email.to.clone();
        match mailer.send(email) {
            Ok(()) => self.notified += 1,
            Err(error) => {
                self.notification_failures += 1;
                tracing::warn!(job = self.job, to = %to, error = %error, "expiry notice not delivered");
            }
        }
    }

    fn finish(self) -> Self {
        tracing::info!(
            job = self.job,
            processed = self.processed,
            notified = self.notified,
            notification_failures = self.notification_failures,
            "sweep finished"
        );
        self
    }
}

/// The sweeps known to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    AdvertisingExpiry,
    SubscriptionRenewal,
    SubscriptionExpiry,
}

impl Job {
    /// Renewal runs before deactivation so auto-renewed rows are never deactivated.
    pub const ALL: [Job; 3] = [
        Job::AdvertisingExpiry,
        Job::SubscriptionRenewal,
        Job::SubscriptionExpiry,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::AdvertisingExpiry => "advertising-expiry",
            Self::SubscriptionRenewal => "subscription-renewal",
            Self::SubscriptionExpiry => "subscription-expiry",
        }
    }

    pub fn run<S, M>(self, store: &S, mailer: &M, today: NaiveDate) -> Result<SweepReport, StoreError>
    where
        S: EntityStore,
        M: Mailer + ?Sized,
    {
        match self {
            Self::AdvertisingExpiry => expire_advertising(store, mailer, today),
            Self::SubscriptionRenewal => renew_subscriptions(store, today),
            Self::SubscriptionExpiry => deactivate_subscriptions(store, mailer, today),
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run every sweep in order, stopping at the first store failure.
pub fn run_all<S, M>(store: &S, mailer: &M, today: NaiveDate) -> Result<Vec<SweepReport>, StoreError>
where
    S: EntityStore,
    M: Mailer + ?Sized,
{
    Job::ALL
        .into_iter()
        .map(|job| job.run(store, mailer, today))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::notify::{MailError, OutboxMailer};
    use crate::test_support::{date, world};

    /// Rejects every message.
    pub(crate) struct RefusingMailer;

    impl Mailer for RefusingMailer {
        fn send(&self, email: Email) -> Result<(), MailError> {
            Err(MailError::Rejected(email.to))
        }
    }

    #[test]
    fn failed_delivery_is_counted_not_raised() {
        let mut report = SweepReport::new(Job::AdvertisingExpiry, date(2024, 5, 1));
        report.notify(&RefusingMailer, Email::notice("a@b.io", "expired"));
        report.notify(&OutboxMailer::default(), Email::notice("c@d.io", "expired"));
        assert_eq!(report.notified, 1);
        assert_eq!(report.notification_failures, 1);
    }

    #[test]
    fn run_all_reports_every_job_in_order() {
        let world = world();
        let reports = run_all(world.store.as_ref(), &OutboxMailer::default(), date(2024, 5, 1))
            .expect("sweeps ran");
        let names: Vec<_> = reports.iter().map(|report| report.job).collect();
        assert_eq!(
            names,
            ["advertising-expiry", "subscription-renewal", "subscription-expiry"]
        );
        assert!(reports.iter().all(|report| report.processed == 0));
    }
}
