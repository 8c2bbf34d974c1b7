use crate::infra;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use swipe::error::AppError;
use swipe::jobs::{self, Job, SweepReport};
use swipe::notify::Mailer;
use swipe::{calendar, EntityStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum JobName {
    AdvertisingExpiry,
    SubscriptionRenewal,
    SubscriptionExpiry,
    All,
}

impl JobName {
    fn jobs(self) -> Vec<Job> {
        match self {
            Self::AdvertisingExpiry => vec![Job::AdvertisingExpiry],
            Self::SubscriptionRenewal => vec![Job::SubscriptionRenewal],
            Self::SubscriptionExpiry => vec![Job::SubscriptionExpiry],
            Self::All => Job::ALL.to_vec(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct JobsArgs {
    /// Sweep to run
    #[arg(value_enum)]
    pub(crate) job: JobName,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_jobs(args: JobsArgs) -> Result<(), AppError> {
    let config = infra::load_config()?;
    let store = infra::open_store(&config.store)?;
    let mailer = infra::mailer(&config.mail);
    let today = args.today.unwrap_or_else(calendar::today);

    let reports = run_selected(store.as_ref(), mailer.as_ref(), &args.job.jobs(), today)?;
    for report in &reports {
        println!(
            "{:<22} processed={} notified={} failed_notifications={}",
            report.job, report.processed, report.notified, report.notification_failures
        );
    }
    Ok(())
}

fn run_selected<S, M>(
    store: &S,
    mailer: &M,
    selected: &[Job],
    today: NaiveDate,
) -> Result<Vec<SweepReport>, AppError>
where
    S: EntityStore,
    M: Mailer + ?Sized,
{
    selected
        .iter()
        .map(|job| job.run(store, mailer, today).map_err(AppError::from))
        .collect()
}

/// Run every sweep on a fixed interval for deployments without an external scheduler.
pub(crate) fn spawn_in_process<S, M>(store: Arc<S>, mailer: Arc<M>, interval: Duration)
where
    S: EntityStore + 'static,
    M: Mailer + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let store = Arc::clone(&store);
            let mailer = Arc::clone(&mailer);
            let outcome = tokio::task::spawn_blocking(move || {
                jobs::run_all(store.as_ref(), mailer.as_ref(), calendar::today())
            })
            .await;

            match outcome {
                Ok(Ok(reports)) => tracing::debug!(jobs = reports.len(), "scheduled sweeps done"),
                Ok(Err(error)) => tracing::error!(%error, "scheduled sweep failed"),
                Err(error) => tracing::error!(%error, "scheduled sweep panicked"),
            }
        }
    });
    tracing::info!(interval_secs = interval.as_secs(), "in-process sweeps scheduled");
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipe::notify::OutboxMailer;
    use swipe::TableStore;

    #[test]
    fn all_expands_to_every_sweep_in_order() {
        assert_eq!(JobName::All.jobs(), Job::ALL.to_vec());
        assert_eq!(JobName::SubscriptionExpiry.jobs(), vec![Job::SubscriptionExpiry]);
    }

    #[test]
    fn selected_sweeps_report_individually() {
        let store = TableStore::new();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
        let reports = run_selected(
            &store,
            &OutboxMailer::default(),
            &JobName::AdvertisingExpiry.jobs(),
            today,
        )
        .expect("sweep ran");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].job, "advertising-expiry");
        assert_eq!(reports[0].processed, 0);
    }
}
