use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use swipe::config::{AppConfig, MailConfig, StoreConfig};
use swipe::error::AppError;
use swipe::notify::TracingMailer;
use swipe::{telemetry, TableStore};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Configuration plus an installed tracing subscriber, shared by every subcommand.
pub(crate) fn load_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn open_store(config: &StoreConfig) -> Result<Arc<TableStore>, AppError> {
    let store = match &config.data_path {
        Some(path) => TableStore::open(path)?,
        None => {
            tracing::warn!("APP_DATA_PATH is not set; data lives in memory only");
            TableStore::new()
        }
    };
    Ok(Arc::new(store))
}

pub(crate) fn mailer(config: &MailConfig) -> Arc<TracingMailer> {
    Arc::new(TracingMailer::new(config.sender.clone()))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
