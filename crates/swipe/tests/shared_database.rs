//! The server and the externally scheduled sweep runner open the same database file.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use swipe::accounts::domain::{NotificationTarget, Registration};
use swipe::notify::OutboxMailer;
use swipe::{jobs, AccountService, Caller, TableStore};

fn scratch_database() -> PathBuf {
    std::env::temp_dir().join(format!(
        "swipe-shared-{}-{}.sqlite3",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn sweep_from_another_process_survives_later_server_writes() {
    let path = scratch_database();
    let server = Arc::new(TableStore::open(&path).expect("server store"));
    let accounts = AccountService::new(Arc::clone(&server));

    let member = Caller(
        accounts
            .register(
                Registration {
                    email: "lapsed@swipe.test".to_string(),
                    first_name: "Olena".to_string(),
                    last_name: "Teliha".to_string(),
                    phone: None,
                    is_developer: false,
                },
                date(2024, 1, 15),
            )
            .expect("registered")
            .id,
    );
    accounts
        .activate_subscription(member, date(2024, 1, 31))
        .expect("activated");
    accounts
        .set_auto_renewal(member, false)
        .expect("auto-renewal off");

    let worker = TableStore::open(&path).expect("worker store");
    let outbox = OutboxMailer::default();
    let report =
        jobs::deactivate_subscriptions(&worker, &outbox, date(2024, 3, 10)).expect("sweep");
    assert_eq!(report.processed, 1);
    assert_eq!(report.notified, 1);
    assert_eq!(outbox.sent()[0].to, "lapsed@swipe.test");

    let seen_by_server = accounts.subscription(member).expect("subscription");
    assert!(!seen_by_server.is_active);

    accounts
        .set_notification(member, NotificationTarget::Agent)
        .expect("profile write");

    let reopened = Arc::new(TableStore::open(&path).expect("reopened store"));
    let on_disk = AccountService::new(reopened)
        .subscription(member)
        .expect("subscription");
    assert!(!on_disk.is_active);

    std::fs::remove_file(&path).ok();
}
