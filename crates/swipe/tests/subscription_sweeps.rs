//! Subscription purchase over HTTP followed by the renewal and expiry sweeps.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, NaiveDate};
use serde_json::Value;
use tower::ServiceExt;

use swipe::accounts::domain::Registration;
use swipe::notify::OutboxMailer;
use swipe::{api_router, calendar, jobs, AccountService, TableStore, CALLER_HEADER};

async fn put(router: &axum::Router, uri: &str, caller: u64, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(CALLER_HEADER, caller.to_string())
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn date_end(body: &Value) -> NaiveDate {
    body["date_end"]
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .expect("date_end")
}

#[tokio::test]
async fn auto_renewal_keeps_a_subscription_alive_until_switched_off() {
    let store = Arc::new(TableStore::new());
    let member = AccountService::new(Arc::clone(&store))
        .register(
            Registration {
                email: "renewer@swipe.test".to_string(),
                first_name: "Marko".to_string(),
                last_name: "Vovchok".to_string(),
                phone: None,
                is_developer: false,
            },
            calendar::today(),
        )
        .expect("registered")
        .id
        .0;
    let router = api_router(Arc::clone(&store));

    let (status, activated) = put(&router, "/api/v1/users/subscription/activate", member, "").await;
    assert_eq!(status, StatusCode::OK);
    let first_end = date_end(&activated);

    let outbox = OutboxMailer::default();
    let lapsed = first_end + Duration::days(1);
    let reports = jobs::run_all(store.as_ref(), &outbox, lapsed).expect("sweeps");
    assert_eq!(reports[1].processed, 1);
    assert_eq!(reports[2].processed, 0);
    assert!(outbox.sent().is_empty());

    let (status, manual) = put(
        &router,
        "/api/v1/users/subscription/auto-renewal",
        member,
        r#"{"is_auto_renewal": false}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(manual["is_active"], true);
    let renewed_end = date_end(&manual);
    assert_eq!(renewed_end, calendar::month_ahead(lapsed));

    let reports = jobs::run_all(store.as_ref(), &outbox, renewed_end + Duration::days(1))
        .expect("sweeps");
    assert_eq!(reports[2].processed, 1);
    assert_eq!(reports[2].notified, 1);
    assert_eq!(outbox.sent()[0].to, "renewer@swipe.test");

    let (status, _) = put(&router, "/api/v1/users/subscription/renew", member, "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
