//! Shared fixtures for the in-crate test suites.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::access::{Caller, CALLER_HEADER};
use crate::accounts::domain::{NotificationTarget, User};
use crate::housing::domain::{Benefits, ComplexDetails, RegistrationAndPayment, ResidentialComplex};
use crate::store::{ComplexId, TableStore, Tables, UserId};

pub(crate) struct World {
    pub store: Arc<TableStore>,
    pub member: Caller,
    pub neighbour: Caller,
    pub developer: Caller,
    pub staff: Caller,
    pub complex: ComplexId,
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(crate) fn user(id: UserId, email: &str) -> User {
    User {
        id,
        email: email.to_string(),
        first_name: "Iryna".to_string(),
        last_name: "Koval".to_string(),
        phone: Some("+380501112233".to_string()),
        profile_image: None,
        is_staff: false,
        is_developer: false,
        is_active: true,
        per_agent: false,
        is_blacklist: false,
        notification: NotificationTarget::Me,
        date_joined: Utc::now(),
    }
}

fn add_user(tables: &mut Tables, email: &str, staff: bool, developer: bool) -> UserId {
    let id = UserId(tables.allocate());
    let mut row = user(id, email);
    row.is_staff = staff;
    row.is_developer = developer;
    tables.users.insert(id, row);
    id
}

/// Two members, a developer owning one complex, and a moderator.
pub(crate) fn world() -> World {
    let mut tables = Tables::default();
    let member = add_user(&mut tables, "member@example.com", false, false);
    let neighbour = add_user(&mut tables, "neighbour@example.com", false, false);
    let developer = add_user(&mut tables, "developer@example.com", false, true);
    let staff = add_user(&mut tables, "moderator@example.com", true, false);

    let complex = ComplexId(tables.allocate());
    let mut details = ComplexDetails::placeholder();
    details.name = "Sea Breeze".to_string();
    tables.complexes.insert(
        complex,
        ResidentialComplex {
            id: complex,
            developer,
            details,
            commissioning_date: date(2026, 3, 1),
        },
    );
    tables.benefits.insert(complex, Benefits::default());
    tables
        .registrations
        .insert(complex, RegistrationAndPayment::default());

    World {
        store: Arc::new(TableStore::with_tables(tables)),
        member: Caller(member),
        neighbour: Caller(neighbour),
        developer: Caller(developer),
        staff: Caller(staff),
        complex,
    }
}

pub(crate) fn request(
    method: &str,
    uri: &str,
    caller: Option<Caller>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(Caller(id)) = caller {
        builder = builder.header(CALLER_HEADER, id.to_string());
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).expect("serialize body")))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
