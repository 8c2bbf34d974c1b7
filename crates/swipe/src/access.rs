//! Caller identity and ownership predicates.
//!
//! The predicates are pure: they look at the tables handed to them and answer yes or no.
//! Staff users pass every ownership check.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::accounts::domain::{SavedFilter, User};
use crate::error::ServiceError;
use crate::housing::domain::ResidentialComplex;
use crate::listings::domain::{Advertising, Announcement, Apartment};
use crate::store::{ComplexId, Tables, UserId};

/// Header set by the upstream auth layer.
pub const CALLER_HEADER: &str = "x-user-id";

/// Authenticated user id taken from [`CALLER_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(|id| Caller(UserId(id)))
            .ok_or(ServiceError::Unauthenticated)
    }
}

/// Resolve the caller to an active user row.
pub fn actor(tables: &Tables, caller: Caller) -> Result<&User, ServiceError> {
    tables
        .users
        .get(&caller.0)
        .filter(|user| user.is_active)
        .ok_or(ServiceError::Unauthenticated)
}

pub fn ensure(allowed: bool) -> Result<(), ServiceError> {
    if allowed {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

pub fn require_staff(user: &User) -> Result<(), ServiceError> {
    ensure(user.is_staff)
}

pub fn require_not_blacklisted(user: &User) -> Result<(), ServiceError> {
    ensure(!user.is_blacklist)
}

pub fn owns_announcement(user: &User, announcement: &Announcement) -> bool {
    user.is_staff || announcement.creator == user.id
}

pub fn owns_advertising(tables: &Tables, user: &User, advertising: &Advertising) -> bool {
    user.is_staff
        || tables
            .announcements
            .get(&advertising.announcement)
            .is_some_and(|announcement| announcement.creator == user.id)
}

/// Apartment → announcement → complex → developer.
pub fn owns_apartment(tables: &Tables, user: &User, apartment: &Apartment) -> bool {
    if user.is_staff {
        return true;
    }

    tables
        .announcements
        .get(&apartment.announcement)
        .and_then(|announcement| announcement.residential_complex)
        .is_some_and(|complex| owns_complex_object(tables, user, complex))
}

pub fn owns_complex(user: &User, complex: &ResidentialComplex) -> bool {
    user.is_staff || (user.is_developer && complex.developer == user.id)
}

/// News, documents and gallery images belong to whoever owns their complex.
pub fn owns_complex_object(tables: &Tables, user: &User, complex: ComplexId) -> bool {
    user.is_staff
        || tables
            .complexes
            .get(&complex)
            .is_some_and(|complex| owns_complex(user, complex))
}

pub fn owns_filter(user: &User, filter: &SavedFilter) -> bool {
    user.is_staff || filter.user == user.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::domain::NotificationTarget;
    use crate::housing::domain::{ComplexDetails, Decoration, Heating};
    use crate::listings::domain::{
        AgentCommission, AnnouncementDetails, Communication, FoundingDocument, Layout,
        PaymentOptions, Purpose,
    };
    use crate::store::{AnnouncementId, ApartmentId};
    use axum::http::Request;
    use chrono::{NaiveDate, Utc};

    fn user(id: u64, is_staff: bool, is_developer: bool) -> User {
        User {
            id: UserId(id),
            email: format!("user{id}@example.com"),
            first_name: "Olga".to_string(),
            last_name: "Bondar".to_string(),
            phone: None,
            profile_image: None,
            is_staff,
            is_developer,
            is_active: true,
            per_agent: false,
            is_blacklist: false,
            notification: NotificationTarget::Me,
            date_joined: Utc::now(),
        }
    }

    fn fixture() -> Tables {
        let mut tables = Tables::default();
        for (id, staff, developer) in [(1, false, true), (2, false, false), (3, true, false)] {
            tables.users.insert(UserId(id), user(id, staff, developer));
        }
        tables.complexes.insert(
            ComplexId(10),
            ResidentialComplex {
                id: ComplexId(10),
                developer: UserId(1),
                details: ComplexDetails::placeholder(),
                commissioning_date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("date"),
            },
        );
        tables.announcements.insert(
            AnnouncementId(20),
            Announcement {
                id: AnnouncementId(20),
                creator: UserId(2),
                purpose: Purpose::Flat,
                residential_complex: Some(ComplexId(10)),
                details: AnnouncementDetails {
                    address: "Fontanska 12".to_string(),
                    description: "sea view".to_string(),
                    area: 50.0,
                    area_kitchen: 10.0,
                    balcony_or_loggia: true,
                    price: 60_000,
                    founding_document: FoundingDocument::Ownership,
                    rooms: 2,
                    layout: Layout::Classic,
                    condition: Decoration::ResidentialCondition,
                    heating: Heating::Central,
                    payment_options: PaymentOptions::Mortgage,
                    agent_commission: AgentCommission::Small,
                    communication: Communication::Call,
                },
                date_created: Utc::now(),
                is_active: true,
                is_moderation_check: true,
                count_view: 0,
            },
        );
        tables
    }

    fn apartment() -> Apartment {
        Apartment {
            id: ApartmentId(30),
            announcement: AnnouncementId(20),
            number: 20,
            floor: None,
            corpus: None,
            section: None,
            is_booked: false,
            price_to_meter: 1200,
        }
    }

    #[test]
    fn apartment_belongs_to_complex_developer_not_creator() {
        let tables = fixture();
        let developer = &tables.users[&UserId(1)];
        let creator = &tables.users[&UserId(2)];
        let staff = &tables.users[&UserId(3)];

        assert!(owns_apartment(&tables, developer, &apartment()));
        assert!(!owns_apartment(&tables, creator, &apartment()));
        assert!(owns_apartment(&tables, staff, &apartment()));
    }

    #[test]
    fn announcement_ownership_follows_creator() {
        let tables = fixture();
        let announcement = &tables.announcements[&AnnouncementId(20)];
        assert!(owns_announcement(&tables.users[&UserId(2)], announcement));
        assert!(!owns_announcement(&tables.users[&UserId(1)], announcement));
        assert!(owns_announcement(&tables.users[&UserId(3)], announcement));
    }

    #[test]
    fn complex_objects_need_developer_flag() {
        let mut tables = fixture();
        if let Some(developer) = tables.users.get_mut(&UserId(1)) {
            developer.is_developer = false;
        }
        let former = &tables.users[&UserId(1)];
        assert!(!owns_complex_object(&tables, former, ComplexId(10)));
        assert!(!owns_complex_object(&tables, former, ComplexId(99)));
    }

    #[test]
    fn inactive_users_are_not_actors() {
        let mut tables = fixture();
        if let Some(member) = tables.users.get_mut(&UserId(2)) {
            member.is_active = false;
        }
        assert!(matches!(
            actor(&tables, Caller(UserId(2))),
            Err(ServiceError::Unauthenticated)
        ));
        assert!(matches!(
            actor(&tables, Caller(UserId(404))),
            Err(ServiceError::Unauthenticated)
        ));
        assert!(actor(&tables, Caller(UserId(1))).is_ok());
    }

    #[tokio::test]
    async fn caller_is_read_from_header() {
        let request = Request::builder()
            .header(CALLER_HEADER, "42")
            .body(())
            .expect("request");
        let (mut parts, _) = request.into_parts();
        let caller = Caller::from_request_parts(&mut parts, &())
            .await
            .expect("caller extracted");
        assert_eq!(caller, Caller(UserId(42)));

        let request = Request::builder()
            .header(CALLER_HEADER, "nobody")
            .body(())
            .expect("request");
        let (mut parts, _) = request.into_parts();
        assert!(matches!(
            Caller::from_request_parts(&mut parts, &()).await,
            Err(ServiceError::Unauthenticated)
        ));
    }
}
