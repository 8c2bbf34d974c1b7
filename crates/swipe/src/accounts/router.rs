use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::access::Caller;
use crate::calendar;
use crate::error::ServiceError;
use crate::housing::domain::ComplexSummary;
use crate::listings::domain::AnnouncementCard;
use crate::payload::Payload;
use crate::store::{AnnouncementId, ComplexId, EntityStore, FilterId, NotaryId, UserId};

use super::directory::{ConversationQuery, UserQuery};
use super::domain::{
    Contact, ContactUpdate, FilterCriteria, Message, MessageDraft, Notary, NotaryDraft,
    NotificationTarget, ProfileUpdate, Registration, SavedFilter, Subscription, UserView,
};
use super::service::AccountService;

type Shared<S> = State<Arc<AccountService<S>>>;

#[derive(Debug, Deserialize)]
struct NotificationChange {
    notification: NotificationTarget,
}

#[derive(Debug, Deserialize)]
struct PerAgentChange {
    per_agent: bool,
}

#[derive(Debug, Deserialize)]
struct AutoRenewalChange {
    is_auto_renewal: bool,
}

#[derive(Debug, Deserialize)]
struct BlacklistChange {
    is_blacklist: bool,
}

pub fn account_router<S>(service: Arc<AccountService<S>>) -> Router
where
    S: EntityStore + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<S>))
        .route(
            "/api/v1/users/profile",
            get(profile_handler::<S>).put(update_profile_handler::<S>),
        )
        .route(
            "/api/v1/users/profile/notification",
            put(notification_handler::<S>),
        )
        .route(
            "/api/v1/users/profile/per-agent",
            put(per_agent_handler::<S>),
        )
        .route(
            "/api/v1/users/agent-contact",
            get(agent_contact_handler::<S>).put(update_agent_contact_handler::<S>),
        )
        .route("/api/v1/users/subscription", get(subscription_handler::<S>))
        .route(
            "/api/v1/users/subscription/activate",
            put(activate_subscription_handler::<S>),
        )
        .route(
            "/api/v1/users/subscription/renew",
            put(renew_subscription_handler::<S>),
        )
        .route(
            "/api/v1/users/subscription/auto-renewal",
            put(auto_renewal_handler::<S>),
        )
        .route(
            "/api/v1/users/filters",
            get(filters_handler::<S>).post(create_filter_handler::<S>),
        )
        .route(
            "/api/v1/users/filters/:id",
            get(filter_handler::<S>)
                .put(update_filter_handler::<S>)
                .delete(delete_filter_handler::<S>),
        )
        .route(
            "/api/v1/users/messages",
            get(messages_handler::<S>).post(send_message_handler::<S>),
        )
        .route(
            "/api/v1/users/favorites/announcements",
            get(favorite_announcements_handler::<S>),
        )
        .route(
            "/api/v1/users/favorites/announcements/:id",
            post(add_favorite_announcement_handler::<S>)
                .delete(remove_favorite_announcement_handler::<S>),
        )
        .route(
            "/api/v1/users/favorites/complexes",
            get(favorite_complexes_handler::<S>),
        )
        .route(
            "/api/v1/users/favorites/complexes/:id",
            post(add_favorite_complex_handler::<S>).delete(remove_favorite_complex_handler::<S>),
        )
        .route(
            "/api/v1/notaries",
            get(notaries_handler::<S>).post(create_notary_handler::<S>),
        )
        .route(
            "/api/v1/notaries/:id",
            get(notary_handler::<S>)
                .put(update_notary_handler::<S>)
                .delete(delete_notary_handler::<S>),
        )
        .route("/api/v1/admin/users", get(users_handler::<S>))
        .route("/api/v1/admin/users/:id", get(user_handler::<S>))
        .route(
            "/api/v1/admin/users/:id/blacklist",
            put(blacklist_handler::<S>),
        )
        .with_state(service)
}

async fn register_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    Payload(registration): Payload<Registration>,
) -> Result<(StatusCode, Json<UserView>), ServiceError> {
    let user = service.register(registration, calendar::today())?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn profile_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<UserView>, ServiceError> {
    service.profile(caller).map(Json)
}

async fn update_profile_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(update): Payload<ProfileUpdate>,
) -> Result<Json<UserView>, ServiceError> {
    service.update_profile(caller, update).map(Json)
}

async fn notification_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(change): Payload<NotificationChange>,
) -> Result<Json<UserView>, ServiceError> {
    service.set_notification(caller, change.notification).map(Json)
}

async fn per_agent_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(change): Payload<PerAgentChange>,
) -> Result<Json<UserView>, ServiceError> {
    service.set_per_agent(caller, change.per_agent).map(Json)
}

async fn agent_contact_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Contact>, ServiceError> {
    service.agent_contact(caller).map(Json)
}

async fn update_agent_contact_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(update): Payload<ContactUpdate>,
) -> Result<Json<Contact>, ServiceError> {
    service.update_agent_contact(caller, update).map(Json)
}

async fn subscription_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Subscription>, ServiceError> {
    service.subscription(caller).map(Json)
}

async fn activate_subscription_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Subscription>, ServiceError> {
    service
        .activate_subscription(caller, calendar::today())
        .map(Json)
}

async fn renew_subscription_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Subscription>, ServiceError> {
    service.renew_subscription(caller, calendar::today()).map(Json)
}

async fn auto_renewal_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(change): Payload<AutoRenewalChange>,
) -> Result<Json<Subscription>, ServiceError> {
    service
        .set_auto_renewal(caller, change.is_auto_renewal)
        .map(Json)
}

async fn filters_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Vec<SavedFilter>>, ServiceError> {
    service.filters(caller).map(Json)
}

async fn create_filter_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(criteria): Payload<FilterCriteria>,
) -> Result<(StatusCode, Json<SavedFilter>), ServiceError> {
    let filter = service.create_filter(caller, criteria)?;
    Ok((StatusCode::CREATED, Json(filter)))
}

async fn filter_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<FilterId>,
) -> Result<Json<SavedFilter>, ServiceError> {
    service.filter(caller, id).map(Json)
}

async fn update_filter_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<FilterId>,
    Payload(criteria): Payload<FilterCriteria>,
) -> Result<Json<SavedFilter>, ServiceError> {
    service.update_filter(caller, id, criteria).map(Json)
}

async fn delete_filter_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<FilterId>,
) -> Result<StatusCode, ServiceError> {
    service.delete_filter(caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn messages_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<Vec<Message>>, ServiceError> {
    service.messages(caller, query).map(Json)
}

async fn send_message_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(draft): Payload<MessageDraft>,
) -> Result<(StatusCode, Json<Message>), ServiceError> {
    let message = service.send_message(caller, draft)?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn favorite_announcements_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Vec<AnnouncementCard>>, ServiceError> {
    service.favorite_announcements(caller).map(Json)
}

async fn add_favorite_announcement_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<AnnouncementId>,
) -> Result<StatusCode, ServiceError> {
    service.add_favorite_announcement(caller, id)?;
    Ok(StatusCode::CREATED)
}

async fn remove_favorite_announcement_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<AnnouncementId>,
) -> Result<StatusCode, ServiceError> {
    service.remove_favorite_announcement(caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn favorite_complexes_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Vec<ComplexSummary>>, ServiceError> {
    service.favorite_complexes(caller).map(Json)
}

async fn add_favorite_complex_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<ComplexId>,
) -> Result<StatusCode, ServiceError> {
    service.add_favorite_complex(caller, id)?;
    Ok(StatusCode::CREATED)
}

async fn remove_favorite_complex_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<ComplexId>,
) -> Result<StatusCode, ServiceError> {
    service.remove_favorite_complex(caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn notaries_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Vec<Notary>>, ServiceError> {
    service.notaries(caller).map(Json)
}

async fn create_notary_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(draft): Payload<NotaryDraft>,
) -> Result<(StatusCode, Json<Notary>), ServiceError> {
    let notary = service.create_notary(caller, draft)?;
    Ok((StatusCode::CREATED, Json(notary)))
}

async fn notary_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<NotaryId>,
) -> Result<Json<Notary>, ServiceError> {
    service.notary(caller, id).map(Json)
}

async fn update_notary_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<NotaryId>,
    Payload(draft): Payload<NotaryDraft>,
) -> Result<Json<Notary>, ServiceError> {
    service.update_notary(caller, id, draft).map(Json)
}

async fn delete_notary_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<NotaryId>,
) -> Result<StatusCode, ServiceError> {
    service.delete_notary(caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn users_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<UserView>>, ServiceError> {
    service.users(caller, &query).map(Json)
}

async fn user_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<UserId>,
) -> Result<Json<UserView>, ServiceError> {
    service.user(caller, id).map(Json)
}

async fn blacklist_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<UserId>,
    Payload(change): Payload<BlacklistChange>,
) -> Result<Json<UserView>, ServiceError> {
    service.set_blacklist(caller, id, change.is_blacklist).map(Json)
}
