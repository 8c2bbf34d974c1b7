use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::access::Caller;
use crate::calendar;
use crate::error::ServiceError;
use crate::payload::Payload;
use crate::store::{AdvertisingId, AnnouncementId, ApartmentId, ComplaintId, EntityStore};

use super::domain::{
    Advertising, AnnouncementCard, AnnouncementDraft, AnnouncementUpdate, AnnouncementView,
    ApartmentUpdate, ApartmentView, Complaint, ComplaintDraft, ModerationDecision,
    PromotionOptions,
};
use super::query::{ApartmentQuery, FeedQuery};
use super::service::{Feed, ListingService};

type Shared<S> = State<Arc<ListingService<S>>>;

/// Router builder exposing announcement, moderation, advertising and apartment endpoints.
pub fn listing_router<S>(service: Arc<ListingService<S>>) -> Router
where
    S: EntityStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/announcement-feed",
            get(feed_handler::<S>).post(create_handler::<S>),
        )
        .route("/api/v1/announcement-feed/mine", get(mine_handler::<S>))
        .route(
            "/api/v1/announcement-feed/:id",
            get(retrieve_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .route(
            "/api/v1/announcement-moderation",
            get(moderation_queue_handler::<S>),
        )
        .route(
            "/api/v1/announcement-moderation/:id",
            put(moderate_handler::<S>),
        )
        .route(
            "/api/v1/announcement-complaint",
            get(complaints_handler::<S>).post(complain_handler::<S>),
        )
        .route(
            "/api/v1/announcement-complaint/:id",
            get(complaint_handler::<S>).delete(delete_complaint_handler::<S>),
        )
        .route(
            "/api/v1/announcement-advertising/:id",
            get(advertising_handler::<S>).put(activate_advertising_handler::<S>),
        )
        .route("/api/v1/apartments", get(apartments_handler::<S>))
        .route(
            "/api/v1/apartments/:id",
            get(apartment_handler::<S>).put(update_apartment_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn feed_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Feed>, ServiceError> {
    service.feed(caller, &query).map(Json)
}

pub(crate) async fn create_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(draft): Payload<AnnouncementDraft>,
) -> Result<(StatusCode, Json<AnnouncementView>), ServiceError> {
    let view = service.create(caller, draft)?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn mine_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Vec<AnnouncementCard>>, ServiceError> {
    service.mine(caller).map(Json)
}

async fn retrieve_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<AnnouncementId>,
) -> Result<Json<AnnouncementView>, ServiceError> {
    service.retrieve(caller, id).map(Json)
}

async fn update_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<AnnouncementId>,
    Payload(update): Payload<AnnouncementUpdate>,
) -> Result<Json<AnnouncementView>, ServiceError> {
    service.update(caller, id, update).map(Json)
}

async fn delete_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<AnnouncementId>,
) -> Result<StatusCode, ServiceError> {
    service.delete(caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn moderation_queue_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Vec<AnnouncementCard>>, ServiceError> {
    service.moderation_queue(caller).map(Json)
}

async fn moderate_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<AnnouncementId>,
    Payload(decision): Payload<ModerationDecision>,
) -> Result<Json<AnnouncementView>, ServiceError> {
    service.moderate(caller, id, decision).map(Json)
}

async fn complain_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(draft): Payload<ComplaintDraft>,
) -> Result<(StatusCode, Json<Complaint>), ServiceError> {
    let complaint = service.complain(caller, draft)?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

async fn complaints_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Vec<Complaint>>, ServiceError> {
    service.complaints(caller).map(Json)
}

async fn complaint_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<ComplaintId>,
) -> Result<Json<Complaint>, ServiceError> {
    service.complaint(caller, id).map(Json)
}

async fn delete_complaint_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<ComplaintId>,
) -> Result<StatusCode, ServiceError> {
    service.delete_complaint(caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn advertising_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<AdvertisingId>,
) -> Result<Json<Advertising>, ServiceError> {
    service.advertising(caller, id).map(Json)
}

async fn activate_advertising_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<AdvertisingId>,
    Payload(options): Payload<PromotionOptions>,
) -> Result<Json<Advertising>, ServiceError> {
    service
        .activate_advertising(caller, id, options, calendar::today())
        .map(Json)
}

async fn apartments_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Query(query): Query<ApartmentQuery>,
) -> Result<Json<Vec<ApartmentView>>, ServiceError> {
    service.apartments(caller, &query).map(Json)
}

async fn apartment_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<ApartmentId>,
) -> Result<Json<ApartmentView>, ServiceError> {
    service.apartment(caller, id).map(Json)
}

async fn update_apartment_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<ApartmentId>,
    Payload(update): Payload<ApartmentUpdate>,
) -> Result<Json<ApartmentView>, ServiceError> {
    service.update_apartment(caller, id, update).map(Json)
}
