use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::access::Caller;
use crate::calendar;
use crate::error::ServiceError;
use crate::payload::Payload;
use crate::store::{ComplexId, DocumentId, EntityStore, NewsId};

use super::domain::{
    ComplexSummary, ComplexUpdate, ComplexView, Document, DocumentDraft, News, NewsDraft,
};
use super::service::HousingService;

type Shared<S> = State<Arc<HousingService<S>>>;

pub fn housing_router<S>(service: Arc<HousingService<S>>) -> Router
where
    S: EntityStore + 'static,
{
    Router::new()
        .route("/api/v1/residential-complex", get(list_handler::<S>))
        .route("/api/v1/residential-complex/mine", get(mine_handler::<S>))
        .route(
            "/api/v1/residential-complex/:id",
            get(retrieve_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .route(
            "/api/v1/residential-complex-news",
            post(create_news_handler::<S>),
        )
        .route(
            "/api/v1/residential-complex-news/:id",
            get(news_handler::<S>)
                .put(update_news_handler::<S>)
                .delete(delete_news_handler::<S>),
        )
        .route(
            "/api/v1/residential-complex-documents",
            post(create_document_handler::<S>),
        )
        .route(
            "/api/v1/residential-complex-documents/:id",
            get(document_handler::<S>)
                .put(update_document_handler::<S>)
                .delete(delete_document_handler::<S>),
        )
        .with_state(service)
}

async fn list_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<Vec<ComplexSummary>>, ServiceError> {
    service.list(caller).map(Json)
}

async fn mine_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
) -> Result<Json<ComplexView>, ServiceError> {
    service.mine(caller).map(Json)
}

async fn retrieve_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<ComplexId>,
) -> Result<Json<ComplexView>, ServiceError> {
    service.retrieve(caller, id).map(Json)
}

async fn update_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<ComplexId>,
    Payload(update): Payload<ComplexUpdate>,
) -> Result<Json<ComplexView>, ServiceError> {
    service.update(caller, id, update).map(Json)
}

async fn delete_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<ComplexId>,
) -> Result<StatusCode, ServiceError> {
    service.delete(caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_news_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(draft): Payload<NewsDraft>,
) -> Result<(StatusCode, Json<News>), ServiceError> {
    let news = service.create_news(caller, draft, calendar::today())?;
    Ok((StatusCode::CREATED, Json(news)))
}

async fn news_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<NewsId>,
) -> Result<Json<News>, ServiceError> {
    service.news(caller, id).map(Json)
}

async fn update_news_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<NewsId>,
    Payload(draft): Payload<NewsDraft>,
) -> Result<Json<News>, ServiceError> {
    service.update_news(caller, id, draft).map(Json)
}

async fn delete_news_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<NewsId>,
) -> Result<StatusCode, ServiceError> {
    service.delete_news(caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_document_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Payload(draft): Payload<DocumentDraft>,
) -> Result<(StatusCode, Json<Document>), ServiceError> {
    let document = service.create_document(caller, draft)?;
    Ok((StatusCode::CREATED, Json(document)))
}

async fn document_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<DocumentId>,
) -> Result<Json<Document>, ServiceError> {
    service.document(caller, id).map(Json)
}

async fn update_document_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<DocumentId>,
    Payload(draft): Payload<DocumentDraft>,
) -> Result<Json<Document>, ServiceError> {
    service.update_document(caller, id, draft).map(Json)
}

async fn delete_document_handler<S: EntityStore + 'static>(
    State(service): Shared<S>,
    caller: Caller,
    Path(id): Path<DocumentId>,
) -> Result<StatusCode, ServiceError> {
    service.delete_document(caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}
