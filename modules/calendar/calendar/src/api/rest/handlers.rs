//! REST handlers for the calendar module.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use calendar_sdk::{CallerContext, EventDraft, EventFilter, SaveMode};
use uuid::Uuid;

use super::dto::{EventDto, EventQuery, MetricsDto, UpdateTimezoneRequest, UserDto};
use super::error::ApiResult;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

fn created_or_ok(created: bool) -> StatusCode {
    if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

/// Path id wins; a body id that disagrees with it is rejected.
fn draft_for_path(id: Uuid, dto: EventDto) -> Result<EventDraft, DomainError> {
    if dto.id.is_some_and(|body_id| body_id != id) {
        return Err(DomainError::validation("id", "does not match the path"));
    }
    let mut draft = EventDraft::try_from(dto)?;
    draft.id = Some(id);
    Ok(draft)
}

/// GET /calendar/v1/events
pub async fn list_events(
    Extension(service): Extension<Arc<Service>>,
    Extension(ctx): Extension<CallerContext>,
    Query(query): Query<EventQuery>,
) -> ApiResult<Json<Vec<EventDto>>> {
    let filter = EventFilter::from(query);
    let events = service.list_events(&ctx, &filter).await?;
    Ok(Json(events.into_iter().map(EventDto::from).collect()))
}

/// POST /calendar/v1/events
///
/// Create, or fully replace when the body carries an existing id.
pub async fn upsert_event(
    Extension(service): Extension<Arc<Service>>,
    Extension(ctx): Extension<CallerContext>,
    Json(dto): Json<EventDto>,
) -> ApiResult<(StatusCode, Json<EventDto>)> {
    let draft = EventDraft::try_from(dto)?;
    let outcome = service.save_event(&ctx, draft, SaveMode::Upsert).await?;
    Ok((created_or_ok(outcome.created), Json(outcome.event.into())))
}

/// GET /calendar/v1/events/{id}
pub async fn get_event(
    Extension(service): Extension<Arc<Service>>,
    Extension(ctx): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EventDto>> {
    let event = service.get_event(&ctx, id).await?;
    Ok(Json(event.into()))
}

/// POST /calendar/v1/events/{id}
pub async fn create_event(
    Extension(service): Extension<Arc<Service>>,
    Extension(ctx): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(dto): Json<EventDto>,
) -> ApiResult<(StatusCode, Json<EventDto>)> {
    let draft = draft_for_path(id, dto)?;
    let outcome = service
        .save_event(&ctx, draft, SaveMode::CreateOnly)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome.event.into())))
}

/// PUT /calendar/v1/events/{id}
pub async fn replace_event(
    Extension(service): Extension<Arc<Service>>,
    Extension(ctx): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(dto): Json<EventDto>,
) -> ApiResult<Json<EventDto>> {
    let draft = draft_for_path(id, dto)?;
    let outcome = service
        .save_event(&ctx, draft, SaveMode::ReplaceOnly)
        .await?;
    Ok(Json(outcome.event.into()))
}

/// DELETE /calendar/v1/events/{id}
pub async fn delete_event(
    Extension(service): Extension<Arc<Service>>,
    Extension(ctx): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service.delete_event(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /calendar/v1/user/timezone
pub async fn update_timezone(
    Extension(service): Extension<Arc<Service>>,
    Extension(ctx): Extension<CallerContext>,
    Json(req): Json<UpdateTimezoneRequest>,
) -> ApiResult<Json<UserDto>> {
    let user = service.update_timezone(&ctx, &req.timezone).await?;
    Ok(Json(user.into()))
}

/// GET /calendar/v1/metrics
pub async fn metrics(
    Extension(service): Extension<Arc<Service>>,
    Extension(ctx): Extension<CallerContext>,
) -> ApiResult<Json<MetricsDto>> {
    let metrics = service.metrics(&ctx).await?;
    Ok(Json(metrics.into()))
}
