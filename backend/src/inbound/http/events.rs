//! Event API handlers, including RSVP join/leave.
//!
//! ```text
//! POST   /api/v1/events
//! GET    /api/v1/events
//! GET    /api/v1/events/{id}
//! PUT    /api/v1/events/{id}
//! DELETE /api/v1/events/{id}
//! POST   /api/v1/events/{id}/rsvp
//! POST   /api/v1/events/{id}/leave
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{
    CreateEventRequest, DeleteEventRequest, JoinOutcome, UpdateEventRequest,
};
use crate::domain::{Error, Event, EventDraft, EventId, EventPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_rfc3339_timestamp, parse_uuid};

/// Request payload for creating an event.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequestBody {
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Scheduled start time, RFC 3339.
    #[schema(format = "date-time")]
    pub starts_at: Option<String>,
    /// Human-readable venue.
    pub location: Option<String>,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// Maximum number of attendees; immutable once set.
    pub capacity: i32,
}

/// Request payload for updating an event's presentation fields.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequestBody {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement start time, RFC 3339.
    #[schema(format = "date-time")]
    pub starts_at: Option<String>,
    /// Replacement venue.
    pub location: Option<String>,
    /// Replacement cover image URL.
    pub image_url: Option<String>,
}

/// Response payload describing an event.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponseBody {
    /// Stable event identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Scheduled start time, RFC 3339.
    #[schema(format = "date-time")]
    pub starts_at: Option<String>,
    /// Human-readable venue.
    pub location: Option<String>,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// Maximum number of attendees.
    pub capacity: i32,
    /// Current attendee count.
    pub attendees_count: i32,
    /// Identifier of the creating user.
    #[schema(format = "uuid")]
    pub created_by: String,
}

impl From<Event> for EventResponseBody {
    fn from(event: Event) -> Self {
        Self {
            id: event.id().to_string(),
            title: event.title().to_owned(),
            description: event.description().map(str::to_owned),
            starts_at: event.starts_at().map(|at| at.to_rfc3339()),
            location: event.location().map(str::to_owned),
            image_url: event.image_url().map(str::to_owned),
            capacity: event.capacity(),
            attendees_count: event.attendees_count(),
            created_by: event.created_by().to_string(),
        }
    }
}

/// Response payload for a successful RSVP.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponseBody {
    /// Always `"joined"`.
    pub status: String,
    /// Attendee count after the join.
    pub attendees_count: i32,
}

/// Response payload for a leave request.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveResponseBody {
    /// Always true; leave is idempotent.
    pub left: bool,
}

fn parse_event_id(raw: &str) -> Result<EventId, Error> {
    parse_uuid(raw, FieldName::new("eventId")).map(EventId::from_uuid)
}

fn parse_draft(body: CreateEventRequestBody) -> Result<EventDraft, Error> {
    Ok(EventDraft {
        title: body.title,
        description: body.description,
        starts_at: parse_optional_rfc3339_timestamp(body.starts_at, FieldName::new("startsAt"))?,
        location: body.location,
        image_url: body.image_url,
        capacity: body.capacity,
    })
}

fn parse_patch(body: UpdateEventRequestBody) -> Result<EventPatch, Error> {
    Ok(EventPatch {
        title: body.title,
        description: body.description,
        starts_at: parse_optional_rfc3339_timestamp(body.starts_at, FieldName::new("startsAt"))?,
        location: body.location,
        image_url: body.image_url,
    })
}

/// Create an event owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventRequestBody,
    responses(
        (status = 200, description = "Event created", body = EventResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent",
    security(("SessionCookie" = []))
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateEventRequestBody>,
) -> ApiResult<web::Json<EventResponseBody>> {
    let created_by = session.require_user_id()?;
    let draft = parse_draft(payload.into_inner())?;

    let event = state
        .events
        .create_event(CreateEventRequest { draft, created_by })
        .await?;

    Ok(web::Json(EventResponseBody::from(event)))
}

/// List all events, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "Events", body = [EventResponseBody])
    ),
    tags = ["events"],
    operation_id = "listEvents",
    security([])
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<EventResponseBody>>> {
    let events = state.events_query.list_events().await?;
    Ok(web::Json(
        events.into_iter().map(EventResponseBody::from).collect(),
    ))
}

/// Fetch a single event.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = EventResponseBody),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "getEvent",
    security([])
)]
#[get("/events/{id}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EventResponseBody>> {
    let event_id = parse_event_id(&path.into_inner())?;
    let event = state.events_query.get_event(event_id).await?;
    Ok(web::Json(EventResponseBody::from(event)))
}

/// Update an event's presentation fields (owner only).
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    request_body = UpdateEventRequestBody,
    responses(
        (status = 200, description = "Event updated", body = EventResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not the event creator", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "updateEvent",
    security(("SessionCookie" = []))
)]
#[put("/events/{id}")]
pub async fn update_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateEventRequestBody>,
) -> ApiResult<web::Json<EventResponseBody>> {
    let acting_user = session.require_user_id()?;
    let event_id = parse_event_id(&path.into_inner())?;
    let patch = parse_patch(payload.into_inner())?;

    let event = state
        .events
        .update_event(UpdateEventRequest {
            event_id,
            acting_user,
            patch,
        })
        .await?;

    Ok(web::Json(EventResponseBody::from(event)))
}

/// Delete an event and its attendance entries (owner only).
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not the event creator", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "deleteEvent",
    security(("SessionCookie" = []))
)]
#[delete("/events/{id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let acting_user = session.require_user_id()?;
    let event_id = parse_event_id(&path.into_inner())?;

    state
        .events
        .delete_event(DeleteEventRequest {
            event_id,
            acting_user,
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// RSVP to an event.
///
/// At most `capacity` concurrent joiners succeed; the rest receive a 409
/// with code `event_full`. A repeated join by the same user yields a 409
/// with code `already_joined`.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/rsvp",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Joined", body = JoinResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Event full or already joined", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "rsvpEvent",
    security(("SessionCookie" = []))
)]
#[post("/events/{id}/rsvp")]
pub async fn rsvp_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<JoinResponseBody>> {
    let user_id = session.require_user_id()?;
    let event_id = parse_event_id(&path.into_inner())?;

    match state.admission.join(user_id, event_id).await? {
        JoinOutcome::Joined { attendees_count } => Ok(web::Json(JoinResponseBody {
            status: "joined".to_owned(),
            attendees_count,
        })),
        JoinOutcome::EventFull => Err(Error::conflict("event is full")
            .with_details(json!({ "code": "event_full" }))),
        JoinOutcome::AlreadyJoined => Err(Error::conflict("already joined")
            .with_details(json!({ "code": "already_joined" }))),
    }
}

/// Leave an event. Idempotent.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/leave",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Left (or was never attending)", body = LeaveResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "leaveEvent",
    security(("SessionCookie" = []))
)]
#[post("/events/{id}/leave")]
pub async fn leave_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LeaveResponseBody>> {
    let user_id = session.require_user_id()?;
    let event_id = parse_event_id(&path.into_inner())?;

    state.admission.leave(user_id, event_id).await?;
    Ok(web::Json(LeaveResponseBody { left: true }))
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
