//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::dto::{
    ClearMessagesResponse, CountdownView, HealthResponse, NewMessage, PastMessage, PhaseChange,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::routes::countdown::{PHASE_EVENT, TICK_EVENT};
use crate::routes::messages::BULK_DELETE_FORBIDDEN;
use crate::services::CountdownTicker;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Cadence of the countdown stream.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let store_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        store: store_status,
    }))
}

// =============================================================================
// Countdown
// =============================================================================

/// GET /v1/countdown
///
/// Countdown state at the moment of the request.
pub async fn get_countdown(State(state): State<AppState>) -> HandlerResult<CountdownView> {
    let snapshot = state.clock.snapshot(state.time_source.now());
    Ok(Json(CountdownView::new(&state.label, &state.clock, &snapshot)))
}

/// GET /v1/countdown/stream
///
/// Stream the countdown via Server-Sent Events: a `tick` event every second
/// and a `phase` event whenever the display phase changes. The stream ends
/// when the server begins shutting down.
pub async fn stream_countdown(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        let mut ticker = CountdownTicker::new(state.clock);
        let mut shutdown = state.shutdown.subscribe();
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !*shutdown.borrow_and_update() {
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.changed() => break,
            }

            let snapshot = ticker.tick(state.time_source.now());
            if let Some(transition) = ticker.last_transition() {
                let change = PhaseChange::from(transition);
                yield Ok(Event::default()
                    .event(PHASE_EVENT)
                    .data(serde_json::to_string(&change).unwrap_or_default()));
            }

            let view = CountdownView::new(&state.label, &state.clock, &snapshot);
            yield Ok(Event::default()
                .event(TICK_EVENT)
                .data(serde_json::to_string(&view).unwrap_or_default()));
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

// =============================================================================
// Messages
// =============================================================================

/// GET /v1/messages
///
/// All stored messages, newest year first.
pub async fn list_messages(State(state): State<AppState>) -> HandlerResult<Vec<PastMessage>> {
    let messages = db_services::list_messages(state.repository.as_ref()).await?;
    Ok(Json(messages))
}

/// POST /v1/messages
///
/// Store a message for a future anniversary.
pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<NewMessage>, JsonRejection>,
) -> Result<(StatusCode, Json<PastMessage>), AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let record = db_services::create_message(
        state.repository.as_ref(),
        request,
        state.time_source.now(),
        state.submission_policy(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /v1/messages
///
/// Remove every message. Development only.
pub async fn clear_messages(State(state): State<AppState>) -> HandlerResult<ClearMessagesResponse> {
    if !state.dev_mode {
        return Err(AppError::Forbidden(BULK_DELETE_FORBIDDEN.to_string()));
    }

    let cleared = db_services::clear_messages(state.repository.as_ref()).await?;
    info!(cleared, "Bulk clear requested");
    Ok(Json(ClearMessagesResponse::for_count(cleared)))
}
