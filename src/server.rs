//! Embedded HTTP server exposing the review API
//!
//! The reader frontend is served from its own origin and talks to this
//! service over localhost, so CORS is left permissive. The surface maps
//! 1:1 onto the study operations: get the next due batch, submit a review,
//! preview a review, plus the flashcard CRUD the frontend needs.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::cards::{storage::CardStorageError, Flashcard};
use crate::service::{DueCard, ReviewPreview, ServiceError, StudyService};
use crate::srs::{algorithm::format_interval, SchedulingState, SrsStats, SrsStorageError};

/// Server state shared across requests
#[derive(Clone)]
pub struct ServerState {
    service: Arc<Mutex<StudyService>>,
    /// Batch size used when a due query carries no explicit limit
    default_batch_size: usize,
}

/// Review API server handle for managing the server lifecycle
pub struct ServerHandle {
    /// Address the server is listening on
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ServerHandle {
    /// Stop the server gracefully
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Start the review API server.
///
/// Returns a handle that can be used to get the bound address and stop the
/// server.
pub async fn start_server(
    service: StudyService,
    bind_addr: &str,
    port: u16,
    default_batch_size: usize,
) -> Result<ServerHandle, Box<dyn std::error::Error + Send + Sync>> {
    let state = ServerState {
        service: Arc::new(Mutex::new(service)),
        default_batch_size,
    };

    let app = router(state);

    let listener = TcpListener::bind((bind_addr, port)).await?;
    let addr = listener.local_addr()?;

    log::info!("Review API server started on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                log::info!("Review API server shutting down");
            })
            .await
            .ok();
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/srs/due", get(due_cards))
        .route("/srs/review", post(submit_review))
        .route("/srs/preview", post(preview_review))
        .route("/srs/states/{card_id}", get(get_state))
        .route("/srs/stats", get(get_stats))
        .route("/flashcards", get(list_cards).post(create_card))
        .route(
            "/flashcards/{card_id}",
            get(get_card).delete(delete_card),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ==================== Error mapping ====================

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Srs(_) => StatusCode::BAD_REQUEST,
        ServiceError::SrsStorage(SrsStorageError::StateNotFound(_)) => StatusCode::NOT_FOUND,
        ServiceError::SrsStorage(SrsStorageError::Conflict { .. }) => StatusCode::CONFLICT,
        ServiceError::CardStorage(CardStorageError::CardNotFound(_)) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Review API internal error: {}", self.0);
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// ==================== Wire types ====================

#[derive(Deserialize)]
struct DueQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DueResponse {
    cards: Vec<DueCard>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRequest {
    card_id: Uuid,
    /// UI rating: 1=Again, 2=Hard, 3=Good, 4=Easy
    rating: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewResponse {
    state: SchedulingState,
    /// Human-readable time until the next review ("10m", "4d", ...)
    next_review_in: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewRequest {
    card_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCardRequest {
    front: String,
    back: String,
    #[serde(default)]
    reading: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

// ==================== Handlers ====================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn due_cards(
    State(state): State<ServerState>,
    Query(query): Query<DueQuery>,
) -> Result<Json<DueResponse>, ApiError> {
    let limit = query.limit.unwrap_or(state.default_batch_size);
    let service = state.service.lock().unwrap();
    let cards = service.due_batch(Utc::now(), limit)?;
    Ok(Json(DueResponse { cards }))
}

async fn submit_review(
    State(state): State<ServerState>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let service = state.service.lock().unwrap();
    let reviewed = service.submit_review(request.card_id, request.rating, Utc::now())?;
    let next_review_in = format_interval(reviewed.interval_days);
    Ok(Json(ReviewResponse {
        state: reviewed,
        next_review_in,
    }))
}

async fn preview_review(
    State(state): State<ServerState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<ReviewPreview>, ApiError> {
    let service = state.service.lock().unwrap();
    let preview = service.preview(request.card_id, Utc::now())?;
    Ok(Json(preview))
}

async fn get_state(
    State(state): State<ServerState>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<SchedulingState>, ApiError> {
    let service = state.service.lock().unwrap();
    let scheduling = service.state(card_id)?;
    Ok(Json(scheduling))
}

async fn get_stats(
    State(state): State<ServerState>,
) -> Result<Json<SrsStats>, ApiError> {
    let service = state.service.lock().unwrap();
    let stats = service.stats(Utc::now())?;
    Ok(Json(stats))
}

async fn list_cards(
    State(state): State<ServerState>,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    let service = state.service.lock().unwrap();
    let cards = service.list_cards()?;
    Ok(Json(cards))
}

async fn create_card(
    State(state): State<ServerState>,
    Json(request): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<Flashcard>), ApiError> {
    let service = state.service.lock().unwrap();
    let card = service.create_card(
        request.front,
        request.back,
        request.reading,
        request.notes,
        request.tags,
        Utc::now(),
    )?;
    Ok((StatusCode::CREATED, Json(card)))
}

async fn get_card(
    State(state): State<ServerState>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<Flashcard>, ApiError> {
    let service = state.service.lock().unwrap();
    let card = service.get_card(card_id)?;
    Ok(Json(card))
}

async fn delete_card(
    State(state): State<ServerState>,
    Path(card_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let service = state.service.lock().unwrap();
    service.delete_card(card_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::SrsError;

    #[test]
    fn error_statuses() {
        assert_eq!(
            status_for(&ServiceError::Srs(SrsError::InvalidRating(7))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ServiceError::SrsStorage(SrsStorageError::StateNotFound(
                Uuid::new_v4()
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ServiceError::SrsStorage(SrsStorageError::Conflict {
                card_id: Uuid::new_v4(),
                expected: 1,
                found: 2,
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&ServiceError::CardStorage(CardStorageError::CardNotFound(
                Uuid::new_v4()
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ServiceError::CardStorage(CardStorageError::Json(
                serde_json::from_str::<Flashcard>("not json").unwrap_err()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
