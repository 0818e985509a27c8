//! Request handlers.
//!
//! `POST /set_recognized` registers a reference image by URL, `POST /check`
//! queries one. The engine is synchronous, so its calls run on the
//! blocking pool.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::engine::{MatchEngine, QueryOutcome, RegisterOutcome};
use crate::error::EngineError;
use crate::server::error::{ServerError, ServerResult};
use crate::server::state::ServerState;

/// Body for `/set_recognized` and `/check`: the image to fetch.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

/// Register a reference image.
///
/// `200` with the assigned id, or `409` when an exactly-equal fingerprint
/// is already registered.
pub async fn set_recognized(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<ImageRef>,
) -> ServerResult<Response> {
    let bytes = state.source.fetch(&req.url).await?;

    let outcome = run_engine(state.engine.clone(), move |engine| {
        engine.register(&bytes)
    })
    .await?;

    match outcome {
        RegisterOutcome::Registered { id } => Ok((
            StatusCode::OK,
            Json(json!({ "result": "registered", "id": id })),
        )
            .into_response()),
        RegisterOutcome::DuplicateRejected => Ok((
            StatusCode::CONFLICT,
            Json(json!({ "error": "Image already known" })),
        )
            .into_response()),
    }
}

/// Check an image against the registry.
///
/// Always `200`; the body says whether the first-acceptable scan found a
/// match and at what combined distance.
pub async fn check(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<ImageRef>,
) -> ServerResult<Response> {
    let bytes = state.source.fetch(&req.url).await?;

    let outcome = run_engine(state.engine.clone(), move |engine| engine.query(&bytes)).await?;

    let body = match outcome {
        QueryOutcome::Match { id, score } => {
            json!({ "result": "match", "distance": score, "id": id })
        }
        QueryOutcome::NoMatch => json!({ "result": "no match" }),
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// List the ids of all registered images, in insertion order.
pub async fn known(State(state): State<Arc<ServerState>>) -> ServerResult<Response> {
    let entries = run_engine(state.engine.clone(), |engine| engine.list_known()).await?;

    let ids: Vec<u64> = entries.iter().map(|(id, _)| *id).collect();
    Ok((
        StatusCode::OK,
        Json(json!({ "count": ids.len(), "ids": ids })),
    )
        .into_response())
}

/// Liveness plus registry size.
pub async fn health(State(state): State<Arc<ServerState>>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "known_images": state.engine.known_count(),
        })),
    )
        .into_response()
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": { "code": "NOT_FOUND", "message": "no such route" } })),
    )
        .into_response()
}

/// Run a synchronous engine call on the blocking pool.
async fn run_engine<T, F>(engine: Arc<MatchEngine>, f: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce(&MatchEngine) -> Result<T, EngineError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&engine))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}
