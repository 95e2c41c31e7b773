//! REST transport for the context engine.
//!
//! Endpoints map one-to-one onto repository operations; payloads are the
//! context record serialized as JSON with ISO-8601 UTC timestamps. Error
//! responses carry an `{"error": ...}` body with the status encoding the
//! taxonomy: 400 for invalid input, 404 for a miss, 500 for storage faults.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::config::DossierConfig;
use crate::context::instructions::instruction_for;
use crate::context::search::SearchHit;
use crate::context::types::{Context, ContextError, Priority};
use crate::context::{delete, query, search, store};
use crate::embedding::{embed_degraded, EmbeddingProvider};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub embedding: Option<Arc<dyn EmbeddingProvider>>,
    pub config: Arc<DossierConfig>,
}

/// Build the REST router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/contexts", post(put_context).get(list_contexts))
        .route("/contexts/search", get(search_contexts))
        .route("/contexts/{key}", get(get_context).delete(delete_context))
        .with_state(state)
}

// ── Error envelope ────────────────────────────────────────────────────────────

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ContextError> for ApiError {
    fn from(err: ContextError) -> Self {
        let status = match &err {
            ContextError::NotFound { .. } => StatusCode::NOT_FOUND,
            ContextError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ContextError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(message = %self.message, "request failed");
        }
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

/// Run a repository operation against the locked connection on the blocking pool.
async fn with_conn<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> Result<T, ContextError> + Send + 'static,
{
    let db = Arc::clone(&state.db);
    tokio::task::spawn_blocking(move || {
        let mut conn = db
            .lock()
            .map_err(|e| ApiError::internal(format!("db lock poisoned: {e}")))?;
        f(&mut conn).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::internal(format!("db task failed: {e}")))?
}

// ── Handlers ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PutContextBody {
    pub project: String,
    pub key: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub priority: Option<Priority>,
}

/// `POST /contexts`: create-or-replace. 201 on a new key, 200 on a replace.
async fn put_context(
    State(state): State<AppState>,
    Json(body): Json<PutContextBody>,
) -> Result<Response, ApiError> {
    let priority = body.priority.unwrap_or_default();
    let embedding = embed_degraded(state.embedding.clone(), &body.content).await;

    let result = with_conn(&state, move |conn| {
        store::put_context(
            conn,
            &body.project,
            &body.key,
            &body.content,
            &body.tags,
            priority,
            embedding.as_deref(),
        )
    })
    .await?;

    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(result.context)).into_response())
}

#[derive(Debug, Deserialize)]
struct ProjectQuery {
    project: String,
}

/// A single-context response: the record plus its read-time instruction.
#[derive(Debug, Serialize)]
struct GetContextResponse {
    #[serde(flatten)]
    context: Context,
    instruction: String,
}

/// `GET /contexts/{key}?project=`: exact lookup, 404 on a miss.
async fn get_context(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<ProjectQuery>,
) -> Result<Json<GetContextResponse>, ApiError> {
    let context = with_conn(&state, move |conn| {
        query::get_context(conn, &params.project, &key)
    })
    .await?;

    let instruction = instruction_for(&context.tags, context.priority);
    Ok(Json(GetContextResponse {
        context,
        instruction,
    }))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    project: String,
    tag: Option<String>,
}

/// `GET /contexts?project=&tag=`: all contexts for a project, newest first.
async fn list_contexts(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Context>>, ApiError> {
    let contexts = with_conn(&state, move |conn| {
        query::list_contexts(conn, &params.project, params.tag.as_deref())
    })
    .await?;
    Ok(Json(contexts))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    project: String,
    q: String,
    k: Option<usize>,
}

/// `GET /contexts/search?project=&q=&k=`: similarity query.
///
/// Responds with an empty sequence when vector search is disabled or the
/// provider is unreachable; tag-filtered listing is the caller's fallback.
async fn search_contexts(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let k = params
        .k
        .unwrap_or(state.config.retrieval.default_max_results);

    let Some(query_embedding) = embed_degraded(state.embedding.clone(), &params.q).await else {
        return Ok(Json(Vec::new()));
    };

    let hits = with_conn(&state, move |conn| {
        search::search_contexts(conn, &params.project, &query_embedding, k)
    })
    .await?;
    Ok(Json(hits))
}

/// `DELETE /contexts/{key}?project=`: 200 when removed, 404 when absent.
async fn delete_context(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<ProjectQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let project = params.project.clone();
    let key_for_query = key.clone();
    let deleted = with_conn(&state, move |conn| {
        delete::delete_context(conn, &project, &key_for_query)
    })
    .await?;

    if !deleted {
        return Err(ApiError::from(ContextError::NotFound {
            project: params.project,
            key,
        }));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
