use crate::infra::{AppState, SharedLeaderboard, UploadState};
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use leaderboard::error::AppError;
use leaderboard::leaderboard::{
    leaderboard_router, DatasetFormat, DatasetImporter, DatasetSummary, ImportError,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UploadQuery {
    #[serde(default)]
    pub(crate) format: Option<String>,
    #[serde(default)]
    pub(crate) filename: Option<String>,
}

pub(crate) fn with_leaderboard_routes(
    service: SharedLeaderboard,
    max_upload_bytes: usize,
) -> axum::Router {
    leaderboard_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/dataset",
            axum::routing::put(upload_dataset_endpoint)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Replace the shared dataset with the raw CSV, XLSX or XLS request body.
pub(crate) async fn upload_dataset_endpoint(
    Extension(uploads): Extension<UploadState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DatasetSummary>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let format = resolve_format(&query, content_type)?;

    let records = DatasetImporter::from_bytes(format, &body).map_err(|err| {
        warn!(%format, bytes = body.len(), error = %err, "rejected dataset upload");
        err
    })?;

    let source = query
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("upload.{}", format.extension()));

    let _commit = uploads.commit.lock().await;
    if let Some(store) = uploads.store.clone() {
        let path = store.persist(format, body).await?;
        info!(path = %path.display(), "stored uploaded dataset");
    }

    let summary = uploads.service.upload(records, source)?;
    Ok(Json(summary))
}

/// Explicit `format` wins, then the filename's extension, then the request `Content-Type`.
pub(crate) fn resolve_format(
    query: &UploadQuery,
    content_type: Option<&str>,
) -> Result<DatasetFormat, ImportError> {
    if let Some(format) = query.format.as_deref().filter(|value| !value.trim().is_empty()) {
        return format.parse();
    }

    if let Some(filename) = query.filename.as_deref().filter(|value| !value.trim().is_empty()) {
        let guessed = mime_guess::from_path(filename.trim())
            .iter()
            .find_map(|mime| DatasetFormat::from_mime(mime.essence_str()));
        return guessed.ok_or_else(|| ImportError::UnsupportedFormat(filename.to_string()));
    }

    content_type
        .and_then(DatasetFormat::from_mime)
        .ok_or_else(|| {
            ImportError::UnsupportedFormat(content_type.unwrap_or("unknown").to_string())
        })
}
