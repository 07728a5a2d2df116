use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use super::repository::DatasetRepository;
use super::service::{LeaderboardService, LeaderboardServiceError};

#[derive(Debug, Default, Deserialize)]
pub struct RankingsQuery {
    #[serde(default)]
    pub viewer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub employee_id: String,
}

/// Router builder exposing the read side of the leaderboard over HTTP.
pub fn leaderboard_router<R>(service: Arc<LeaderboardService<R>>) -> Router
where
    R: DatasetRepository + 'static,
{
    Router::new()
        .route("/api/v1/dataset", get(dataset_handler::<R>))
        .route("/api/v1/rankings", get(rankings_handler::<R>))
        .route("/api/v1/login", post(login_handler::<R>))
        .route(
            "/api/v1/employees/:employee_id",
            get(standing_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn dataset_handler<R>(
    State(service): State<Arc<LeaderboardService<R>>>,
) -> Response
where
    R: DatasetRepository + 'static,
{
    match service.dataset() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rankings_handler<R>(
    State(service): State<Arc<LeaderboardService<R>>>,
    Query(query): Query<RankingsQuery>,
) -> Response
where
    R: DatasetRepository + 'static,
{
    match service.rankings(query.viewer.as_deref()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn login_handler<R>(
    State(service): State<Arc<LeaderboardService<R>>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    R: DatasetRepository + 'static,
{
    match service.login(&request.employee_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn standing_handler<R>(
    State(service): State<Arc<LeaderboardService<R>>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: DatasetRepository + 'static,
{
    match service.standing(&employee_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: LeaderboardServiceError) -> Response {
    AppError::from(error).into_response()
}
