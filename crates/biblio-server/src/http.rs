//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request, State,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use biblio_core::{BiblioError, NewProject, ProjectSummary, ProjectUpdate, Source, SourcePayload};

use crate::AppState;

/// A core error rendered as `{"message": ...}` with a matching status
#[derive(Debug)]
pub struct ApiError(pub BiblioError);

impl From<BiblioError> for ApiError {
    fn from(err: BiblioError) -> Self {
        ApiError(err)
    }
}

/// Status code for each error kind
pub fn status_for(err: &BiblioError) -> StatusCode {
    match err {
        BiblioError::Validation(_) => StatusCode::BAD_REQUEST,
        BiblioError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        BiblioError::ProjectNotFound(_) | BiblioError::SourceNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        BiblioError::AlreadyExists(_) => StatusCode::CONFLICT,
        BiblioError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        BiblioError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = match &self.0 {
            BiblioError::Unauthorized(_) => "Invalid password".to_string(),
            BiblioError::Storage(_) => "Internal storage error".to_string(),
            other => other.to_string(),
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// JSON body whose decode failures answer 400 through [`ApiError`]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError(BiblioError::Validation(rejection.body_text()))),
        }
    }
}

/// Query string whose decode failures answer 400 through [`ApiError`]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiError(BiblioError::Validation(rejection.body_text()))),
        }
    }
}

fn message(text: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": text }))
}

// ============================================================================
// Projects
// ============================================================================

/// Optional single-project selector on `GET /projects`
#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    pub project_id: Option<String>,
}

/// List all projects, or fetch one when `project_id` is given
pub async fn get_projects(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ProjectQuery>,
) -> Result<Response, ApiError> {
    match query.project_id.filter(|id| !id.is_empty()) {
        Some(id) => Ok(Json(state.service.get_project(&id).await?).into_response()),
        None => Ok(Json(state.service.list_projects().await?).into_response()),
    }
}

#[derive(Debug, Deserialize)]
pub struct ExistsQuery {
    pub project_id: String,
}

/// Existence check, `{"exists": bool}`
pub async fn project_exists(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ExistsQuery>,
) -> ApiResult<serde_json::Value> {
    let exists = state.service.project_exists(&query.project_id).await?;
    Ok(Json(serde_json::json!({ "exists": exists })))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewProject>,
) -> ApiResult<ProjectSummary> {
    Ok(Json(state.service.create_project(payload).await?))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ProjectUpdate>,
) -> ApiResult<ProjectSummary> {
    Ok(Json(state.service.update_project(payload).await?))
}

#[derive(Debug, Deserialize)]
pub struct DeleteProjectQuery {
    pub project_id: String,
    pub password: String,
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<DeleteProjectQuery>,
) -> ApiResult<serde_json::Value> {
    state
        .service
        .delete_project(&query.project_id, &query.password)
        .await?;
    Ok(message("Project deleted"))
}

// ============================================================================
// Sources
// ============================================================================

pub async fn list_sources(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> ApiResult<Vec<Source>> {
    Ok(Json(state.service.list_sources(&project_id).await?))
}

pub async fn create_source(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    ApiJson(payload): ApiJson<SourcePayload>,
) -> ApiResult<Source> {
    Ok(Json(state.service.create_source(&project_id, payload).await?))
}

pub async fn get_source(
    State(state): State<Arc<AppState>>,
    Path((project_id, source_id)): Path<(String, String)>,
) -> ApiResult<Source> {
    Ok(Json(state.service.get_source(&project_id, &source_id).await?))
}

pub async fn update_source(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    ApiJson(payload): ApiJson<SourcePayload>,
) -> ApiResult<Source> {
    Ok(Json(state.service.update_source(&project_id, payload).await?))
}

pub async fn delete_source(
    State(state): State<Arc<AppState>>,
    Path((project_id, source_id)): Path<(String, String)>,
) -> ApiResult<serde_json::Value> {
    state.service.delete_source(&project_id, &source_id).await?;
    Ok(message("Source deleted"))
}
