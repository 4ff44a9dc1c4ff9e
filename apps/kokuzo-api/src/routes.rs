use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use kokuzo_service::{
	ChunkSearchRequest, ChunkSearchResponse, Error, SearchRequest, SearchResponse, SeedsRequest,
	SeedsResponse,
};

#[derive(Debug, Deserialize)]
struct SeedsQuery {
	#[serde(default)]
	limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::NotFound { message } => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			Error::StoreUnavailable { message } => {
				tracing::warn!(%message, "Store unavailable.");

				Self::new(StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", message)
			},
			err @ (Error::Storage { .. } | Error::PageFetch { .. }) => {
				tracing::error!(error = %err, "Request failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal error.")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/pages/search", post(search_pages))
		.route("/v1/chunks/search", post(search_chunks))
		.route("/v1/files/{file_id}/seeds", get(seeds_by_file))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search_pages(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Json<SearchResponse> {
	Json(state.service.search_pages(payload).await)
}

async fn search_chunks(
	State(state): State<AppState>,
	Json(payload): Json<ChunkSearchRequest>,
) -> Result<Json<ChunkSearchResponse>, ApiError> {
	let response = state.service.search_chunks(payload).await?;

	Ok(Json(response))
}

async fn seeds_by_file(
	State(state): State<AppState>,
	Path(file_id): Path<i64>,
	Query(query): Query<SeedsQuery>,
) -> Result<Json<SeedsResponse>, ApiError> {
	let response =
		state.service.seeds_by_file(SeedsRequest { file_id, limit: query.limit }).await?;

	Ok(Json(response))
}
