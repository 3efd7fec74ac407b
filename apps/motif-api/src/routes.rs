use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;
use motif_service::{Error, IndexStatus, ReloadReport, SearchRequest, SearchResponse};

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	fn invalid_request(message: impl Into<String>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "invalid_request", message, None)
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::Validation { .. } => Self::invalid_request(message),
			Error::IndexNotReady =>
				Self::new(StatusCode::SERVICE_UNAVAILABLE, "index_not_ready", message, None),
			Error::RetrievalUnavailable { .. } | Error::RetrieverTimeout { .. } => Self::new(
				StatusCode::SERVICE_UNAVAILABLE,
				"retrieval_unavailable",
				message,
				None,
			),
			Error::Provider { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "provider_error", message, None),
			Error::Index { .. } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "index_error", message, None),
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::invalid_request(rejection.body_text())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/patterns/search", post(search))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/index", get(index_status))
		.route("/v1/admin/index/reload", post(reload_index))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(raw) = payload?;
	let request: SearchRequest = serde_json::from_value(raw).map_err(|err| {
		let mut api_err = ApiError::invalid_request(err.to_string());

		api_err.fields = Some(vec!["$.requirements".to_string()]);

		api_err
	})?;
	let response = state.service.search(request).await?;

	Ok(Json(response))
}

async fn reload_index(State(state): State<AppState>) -> Result<Json<ReloadReport>, ApiError> {
	let report = state.service.reload_index().await?;

	Ok(Json(report))
}

async fn index_status(State(state): State<AppState>) -> Json<IndexStatus> {
	Json(state.service.index_status())
}
