// Export route modules
pub mod agents;
pub mod inputs;
pub mod schema;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new<S: Into<String>>(error: S) -> Self {
        Self {
            error: error.into(),
            field: None,
        }
    }
}

/// Compile errors are the author's problem, reported against the offending field
pub(crate) fn schema_error_response(err: &agentform::errors::SchemaError) -> axum::response::Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: err.to_string(),
            field: err.field().map(String::from),
        }),
    )
        .into_response()
}

async fn status() -> &'static str {
    "ok"
}

// Function to configure all routes
pub fn configure(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status))
        .merge(schema::routes())
        .merge(agents::routes())
        .merge(inputs::routes(state))
}
