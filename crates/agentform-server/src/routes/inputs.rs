use agentform::errors::{AgentError, SubmitError};
use agentform::models::agent::AgentDefinition;
use agentform::models::field::FieldDescriptor;
use agentform::models::value::SubmittedValues;
use agentform::submission::submit_inputs;
use agentform::compile;
use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::agents::ValidateAgentResponse;
use super::{schema_error_response, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct ValidateInputsRequest {
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub values: SubmittedValues,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInputsRequest {
    pub agent: AgentDefinition,
    #[serde(alias = "chat_session_id")]
    pub chat_session_id: String,
    #[serde(default)]
    pub values: SubmittedValues,
}

async fn validate_inputs(Json(request): Json<ValidateInputsRequest>) -> impl IntoResponse {
    match compile(&request.fields) {
        Ok(schema) => (StatusCode::OK, Json(schema.validate(&request.values))).into_response(),
        Err(e) => schema_error_response(&e),
    }
}

async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitInputsRequest>,
) -> impl IntoResponse {
    if request.chat_session_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Chat session id is required")),
        )
            .into_response();
    }

    if let Err(AgentError(problems)) = request.agent.validate() {
        tracing::warn!(
            "rejecting inputs for invalid agent '{}': {}",
            request.agent.name,
            problems.join("; ")
        );
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidateAgentResponse {
                valid: false,
                errors: problems,
            }),
        )
            .into_response();
    }

    match submit_inputs(
        &request.agent,
        &request.chat_session_id,
        request.values,
        state.sink.as_ref(),
    )
    .await
    {
        Ok(submission) => (StatusCode::OK, Json(submission)).into_response(),
        Err(SubmitError::Schema(e)) => schema_error_response(&e),
        Err(SubmitError::Invalid(result)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(result)).into_response()
        }
        Err(e) => {
            tracing::error!("Error submitting inputs: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/inputs/validate", post(validate_inputs))
        .route("/inputs/submit", post(submit))
        .with_state(state)
}
