use agentform::errors::AgentError;
use agentform::models::agent::AgentDefinition;
use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct ValidateAgentRequest {
    pub agent: AgentDefinition,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ValidateAgentResponse {
    pub valid: bool,
    pub errors: Vec<String>,
}

async fn validate_agent(Json(request): Json<ValidateAgentRequest>) -> Json<ValidateAgentResponse> {
    let errors = match request.agent.validate() {
        Ok(()) => Vec::new(),
        Err(AgentError(problems)) => problems,
    };
    Json(ValidateAgentResponse {
        valid: errors.is_empty(),
        errors,
    })
}

// Configure routes for this module
pub fn routes() -> Router {
    Router::new().route("/agents/validate", post(validate_agent))
}
