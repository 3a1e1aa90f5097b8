use agentform::models::field::{in_display_order, FieldDescriptor};
use agentform::models::value::SubmittedValues;
use agentform::{compile, defaults, render_control_kind, ControlKind};
use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::schema_error_response;

#[derive(Debug, Deserialize, Serialize)]
pub struct CompileRequest {
    pub fields: Vec<FieldDescriptor>,
}

/// What a form needs to render one field
#[derive(Debug, Deserialize, Serialize)]
pub struct CompiledField {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub control: ControlKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CompileResponse {
    pub fields: Vec<CompiledField>,
    pub defaults: SubmittedValues,
}

async fn compile_fields(Json(request): Json<CompileRequest>) -> impl IntoResponse {
    let schema = match compile(&request.fields) {
        Ok(schema) => schema,
        Err(e) => return schema_error_response(&e),
    };

    let fields = in_display_order(&request.fields)
        .into_iter()
        .map(|descriptor| CompiledField {
            name: descriptor.name.clone(),
            label: descriptor.label.clone(),
            required: schema
                .field(&descriptor.name)
                .is_some_and(|field| field.is_required()),
            control: render_control_kind(descriptor),
            description: descriptor.description.clone(),
            placeholder: descriptor.placeholder.clone(),
        })
        .collect();

    (
        StatusCode::OK,
        Json(CompileResponse {
            fields,
            defaults: defaults(&request.fields),
        }),
    )
        .into_response()
}

// Configure routes for this module
pub fn routes() -> Router {
    Router::new().route("/schema/compile", post(compile_fields))
}
