use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SubmitError;
use crate::models::agent::AgentDefinition;
use crate::models::field::in_display_order;
use crate::models::value::SubmittedValues;
use crate::schema;
use crate::sink::{AgentInputRecord, InputSink};

/// What a successful submission hands back to the chat UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub chat_session_id: String,
    pub inputs: SubmittedValues,
}

/// Validate an end user's inputs for `agent` and forward them to storage.
///
/// Nothing is written unless every field passes. Blank optional values are not stored.
pub async fn submit_inputs(
    agent: &AgentDefinition,
    chat_session_id: &str,
    values: SubmittedValues,
    sink: &dyn InputSink,
) -> Result<Submission, SubmitError> {
    let schema = schema::compile(&agent.required_inputs)?;
    let result = schema.validate(&values);
    if !result.valid {
        return Err(SubmitError::Invalid(result));
    }

    let validated_at = Utc::now();
    let records: Vec<AgentInputRecord> = in_display_order(&agent.required_inputs)
        .into_iter()
        .filter_map(|input| {
            let value = values.get(&input.name).filter(|value| !value.is_blank())?;
            Some(AgentInputRecord {
                id: Uuid::new_v4(),
                agent_id: agent.id.clone(),
                field_name: input.name.clone(),
                chat_session_id: chat_session_id.to_string(),
                value: value.clone(),
                is_valid: true,
                validated_at,
            })
        })
        .collect();

    if !records.is_empty() {
        let fields: Vec<String> = records.iter().map(|r| r.field_name.clone()).collect();
        if let Err(source) = sink.save(records).await {
            tracing::warn!("failed to save inputs for session {}: {}", chat_session_id, source);
            return Err(SubmitError::Sink {
                fields,
                source: source.into(),
            });
        }
    }

    Ok(Submission {
        chat_session_id: chat_session_id.to_string(),
        inputs: values,
    })
}
