use agentform::compile;
use agentform::errors::SubmitError;
use agentform::sink::JsonlInputSink;
use agentform::submission::submit_inputs;
use anyhow::Result;
use console::style;
use std::path::Path;

use crate::agent_file::load_agent;
use crate::form::prompt_fields;

pub async fn execute(path: &Path, session: Option<String>, out: &Path) -> Result<()> {
    let agent = load_agent(path)?;
    agent.validate()?;
    let schema = compile(&agent.required_inputs)?;

    cliclack::intro(style(format!(" {} ", agent.name)).on_cyan().black())?;
    if let Some(description) = &agent.description {
        cliclack::log::info(description)?;
    }

    let chat_session_id = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let values = prompt_fields(&agent.required_inputs, &schema)?;

    let sink = JsonlInputSink::new(out);
    match submit_inputs(&agent, &chat_session_id, values, &sink).await {
        Ok(submission) => {
            cliclack::outro(format!(
                "Inputs for session {} saved to {}",
                submission.chat_session_id,
                out.display()
            ))?;
            println!("{}", serde_json::to_string_pretty(&submission.inputs)?);
            Ok(())
        }
        Err(SubmitError::Invalid(result)) => {
            for (field, message) in &result.errors {
                cliclack::log::error(format!("{}: {}", field, message))?;
            }
            cliclack::outro_cancel("Inputs were not saved")?;
            Err(SubmitError::Invalid(result).into())
        }
        Err(e) => {
            cliclack::outro_cancel("Inputs were not saved")?;
            Err(e.into())
        }
    }
}
