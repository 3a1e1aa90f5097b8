use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

use super::field::FieldDescriptor;
use crate::control::{render_control_kind, ControlKind};
use crate::errors::AgentError;
use crate::schema;

/// An agent may ask for at most this many inputs before a chat starts
pub const MAX_REQUIRED_INPUTS: usize = 4;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Hosted model providers the chat proxy can stream from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(try_from = "String", into = "String")]
pub enum ModelProvider {
    Claude,
    OpenAi,
    OpenRouter,
}

impl TryFrom<String> for ModelProvider {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ModelProvider::from_str(&value).map_err(|_| format!("Unsupported provider: {}", value))
    }
}

impl From<ModelProvider> for String {
    fn from(provider: ModelProvider) -> Self {
        provider.to_string()
    }
}

/// Which model a chat with this agent streams from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSelection {
    pub provider: ModelProvider,
    #[serde(alias = "model_id")]
    pub model_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Draft,
    Active,
    Inactive,
}

impl AgentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AgentStatus::Draft => "Draft",
            AgentStatus::Active => "Active",
            AgentStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfiguration {
    #[serde(default, alias = "system_prompt")]
    pub system_prompt: String,
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_version() -> u32 {
    1
}

/// An agent as its owner defines it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub model: ModelSelection,
    #[serde(default)]
    pub configuration: AgentConfiguration,
    #[serde(default, alias = "max_tokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default, alias = "is_premium")]
    pub is_premium: bool,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, alias = "is_public")]
    pub is_public: bool,
    #[serde(default, alias = "required_inputs")]
    pub required_inputs: Vec<FieldDescriptor>,
}

impl AgentDefinition {
    pub fn new<N, P>(name: N, model: ModelSelection, system_prompt: P) -> Self
    where
        N: Into<String>,
        P: Into<String>,
    {
        Self {
            id: None,
            name: name.into(),
            description: None,
            model,
            configuration: AgentConfiguration {
                system_prompt: system_prompt.into(),
            },
            max_tokens: None,
            temperature: DEFAULT_TEMPERATURE,
            is_premium: false,
            status: AgentStatus::default(),
            version: 1,
            is_public: false,
            required_inputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: FieldDescriptor) -> Self {
        self.required_inputs.push(input);
        self
    }

    /// Check everything an owner can get wrong, reporting all problems at once
    pub fn validate(&self) -> Result<(), AgentError> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("Name is required".to_string());
        }
        if self.model.model_id.trim().is_empty() {
            problems.push("Model ID is required".to_string());
        }
        if self.configuration.system_prompt.trim().is_empty() {
            problems.push("System prompt is required".to_string());
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            problems.push(format!(
                "Temperature must be between 0 and 1, got {}",
                self.temperature
            ));
        }
        if self.max_tokens == Some(0) {
            problems.push("Max tokens must be positive".to_string());
        }
        if self.required_inputs.len() > MAX_REQUIRED_INPUTS {
            problems.push(format!(
                "Maximum of {} inputs allowed",
                MAX_REQUIRED_INPUTS
            ));
        }

        let mut names = HashSet::new();
        for input in &self.required_inputs {
            if input.name.trim().is_empty() {
                problems.push("Input name is required".to_string());
            } else if !names.insert(input.name.as_str()) {
                problems.push(format!("Input name '{}' must be unique", input.name));
            }
            if input.label.trim().is_empty() {
                problems.push(format!("Input '{}' needs a label", input.name));
            }
            if input.order_index < 0 {
                problems.push(format!(
                    "Input '{}' has a negative order index",
                    input.name
                ));
            }
            // compiled one at a time so a bad pattern is reported for every input
            if !input.name.is_empty() {
                match schema::compile(std::slice::from_ref(input)) {
                    Ok(compiled) => {
                        let required = compiled.fields().iter().any(|field| field.is_required());
                        if required && render_control_kind(input) == ControlKind::None {
                            problems.push(format!(
                                "Input '{}' has no control and cannot be required",
                                input.name
                            ));
                        }
                    }
                    Err(err) => problems.push(err.to_string()),
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AgentError(problems))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::ValidationRule;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn model() -> ModelSelection {
        ModelSelection {
            provider: ModelProvider::OpenAi,
            model_id: "gpt-4o".to_string(),
        }
    }

    #[test]
    fn test_provider_names() {
        let names: Vec<String> = ModelProvider::iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["claude", "openai", "openrouter"]);

        let err = serde_json::from_value::<ModelProvider>(json!("gemini")).unwrap_err();
        assert!(err.to_string().contains("Unsupported provider: gemini"));
    }

    #[test]
    fn test_definition_defaults() {
        let agent: AgentDefinition = serde_json::from_value(json!({
            "name": "Summarizer",
            "model": {"provider": "claude", "model_id": "claude-3-5-sonnet"},
            "configuration": {"systemPrompt": "Summarize the video."}
        }))
        .unwrap();

        assert_eq!(agent.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(agent.status, AgentStatus::Draft);
        assert_eq!(agent.status.label(), "Draft");
        assert_eq!(agent.version, 1);
        assert!(!agent.is_public);
        assert!(agent.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let mut agent = AgentDefinition::new("", model(), " ");
        agent.temperature = 1.5;
        agent.max_tokens = Some(0);

        let AgentError(problems) = agent.validate().unwrap_err();
        assert_eq!(problems.len(), 4);
        assert!(problems.contains(&"Name is required".to_string()));
        assert!(problems.contains(&"System prompt is required".to_string()));
    }

    #[test]
    fn test_validate_inputs() {
        let mut agent = AgentDefinition::new("Helper", model(), "Be helpful.")
            .with_input(FieldDescriptor::new("topic", "Topic", "text"))
            .with_input(FieldDescriptor::new("topic", "", "text"))
            .with_input(
                FieldDescriptor::new("code", "Code", "text")
                    .with_rule(ValidationRule::pattern("(")),
            );
        agent.required_inputs[2].order_index = -1;

        let AgentError(problems) = agent.validate().unwrap_err();
        assert!(problems.contains(&"Input name 'topic' must be unique".to_string()));
        assert!(problems.contains(&"Input 'topic' needs a label".to_string()));
        assert!(problems.contains(&"Input 'code' has a negative order index".to_string()));
        assert!(problems.iter().any(|p| p.contains("invalid pattern")));
    }

    #[test]
    fn test_required_input_needs_a_control() {
        let agent = AgentDefinition::new("Tagger", model(), "Tag the post.")
            .with_input(FieldDescriptor::new("tags", "Tags", "multiselect"))
            .with_input(
                FieldDescriptor::new("labels", "Labels", "multiselect")
                    .optional()
                    .with_rule(ValidationRule::required()),
            );

        let AgentError(problems) = agent.validate().unwrap_err();
        assert_eq!(
            problems,
            vec![
                "Input 'tags' has no control and cannot be required".to_string(),
                "Input 'labels' has no control and cannot be required".to_string(),
            ]
        );

        let optional = AgentDefinition::new("Tagger", model(), "Tag the post.")
            .with_input(FieldDescriptor::new("tags", "Tags", "multiselect").optional());
        assert!(optional.validate().is_ok());
    }

    #[test]
    fn test_too_many_inputs() {
        let mut agent = AgentDefinition::new("Helper", model(), "Be helpful.");
        for i in 0..=MAX_REQUIRED_INPUTS {
            agent = agent.with_input(FieldDescriptor::new(format!("f{}", i), "Field", "text"));
        }
        let AgentError(problems) = agent.validate().unwrap_err();
        assert_eq!(problems, vec!["Maximum of 4 inputs allowed".to_string()]);
    }
}
