use agentform::models::agent::AgentDefinition;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read an agent definition; `.json` files are parsed as JSON, anything else as YAML
pub fn load_agent(path: &Path) -> Result<AgentDefinition> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read agent file {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let agent = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(agent)
}
