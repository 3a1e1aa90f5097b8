use agentform::errors::AgentError;
use agentform::models::field::in_display_order;
use agentform::{defaults, render_control_kind, ControlKind};
use anyhow::{bail, Result};
use console::style;
use std::path::Path;

use crate::agent_file::load_agent;

pub fn execute(path: &Path) -> Result<()> {
    let agent = load_agent(path)?;

    println!(
        "{} {} ({}/{}, {})",
        style("Agent").bold(),
        style(&agent.name).bold().green(),
        agent.model.provider,
        agent.model.model_id,
        agent.status.label()
    );

    if let Err(AgentError(problems)) = agent.validate() {
        for problem in &problems {
            println!("  {} {}", style("✗").red(), problem);
        }
        bail!("{} has {} problem(s)", path.display(), problems.len());
    }

    let defaults = defaults(&agent.required_inputs);
    for descriptor in in_display_order(&agent.required_inputs) {
        let default = defaults
            .get(&descriptor.name)
            .map(|value| value.to_string())
            .unwrap_or_default();
        println!(
            "  {} {} [{}] {}{}",
            style("✓").green(),
            style(&descriptor.name).bold(),
            descriptor.field_type,
            describe_control(&render_control_kind(descriptor)),
            if default.is_empty() {
                String::new()
            } else {
                format!(" default={:?}", default)
            }
        );
    }
    Ok(())
}

fn describe_control(control: &ControlKind) -> String {
    match control {
        ControlKind::Input { input_type } => format!("{} input", input_type),
        ControlKind::Multiline => "multi-line input".to_string(),
        ControlKind::Numeric => "number input".to_string(),
        ControlKind::Dropdown { options } => format!("dropdown of {}", options.len()),
        ControlKind::None => "no control".to_string(),
    }
}
