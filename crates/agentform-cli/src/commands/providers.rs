use agentform::models::agent::ModelProvider;
use anyhow::Result;
use console::style;
use strum::IntoEnumIterator;

pub fn execute() -> Result<()> {
    println!("{}", style("Model providers").bold());
    for provider in ModelProvider::iter() {
        println!("  {}", style(provider).cyan());
    }
    Ok(())
}
