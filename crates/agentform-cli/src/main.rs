mod agent_file;
mod commands;
mod form;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check an agent definition and show how its inputs will be rendered
    Check {
        /// Agent definition file (YAML or JSON)
        agent: PathBuf,
    },

    /// Fill in an agent's required inputs and save them for a chat session
    Fill {
        /// Agent definition file (YAML or JSON)
        agent: PathBuf,

        /// Chat session to attach the inputs to; a new id is generated when omitted
        #[arg(short, long)]
        session: Option<String>,

        /// File the validated inputs are appended to
        #[arg(short, long, default_value = "agent-inputs.jsonl")]
        out: PathBuf,
    },

    /// List the model providers an agent can use
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { agent } => commands::check::execute(&agent),
        Command::Fill {
            agent,
            session,
            out,
        } => commands::fill::execute(&agent, session, &out).await,
        Command::Providers => commands::providers::execute(),
    }
}
