//! CLI command definitions and dispatch.

pub mod graph;
pub mod plan;
pub mod render;
pub mod stack;

use clap::{Parser, Subcommand};

/// topoform — compose the web application topology.
#[derive(Parser, Debug)]
#[command(name = "topoform", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Stack configuration.
    #[command(flatten)]
    pub stack: stack::StackArgs,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, env = "TOPOFORM_LOG_JSON")]
    pub log_json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the units in creation order with their outputs and dependencies.
    Plan(plan::PlanArgs),
    /// Render the instance bootstrap script.
    Render(render::RenderArgs),
    /// Print the dependency graph in Graphviz DOT format.
    Graph(graph::GraphArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.stack.resolve()?;
    match cli.command {
        Command::Plan(args) => plan::execute(&args, &config),
        Command::Render(args) => render::execute(&args, &config),
        Command::Graph(args) => graph::execute(&args, &config),
    }
}
