//! `topoform plan` — Show the units in creation order.

use clap::{Args, ValueEnum};
use topoform_common::config::StackConfig;
use topoform_compose::PlanRecorder;

use crate::output;

/// Output format of the plan.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlanFormat {
    /// Human-readable listing.
    #[default]
    Text,
    /// JSON array of steps.
    Json,
    /// YAML sequence of steps.
    Yaml,
}

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
    pub format: PlanFormat,
}

/// Executes the `plan` command.
///
/// # Errors
///
/// Returns an error if composition fails.
pub fn execute(args: &PlanArgs, config: &StackConfig) -> anyhow::Result<()> {
    print!("{}", plan_document(args.format, config)?);
    Ok(())
}

/// Composes the stack, records it, and formats the recorded steps.
///
/// # Errors
///
/// Returns an error if composition or serialization fails.
pub fn plan_document(format: PlanFormat, config: &StackConfig) -> anyhow::Result<String> {
    let composition = topoform_stack::compose_web_application(config)?;
    let mut recorder = PlanRecorder::new();
    composition.provision(&mut recorder)?;
    tracing::info!(units = recorder.entries().len(), ?format, "plan recorded");

    Ok(match format {
        PlanFormat::Json => {
            let mut json = recorder.to_json()?;
            json.push('\n');
            json
        }
        PlanFormat::Text => output::plan_listing(&config.stack_id, &recorder.into_entries()),
        PlanFormat::Yaml => serde_yaml::to_string(&recorder.into_entries())?,
    })
}
