//! `topoform render` — Render the instance bootstrap script.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use topoform_common::config::StackConfig;
use topoform_common::types::Sha256Digest;
use topoform_stack::bootstrap;

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Write the script to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Executes the `render` command.
///
/// # Errors
///
/// Returns an error if composition fails or the file cannot be written.
pub fn execute(args: &RenderArgs, config: &StackConfig) -> anyhow::Result<()> {
    let script = rendered_bootstrap(config)?;
    let digest = Sha256Digest::of(&script);

    if let Some(ref path) = args.output {
        std::fs::write(path, &script)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), %digest, bytes = script.len(), "bootstrap script written");
    } else {
        tracing::info!(%digest, bytes = script.len(), "bootstrap script rendered");
        print!("{script}");
    }
    Ok(())
}

/// Composes the stack and returns the rendered bootstrap script.
///
/// # Errors
///
/// Returns an error if composition fails.
pub fn rendered_bootstrap(config: &StackConfig) -> anyhow::Result<String> {
    let composition = topoform_stack::compose_web_application(config)?;
    let script = composition
        .unit(bootstrap::UNIT)
        .and_then(|unit| unit.output("user_data"))
        .context("bootstrap unit has no user_data output")?;
    Ok(script.to_string())
}
