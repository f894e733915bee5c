//! `topoform graph` — Print the dependency graph.

use clap::Args;
use topoform_common::config::StackConfig;

/// Arguments for the `graph` command.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Print the creation order, one unit per line, instead of DOT.
    #[arg(long)]
    pub order: bool,
}

/// Executes the `graph` command.
///
/// # Errors
///
/// Returns an error if composition fails.
pub fn execute(args: &GraphArgs, config: &StackConfig) -> anyhow::Result<()> {
    print!("{}", graph_document(args, config)?);
    Ok(())
}

fn graph_document(args: &GraphArgs, config: &StackConfig) -> anyhow::Result<String> {
    let composition = topoform_stack::compose_web_application(config)?;
    if args.order {
        let mut listing = composition.order().join("\n");
        listing.push('\n');
        return Ok(listing);
    }
    Ok(composition.graph().to_dot())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StackConfig {
        StackConfig {
            region: "eu-west-1".into(),
            domain_name: "forum.example.com".into(),
            ses_smtp_domain_name: "mail.example.com".into(),
            auth_sub_domain_name: "forum-auth".into(),
            settings_secret_arn: "arn:settings".into(),
            ..StackConfig::default()
        }
    }

    #[test]
    fn dot_contains_explicit_workaround_edges() {
        let dot = graph_document(&GraphArgs { order: false }, &config()).expect("graph");
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("explicit"));
        assert!(dot.contains("listener-rule"));
    }

    #[test]
    fn order_listing_ends_with_cdn() {
        let listing = graph_document(&GraphArgs { order: true }, &config()).expect("graph");
        assert!(listing.starts_with("certificate\n"));
        assert!(listing.ends_with("cdn\n"));
    }
}
