//! Formatted output helpers for CLI commands.

use std::fmt::Write;

use topoform_compose::{PlanEntry, Value};

const RULE_WIDTH: usize = 48;

/// Formats a recorded plan as a human-readable listing.
#[must_use]
pub fn plan_listing(stack_id: &str, entries: &[PlanEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Provisioning plan for: {stack_id}");
    let _ = writeln!(out, "{}", "\u{2550}".repeat(RULE_WIDTH));

    for entry in entries {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {:>2}. {}", entry.step, entry.unit);
        if !entry.dependencies.is_empty() {
            let _ = writeln!(out, "      after: {}", entry.dependencies.join(", "));
        }
        for (name, value) in &entry.outputs {
            let _ = writeln!(out, "      {name} = {}", format_value(value));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  {} unit(s) will be provisioned.", entries.len());
    out
}

/// Formats an output value on one line, marking deferred values with the
/// unit that resolves them. Multi-line values are summarized.
#[must_use]
pub fn format_value(value: &Value) -> String {
    let text = value.rendered_text();
    let shown = match text.lines().count() {
        0 | 1 => text.into_owned(),
        lines => format!("<{lines} lines, {} bytes>", text.len()),
    };
    match value.source_unit() {
        Some(unit) => format!("{shown}  (deferred: {unit})"),
        None => shown,
    }
}
