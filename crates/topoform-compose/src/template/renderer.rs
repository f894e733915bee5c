//! Single-pass template rendering.

use topoform_common::error::{Result, TopoformError};

use super::{Binding, Segment, Template};

/// Renders `template` against `binding`.
///
/// Literal segments are copied verbatim. A placeholder bound to a concrete
/// value is replaced by its literal; one bound to a deferred value is
/// replaced by the resolution expression itself, so the lookup runs where the
/// artifact executes. Output order is exactly segment order, and the same
/// inputs always produce the same bytes.
///
/// # Errors
///
/// Returns [`TopoformError::UnboundPlaceholder`] for the first placeholder,
/// in segment order, that has no binding.
pub fn render(template: &Template, binding: &Binding) -> Result<String> {
    let mut out = String::with_capacity(template.literal_len());
    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(name) => {
                let value = binding
                    .get(name)
                    .ok_or_else(|| TopoformError::UnboundPlaceholder { name: name.clone() })?;
                out.push_str(&value.rendered_text());
            }
        }
    }
    tracing::trace!(bytes = out.len(), "rendered template");
    Ok(out)
}
