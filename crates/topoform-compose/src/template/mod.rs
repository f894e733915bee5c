//! Placeholder templates and their bindings.
//!
//! A template is an ordered sequence of literal and placeholder segments.
//! A binding maps placeholder names to values; rendering substitutes concrete
//! values by their literal and deferred values by their resolution
//! expression, which the host running the artifact evaluates later.

pub mod parser;
pub mod renderer;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use topoform_common::error::Result;

use crate::value::Value;

pub use renderer::render;

/// One piece of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Segment {
    /// Text copied to the output verbatim.
    Literal(String),
    /// A named slot substituted from the binding.
    Placeholder(String),
}

/// An ordered sequence of segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses template text using the `{{ name }}` placeholder syntax.
    ///
    /// # Errors
    ///
    /// Returns [`topoform_common::error::TopoformError::TemplateSyntax`] if a
    /// `{{` does not open a well-formed placeholder.
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self {
            segments: parser::parse_segments(input)?,
        })
    }

    /// Creates a template from already split segments.
    #[must_use]
    pub const fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Returns the segments in output order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the distinct placeholder names in order of first occurrence.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Returns the total byte length of all literal segments.
    #[must_use]
    pub fn literal_len(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.len(),
                Segment::Placeholder(_) => 0,
            })
            .sum()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Placeholder(name) => write!(f, "{{{{{name}}}}}")?,
            }
        }
        Ok(())
    }
}

/// Values bound to placeholder names.
///
/// A binding may hold more names than a template uses, so one binding can
/// serve several templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Binding {
    values: BTreeMap<String, Value>,
}

impl Binding {
    /// Creates an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any earlier value.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Binds `name` to `value` in place, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let _ = self.values.insert(name.into(), value);
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns every bound value.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.values()
    }

    /// Returns the units owning the deferred values in this binding.
    #[must_use]
    pub fn deferred_sources(&self) -> BTreeSet<&str> {
        self.values.values().filter_map(Value::source_unit).collect()
    }

    /// Returns the number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
