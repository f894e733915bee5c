//! Output values of provisioning units.
//!
//! A value is either concrete (known while composing) or deferred: an opaque
//! expression that can only be evaluated after its source unit has been
//! provisioned. The engine transports deferred expressions verbatim and never
//! evaluates them.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A literal known at composition time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// A string literal.
    Text(String),
    /// An integer literal.
    Integer(i64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u16> for Literal {
    fn from(value: u16) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Literal {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

/// An output of a provisioning unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Value {
    /// A value known at composition time.
    Concrete {
        /// The literal content.
        literal: Literal,
    },
    /// A value that resolves only after `source_unit` is provisioned.
    Deferred {
        /// Unit that owns the underlying resource.
        source_unit: String,
        /// Runtime lookup understood by the environment the artifact runs in.
        expression: String,
    },
}

impl Value {
    /// Creates a concrete value.
    #[must_use]
    pub fn concrete(literal: impl Into<Literal>) -> Self {
        Self::Concrete {
            literal: literal.into(),
        }
    }

    /// Creates a deferred value owned by `source_unit`.
    #[must_use]
    pub fn deferred(source_unit: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::Deferred {
            source_unit: source_unit.into(),
            expression: expression.into(),
        }
    }

    /// Returns `true` only for concrete values.
    #[must_use]
    pub const fn is_resolved_at_composition_time(&self) -> bool {
        matches!(self, Self::Concrete { .. })
    }

    /// Returns the owning unit of a deferred value.
    #[must_use]
    pub fn source_unit(&self) -> Option<&str> {
        match self {
            Self::Concrete { .. } => None,
            Self::Deferred { source_unit, .. } => Some(source_unit),
        }
    }

    /// Returns the text substituted for this value in an artifact: the
    /// literal for a concrete value, the expression itself for a deferred one.
    #[must_use]
    pub fn rendered_text(&self) -> Cow<'_, str> {
        match self {
            Self::Concrete {
                literal: Literal::Text(text),
            } => Cow::Borrowed(text),
            Self::Concrete { literal } => Cow::Owned(literal.to_string()),
            Self::Deferred { expression, .. } => Cow::Borrowed(expression),
        }
    }

    /// Builds a new value from this value's rendered text.
    ///
    /// A deferred value stays deferred and keeps its source unit, so
    /// compound lookups (e.g. a field of a secret) carry the same ordering
    /// constraint as the value they wrap.
    #[must_use]
    pub fn derive(&self, f: impl FnOnce(&str) -> String) -> Self {
        let text = f(&self.rendered_text());
        match self {
            Self::Concrete { .. } => Self::concrete(text),
            Self::Deferred { source_unit, .. } => Self::deferred(source_unit.clone(), text),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered_text())
    }
}
