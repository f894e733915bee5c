//! Unified error types for the topoform workspace.
//!
//! Every failure the composition engine can report is detected synchronously
//! while composing or rendering, so a single enum covers the whole workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum TopoformError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid or missing.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A unit with the same name is already registered.
    #[error("duplicate unit: \"{name}\" is already registered")]
    DuplicateUnit {
        /// Name that was registered twice.
        name: String,
    },

    /// A dependency edge references a unit that was never registered.
    #[error("unknown unit: \"{name}\"")]
    UnknownUnit {
        /// Name of the missing unit.
        name: String,
    },

    /// The dependency graph contains at least one cycle.
    #[error("cyclic dependency between units: {}", members.join(", "))]
    CyclicDependency {
        /// Units taking part in a cycle, in registration order.
        members: Vec<String>,
    },

    /// A template placeholder has no binding.
    #[error("unbound placeholder: {{{{{name}}}}}")]
    UnboundPlaceholder {
        /// Name of the placeholder without a binding.
        name: String,
    },

    /// Template text could not be parsed.
    #[error("template syntax error at byte {offset}: {message}")]
    TemplateSyntax {
        /// Byte offset of the malformed construct.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// A unit factory failed while the composition was being built.
    #[error("unit \"{unit}\" failed to construct (ready: [{}]): {source}", instantiated.join(", "))]
    FactoryFailure {
        /// Unit whose factory failed.
        unit: String,
        /// Units that had already reached `Ready`, in creation order.
        instantiated: Vec<String>,
        /// Underlying cause.
        source: Box<TopoformError>,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TopoformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_members() {
        let err = TopoformError::CyclicDependency {
            members: vec!["a".into(), "b".into(), "c".into()],
        };
        assert_eq!(err.to_string(), "cyclic dependency between units: a, b, c");
    }

    #[test]
    fn unbound_placeholder_message_shows_braces() {
        let err = TopoformError::UnboundPlaceholder {
            name: "db_host".into(),
        };
        assert_eq!(err.to_string(), "unbound placeholder: {{db_host}}");
    }

    #[test]
    fn factory_failure_reports_ready_units() {
        let err = TopoformError::FactoryFailure {
            unit: "cdn".into(),
            instantiated: vec!["network".into(), "storage".into()],
            source: Box::new(TopoformError::Config {
                message: "domain name is required".into(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"cdn\""), "got: {msg}");
        assert!(msg.contains("ready: [network, storage]"), "got: {msg}");
        assert!(msg.contains("domain name is required"), "got: {msg}");
    }
}
