//! Error types for migration generation
//!
//! Generation itself is a pure text transform, so almost everything here is
//! either an input problem (roster, template, config) caught before any output
//! exists, or an environment failure while replacing the artifacts on disk.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the generator
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace {}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Apply and revert artifacts both resolve to {}", .path.display())]
    ArtifactClash { path: PathBuf },

    #[cfg(feature = "database")]
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "database")]
    #[error("Verification failed: {message}")]
    Verification { message: String },
}

/// Problems with the list of types to instantiate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Invalid type name '{name}': expected a lowercase SQL identifier")]
    InvalidTypeName { name: String },

    #[error("Type '{name}' appears more than once in the roster")]
    DuplicateType { name: String },
}

/// Template instantiation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template '{template}' left unresolved placeholders: {}", .placeholders.join(", "))]
    UnresolvedPlaceholder {
        template: String,
        placeholders: Vec<String>,
    },

    #[error("Invalid {kind} identifier '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    /// Collect an error and its sources the way `{:#}` chains print them
    fn chain(err: &dyn std::error::Error) -> Vec<String> {
        let mut messages = vec![err.to_string()];
        let mut source = err.source();
        while let Some(inner) = source {
            messages.push(inner.to_string());
            source = inner.source();
        }
        messages
    }

    #[test]
    fn test_wrapped_roster_error_prints_once() {
        let inner = RosterError::DuplicateType {
            name: "int4".to_string(),
        };
        let err = GeneratorError::from(inner.clone());
        assert_eq!(chain(&err), vec![inner.to_string()]);
    }

    #[test]
    fn test_io_cause_is_only_in_source() {
        let err = GeneratorError::Io {
            path: PathBuf::from("out/up.sql"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            chain(&err),
            vec!["Failed to write out/up.sql".to_string(), "denied".to_string()]
        );
        assert!(err.source().is_some());
    }
}
