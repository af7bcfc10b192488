//! Error types for tome-core.

use thiserror::Error;

/// Result type for tome-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tome-core.
#[derive(Debug, Error)]
pub enum Error {
    /// Following references from a requested module revisits a module on
    /// the current path. `path` ends with the module that closes the loop.
    #[error("cyclic dependency detected: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    /// Module not found.
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// Requested version does not exist in the module's history.
    #[error("version {version} not found for module {module_id}")]
    VersionNotFound { module_id: String, version: u32 },

    /// A module record violates the data model (e.g. empty history).
    #[error("invalid module: {0}")]
    InvalidModule(String),

    /// Type tag outside the fixed module type set.
    #[error("unknown module type: {0}")]
    UnknownModuleType(String),

    /// Output format other than html or pdf.
    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Recovery hint shown to users alongside the error, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::CyclicDependency { .. } => Some(
                "remove one of the @module references along the path, or compile the modules separately",
            ),
            Error::ModuleNotFound(_) => Some("check the module id against `tome stats <library>`"),
            Error::VersionNotFound { .. } => {
                Some("versions are numbered from 1; see the module's history for valid numbers")
            }
            Error::UnknownModuleType(_) => Some(
                "valid types are: definition, example, explanation, diagram, proof, problem",
            ),
            _ => None,
        }
    }

    /// Render the error followed by its hint, if any.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }

    /// The offending path when this is a cycle error.
    pub fn cycle_path(&self) -> Option<&[String]> {
        match self {
            Error::CyclicDependency { path } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_path() {
        let err = Error::CyclicDependency {
            path: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "cyclic dependency detected: A -> B -> A");
        assert_eq!(err.cycle_path().unwrap().len(), 3);
        assert!(err.with_hint().contains("hint:"));
    }

    #[test]
    fn test_io_error_has_no_hint() {
        let err = Error::from(std::io::Error::other("disk"));
        assert!(err.hint().is_none());
        assert_eq!(err.with_hint(), err.to_string());
    }
}
