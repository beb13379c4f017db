//! Unified error types for the MSPP workspace
//!
//! [`MsppError`] covers everything that can go wrong between reading a
//! network and reading objective values back from a solved model. Library
//! crates return [`MsppResult`]; the binary and batch layers wrap it in
//! `anyhow` with context.
//!
//! # Example
//!
//! ```ignore
//! use mspp_core::{MsppError, MsppResult};
//!
//! fn route(path: &str) -> MsppResult<()> {
//!     let network = load_network(path)?;
//!     let formulation = build_model(Variant::Abp, &network, &agents)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all MSPP operations.
#[derive(Error, Debug)]
pub enum MsppError {
    /// Agent is degenerate (source == terminus) or references unknown nodes
    #[error("Invalid agent {agent}: {reason}")]
    InvalidAgent { agent: usize, reason: String },

    /// Arc rejected at network construction
    #[error("Invalid arc {arc}: {reason}")]
    InvalidArc { arc: usize, reason: String },

    /// Unrecognized formulation name
    #[error("Unsupported variant '{0}'; supported values: MSPP, ABP, NBP, ALP, NLP, AQP, NQP")]
    UnsupportedVariant(String),

    /// Formulation requested with no agents to route
    #[error("Agent set is empty; at least one agent is required")]
    EmptyAgentSet,

    /// Objective extraction on a model without an optimal solution
    #[error("Model is not solved to optimality (status: {0})")]
    NotOptimal(String),

    /// Solver proved that no feasible routing exists
    #[error("Model infeasible: {0}")]
    InfeasibleModel(String),

    /// Solver reported an unbounded objective
    #[error("Model unbounded: {0}")]
    UnboundedModel(String),

    /// Solver/backend failures
    #[error("Solver error: {0}")]
    Solver(String),

    /// Selected arcs do not form a source-to-terminus path
    #[error("Route reconstruction failed for agent {agent}: {reason}")]
    RouteReconstruction { agent: usize, reason: String },

    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

impl MsppError {
    pub fn invalid_agent(agent: usize, reason: impl Into<String>) -> Self {
        MsppError::InvalidAgent {
            agent,
            reason: reason.into(),
        }
    }

    pub fn invalid_arc(arc: usize, reason: impl Into<String>) -> Self {
        MsppError::InvalidArc {
            arc,
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results using MsppError.
pub type MsppResult<T> = Result<T, MsppError>;

impl From<anyhow::Error> for MsppError {
    fn from(err: anyhow::Error) -> Self {
        MsppError::Other(err.to_string())
    }
}

impl From<String> for MsppError {
    fn from(s: String) -> Self {
        MsppError::Other(s)
    }
}

impl From<&str> for MsppError {
    fn from(s: &str) -> Self {
        MsppError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MsppError::invalid_agent(3, "source equals terminus");
        assert!(err.to_string().contains("Invalid agent 3"));
        assert!(err.to_string().contains("source equals terminus"));
    }

    #[test]
    fn test_unsupported_variant_lists_choices() {
        let err = MsppError::UnsupportedVariant("XYZ".into());
        let msg = err.to_string();
        assert!(msg.contains("XYZ"));
        assert!(msg.contains("NQP"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MsppError = io_err.into();
        assert!(matches!(err, MsppError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> MsppResult<()> {
            Err(MsppError::EmptyAgentSet)
        }

        fn outer() -> MsppResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(MsppError::EmptyAgentSet)));
    }
}
