//! Error types for the esmapper crate.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when building queries or reading results.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Range operators and values do not pair up.
    #[error(
        "range operator and value must both be scalar or both be lists of the same length \
         (got {operators} operator(s) and {values} value(s))"
    )]
    InvalidRangeArity {
        /// Operator count, or 1 for a scalar.
        operators: usize,
        /// Value count, or 1 for a scalar.
        values: usize,
    },

    /// A range operator string is not one of `gt`, `gte`, `lt`, `lte`.
    #[error("invalid range operator '{0}'")]
    InvalidOperator(String),

    /// `end_sub_query` was already called on this sub-query.
    #[error("sub-query was already ended and folded into its parent")]
    SubQueryConsumed,

    /// A key, value, or operator list was given with no items.
    #[error("{0} list is empty")]
    EmptyList(&'static str),

    /// An existing document node has the wrong shape for the insertion.
    #[error("cannot insert at '{path}': existing value is {found}")]
    Conflict {
        /// Dot-joined path of the offending node.
        path: String,
        /// What the node holds instead of the expected container.
        found: &'static str,
    },

    /// A loaded index config is unusable.
    #[error("invalid index config: {0}")]
    InvalidConfig(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML decoding failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The search executor reported a failure.
    #[error("executor error: {0}")]
    Executor(String),
}

impl QueryError {
    /// Create an executor error.
    pub fn executor(msg: impl Into<String>) -> Self {
        Self::Executor(msg.into())
    }

    pub(crate) fn conflict(path: &[&str], found: &Value) -> Self {
        Self::Conflict {
            path: path.join("."),
            found: kind_name(found),
        }
    }

    /// Returns `true` for errors caused by misuse of the builder API rather
    /// than by bad input data.
    pub fn is_protocol_misuse(&self) -> bool {
        matches!(self, QueryError::SubQueryConsumed)
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Result type for esmapper operations.
pub type Result<T> = std::result::Result<T, QueryError>;
