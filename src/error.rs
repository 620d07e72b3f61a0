//! Error types for crafty_search.
//!
//! Search itself never fails: these errors describe why a single record
//! source contributed nothing, or why a configuration was rejected.

use thiserror::Error;

/// Why a record source could not answer a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
  /// The backing store could not be reached.
  #[error("source unavailable: {0}")]
  Unavailable(String),

  /// The backing store did not answer in time.
  #[error("source timed out after {after_ms}ms")]
  Timeout { after_ms: u64 },

  /// The backing store answered with something that could not be read.
  #[error("malformed source response: {0}")]
  Malformed(String),

  /// The adapter panicked while serving the request.
  #[error("source panicked: {0}")]
  Panicked(String),
}

/// Errors raised while loading or validating a [`SearchConfig`](crate::config::SearchConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("config parse error: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("invalid config: {0}")]
  Invalid(String),
}
