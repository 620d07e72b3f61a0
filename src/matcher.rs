//! The per-source matcher.

use crate::error::SourceError;
use crate::filter::MatchExpr;
use crate::query::SearchQuery;
use crate::rules::SourceRules;
use crate::source::RecordSource;
use crate::types::{RecordKind, SourceRecord};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::trace;

/// Runs one record source for a query.
///
/// A `SourceMatcher` owns the rules for its source: it turns a
/// [`SearchQuery`] into the source's [`MatchExpr`], asks the source for
/// matches, and reports the outcome as a `Result` so callers can tell an
/// empty answer from a failed one. A panic inside the source is caught and
/// reported as [`SourceError::Panicked`].
pub struct SourceMatcher<T: SourceRecord> {
  source: Arc<dyn RecordSource<T>>,
  rules: SourceRules,
}

impl<T: SourceRecord> SourceMatcher<T> {
  pub fn new(source: Arc<dyn RecordSource<T>>, rules: SourceRules) -> Self {
    Self { source, rules }
  }

  /// The kind of record this matcher returns.
  pub fn kind(&self) -> RecordKind {
    T::KIND
  }

  pub fn rules(&self) -> &SourceRules {
    &self.rules
  }

  /// Fetch the records matching `query`, ordered and capped by the rules.
  pub fn run(&self, query: &SearchQuery) -> Result<Vec<T>, SourceError> {
    let predicate = MatchExpr::for_query(query, &self.rules);
    let kind = T::KIND;
    trace!(source = %kind, predicate = %predicate, "querying source");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
      self.source.fetch(&predicate, &self.rules)
    }));

    match outcome {
      Ok(Ok(mut records)) => {
        // Sources that ignore the limit still never exceed it here.
        records.truncate(self.rules.limit);
        Ok(records)
      }
      Ok(Err(error)) => Err(error),
      Err(payload) => Err(SourceError::Panicked(panic_message(payload.as_ref()))),
    }
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic".to_string()
  }
}
