//! Defines the extension system for global search.

use crate::engine::SourceFailure;
use crate::error::SourceError;
use crate::query::SearchQuery;
use crate::types::{RecordKind, SearchResultPayload};

/// A trait for extensions that observe the search lifecycle.
///
/// Extensions cannot change results: search degrades silently to empty
/// categories, and extensions are where an application hooks in to log,
/// count or alert on that. All hooks default to doing nothing.
///
/// Hooks are not called for blank queries, which never reach a source.
///
/// # Examples
///
/// Counting total failures:
///
/// ```rust
/// use crafty_search::prelude::*;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct OutageCounter(AtomicUsize);
///
/// impl SearchExtension for OutageCounter {
///     fn on_total_failure(&self, _failures: &[SourceFailure]) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait SearchExtension: Send + Sync {
  /// Called once a non-blank query has been normalized.
  fn before_query(&self, _query: &SearchQuery) {}

  /// Called after each source has answered, with the number of records it
  /// returned or the reason it failed.
  ///
  /// With the `parallel` feature the sources run concurrently, but this hook
  /// is still called from the searching thread, in a fixed order: content,
  /// events, event guides, registered players, statistics.
  fn after_source(&self, _kind: RecordKind, _status: &Result<usize, SourceError>) {}

  /// Called when every source failed during one search.
  fn on_total_failure(&self, _failures: &[SourceFailure]) {}

  /// Called with the final payload.
  fn after_search(&self, _query: &SearchQuery, _payload: &SearchResultPayload) {}
}

impl<E: SearchExtension + ?Sized> SearchExtension for std::sync::Arc<E> {
  fn before_query(&self, query: &SearchQuery) {
    (**self).before_query(query)
  }

  fn after_source(&self, kind: RecordKind, status: &Result<usize, SourceError>) {
    (**self).after_source(kind, status)
  }

  fn on_total_failure(&self, failures: &[SourceFailure]) {
    (**self).on_total_failure(failures)
  }

  fn after_search(&self, query: &SearchQuery, payload: &SearchResultPayload) {
    (**self).after_search(query, payload)
  }
}
