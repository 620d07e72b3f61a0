//! Defines the `RecordSource` trait for plugging in storage back ends.

use crate::error::SourceError;
use crate::filter::MatchExpr;
use crate::rules::SourceRules;
use crate::types::SourceRecord;
use std::sync::Arc;

/// A read-only source of one kind of record.
///
/// `RecordSource` is the boundary between the search engine and whatever
/// store holds the records: a SQL database, a remote API, or the in-process
/// [`InMemSource`](crate::source::InMemSource). The engine never needs to
/// know which.
///
/// Implementations must:
///
/// * match case-insensitively, as described by [`MatchExpr`];
/// * return records in the order given by `rules.order`, collapse to one
///   record per `rules.distinct_on` value when set, and stop after
///   `rules.limit` records, in that order;
/// * never return records the site does not show publicly (unpublished
///   posts and the like).
///
/// The `Send` and `Sync` bounds allow a source to be shared across the
/// threads of a parallel fan-out.
pub trait RecordSource<T: SourceRecord>: Send + Sync {
  /// Fetch the records matching `predicate`.
  ///
  /// # Arguments
  ///
  /// * `predicate` - The match expression built from the query.
  /// * `rules` - The source's rules, which carry the limit, ordering and
  ///   distinct field.
  ///
  /// # Returns
  ///
  /// The matching records, or the reason the source could not answer. An
  /// empty `Vec` means "no matches", never "failed".
  fn fetch(&self, predicate: &MatchExpr, rules: &SourceRules) -> Result<Vec<T>, SourceError>;
}

impl<T: SourceRecord, S: RecordSource<T> + ?Sized> RecordSource<T> for Arc<S> {
  fn fetch(&self, predicate: &MatchExpr, rules: &SourceRules) -> Result<Vec<T>, SourceError> {
    (**self).fetch(predicate, rules)
  }
}
