//! In-memory record source.

use crate::error::SourceError;
use crate::filter::MatchExpr;
use crate::rules::{OrderSpec, SourceRules};
use crate::source::adapter::RecordSource;
use crate::types::SourceRecord;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

type Visibility<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// In-memory source holding records in insertion order.
pub struct InMemSource<T: SourceRecord> {
    records: Vec<T>,
    visible: Option<Visibility<T>>,
    failure: Option<SourceError>,
    fetches: AtomicUsize,
}

impl<T: SourceRecord> InMemSource<T> {
    /// Create a source over the given records.
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            visible: None,
            failure: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Create an empty source.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Only serve records for which `visible` returns true.
    pub fn with_visibility(mut self, visible: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.visible = Some(Box::new(visible));
        self
    }

    /// Make every fetch fail with `error`.
    pub fn failing(mut self, error: SourceError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Append a record.
    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    /// Number of records held, visible or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// How many times `fetch` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(AtomicOrdering::SeqCst)
    }
}

impl<T: SourceRecord> Default for InMemSource<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: SourceRecord> RecordSource<T> for InMemSource<T> {
    fn fetch(&self, predicate: &MatchExpr, rules: &SourceRules) -> Result<Vec<T>, SourceError> {
        self.fetches.fetch_add(1, AtomicOrdering::SeqCst);

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let mut matched: Vec<(&T, Value)> = Vec::new();
        for record in &self.records {
            if let Some(visible) = &self.visible {
                if !visible(record) {
                    continue;
                }
            }

            let value = serde_json::to_value(record)
                .map_err(|e| SourceError::Malformed(e.to_string()))?;
            if predicate.evaluate(&value) {
                matched.push((record, value));
            }
        }

        // Stable sort keeps insertion order among equal timestamps.
        match rules.order {
            OrderSpec::Natural => {}
            OrderSpec::NewestFirst => {
                matched.sort_by(|(a, _), (b, _)| by_timestamp(*a, *b, true));
            }
            OrderSpec::SoonestFirst => {
                matched.sort_by(|(a, _), (b, _)| by_timestamp(*a, *b, false));
            }
        }

        let mut seen = HashSet::new();
        let results = matched
            .into_iter()
            .filter(|(_, value)| match &rules.distinct_on {
                Some(field) => seen.insert(distinct_key(value, field)),
                None => true,
            })
            .map(|(record, _)| record.clone())
            .take(rules.limit)
            .collect();

        Ok(results)
    }
}

/// Records without a timestamp sort last in either direction.
fn by_timestamp<T: SourceRecord>(a: &T, b: &T, newest_first: bool) -> Ordering {
    match (a.timestamp(), b.timestamp()) {
        (Some(x), Some(y)) => {
            if newest_first {
                y.cmp(&x)
            } else {
                x.cmp(&y)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn distinct_key(value: &Value, field: &str) -> String {
    match value.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
