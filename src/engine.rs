//! The search engine that fans a query out to every source and assembles
//! the result payload.

use crate::config::SearchConfig;
use crate::error::{ConfigError, SourceError};
use crate::extension::SearchExtension;
use crate::matcher::SourceMatcher;
use crate::query::SearchQuery;
use crate::rules::SourceRules;
use crate::source::{InMemSource, RecordSource};
use crate::types::{
  ContentRecord, EventGuideRecord, EventRecord, GhostPlayer, RecordKind, RegisteredPlayer,
  SearchResultPayload, SourceRecord, StatisticsRow,
};
use crate::unify::PlayerUnifier;
use std::sync::Arc;
use tracing::{debug, warn};

/// Number of sources a search reads from.
const SOURCE_COUNT: usize = 5;

/// A source that failed during one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
  pub kind: RecordKind,
  pub error: SourceError,
}

/// The payload of one search plus the sources that failed along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
  pub payload: SearchResultPayload,
  pub failures: Vec<SourceFailure>,
}

impl SearchOutcome {
  /// True when at least one source failed.
  pub fn is_degraded(&self) -> bool {
    !self.failures.is_empty()
  }

  /// True when every source failed.
  pub fn is_total_failure(&self) -> bool {
    self.failures.len() == SOURCE_COUNT
  }
}

/// Raw per-source answers for one query.
struct Fetched {
  content: Result<Vec<ContentRecord>, SourceError>,
  events: Result<Vec<EventRecord>, SourceError>,
  guides: Result<Vec<EventGuideRecord>, SourceError>,
  registered: Result<Vec<RegisteredPlayer>, SourceError>,
  statistics: Result<Vec<StatisticsRow>, SourceError>,
}

/// The global search engine.
///
/// `SearchEngine` holds one [`SourceMatcher`] per record source and a
/// [`PlayerUnifier`]. A search runs in these steps:
///
/// 1. **Normalize**: blank input returns the empty payload immediately,
///    without calling any source or extension.
/// 2. **Fan out**: every source is queried. With the `parallel` feature
///    this happens concurrently on the rayon pool; the result is the same
///    either way since no source depends on another.
/// 3. **Settle**: a failed source contributes an empty category and is
///    recorded as a [`SourceFailure`]; the rest proceed unaffected.
/// 4. **Unify**: registered accounts and statistics usernames are merged
///    into the player category.
///
/// Searching never returns an error.
///
/// Create a `SearchEngine` using the [`SearchEngineBuilder`].
///
/// # Examples
///
/// ```rust
/// use crafty_search::prelude::*;
/// use chrono::Utc;
///
/// let posts = InMemSource::new(vec![
///     ContentRecord::new("1", "Winter Wonderland Event", Utc::now()),
/// ]);
///
/// let engine = SearchEngine::builder()
///     .content_source(posts)
///     .build();
///
/// let payload = engine.search("winter");
/// assert_eq!(payload.content.len(), 1);
/// assert!(engine.search("   ").is_empty());
/// ```
pub struct SearchEngine {
  content: SourceMatcher<ContentRecord>,
  events: SourceMatcher<EventRecord>,
  guides: SourceMatcher<EventGuideRecord>,
  registered: SourceMatcher<RegisteredPlayer>,
  statistics: SourceMatcher<StatisticsRow>,
  unifier: PlayerUnifier,
  extensions: Vec<Box<dyn SearchExtension>>,
}

impl SearchEngine {
  /// Creates a new `SearchEngineBuilder`.
  pub fn builder() -> SearchEngineBuilder {
    SearchEngineBuilder::new()
  }

  /// Search every source for `raw_text`.
  ///
  /// Blank input, failed sources and total failure all degrade to empty
  /// categories.
  pub fn search(&self, raw_text: &str) -> SearchResultPayload {
    self.search_detailed(raw_text).payload
  }

  /// Like [`search`](Self::search), but also reports which sources failed.
  pub fn search_detailed(&self, raw_text: &str) -> SearchOutcome {
    let Some(query) = SearchQuery::normalize(raw_text) else {
      debug!("blank search query; skipping sources");
      return SearchOutcome::default();
    };

    for ext in &self.extensions {
      ext.before_query(&query);
    }

    let fetched = self.fan_out(&query);
    let mut failures = Vec::new();

    let content = self.settle(RecordKind::Content, fetched.content, &mut failures);
    let events = self.settle(RecordKind::Event, fetched.events, &mut failures);
    let event_guides = self.settle(RecordKind::EventGuide, fetched.guides, &mut failures);
    let registered = self.settle(RecordKind::RegisteredPlayer, fetched.registered, &mut failures);
    let statistics = self.settle(RecordKind::Statistics, fetched.statistics, &mut failures);

    let ghosts: Vec<GhostPlayer> = statistics
      .iter()
      .filter_map(|row| GhostPlayer::from_username(&row.username))
      .collect();
    let players = self.unifier.unify(&registered, &ghosts);

    if failures.len() == SOURCE_COUNT {
      warn!(query = %query.phrase, "every search source failed; returning no results");
      for ext in &self.extensions {
        ext.on_total_failure(&failures);
      }
    }

    let payload = SearchResultPayload {
      content,
      players,
      events,
      event_guides,
    };

    debug!(
      query = %query.phrase,
      content = payload.content.len(),
      players = payload.players.len(),
      events = payload.events.len(),
      event_guides = payload.event_guides.len(),
      failed_sources = failures.len(),
      "search complete"
    );

    for ext in &self.extensions {
      ext.after_search(&query, &payload);
    }

    SearchOutcome { payload, failures }
  }

  #[cfg(feature = "parallel")]
  fn fan_out(&self, query: &SearchQuery) -> Fetched {
    let ((content, events), (guides, (registered, statistics))) = rayon::join(
      || rayon::join(|| self.content.run(query), || self.events.run(query)),
      || {
        rayon::join(
          || self.guides.run(query),
          || rayon::join(|| self.registered.run(query), || self.statistics.run(query)),
        )
      },
    );

    Fetched {
      content,
      events,
      guides,
      registered,
      statistics,
    }
  }

  #[cfg(not(feature = "parallel"))]
  fn fan_out(&self, query: &SearchQuery) -> Fetched {
    Fetched {
      content: self.content.run(query),
      events: self.events.run(query),
      guides: self.guides.run(query),
      registered: self.registered.run(query),
      statistics: self.statistics.run(query),
    }
  }

  /// Map a source answer to its records, recording failures.
  fn settle<T>(
    &self,
    kind: RecordKind,
    result: Result<Vec<T>, SourceError>,
    failures: &mut Vec<SourceFailure>,
  ) -> Vec<T> {
    if !self.extensions.is_empty() {
      let status = result.as_ref().map(Vec::len).map_err(|e| e.clone());
      for ext in &self.extensions {
        ext.after_source(kind, &status);
      }
    }

    match result {
      Ok(records) => records,
      Err(error) => {
        warn!(source = %kind, error = %error, "search source failed; category left empty");
        failures.push(SourceFailure { kind, error });
        Vec::new()
      }
    }
  }
}

/// A builder for creating `SearchEngine` instances.
///
/// Every source defaults to an empty in-memory source, so an engine built
/// with only some sources set simply returns nothing for the others.
///
/// # Examples
///
/// ```
/// use crafty_search::prelude::*;
///
/// let players = InMemSource::new(vec![
///     RegisteredPlayer::new("acc-1").with_display_name("Birdy Parrot"),
/// ]);
/// let stats = InMemSource::new(vec![
///     StatisticsRow::new("Notch", "blocks_mined", 42, chrono::Utc::now()),
/// ]);
///
/// let engine = SearchEngine::builder()
///     .registered_source(players)
///     .statistics_source(stats)
///     .config(SearchConfig::default().player_limit(10))
///     .build();
///
/// assert_eq!(engine.search("BirdyParrot").players[0].id, "acc-1");
/// assert_eq!(engine.search("notch").players[0].id, "ghost-Notch");
/// ```
#[derive(Default)]
pub struct SearchEngineBuilder {
  content: Option<Arc<dyn RecordSource<ContentRecord>>>,
  events: Option<Arc<dyn RecordSource<EventRecord>>>,
  guides: Option<Arc<dyn RecordSource<EventGuideRecord>>>,
  registered: Option<Arc<dyn RecordSource<RegisteredPlayer>>>,
  statistics: Option<Arc<dyn RecordSource<StatisticsRow>>>,
  config: SearchConfig,
  extensions: Vec<Box<dyn SearchExtension>>,
}

impl SearchEngineBuilder {
  /// Creates a new builder with the default configuration.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the content post source.
  pub fn content_source(mut self, source: impl RecordSource<ContentRecord> + 'static) -> Self {
    self.content = Some(Arc::new(source));
    self
  }

  /// Sets the event source.
  pub fn event_source(mut self, source: impl RecordSource<EventRecord> + 'static) -> Self {
    self.events = Some(Arc::new(source));
    self
  }

  /// Sets the event-guide source.
  pub fn guide_source(mut self, source: impl RecordSource<EventGuideRecord> + 'static) -> Self {
    self.guides = Some(Arc::new(source));
    self
  }

  /// Sets the registered-account source.
  pub fn registered_source(mut self, source: impl RecordSource<RegisteredPlayer> + 'static) -> Self {
    self.registered = Some(Arc::new(source));
    self
  }

  /// Sets the gameplay-statistics source.
  pub fn statistics_source(mut self, source: impl RecordSource<StatisticsRow> + 'static) -> Self {
    self.statistics = Some(Arc::new(source));
    self
  }

  /// Sets limits and the avatar template.
  pub fn config(mut self, config: SearchConfig) -> Self {
    self.config = config;
    self
  }

  /// Adds an extension.
  pub fn with_extension(mut self, extension: Box<dyn SearchExtension>) -> Self {
    self.extensions.push(extension);
    self
  }

  /// Builds the `SearchEngine` after validating the configuration.
  pub fn try_build(self) -> Result<SearchEngine, ConfigError> {
    self.config.validate()?;
    Ok(self.build())
  }

  /// Builds the `SearchEngine`.
  ///
  /// The configuration is used as given; a zero limit empties its
  /// category. Use [`try_build`](Self::try_build) to reject such configs.
  pub fn build(self) -> SearchEngine {
    let config = self.config;

    SearchEngine {
      content: SourceMatcher::new(
        or_empty(self.content),
        SourceRules::content().with_limit(config.content_limit),
      ),
      events: SourceMatcher::new(
        or_empty(self.events),
        SourceRules::events().with_limit(config.event_limit),
      ),
      guides: SourceMatcher::new(
        or_empty(self.guides),
        SourceRules::event_guides().with_limit(config.guide_limit),
      ),
      registered: SourceMatcher::new(
        or_empty(self.registered),
        SourceRules::registered_players().with_limit(config.registered_limit),
      ),
      statistics: SourceMatcher::new(
        or_empty(self.statistics),
        SourceRules::statistics().with_limit(config.statistics_limit),
      ),
      unifier: PlayerUnifier::new(config.avatar_url_template, config.player_limit),
      extensions: self.extensions,
    }
  }
}

fn or_empty<T: SourceRecord>(
  source: Option<Arc<dyn RecordSource<T>>>,
) -> Arc<dyn RecordSource<T>> {
  match source {
    Some(source) => source,
    None => Arc::new(InMemSource::<T>::empty()),
  }
}
