//! Core data types for global search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type alias for record identifiers.
pub type RecordId = String;

/// The kinds of records a search reads from.
///
/// Each kind is served by its own source and has its own rules; the two
/// player-like kinds (`RegisteredPlayer` and `Statistics`) are merged into a
/// single result category by the unifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
  /// Published content posts and updates.
  Content,
  /// Scheduled events.
  Event,
  /// Event reference-guide entries.
  EventGuide,
  /// Registered accounts.
  RegisteredPlayer,
  /// Raw gameplay-statistics rows keyed by in-game name.
  Statistics,
}

impl RecordKind {
  /// A short, stable name used in log fields.
  pub fn as_str(&self) -> &'static str {
    match self {
      RecordKind::Content => "content",
      RecordKind::Event => "event",
      RecordKind::EventGuide => "event_guide",
      RecordKind::RegisteredPlayer => "registered_player",
      RecordKind::Statistics => "statistics",
    }
  }
}

impl std::fmt::Display for RecordKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A record that can be served by a [`RecordSource`](crate::source::RecordSource).
///
/// Searchable fields are looked up through the record's JSON form, so the
/// field names used in [`SourceRules`](crate::rules::SourceRules) are the
/// serialized (camelCase) names.
pub trait SourceRecord: Serialize + Clone + Send + Sync + 'static {
  /// The kind this record type belongs to.
  const KIND: RecordKind;

  /// The timestamp used by time-based orderings, if the record has one.
  fn timestamp(&self) -> Option<DateTime<Utc>> {
    None
  }
}

/// A content post or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
  pub id: RecordId,
  pub title: String,
  #[serde(default)]
  pub excerpt: Option<String>,
  #[serde(default)]
  pub content: String,
  #[serde(default)]
  pub cover_image: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub author_name: Option<String>,
  /// Sources only hand out published records; the flag travels with the
  /// record so in-process sources can filter on it.
  #[serde(default)]
  pub published: bool,
  pub created_at: DateTime<Utc>,
}

impl ContentRecord {
  /// Create a published post with empty body.
  pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
    Self {
      id: id.into(),
      title: title.into(),
      excerpt: None,
      content: String::new(),
      cover_image: None,
      category: None,
      author_name: None,
      published: true,
      created_at,
    }
  }

  pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
    self.excerpt = Some(excerpt.into());
    self
  }

  pub fn with_content(mut self, content: impl Into<String>) -> Self {
    self.content = content.into();
    self
  }

  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  pub fn with_author(mut self, author: impl Into<String>) -> Self {
    self.author_name = Some(author.into());
    self
  }

  pub fn with_published(mut self, published: bool) -> Self {
    self.published = published;
    self
  }
}

impl SourceRecord for ContentRecord {
  const KIND: RecordKind = RecordKind::Content;

  fn timestamp(&self) -> Option<DateTime<Utc>> {
    Some(self.created_at)
  }
}

/// A scheduled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
  pub id: RecordId,
  pub title: String,
  #[serde(default)]
  pub description: Option<String>,
  pub starts_at: DateTime<Utc>,
  #[serde(rename = "type")]
  pub event_type: String,
}

impl EventRecord {
  pub fn new(
    id: impl Into<String>,
    title: impl Into<String>,
    event_type: impl Into<String>,
    starts_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: id.into(),
      title: title.into(),
      description: None,
      starts_at,
      event_type: event_type.into(),
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }
}

impl SourceRecord for EventRecord {
  const KIND: RecordKind = RecordKind::Event;

  fn timestamp(&self) -> Option<DateTime<Utc>> {
    Some(self.starts_at)
  }
}

/// An entry in the event reference guide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGuideRecord {
  pub id: RecordId,
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub image: Option<String>,
  /// Ordered "how to play" steps.
  #[serde(default)]
  pub how_to: Vec<String>,
  /// Ordered rules list.
  #[serde(default)]
  pub rules: Vec<String>,
}

impl EventGuideRecord {
  pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      title: title.into(),
      description: description.into(),
      image: None,
      how_to: Vec::new(),
      rules: Vec::new(),
    }
  }

  pub fn with_steps(mut self, steps: Vec<String>) -> Self {
    self.how_to = steps;
    self
  }

  pub fn with_rules(mut self, rules: Vec<String>) -> Self {
    self.rules = rules;
    self
  }
}

impl SourceRecord for EventGuideRecord {
  const KIND: RecordKind = RecordKind::EventGuide;
}

/// A registered account, optionally linked to an in-game name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredPlayer {
  pub id: RecordId,
  #[serde(default)]
  pub display_name: Option<String>,
  /// The account's stored profile image.
  #[serde(default)]
  pub image: Option<String>,
  #[serde(default)]
  pub in_game_name: Option<String>,
}

impl RegisteredPlayer {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      display_name: None,
      image: None,
      in_game_name: None,
    }
  }

  pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
    self.display_name = Some(name.into());
    self
  }

  pub fn with_image(mut self, image: impl Into<String>) -> Self {
    self.image = Some(image.into());
    self
  }

  pub fn with_in_game_name(mut self, name: impl Into<String>) -> Self {
    self.in_game_name = Some(name.into());
    self
  }
}

impl SourceRecord for RegisteredPlayer {
  const KIND: RecordKind = RecordKind::RegisteredPlayer;
}

/// One raw gameplay-statistics row. Several rows may share a username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRow {
  pub username: String,
  #[serde(default)]
  pub statistic: String,
  #[serde(default)]
  pub value: i64,
  pub recorded_at: DateTime<Utc>,
}

impl StatisticsRow {
  pub fn new(
    username: impl Into<String>,
    statistic: impl Into<String>,
    value: i64,
    recorded_at: DateTime<Utc>,
  ) -> Self {
    Self {
      username: username.into(),
      statistic: statistic.into(),
      value,
      recorded_at,
    }
  }
}

impl SourceRecord for StatisticsRow {
  const KIND: RecordKind = RecordKind::Statistics;

  fn timestamp(&self) -> Option<DateTime<Utc>> {
    Some(self.recorded_at)
  }
}

/// An in-game identity seen only in gameplay statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostPlayer {
  pub username: String,
}

impl GhostPlayer {
  /// Prefix of the synthetic identifier given to ghosts.
  pub const ID_PREFIX: &'static str = "ghost-";

  /// Builds a ghost from a statistics username. Blank usernames yield `None`.
  pub fn from_username(username: &str) -> Option<Self> {
    let username = username.trim();
    if username.is_empty() {
      None
    } else {
      Some(Self {
        username: username.to_string(),
      })
    }
  }

  /// The synthetic identifier, e.g. `ghost-Notch`.
  pub fn synthetic_id(&self) -> String {
    format!("{}{}", Self::ID_PREFIX, self.username)
  }
}

/// A player entry in the search results, from either source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedPlayer {
  pub id: RecordId,
  pub display_name: Option<String>,
  pub avatar: Option<String>,
  pub in_game_name: Option<String>,
}

impl UnifiedPlayer {
  /// True when this entry was synthesized from statistics only.
  pub fn is_ghost(&self) -> bool {
    self.id.starts_with(GhostPlayer::ID_PREFIX)
  }
}

/// The final, multi-category result of one search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPayload {
  pub content: Vec<ContentRecord>,
  pub players: Vec<UnifiedPlayer>,
  pub events: Vec<EventRecord>,
  pub event_guides: Vec<EventGuideRecord>,
}

impl SearchResultPayload {
  /// The all-empty payload returned for blank queries and total failure.
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.content.is_empty()
      && self.players.is_empty()
      && self.events.is_empty()
      && self.event_guides.is_empty()
  }

  /// Total number of entries across every category.
  pub fn total(&self) -> usize {
    self.content.len() + self.players.len() + self.events.len() + self.event_guides.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_payload_shape() {
    let json = serde_json::to_value(SearchResultPayload::empty()).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "content": [], "players": [], "events": [], "eventGuides": [] })
    );
  }

  #[test]
  fn test_ghost_from_blank_username() {
    assert!(GhostPlayer::from_username("").is_none());
    assert!(GhostPlayer::from_username("   ").is_none());

    let ghost = GhostPlayer::from_username("Notch").unwrap();
    assert_eq!(ghost.synthetic_id(), "ghost-Notch");
  }

  #[test]
  fn test_event_type_serializes_as_type() {
    let event = EventRecord::new("e1", "Build Battle", "competition", Utc::now());
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "competition");
    assert!(json.get("startsAt").is_some());
  }
}
