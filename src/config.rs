//! Search configuration.

use crate::error::ConfigError;
use crate::unify::{DEFAULT_AVATAR_URL_TEMPLATE, DEFAULT_PLAYER_LIMIT, USERNAME_PLACEHOLDER};
use serde::{Deserialize, Serialize};

/// Limits and the avatar template used by a [`SearchEngine`](crate::engine::SearchEngine).
///
/// Every field has a default, so a partial JSON document such as
/// `{"playerLimit": 10}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
  /// Maximum content posts returned.
  #[serde(default = "default_category_limit")]
  pub content_limit: usize,
  /// Maximum events returned.
  #[serde(default = "default_category_limit")]
  pub event_limit: usize,
  /// Maximum event-guide entries returned.
  #[serde(default = "default_category_limit")]
  pub guide_limit: usize,
  /// Maximum registered accounts read before unification.
  #[serde(default = "default_player_source_limit")]
  pub registered_limit: usize,
  /// Maximum distinct statistics usernames read before unification.
  #[serde(default = "default_player_source_limit")]
  pub statistics_limit: usize,
  /// Maximum players returned after unification.
  #[serde(default = "default_player_limit")]
  pub player_limit: usize,
  /// Avatar URL with a `{username}` placeholder.
  #[serde(default = "default_avatar_url_template")]
  pub avatar_url_template: String,
}

fn default_category_limit() -> usize {
  10
}

fn default_player_source_limit() -> usize {
  20
}

fn default_player_limit() -> usize {
  DEFAULT_PLAYER_LIMIT
}

fn default_avatar_url_template() -> String {
  DEFAULT_AVATAR_URL_TEMPLATE.to_string()
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      content_limit: default_category_limit(),
      event_limit: default_category_limit(),
      guide_limit: default_category_limit(),
      registered_limit: default_player_source_limit(),
      statistics_limit: default_player_source_limit(),
      player_limit: default_player_limit(),
      avatar_url_template: default_avatar_url_template(),
    }
  }
}

impl SearchConfig {
  /// Parse and validate a JSON configuration.
  pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
    let config: Self = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  /// Check that every limit is positive and the template has a placeholder.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let limits = [
      ("contentLimit", self.content_limit),
      ("eventLimit", self.event_limit),
      ("guideLimit", self.guide_limit),
      ("registeredLimit", self.registered_limit),
      ("statisticsLimit", self.statistics_limit),
      ("playerLimit", self.player_limit),
    ];
    if let Some((name, _)) = limits.iter().find(|(_, limit)| *limit == 0) {
      return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
    }

    if !self.avatar_url_template.contains(USERNAME_PLACEHOLDER) {
      return Err(ConfigError::Invalid(format!(
        "avatarUrlTemplate must contain {USERNAME_PLACEHOLDER}"
      )));
    }

    Ok(())
  }

  pub fn content_limit(mut self, limit: usize) -> Self {
    self.content_limit = limit;
    self
  }

  pub fn event_limit(mut self, limit: usize) -> Self {
    self.event_limit = limit;
    self
  }

  pub fn guide_limit(mut self, limit: usize) -> Self {
    self.guide_limit = limit;
    self
  }

  pub fn registered_limit(mut self, limit: usize) -> Self {
    self.registered_limit = limit;
    self
  }

  pub fn statistics_limit(mut self, limit: usize) -> Self {
    self.statistics_limit = limit;
    self
  }

  pub fn player_limit(mut self, limit: usize) -> Self {
    self.player_limit = limit;
    self
  }

  pub fn avatar_url_template(mut self, template: impl Into<String>) -> Self {
    self.avatar_url_template = template.into();
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = SearchConfig::default();
    assert_eq!(config.content_limit, 10);
    assert_eq!(config.event_limit, 10);
    assert_eq!(config.guide_limit, 10);
    assert_eq!(config.registered_limit, 20);
    assert_eq!(config.statistics_limit, 20);
    assert_eq!(config.player_limit, 15);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_partial_json() {
    let config = SearchConfig::from_json_str(r#"{ "playerLimit": 5 }"#).unwrap();
    assert_eq!(config.player_limit, 5);
    assert_eq!(config.content_limit, 10);
  }

  #[test]
  fn test_rejects_zero_limit() {
    let err = SearchConfig::from_json_str(r#"{ "eventLimit": 0 }"#).unwrap_err();
    assert_eq!(err.to_string(), "invalid config: eventLimit must be greater than zero");
  }

  #[test]
  fn test_rejects_template_without_placeholder() {
    let config = SearchConfig::default().avatar_url_template("https://example.com/head.png");
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
  }

  #[test]
  fn test_chained_setters() {
    let config = SearchConfig::default()
      .event_limit(3)
      .guide_limit(4)
      .registered_limit(5)
      .statistics_limit(6)
      .player_limit(7);
    assert_eq!(
      (config.event_limit, config.guide_limit, config.registered_limit, config.statistics_limit, config.player_limit),
      (3, 4, 5, 6, 7)
    );
    assert!(config.validate().is_ok());
    assert!(config.statistics_limit(0).validate().is_err());
  }

  #[test]
  fn test_rejects_malformed_json() {
    assert!(matches!(
      SearchConfig::from_json_str("{ playerLimit: }"),
      Err(ConfigError::Parse(_))
    ));
  }
}
