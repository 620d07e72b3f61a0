//! Player identity unification.
//!
//! Registered accounts and statistics-only ("ghost") usernames are merged
//! into one list keyed by a lowercase identity key. A registered account
//! always wins over a ghost with the same key, and output keeps insertion
//! order: registered entries first, then ghosts that were not already
//! present. The list is truncated only after merging.

use crate::types::{GhostPlayer, RegisteredPlayer, UnifiedPlayer};
use std::collections::HashMap;

/// Avatar service used when nothing else is configured.
pub const DEFAULT_AVATAR_URL_TEMPLATE: &str = "https://mc-heads.net/avatar/{username}";

/// Placeholder replaced by the in-game name in an avatar template.
pub const USERNAME_PLACEHOLDER: &str = "{username}";

/// Key used for a registered account with no name and no id.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Number of players kept after unification by default.
pub const DEFAULT_PLAYER_LIMIT: usize = 15;

/// The identity key of a registered account: the first non-blank of in-game
/// name, display name and account id, trimmed and lowercased, or `"unknown"`.
///
/// Two anonymous accounts both fall back to `"unknown"` and collide; the later
/// one wins.
pub fn registered_identity(player: &RegisteredPlayer) -> String {
  non_blank(player.in_game_name.as_deref())
    .or_else(|| non_blank(player.display_name.as_deref()))
    .or_else(|| non_blank(Some(player.id.as_str())))
    .unwrap_or(UNKNOWN_IDENTITY)
    .to_lowercase()
}

/// The identity key of a ghost: its trimmed, lowercased username.
pub fn ghost_identity(ghost: &GhostPlayer) -> String {
  ghost.username.trim().to_lowercase()
}

/// The trimmed value, if anything is left.
fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

/// Merges registered and ghost players.
#[derive(Debug, Clone)]
pub struct PlayerUnifier {
  avatar_url_template: String,
  limit: usize,
}

impl Default for PlayerUnifier {
  fn default() -> Self {
    Self::new(DEFAULT_AVATAR_URL_TEMPLATE, DEFAULT_PLAYER_LIMIT)
  }
}

impl PlayerUnifier {
  pub fn new(avatar_url_template: impl Into<String>, limit: usize) -> Self {
    Self {
      avatar_url_template: avatar_url_template.into(),
      limit,
    }
  }

  pub fn limit(&self) -> usize {
    self.limit
  }

  /// The avatar URL for an in-game name.
  pub fn avatar_url(&self, username: &str) -> String {
    self.avatar_url_template.replace(USERNAME_PLACEHOLDER, username)
  }

  /// Merge `registered` and `ghosts`, in that order, and keep at most
  /// `limit` entries.
  pub fn unify(&self, registered: &[RegisteredPlayer], ghosts: &[GhostPlayer]) -> Vec<UnifiedPlayer> {
    let mut merged = IdentityMap::with_capacity(registered.len() + ghosts.len());

    for player in registered {
      merged.insert(registered_identity(player), self.from_registered(player));
    }

    for ghost in ghosts {
      if ghost.username.trim().is_empty() {
        continue;
      }
      merged.insert_if_absent(ghost_identity(ghost), || self.from_ghost(ghost));
    }

    let mut players = merged.into_values();
    players.truncate(self.limit);
    players
  }

  fn from_registered(&self, player: &RegisteredPlayer) -> UnifiedPlayer {
    // The in-game skin is preferred over the stored profile image.
    let in_game_name = non_blank(player.in_game_name.as_deref());
    let avatar = match in_game_name {
      Some(username) => Some(self.avatar_url(username)),
      None => player.image.clone(),
    };

    UnifiedPlayer {
      id: player.id.clone(),
      display_name: player.display_name.clone(),
      avatar,
      in_game_name: in_game_name.map(str::to_string),
    }
  }

  fn from_ghost(&self, ghost: &GhostPlayer) -> UnifiedPlayer {
    UnifiedPlayer {
      id: ghost.synthetic_id(),
      display_name: Some(ghost.username.clone()),
      avatar: Some(self.avatar_url(&ghost.username)),
      in_game_name: Some(ghost.username.clone()),
    }
  }
}

/// Unify with the default avatar template.
pub fn unify(registered: &[RegisteredPlayer], ghosts: &[GhostPlayer], limit: usize) -> Vec<UnifiedPlayer> {
  PlayerUnifier::new(DEFAULT_AVATAR_URL_TEMPLATE, limit).unify(registered, ghosts)
}

/// Insertion-ordered map. Overwriting a key keeps its original position.
struct IdentityMap {
  positions: HashMap<String, usize>,
  values: Vec<UnifiedPlayer>,
}

impl IdentityMap {
  fn with_capacity(capacity: usize) -> Self {
    Self {
      positions: HashMap::with_capacity(capacity),
      values: Vec::with_capacity(capacity),
    }
  }

  fn insert(&mut self, key: String, value: UnifiedPlayer) {
    match self.positions.get(&key) {
      Some(&index) => self.values[index] = value,
      None => {
        self.positions.insert(key, self.values.len());
        self.values.push(value);
      }
    }
  }

  fn insert_if_absent(&mut self, key: String, value: impl FnOnce() -> UnifiedPlayer) {
    if !self.positions.contains_key(&key) {
      self.positions.insert(key, self.values.len());
      self.values.push(value());
    }
  }

  fn into_values(self) -> Vec<UnifiedPlayer> {
    self.values
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ghost(name: &str) -> GhostPlayer {
    GhostPlayer {
      username: name.to_string(),
    }
  }

  #[test]
  fn test_identity_precedence() {
    let full = RegisteredPlayer::new("acc-1")
      .with_display_name("Birdy Parrot")
      .with_in_game_name("BirdyMC");
    assert_eq!(registered_identity(&full), "birdymc");

    let named = RegisteredPlayer::new("acc-2").with_display_name("Birdy Parrot");
    assert_eq!(registered_identity(&named), "birdy parrot");

    let blank_names = RegisteredPlayer::new("ACC-3")
      .with_display_name("")
      .with_in_game_name("  ");
    assert_eq!(registered_identity(&blank_names), "acc-3");

    assert_eq!(registered_identity(&RegisteredPlayer::new("")), "unknown");
  }

  #[test]
  fn test_registered_wins_over_ghost() {
    let registered = vec![RegisteredPlayer::new("acc-steve")
      .with_display_name("Steve the Builder")
      .with_image("https://cdn.example/steve.png")
      .with_in_game_name("Steve")];
    let ghosts = vec![ghost("steve"), ghost("Notch")];

    let players = unify(&registered, &ghosts, 15);
    assert_eq!(players.len(), 2);

    assert_eq!(players[0].id, "acc-steve");
    assert_eq!(players[0].display_name.as_deref(), Some("Steve the Builder"));
    assert_eq!(
      players[0].avatar.as_deref(),
      Some("https://mc-heads.net/avatar/Steve")
    );

    assert_eq!(players[1].id, "ghost-Notch");
    assert!(players[1].is_ghost());
  }

  #[test]
  fn test_stored_image_without_in_game_name() {
    let registered = vec![RegisteredPlayer::new("acc-1")
      .with_display_name("Alex")
      .with_image("https://cdn.example/alex.png")];

    let players = unify(&registered, &[], 15);
    assert_eq!(players[0].avatar.as_deref(), Some("https://cdn.example/alex.png"));
  }

  #[test]
  fn test_later_registered_overwrites_in_place() {
    let registered = vec![
      RegisteredPlayer::new("").with_image("first"),
      RegisteredPlayer::new("acc-2").with_in_game_name("Alex"),
      RegisteredPlayer::new("").with_image("second"),
    ];

    let players = unify(&registered, &[], 15);
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].avatar.as_deref(), Some("second"));
    assert_eq!(players[1].id, "acc-2");
  }

  #[test]
  fn test_ghost_duplicates_and_blanks() {
    let players = unify(&[], &[ghost("Notch"), ghost("NOTCH"), ghost(" ")], 15);
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].id, "ghost-Notch");
    assert_eq!(players[0].in_game_name.as_deref(), Some("Notch"));
  }

  #[test]
  fn test_truncate_after_merge() {
    let registered: Vec<_> = (0..30)
      .map(|i| RegisteredPlayer::new(format!("acc-{i}")).with_in_game_name(format!("player{i}")))
      .collect();
    let ghosts: Vec<_> = (0..30).map(|i| ghost(&format!("ghost{i}"))).collect();

    let players = unify(&registered, &ghosts, 15);
    assert_eq!(players.len(), 15);
    assert!(players.iter().all(|p| !p.is_ghost()));
  }

  #[test]
  fn test_padded_in_game_name_matches_ghost() {
    let registered = vec![RegisteredPlayer::new("acc-steve").with_in_game_name(" Steve ")];
    let ghosts = vec![GhostPlayer::from_username(" Steve").unwrap()];

    assert_eq!(registered_identity(&registered[0]), "steve");
    assert_eq!(ghost_identity(&ghosts[0]), "steve");

    let players = unify(&registered, &ghosts, 15);
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].id, "acc-steve");
    assert_eq!(players[0].in_game_name.as_deref(), Some("Steve"));
    assert_eq!(
      players[0].avatar.as_deref(),
      Some("https://mc-heads.net/avatar/Steve")
    );
  }

  #[test]
  fn test_custom_template() {
    let unifier = PlayerUnifier::new("https://minotar.net/helm/{username}/64", 5);
    let players = unifier.unify(&[], &[ghost("jeb_")]);
    assert_eq!(
      players[0].avatar.as_deref(),
      Some("https://minotar.net/helm/jeb_/64")
    );
  }
}
