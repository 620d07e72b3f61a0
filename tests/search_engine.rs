use chrono::{DateTime, TimeZone, Utc};
use crafty_search::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn day(d: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 12, d, 18, 0, 0).unwrap()
}

/// A source that counts calls and always answers with nothing.
#[derive(Default)]
struct CountingSource(AtomicUsize);

impl<T: SourceRecord> RecordSource<T> for CountingSource {
  fn fetch(&self, _: &MatchExpr, _: &SourceRules) -> Result<Vec<T>, SourceError> {
    self.0.fetch_add(1, Ordering::SeqCst);
    Ok(Vec::new())
  }
}

fn community_engine() -> SearchEngine {
  let posts = InMemSource::new(vec![
    ContentRecord::new("p1", "Winter Wonderland Event", day(1)),
    ContentRecord::new("p2", "Winter Draft", day(20)).with_published(false),
    ContentRecord::new("p3", "Spawn rebuild", day(5)).with_content("The winter spawn is getting a rebuild"),
  ])
  .with_visibility(|post| post.published);

  let events = InMemSource::new(vec![
    EventRecord::new("e1", "Winter Parkour", "parkour", day(14)),
    EventRecord::new("e2", "Winter Build Battle", "competition", day(7)),
  ]);

  let guides = InMemSource::new(vec![EventGuideRecord::new(
    "g1",
    "Parkour",
    "Reach the top of the winter tower",
  )]);

  let players = InMemSource::new(vec![
    RegisteredPlayer::new("acc-birdy").with_display_name("Birdy Parrot"),
    RegisteredPlayer::new("acc-steve")
      .with_display_name("Steve the Builder")
      .with_image("https://cdn.example/steve.png")
      .with_in_game_name("Steve"),
    RegisteredPlayer::new("acc-winter").with_in_game_name("WinterFox"),
  ]);

  let stats = InMemSource::new(vec![
    StatisticsRow::new("Steve", "blocks_mined", 500, day(1)),
    StatisticsRow::new("Steve", "deaths", 3, day(2)),
    StatisticsRow::new("Notch", "blocks_mined", 9000, day(3)),
    StatisticsRow::new("Notch", "deaths", 0, day(4)),
  ]);

  SearchEngine::builder()
    .content_source(posts)
    .event_source(events)
    .guide_source(guides)
    .registered_source(players)
    .statistics_source(stats)
    .build()
}

#[test]
fn test_blank_query_touches_no_source() {
  let counter = Arc::new(CountingSource::default());
  let engine = SearchEngine::builder()
    .content_source(Arc::clone(&counter))
    .event_source(Arc::clone(&counter))
    .guide_source(Arc::clone(&counter))
    .registered_source(Arc::clone(&counter))
    .statistics_source(Arc::clone(&counter))
    .build();

  for blank in ["", " ", "\t\n", "     "] {
    assert!(engine.search(blank).is_empty());
  }
  assert_eq!(counter.0.load(Ordering::SeqCst), 0);

  engine.search("steve");
  assert_eq!(counter.0.load(Ordering::SeqCst), 5);
}

#[test]
fn test_blank_query_payload_shape() {
  let payload = community_engine().search("");
  assert_eq!(
    serde_json::to_value(&payload).unwrap(),
    serde_json::json!({ "content": [], "players": [], "events": [], "eventGuides": [] })
  );
}

#[test]
fn test_case_insensitive() {
  let engine = community_engine();
  for variant in ["WONDERLAND", "wonderland", "WoNdErLaNd"] {
    let payload = engine.search(variant);
    assert_eq!(payload.content.len(), 1, "{variant}");
    assert_eq!(payload.content[0].id, "p1");
  }
}

#[test]
fn test_player_token_composition() {
  let engine = community_engine();
  for raw in ["Birdy", "Parrot", "BirdyParrot", "Birdy Parrot"] {
    let players = engine.search(raw).players;
    assert!(
      players.iter().any(|p| p.id == "acc-birdy"),
      "{raw} should find Birdy Parrot"
    );
  }
}

#[test]
fn test_registered_precedence() {
  let players = community_engine().search("steve").players;
  let steves: Vec<_> = players
    .iter()
    .filter(|p| p.in_game_name.as_deref().map(str::to_lowercase).as_deref() == Some("steve"))
    .collect();

  assert_eq!(steves.len(), 1);
  assert_eq!(steves[0].id, "acc-steve");
  assert_eq!(steves[0].display_name.as_deref(), Some("Steve the Builder"));
  assert_eq!(
    steves[0].avatar.as_deref(),
    Some("https://mc-heads.net/avatar/Steve")
  );
}

#[test]
fn test_ghost_player_retained() {
  let players = community_engine().search("notch").players;
  assert_eq!(players.len(), 1);
  assert_eq!(players[0].id, "ghost-Notch");
  assert_eq!(players[0].in_game_name.as_deref(), Some("Notch"));
}

#[test]
fn test_player_cap() {
  let registered: Vec<_> = (0..30)
    .map(|i| RegisteredPlayer::new(format!("acc-{i}")).with_in_game_name(format!("Crafter{i}")))
    .collect();
  let stats: Vec<_> = (0..30)
    .map(|i| StatisticsRow::new(format!("CrafterGhost{i}"), "deaths", i, day(1)))
    .collect();

  let engine = SearchEngine::builder()
    .registered_source(InMemSource::new(registered))
    .statistics_source(InMemSource::new(stats))
    .build();

  let players = engine.search("crafter").players;
  assert_eq!(players.len(), 15);
}

#[test]
fn test_failing_content_source_is_isolated() {
  let engine = SearchEngine::builder()
    .content_source(
      InMemSource::<ContentRecord>::empty().failing(SourceError::Timeout { after_ms: 500 }),
    )
    .event_source(InMemSource::new(vec![EventRecord::new(
      "e1",
      "Winter Parkour",
      "parkour",
      day(14),
    )]))
    .guide_source(InMemSource::new(vec![EventGuideRecord::new(
      "g1",
      "Winter Parkour",
      "Jump",
    )]))
    .statistics_source(InMemSource::new(vec![StatisticsRow::new(
      "WinterWolf",
      "deaths",
      1,
      day(1),
    )]))
    .build();

  let outcome = engine.search_detailed("winter");
  assert!(outcome.payload.content.is_empty());
  assert_eq!(outcome.payload.events.len(), 1);
  assert_eq!(outcome.payload.event_guides.len(), 1);
  assert_eq!(outcome.payload.players.len(), 1);

  assert!(outcome.is_degraded());
  assert!(!outcome.is_total_failure());
  assert_eq!(
    outcome.failures,
    vec![SourceFailure {
      kind: RecordKind::Content,
      error: SourceError::Timeout { after_ms: 500 },
    }]
  );
}

#[test]
fn test_idempotent() {
  let engine = community_engine();
  let first = engine.search("winter");
  let second = engine.search("winter");
  assert_eq!(first, second);
  assert!(!first.is_empty());
}

#[test]
fn test_winter_scenario() {
  let payload = community_engine().search("winter");

  // The draft is unpublished; the spawn post matches on its body.
  let ids: Vec<_> = payload.content.iter().map(|c| c.id.as_str()).collect();
  assert_eq!(ids, vec!["p3", "p1"]);

  let events: Vec<_> = payload.events.iter().map(|e| e.id.as_str()).collect();
  assert_eq!(events, vec!["e2", "e1"]);

  assert_eq!(payload.event_guides.len(), 1);
  assert_eq!(payload.players.len(), 1);
  assert_eq!(payload.players[0].id, "acc-winter");
}

#[test]
fn test_statistics_token_and_compact_matching() {
  let engine = SearchEngine::builder()
    .statistics_source(InMemSource::new(vec![
      StatisticsRow::new("WinterWolf", "blocks_mined", 1200, day(1)),
      StatisticsRow::new("WinterWolf", "deaths", 4, day(2)),
      StatisticsRow::new("PackLeader", "kills", 7, day(3)),
    ]))
    .build();

  for raw in ["Winter Wolf", "winterwolf", "wolf", "WOLF pack"] {
    let players = engine.search(raw).players;
    assert!(
      players.iter().any(|p| p.id == "ghost-WinterWolf"),
      "{raw} should find WinterWolf"
    );
  }

  let ids: Vec<_> = engine.search("wolf pack").players.into_iter().map(|p| p.id).collect();
  assert_eq!(ids, vec!["ghost-WinterWolf", "ghost-PackLeader"]);
}

#[test]
fn test_padded_names_unify_to_one_player() {
  let engine = SearchEngine::builder()
    .registered_source(InMemSource::new(vec![
      RegisteredPlayer::new("acc-steve").with_in_game_name(" Steve"),
    ]))
    .statistics_source(InMemSource::new(vec![StatisticsRow::new(" Steve", "deaths", 2, day(1))]))
    .build();

  let players = engine.search("steve").players;
  assert_eq!(players.len(), 1);
  assert_eq!(players[0].id, "acc-steve");
}
