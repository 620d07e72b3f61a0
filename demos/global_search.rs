//! Global search over a small in-memory community.
//!
//! Run with `RUST_LOG=crafty_search=debug` to see per-source logging.

use chrono::{Duration, Utc};
use crafty_search::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let now = Utc::now();

  let posts = InMemSource::new(vec![
    ContentRecord::new("post-1", "Winter Wonderland Event", now - Duration::days(2))
      .with_excerpt("Snowball fights and ice races all weekend")
      .with_category("events")
      .with_author("Birdy Parrot"),
    ContentRecord::new("post-2", "Winter Draft", now).with_published(false),
    ContentRecord::new("post-3", "Server Patch 1.21", now - Duration::days(7))
      .with_content("Fixed the winter biome lag."),
  ])
  .with_visibility(|post| post.published);

  let events = InMemSource::new(vec![
    EventRecord::new("ev-1", "Ice Boat Race", "race", now + Duration::days(3))
      .with_description("Winter racing on packed ice"),
    EventRecord::new("ev-2", "Build Battle", "competition", now + Duration::days(1)),
  ]);

  let guides = InMemSource::new(vec![EventGuideRecord::new(
    "guide-1",
    "Ice Boat Race",
    "How the winter race works",
  )
  .with_steps(vec!["Grab a boat".into(), "Follow the lanterns".into()])
  .with_rules(vec!["No pearls".into()])]);

  let players = InMemSource::new(vec![
    RegisteredPlayer::new("acc-1")
      .with_display_name("Birdy Parrot")
      .with_in_game_name("BirdyParrot"),
    RegisteredPlayer::new("acc-2").with_display_name("Winterfell"),
  ]);

  let stats = InMemSource::new(vec![
    StatisticsRow::new("WinterWolf", "blocks_mined", 1200, now),
    StatisticsRow::new("WinterWolf", "deaths", 4, now),
    StatisticsRow::new("BirdyParrot", "deaths", 9, now),
  ]);

  let engine = SearchEngine::builder()
    .content_source(posts)
    .event_source(events)
    .guide_source(guides)
    .registered_source(players)
    .statistics_source(stats)
    .build();

  let query = std::env::args().nth(1).unwrap_or_else(|| "winter".to_string());
  let payload = engine.search(&query);

  match serde_json::to_string_pretty(&payload) {
    Ok(json) => println!("{json}"),
    Err(e) => eprintln!("failed to render results: {e}"),
  }
}
