//! crafty_search - global search for the Crafty Friends community site.
//!
//! One free-text query is matched against content posts, events, event
//! guides, registered accounts and gameplay statistics. Registered accounts
//! and statistics-only usernames are unified into a single player list.
//! A failing source only empties its own category; search never errors.

pub mod config;
pub mod engine;
pub mod error;
pub mod extension;
pub mod filter;
pub mod matcher;
pub mod query;
pub mod rules;
pub mod source;
pub mod types;
pub mod unify;

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::SearchConfig;
    pub use crate::engine::*;
    pub use crate::error::{ConfigError, SourceError};
    pub use crate::extension::SearchExtension;
    pub use crate::filter::{MatchExpr, Term};
    pub use crate::query::SearchQuery;
    pub use crate::rules::*;
    pub use crate::source::{InMemSource, RecordSource};
    pub use crate::types::*;
    pub use crate::unify::PlayerUnifier;
}
