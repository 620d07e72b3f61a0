//! Query normalization.
//!
//! A raw, user-entered string becomes a [`SearchQuery`]: the trimmed phrase,
//! the phrase with all whitespace removed, and its whitespace-delimited tokens.
//! Blank input normalizes to `None`, which the engine treats as "return the
//! empty payload without touching any source".

use serde::{Deserialize, Serialize};

/// A normalized search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
  /// The original input.
  pub raw_text: String,
  /// `raw_text` trimmed of surrounding whitespace. Never empty.
  pub phrase: String,
  /// `phrase` with every whitespace run removed.
  pub phrase_no_spaces: String,
  /// The non-empty whitespace-delimited pieces of `phrase`, in split order.
  pub tokens: Vec<String>,
}

impl SearchQuery {
  /// Normalize raw input. Returns `None` when the input is empty or only
  /// whitespace.
  pub fn normalize(raw_text: &str) -> Option<Self> {
    let phrase = raw_text.trim();
    if phrase.is_empty() {
      return None;
    }

    let tokens: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();
    let phrase_no_spaces = tokens.concat();

    Some(Self {
      raw_text: raw_text.to_string(),
      phrase: phrase.to_string(),
      phrase_no_spaces,
      tokens,
    })
  }

  /// True when the phrase is a single token, in which case the phrase,
  /// compact phrase and token terms are all the same string.
  pub fn is_single_token(&self) -> bool {
    self.tokens.len() == 1
  }
}
