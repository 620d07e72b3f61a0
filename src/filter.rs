//! Typed match predicates.
//!
//! A [`MatchExpr`] is an OR of case-insensitive substring tests, one per
//! (field, term) pair. Sources receive the expression and either evaluate it
//! directly (see [`MatchExpr::matches`]) or translate it into their own query
//! language.

use crate::query::SearchQuery;
use crate::rules::{SourceRules, TermMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One query term. Needles are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
  /// The whole trimmed phrase.
  Phrase(String),
  /// The phrase with whitespace removed. Also matches a field whose own
  /// whitespace has been removed, so "birdyparrot" finds "Birdy Parrot".
  Compact(String),
  /// A single whitespace-delimited token.
  Token(String),
}

impl Term {
  /// The lowercased text this term looks for.
  pub fn needle(&self) -> &str {
    match self {
      Term::Phrase(s) | Term::Compact(s) | Term::Token(s) => s,
    }
  }

  /// Case-insensitive containment test against `text`.
  pub fn matches(&self, text: &str) -> bool {
    let haystack = text.to_lowercase();
    match self {
      Term::Phrase(needle) | Term::Token(needle) => haystack.contains(needle.as_str()),
      Term::Compact(needle) => {
        haystack.contains(needle.as_str()) || strip_whitespace(&haystack).contains(needle.as_str())
      }
    }
  }
}

/// A node of the match expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchExpr {
  /// The named field contains the term. String-array fields match when any
  /// element does; missing and null fields never match.
  Contains {
    field: String,
    term: Term,
  },
  /// True if at least one sub-expression is true. An empty OR is false.
  Or(Vec<MatchExpr>),
}

impl MatchExpr {
  /// Build the predicate a source should apply for `query` under `rules`.
  pub fn for_query(query: &SearchQuery, rules: &SourceRules) -> Self {
    let terms = terms_for(query, rules.mode);

    let mut clauses = Vec::with_capacity(rules.fields.len() * terms.len());
    for field in &rules.fields {
      for term in &terms {
        clauses.push(MatchExpr::Contains {
          field: field.clone(),
          term: term.clone(),
        });
      }
    }

    MatchExpr::Or(clauses)
  }

  /// Evaluate against any serializable record.
  pub fn matches<T: Serialize>(&self, item: &T) -> bool {
    match serde_json::to_value(item) {
      Ok(value) => self.evaluate(&value),
      Err(_) => false,
    }
  }

  /// Evaluate against a record already in JSON form.
  pub fn evaluate(&self, value: &Value) -> bool {
    match self {
      MatchExpr::Contains { field, term } => match value.get(field) {
        Some(Value::Array(items)) => items.iter().any(|v| scalar_matches(v, term)),
        Some(v) => scalar_matches(v, term),
        None => false,
      },
      MatchExpr::Or(exprs) => exprs.iter().any(|e| e.evaluate(value)),
    }
  }
}

impl fmt::Display for MatchExpr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MatchExpr::Contains { field, term } => {
        let kind = match term {
          Term::Phrase(_) => "phrase",
          Term::Compact(_) => "compact",
          Term::Token(_) => "token",
        };
        write!(f, "{} ~ {}({:?})", field, kind, term.needle())
      }
      MatchExpr::Or(exprs) => {
        f.write_str("(")?;
        for (i, expr) in exprs.iter().enumerate() {
          if i > 0 {
            f.write_str(" OR ")?;
          }
          write!(f, "{}", expr)?;
        }
        f.write_str(")")
      }
    }
  }
}

/// The distinct terms for a query under the given mode.
fn terms_for(query: &SearchQuery, mode: TermMode) -> Vec<Term> {
  let phrase = query.phrase.to_lowercase();
  let mut terms = vec![Term::Phrase(phrase.clone())];

  if mode == TermMode::Expanded {
    terms.push(Term::Compact(query.phrase_no_spaces.to_lowercase()));

    // A lone token is the phrase itself.
    if !query.is_single_token() {
      for token in &query.tokens {
        let token = Term::Token(token.to_lowercase());
        if !terms.contains(&token) {
          terms.push(token);
        }
      }
    }
  }

  terms
}

fn scalar_matches(value: &Value, term: &Term) -> bool {
  match value {
    Value::String(s) => term.matches(s),
    Value::Number(n) => term.matches(&n.to_string()),
    Value::Bool(b) => term.matches(&b.to_string()),
    _ => false,
  }
}

fn strip_whitespace(text: &str) -> String {
  text.chars().filter(|c| !c.is_whitespace()).collect()
}
