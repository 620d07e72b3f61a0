//! Per-source matching rules.

use serde::{Deserialize, Serialize};

/// Which query terms a source is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermMode {
    /// Only the whole phrase.
    PhraseOnly,
    /// The whole phrase, the phrase without spaces, and every token.
    Expanded,
}

/// The order a source returns its matches in. The cap is applied after
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSpec {
    /// The source's own retrieval order.
    Natural,
    /// Most recent timestamp first.
    NewestFirst,
    /// Earliest timestamp first.
    SoonestFirst,
}

/// Rules for one record source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRules {
    /// Searchable field names, as serialized.
    pub fields: Vec<String>,
    /// Terms to OR together.
    pub mode: TermMode,
    /// Maximum number of records the source may return.
    pub limit: usize,
    /// Result ordering.
    pub order: OrderSpec,
    /// When set, at most one record per distinct value of this field is
    /// returned. Collapsing happens before the limit.
    pub distinct_on: Option<String>,
}

impl SourceRules {
    /// Create a new rules builder.
    pub fn builder() -> SourceRulesBuilder {
        SourceRulesBuilder::default()
    }

    /// Content posts: phrase search over text fields, newest first.
    pub fn content() -> Self {
        Self::builder()
            .fields(["title", "excerpt", "content", "category"])
            .limit(10)
            .order(OrderSpec::NewestFirst)
            .build()
    }

    /// Events: phrase search, soonest first.
    pub fn events() -> Self {
        Self::builder()
            .fields(["title", "description", "type"])
            .limit(10)
            .order(OrderSpec::SoonestFirst)
            .build()
    }

    /// Event guides: phrase search over text and step lists.
    pub fn event_guides() -> Self {
        Self::builder()
            .fields(["title", "description", "howTo", "rules"])
            .limit(10)
            .build()
    }

    /// Registered accounts: expanded search over both names.
    pub fn registered_players() -> Self {
        Self::builder()
            .fields(["displayName", "inGameName"])
            .mode(TermMode::Expanded)
            .limit(20)
            .build()
    }

    /// Gameplay statistics: expanded search, one row per username.
    pub fn statistics() -> Self {
        Self::builder()
            .field("username")
            .mode(TermMode::Expanded)
            .limit(20)
            .distinct_on("username")
            .build()
    }

    /// Replace the limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Builder for [`SourceRules`].
#[derive(Debug)]
pub struct SourceRulesBuilder {
    fields: Vec<String>,
    mode: TermMode,
    limit: usize,
    order: OrderSpec,
    distinct_on: Option<String>,
}

impl Default for SourceRulesBuilder {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            mode: TermMode::PhraseOnly,
            limit: 10,
            order: OrderSpec::Natural,
            distinct_on: None,
        }
    }
}

impl SourceRulesBuilder {
    /// Add a searchable field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Add several searchable fields.
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn mode(mut self, mode: TermMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn order(mut self, order: OrderSpec) -> Self {
        self.order = order;
        self
    }

    pub fn distinct_on(mut self, field: impl Into<String>) -> Self {
        self.distinct_on = Some(field.into());
        self
    }

    /// Build the rules.
    pub fn build(self) -> SourceRules {
        SourceRules {
            fields: self.fields,
            mode: self.mode,
            limit: self.limit,
            order: self.order,
            distinct_on: self.distinct_on,
        }
    }
}
