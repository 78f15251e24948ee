//! Query gating
//!
//! Decides from the user's terms whether a remote search runs at all. Only
//! a first term starting with the trigger prefix (`p:` by default) opens the
//! gate; the rest of that term plus every following term forms the query.

/// Outcome of gating a term list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// No prefix; answer with an empty result set and no network access
    Rejected,
    /// Prefix present; the query string to send
    Accepted(String),
}

/// Prefix gate for search terms
#[derive(Debug, Clone)]
pub struct QueryGate {
    prefix: String,
}

impl QueryGate {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether the first term opens the gate. Depends on the first term only.
    pub fn accepts<S: AsRef<str>>(&self, terms: &[S]) -> bool {
        terms
            .first()
            .map(|first| first.as_ref().starts_with(&self.prefix))
            .unwrap_or(false)
    }

    /// Gate the terms and build the query string
    pub fn evaluate<S: AsRef<str>>(&self, terms: &[S]) -> GateDecision {
        if !self.accepts(terms) {
            return GateDecision::Rejected;
        }
        GateDecision::Accepted(self.query_words(terms).join(" "))
    }

    /// The query split into words, prefix removed
    pub fn query_words<'a, S: AsRef<str>>(&self, terms: &'a [S]) -> Vec<&'a str> {
        terms
            .iter()
            .enumerate()
            .map(|(i, term)| {
                let term = term.as_ref();
                if i == 0 {
                    term.strip_prefix(self.prefix.as_str()).unwrap_or(term)
                } else {
                    term
                }
            })
            .flat_map(str::split_whitespace)
            .collect()
    }
}

impl Default for QueryGate {
    fn default() -> Self {
        Self::new("p:")
    }
}
