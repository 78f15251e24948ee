//! Search progress events

use serde::Serialize;

/// Progress of one search generation, broadcast to interested hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEvent {
    /// Generation the event belongs to
    pub generation: u64,
    pub kind: SearchEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "ids", rename_all = "snake_case")]
pub enum SearchEventKind {
    /// Debounce started; hosts may show the loading sentinel
    Loading,
    /// Final ids for the generation, real results or a sentinel
    Results(Vec<String>),
}

impl SearchEvent {
    pub fn loading(generation: u64) -> Self {
        Self {
            generation,
            kind: SearchEventKind::Loading,
        }
    }

    pub fn results(generation: u64, ids: Vec<String>) -> Self {
        Self {
            generation,
            kind: SearchEventKind::Results(ids),
        }
    }
}
