pub mod course;
pub mod institution;
pub mod offering;

use serde::Deserialize;

/// Remote list endpoints answer either with a bare array or with `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

/// Exact name identity used by the remote directory: trimmed and case-insensitive.
pub fn names_match(stored: &str, wanted: &str) -> bool {
    stored.trim().to_lowercase() == wanted.trim().to_lowercase()
}
