use serde::Serialize;

/// Paging data reported next to a list. Cursor backends fill
/// `before`/`after`, numeric ones `current_page`/`total_page`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_count: u64,
    pub before: Option<String>,
    pub after: Option<String>,
    pub current_page: Option<u64>,
    pub total_page: Option<u64>,
}

/// A list of entries with its paging data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub metadata: PageMetadata,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            entries: self.entries.into_iter().map(f).collect(),
            metadata: self.metadata,
        }
    }
}
