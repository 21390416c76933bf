use serde::Serialize;
use tracing::warn;
use url::form_urlencoded;

use crate::Redirect;

/// Which cursor a list request pages by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Cursor {
    /// entries before this token (towards newer)
    Before(String),
    /// entries after this token (towards older)
    After(String),
}

/// The query-string surface of a list view.
///
/// `page` and `page_size` stay raw: validating them needs the configured
/// sizes and produces redirects, see [`crate::pagination::PageRequest`].
/// Unknown keys are ignored, empty values count as absent, a repeated key
/// keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// cursor towards newer entries
    pub before: Option<String>,
    /// cursor towards older entries
    pub after: Option<String>,
    /// requested page, unvalidated
    pub page: Option<String>,
    /// requested page size, unvalidated
    pub page_size: Option<String>,
    /// sender filter
    pub address_from: Option<String>,
    /// receiver filter
    pub address_to: Option<String>,
    /// lowest block number
    pub block_from: Option<u64>,
    /// highest block number
    pub block_to: Option<u64>,
    /// earliest timestamp
    pub age_range_start: Option<String>,
    /// latest timestamp
    pub age_range_end: Option<String>,
    /// `asc` or `desc`
    pub sort: Option<String>,
}

fn parse_block(key: &str, value: &str) -> Option<u64> {
    match value.trim().parse() {
        Ok(number) => Some(number),
        Err(_) => {
            warn!(key, value, "Ignoring non numeric block filter");
            None
        }
    }
}

impl ListQuery {
    /// Parse a query string, with or without its leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let text = Some(value.to_owned());
            match key.as_ref() {
                "before" => parsed.before = text,
                "after" => parsed.after = text,
                "page" => parsed.page = text,
                "page_size" => parsed.page_size = text,
                "address_from" => parsed.address_from = text,
                "address_to" => parsed.address_to = text,
                "block_from" => parsed.block_from = parse_block("block_from", value),
                "block_to" => parsed.block_to = parse_block("block_to", value),
                "age_range_start" => parsed.age_range_start = text,
                "age_range_end" => parsed.age_range_end = text,
                "sort" => parsed.sort = text,
                _ => {}
            }
        }
        parsed
    }

    /// The cursor in effect. `before` wins when a request carries both.
    pub fn cursor(&self) -> Option<Cursor> {
        match (&self.before, &self.after) {
            (Some(before), _) => Some(Cursor::Before(before.clone())),
            (None, Some(after)) => Some(Cursor::After(after.clone())),
            (None, None) => None,
        }
    }

    /// Whether any filter narrows the list.
    pub fn has_filters(&self) -> bool {
        self.address_from.is_some()
            || self.address_to.is_some()
            || self.block_from.is_some()
            || self.block_to.is_some()
            || self.age_range_start.is_some()
            || self.age_range_end.is_some()
    }

    /// Same filters, moved to another cursor. Numeric paging is dropped.
    pub fn with_cursor(&self, cursor: Cursor) -> Self {
        let (before, after) = match cursor {
            Cursor::Before(token) => (Some(token), None),
            Cursor::After(token) => (None, Some(token)),
        };
        Self {
            before,
            after,
            page: None,
            ..self.clone()
        }
    }

    /// Same filters and size, on another numbered page.
    pub fn with_page(&self, page: u64) -> Self {
        Self {
            before: None,
            after: None,
            page: Some(page.to_string()),
            ..self.clone()
        }
    }

    /// Same query with another page size.
    pub fn with_page_size(&self, page_size: u64) -> Self {
        Self {
            page_size: Some(page_size.to_string()),
            ..self.clone()
        }
    }

    /// Key/value pairs in a stable order, absent values skipped.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let block_from = self.block_from.map(|n| n.to_string());
        let block_to = self.block_to.map(|n| n.to_string());
        [
            ("address_from", self.address_from.clone()),
            ("address_to", self.address_to.clone()),
            ("block_from", block_from),
            ("block_to", block_to),
            ("age_range_start", self.age_range_start.clone()),
            ("age_range_end", self.age_range_end.clone()),
            ("sort", self.sort.clone()),
            ("before", self.before.clone()),
            ("after", self.after.clone()),
            ("page", self.page.clone()),
            ("page_size", self.page_size.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }

    /// Percent encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }

    /// Link to `path` carrying this query.
    pub fn href(&self, path: &str) -> Redirect {
        let pairs = self.pairs();
        let pairs = pairs.iter().map(|(key, value)| (*key, value.as_str()));
        Redirect::new(path, pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys() {
        let query = ListQuery::parse(
            "?after=abc&page_size=50&block_from=10&block_to=x&address_from=0xAA&foo=bar&sort=",
        );
        assert_eq!(query.after.as_deref(), Some("abc"));
        assert_eq!(query.page_size.as_deref(), Some("50"));
        assert_eq!(query.block_from, Some(10));
        assert_eq!(query.block_to, None);
        assert_eq!(query.address_from.as_deref(), Some("0xAA"));
        assert_eq!(query.sort, None);
        assert!(query.has_filters());
    }

    #[test]
    fn cursor_prefers_before() {
        let query = ListQuery::parse("before=b&after=a");
        assert_eq!(query.cursor(), Some(Cursor::Before("b".into())));
        assert_eq!(ListQuery::default().cursor(), None);
    }

    #[test]
    fn moving_cursor_keeps_filters() {
        let query = ListQuery::parse("address_to=0xbb&page=3&page_size=10");
        let moved = query.with_cursor(Cursor::After("tok".into()));
        assert_eq!(
            moved.href("/txs").href(),
            "/txs?address_to=0xbb&after=tok&page_size=10"
        );
    }

    #[test]
    fn encodes_values() {
        let query = ListQuery {
            age_range_start: Some("2022-01-01 00:00".into()),
            ..Default::default()
        };
        assert_eq!(
            query.to_query_string(),
            "age_range_start=2022-01-01+00%3A00"
        );
        assert_eq!(ListQuery::default().href("/blocks").href(), "/blocks");
    }
}
