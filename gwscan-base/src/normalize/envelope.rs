//! Unwrapping of the two response envelopes.
//!
//! REST answers `{ data: { id, type, attributes: {..} }, meta: {..} }` (or a
//! bare object for a few legacy routes) and reports failures through
//! `error_code` or a JSON:API `errors` list. GraphQL answers
//! `{ data: { <field>: .. }, errors: [..] }` where a missing entity is a
//! `null` field.

use gwscan_core::{ExplorerError, ExplorerResult};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::Source;

fn mentions_not_found(text: &str) -> bool {
    text.to_ascii_lowercase().contains("not found")
}

fn is_404(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_u64() == Some(404),
        Value::String(s) => s.trim() == "404",
        _ => false,
    }
}

/// A 404 status or a `not_found` error code.
fn is_not_found_code(code: &Value) -> bool {
    match code {
        Value::String(s) => is_404(code) || s.eq_ignore_ascii_case("not_found"),
        other => is_404(other),
    }
}

fn text_of<'a>(error: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| error.get(*key).and_then(Value::as_str))
}

/// Errors as a list whether sent as one object or many.
fn error_list(errors: &Value) -> Vec<&Value> {
    match errors {
        Value::Array(items) => items.iter().collect(),
        Value::Null => vec![],
        other => vec![other],
    }
}

fn classify<'a>(errors: impl IntoIterator<Item = &'a Value>) -> Option<ExplorerError> {
    let mut messages = vec![];
    for error in errors {
        let message = text_of(error, &["detail", "title", "message"]).unwrap_or_default();
        let code = error
            .get("status")
            .or_else(|| error.get("extensions").and_then(|ext| ext.get("code")))
            .or_else(|| error.get("code"));
        let coded_not_found = code.map_or(false, is_not_found_code);
        if coded_not_found || mentions_not_found(message) {
            return Some(ExplorerError::NotFound);
        }
        if !message.is_empty() {
            messages.push(message.to_owned());
        } else if let Some(code) = code {
            messages.push(format!("error {code}"));
        }
    }
    if messages.is_empty() {
        None
    } else {
        Some(ExplorerError::from_other_str(messages.join("; ")))
    }
}

fn rest_error(payload: &Value) -> Option<ExplorerError> {
    if let Some(code) = payload.get("error_code").filter(|c| !c.is_null()) {
        if is_404(code) {
            return Some(ExplorerError::NotFound);
        }
        let message = text_of(payload, &["message", "error"]).unwrap_or_default();
        if mentions_not_found(message) {
            return Some(ExplorerError::NotFound);
        }
        let message = format!("Backend error {code}: {message}");
        return Some(ExplorerError::from_other_str(message));
    }
    payload
        .get("errors")
        .and_then(|errors| classify(error_list(errors)))
}

/// Merge a JSON:API resource object into one flat object. Attributes win over
/// the resource `id`; the resource `type` is dropped.
fn flatten_resource(resource: &Value) -> Value {
    let Some(attributes) = resource.get("attributes").and_then(Value::as_object) else {
        return resource.clone();
    };
    let mut merged: Map<String, Value> = attributes.clone();
    if let Some(id) = resource.get("id") {
        merged.entry("id").or_insert_with(|| id.clone());
    }
    if let Some(relationships) = resource.get("relationships").and_then(Value::as_object) {
        for (key, value) in relationships {
            if let Some(data) = value.get("data") {
                merged
                    .entry(key.clone())
                    .or_insert_with(|| flatten_resource(data));
            }
        }
    }
    Value::Object(merged)
}

/// The GraphQL `data` object, failing on errors that left no data behind.
fn graphql_data<'a>(payload: &'a Value, fields: &[&str]) -> ExplorerResult<Option<&'a Value>> {
    let data = payload.get("data").filter(|d| !d.is_null());
    let selected = match fields {
        [] => data,
        fields => data.and_then(|data| {
            fields
                .iter()
                .find_map(|field| data.get(*field).filter(|v| !v.is_null()))
        }),
    };
    if let Some(errors) = payload.get("errors") {
        match classify(error_list(errors)) {
            Some(err) if selected.is_none() => return Err(err),
            Some(err) => warn!(%err, "GraphQL reported errors alongside data"),
            None => {}
        }
    }
    Ok(selected)
}

fn rest_data(payload: &Value) -> ExplorerResult<Option<&Value>> {
    if let Some(err) = rest_error(payload) {
        return Err(err);
    }
    Ok(match payload.get("data") {
        Some(Value::Null) => None,
        Some(data) => Some(data),
        None => Some(payload),
    })
}

/// The single entity of a payload. `fields` names the GraphQL fields that may
/// carry it, first match wins; an empty list selects the whole `data` object.
pub(crate) fn resource(source: Source, payload: &Value, fields: &[&str]) -> ExplorerResult<Value> {
    let data = match source {
        Source::Rest => rest_data(payload)?.map(flatten_resource),
        Source::Graphql => graphql_data(payload, fields)?.cloned(),
    };
    data.ok_or_else(|| {
        debug!(?source, "Payload holds no entity");
        ExplorerError::NotFound
    })
}

/// The entries of a list payload together with its raw paging metadata.
pub(crate) fn collection(
    source: Source,
    payload: &Value,
    fields: &[&str],
) -> ExplorerResult<(Vec<Value>, Value)> {
    match source {
        Source::Rest => {
            let data = rest_data(payload)?;
            let entries = match data {
                Some(Value::Array(items)) => items.iter().map(flatten_resource).collect(),
                Some(data) => data
                    .get("entries")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(flatten_resource).collect())
                    .unwrap_or_default(),
                None => vec![],
            };
            let meta = payload
                .get("meta")
                .or_else(|| data.and_then(|d| d.get("metadata")))
                .cloned()
                .unwrap_or(Value::Null);
            Ok((entries, meta))
        }
        Source::Graphql => {
            let Some(data) = graphql_data(payload, fields)? else {
                // an empty list answered as null
                return Ok((vec![], Value::Null));
            };
            Ok(match data {
                Value::Array(items) => (items.clone(), Value::Null),
                object => (
                    object
                        .get("entries")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default(),
                    object.get("metadata").cloned().unwrap_or(Value::Null),
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rest_attributes_are_flattened() {
        let payload = json!({
            "data": {
                "id": "12",
                "type": "account",
                "attributes": { "eth_address": "0xab", "type": "eth_user" }
            }
        });
        let value = resource(Source::Rest, &payload, &[]).unwrap();
        assert_eq!(value["id"], "12");
        assert_eq!(value["type"], "eth_user");
        assert_eq!(value["eth_address"], "0xab");
    }

    #[test]
    fn rest_error_codes() {
        let payload = json!({ "error_code": 404, "message": "Block not exist" });
        assert!(matches!(
            resource(Source::Rest, &payload, &[]),
            Err(ExplorerError::NotFound)
        ));

        let payload = json!({ "errors": [{ "status": "404", "title": "not found" }] });
        assert!(matches!(
            resource(Source::Rest, &payload, &[]),
            Err(ExplorerError::NotFound)
        ));

        let payload = json!({ "errors": { "status": "500", "detail": "db timeout" } });
        match resource(Source::Rest, &payload, &[]) {
            Err(ExplorerError::Other(err)) => assert_eq!(err.to_string(), "db timeout"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn graphql_null_field_is_not_found() {
        let payload = json!({ "data": { "block": null } });
        assert!(matches!(
            resource(Source::Graphql, &payload, &["block"]),
            Err(ExplorerError::NotFound)
        ));
    }

    #[test]
    fn graphql_partial_errors_keep_data() {
        let payload = json!({
            "data": { "block": { "number": 1 } },
            "errors": [{ "message": "field tps failed" }]
        });
        let value = resource(Source::Graphql, &payload, &["block"]).unwrap();
        assert_eq!(value["number"], 1);
    }

    fn graphql_list(payload: &Value, field: &str) -> (Vec<Value>, Value) {
        collection(Source::Graphql, payload, &[field]).unwrap()
    }

    #[test]
    fn graphql_lists() {
        let payload = json!({
            "data": {
                "token_transfers": {
                    "entries": [{ "log_index": 1 }],
                    "metadata": { "total_count": 1 }
                }
            }
        });
        let (entries, meta) = graphql_list(&payload, "token_transfers");
        assert_eq!(entries.len(), 1);
        assert_eq!(meta["total_count"], 1);

        let payload = json!({ "data": { "daily_stats": [{ "date": "2022-01-01" }] } });
        let (entries, meta) = graphql_list(&payload, "daily_stats");
        assert_eq!(entries.len(), 1);
        assert!(meta.is_null());
    }

    #[test]
    fn rest_lists_use_meta() {
        let payload = json!({
            "data": [{ "id": "1", "type": "block", "attributes": { "number": 1 } }],
            "meta": { "current_page": 1, "total_page": 3 }
        });
        let (entries, meta) = collection(Source::Rest, &payload, &[]).unwrap();
        assert_eq!(entries[0]["number"], 1);
        assert_eq!(meta["total_page"], 3);
    }
}
