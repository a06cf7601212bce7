//! Sub-resource aggregation.
//!
//! Parent records embed each relation as a `{count, url}` descriptor. This
//! module turns one descriptor into a bounded list, keeping "the relation is
//! not there" apart from "the relation is confirmed empty".

use legis_core::FetchError;
use serde_json::{Map, Value};

use crate::transport::Transport;
use crate::value::{count_of, str_field};

/// API path prefixes a sub-resource URL is expected to start with.
const KNOWN_BASES: &[&str] = &["/bill/", "/amendment/", "/committee/", "/nomination/", "/member/"];

/// Outcome of fetching one relation.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    /// Parent has no descriptor (or the descriptor has no URL).
    Absent,
    /// Confirmed empty: zero count, upstream 404, or no list in the response.
    Empty,
    Items(Vec<Value>),
    /// The fetch failed for any other reason.
    Failed(FetchError),
}

impl Relation {
    /// Absent and failed relations both collapse to an empty list.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Relation::Items(items) => items,
            Relation::Absent | Relation::Empty | Relation::Failed(_) => Vec::new(),
        }
    }

    /// True for the two outcomes that carry no confirmed answer.
    pub fn is_null(&self) -> bool {
        matches!(self, Relation::Absent | Relation::Failed(_))
    }
}

/// Keys that may hold the list for `name`, in lookup order.
pub fn candidate_keys(name: &str) -> Vec<&str> {
    let synonyms: &[&str] = match name {
        "communications" => &["houseCommunications", "senateCommunications", "communications"],
        _ => &[],
    };
    let mut keys = vec![name];
    for key in synonyms {
        if !keys.contains(key) {
            keys.push(key);
        }
    }
    keys
}

/// API endpoint for an absolute sub-resource URL.
///
/// Drops scheme, host, query and the `/v{n}` version prefix:
/// `https://api.congress.gov/v3/bill/118/hr/1/actions?format=json` → `/bill/118/hr/1/actions`.
pub fn endpoint_from_url(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    let mut segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();

    let versioned = segments
        .first()
        .is_some_and(|s| s.len() > 1 && s.starts_with('v') && s[1..].bytes().all(|b| b.is_ascii_digit()));
    if versioned {
        segments.remove(0);
    }
    if segments.is_empty() {
        return None;
    }

    Some(format!("/{}", segments.join("/")))
}

fn locate_list(payload: &Map<String, Value>, name: &str) -> Option<Vec<Value>> {
    candidate_keys(name)
        .into_iter()
        .find_map(|key| payload.get(key).and_then(Value::as_array).cloned())
}

/// Fetch up to `limit` items of relation `name` described on `parent`.
pub async fn fetch_sub_resource(transport: &dyn Transport, parent: &Map<String, Value>, name: &str, limit: u32) -> Relation {
    let Some(descriptor) = parent.get(name).and_then(Value::as_object) else {
        return Relation::Absent;
    };
    let Some(url) = str_field(descriptor, "url") else {
        let count = count_of(descriptor.get("count"));
        if count > 0 {
            tracing::warn!(relation = name, count, "sub-resource has items but no url");
        }
        return Relation::Absent;
    };

    if count_of(descriptor.get("count")) == 0 {
        return Relation::Empty;
    }

    let Some(endpoint) = endpoint_from_url(url) else {
        tracing::warn!(relation = name, url, "unparseable sub-resource URL");
        return Relation::Empty;
    };

    if !KNOWN_BASES.iter().any(|base| endpoint.starts_with(base)) {
        tracing::warn!(relation = name, url, endpoint, "unexpected sub-resource endpoint");
    }

    let payload = match transport.get(&endpoint, &[("limit", limit.to_string())]).await {
        Ok(payload) => payload,
        Err(e) if e.kind().is_not_found() => {
            tracing::info!(relation = name, endpoint, "sub-resource not found, treating as empty");
            return Relation::Empty;
        }
        Err(e) => {
            tracing::warn!(relation = name, endpoint, error = %e, "failed to fetch sub-resource");
            return Relation::Failed(e.into());
        }
    };

    let Some(payload) = payload.as_object() else {
        tracing::error!(relation = name, endpoint, "sub-resource response is not an object");
        return Relation::Failed(FetchError::shape(format!("{name} response from {endpoint} is not an object")));
    };

    match locate_list(payload, name) {
        Some(items) if items.is_empty() => Relation::Empty,
        Some(items) => Relation::Items(items),
        None => {
            let keys: Vec<&String> = payload.keys().collect();
            tracing::warn!(relation = name, endpoint, ?keys, "no list key in sub-resource response");
            Relation::Empty
        }
    }
}
