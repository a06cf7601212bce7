//! The `/congress` listing.

use std::sync::LazyLock;

use legis_core::FetchError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transport::Transport;
use crate::value::{parse_digits, scalar, str_field};

static CONGRESS_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(\d+)(?:st|nd|rd|th)\s+congress").ok());

/// One congress with its number resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Congress {
    pub number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn number_from_url(url: &str) -> Option<u32> {
    let path = url::Url::parse(url).ok()?;
    let last = path.path_segments()?.filter(|s| !s.is_empty()).next_back()?;
    parse_digits(last)
}

fn number_from_name(name: &str) -> Option<u32> {
    let caps = CONGRESS_NAME.as_ref()?.captures(name)?;
    parse_digits(&caps[1])
}

fn parse_entry(entry: &Value) -> Option<Congress> {
    let obj = entry.as_object()?;
    let url = str_field(obj, "url");
    let name = str_field(obj, "name");

    let number = url
        .and_then(number_from_url)
        .or_else(|| name.and_then(number_from_name))
        .filter(|n| *n > 0);

    let Some(number) = number else {
        tracing::warn!(?entry, "could not determine congress number");
        return None;
    };

    Some(Congress {
        number,
        name: name.map(str::to_string),
        start_year: scalar(obj.get("startYear")),
        end_year: scalar(obj.get("endYear")),
        url: url.map(str::to_string),
    })
}

/// All congresses the API knows about, newest first.
pub async fn fetch_congress_list(transport: &dyn Transport) -> Result<Vec<Congress>, FetchError> {
    let payload = transport.get("/congress", &[("limit", "250".to_string())]).await?;

    let Some(entries) = payload.get("congresses").and_then(Value::as_array) else {
        return Err(FetchError::shape("congress list not found or invalid format"));
    };

    let mut congresses: Vec<Congress> = entries.iter().filter_map(parse_entry).collect();
    congresses.sort_by(|a, b| b.number.cmp(&a.number));
    congresses.dedup_by_key(|c| c.number);

    tracing::info!(count = congresses.len(), "parsed congress list");
    Ok(congresses)
}

/// Newest congress in a fetched list.
pub fn newest_congress(list: &[Congress]) -> Option<u32> {
    list.iter().map(|c| c.number).max()
}
