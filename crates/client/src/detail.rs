//! Bill and amendment detail fetchers.
//!
//! Each fetcher is a pure function of its key: validate the type code, issue
//! one GET against the canonical detail endpoint, and normalize the envelope
//! into a [`LegislationDetail`]. Failures come back as a [`FetchError`] value.

use legis_core::{Catalog, FetchError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identity::{ItemKind, LegislationId};
use crate::links;
use crate::transport::Transport;
use crate::value::{count_of, first_str, str_field};

/// Normalized core fields of one bill or amendment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislationDetail {
    pub kind: ItemKind,
    pub congress: u32,
    pub type_code: String,
    pub number: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduced_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_action_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_action_date: Option<String>,
    /// Deep link on the public site; absent when the type is unmapped.
    pub external_url: Option<String>,
    pub cosponsors_count: u64,
    pub actions_count: u64,
}

impl LegislationDetail {
    fn from_record(id: &LegislationId, record: &Map<String, Value>, catalog: &Catalog) -> Self {
        let title = first_str(record, &["title", "purpose"])
            .unwrap_or_else(|| format!("{} {}{}", id.kind, id.type_code, id.number));

        let introduced_date = match id.kind {
            ItemKind::Bill => first_str(record, &["introducedDate"]),
            ItemKind::Amendment => first_str(record, &["proposedDate", "submittedDate", "introducedDate"]),
        };

        let latest_action = record.get("latestAction").and_then(Value::as_object);
        let latest_action_text = latest_action.and_then(|a| str_field(a, "text")).map(str::to_string);
        let latest_action_date = latest_action
            .and_then(|a| str_field(a, "actionDate"))
            .map(str::to_string);

        let external_url =
            links::legislation_url(catalog, id.kind, id.congress, &id.type_code, &id.number.to_string());

        Self {
            kind: id.kind,
            congress: id.congress,
            type_code: id.type_code.clone(),
            number: id.number,
            title,
            introduced_date,
            latest_action_text,
            latest_action_date,
            external_url,
            cosponsors_count: relation_count(record, "cosponsors"),
            actions_count: relation_count(record, "actions"),
        }
    }
}

fn relation_count(record: &Map<String, Value>, name: &str) -> u64 {
    count_of(record.get(name).and_then(|d| d.get("count")))
}

/// Validate a type code against the catalog and build the canonical key.
pub fn legislation_id(
    catalog: &Catalog, kind: ItemKind, congress: u32, type_code: &str, number: u32,
) -> Result<LegislationId, FetchError> {
    let allowed = match kind {
        ItemKind::Bill => catalog.is_bill_type(type_code),
        ItemKind::Amendment => catalog.is_amendment_type(type_code),
    };
    if !allowed {
        return Err(FetchError::invalid_input(format!(
            "Invalid {} type: {type_code}",
            kind.segment()
        )));
    }
    Ok(LegislationId { kind, congress, type_code: type_code.to_ascii_uppercase(), number })
}

/// Fetch the `bill`/`amendment` envelope for `id`.
///
/// Returns the anchor record; composites decorate it further.
pub(crate) async fn fetch_record(transport: &dyn Transport, id: &LegislationId) -> Result<Map<String, Value>, FetchError> {
    let payload = transport.get(&id.endpoint(), &[]).await?;
    match payload.get(id.kind.segment()) {
        Some(Value::Object(record)) => Ok(record.clone()),
        _ => Err(FetchError::shape(format!("{id} data not found or invalid format"))),
    }
}

/// Fetch and normalize one bill or amendment.
pub async fn fetch_detail(
    transport: &dyn Transport, catalog: &Catalog, id: &LegislationId,
) -> Result<LegislationDetail, FetchError> {
    let record = fetch_record(transport, id).await.inspect_err(|e| {
        tracing::debug!(%id, error = %e, "detail fetch failed");
    })?;
    Ok(LegislationDetail::from_record(id, &record, catalog))
}

pub async fn fetch_bill_detail(
    transport: &dyn Transport, catalog: &Catalog, congress: u32, type_code: &str, number: u32,
) -> Result<LegislationDetail, FetchError> {
    let id = legislation_id(catalog, ItemKind::Bill, congress, type_code, number)?;
    fetch_detail(transport, catalog, &id).await
}

pub async fn fetch_amendment_detail(
    transport: &dyn Transport, catalog: &Catalog, congress: u32, type_code: &str, number: u32,
) -> Result<LegislationDetail, FetchError> {
    let id = legislation_id(catalog, ItemKind::Amendment, congress, type_code, number)?;
    fetch_detail(transport, catalog, &id).await
}
