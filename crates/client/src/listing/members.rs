//! Member detail and member roster.

use std::collections::BTreeMap;

use legis_core::FetchError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::transport::Transport;
use crate::value::{as_u32, first_str, scalar, str_field};

/// Roster page size; the API's maximum.
const ROSTER_PAGE: u32 = 250;

/// Offset at which roster paging stops.
const ROSTER_MAX_OFFSET: u32 = 3000;

/// Normalized `/member/{bioguideId}` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDetail {
    pub bioguide_id: String,
    pub name: Option<String>,
    pub state: Option<String>,
    /// Party of the most recent party-history entry.
    pub party: Option<String>,
    pub birth_year: Option<String>,
    pub leadership: Vec<Value>,
    pub website_url: Option<String>,
    pub terms: Vec<Value>,
    pub party_history: Vec<Value>,
    pub depiction: Option<Value>,
    pub honorific_name: Option<String>,
    /// `{count, url}` descriptor, when present.
    pub sponsored_legislation: Option<Value>,
    /// `{count, url}` descriptor, when present.
    pub cosponsored_legislation: Option<Value>,
}

/// Member terms arrive either as a bare list or wrapped as `{"item": [...]}`.
fn term_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(obj)) => obj.get("item").and_then(Value::as_array).cloned().unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn array_field(obj: &Map<String, Value>, key: &str) -> Vec<Value> {
    obj.get(key).and_then(Value::as_array).cloned().unwrap_or_default()
}

fn start_year(entry: &Value) -> u32 {
    entry.get("startYear").and_then(as_u32).unwrap_or(0)
}

/// Latest entry by `startYear`; ties keep the later entry.
fn latest(entries: &[Value]) -> Option<&Value> {
    entries.iter().max_by_key(|entry| start_year(entry))
}

fn object_field(obj: &Map<String, Value>, key: &str) -> Option<Value> {
    obj.get(key).filter(|v| v.is_object()).cloned()
}

impl MemberDetail {
    fn from_record(bioguide_id: &str, record: &Map<String, Value>) -> Self {
        let party_history = array_field(record, "partyHistory");
        let party = latest(&party_history)
            .and_then(Value::as_object)
            .and_then(|entry| first_str(entry, &["partyName", "partyAbbreviation"]));

        Self {
            bioguide_id: first_str(record, &["bioguideId"]).unwrap_or_else(|| bioguide_id.to_string()),
            name: first_str(record, &["directOrderName", "invertedOrderName", "name"]),
            state: first_str(record, &["state"]),
            party,
            birth_year: scalar(record.get("birthYear")),
            leadership: array_field(record, "leadership"),
            website_url: first_str(record, &["officialWebsiteUrl", "directUrl", "url"]),
            terms: term_list(record.get("terms")),
            party_history,
            depiction: object_field(record, "depiction"),
            honorific_name: first_str(record, &["honorificName"]),
            sponsored_legislation: object_field(record, "sponsoredLegislation"),
            cosponsored_legislation: object_field(record, "cosponsoredLegislation"),
        }
    }
}

/// Fetch and normalize one member.
pub async fn fetch_member_detail(transport: &dyn Transport, bioguide_id: &str) -> Result<MemberDetail, FetchError> {
    let payload = transport.get(&format!("/member/{bioguide_id}"), &[]).await?;
    match payload.get("member") {
        Some(Value::Object(record)) => Ok(MemberDetail::from_record(bioguide_id, record)),
        _ => {
            tracing::error!(bioguide_id, "invalid member detail structure");
            Err(FetchError::shape(format!("member {bioguide_id}: detail response format invalid")))
        }
    }
}

/// One row of the member roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterMember {
    pub bioguide_id: String,
    pub name: String,
    pub state: Option<String>,
    pub district: Option<u32>,
    pub party: Option<String>,
    /// `D`, `R`, or `ID` for everything else.
    pub party_code: String,
    /// `House` or `Senate`.
    pub chamber: Option<String>,
    pub congress: Option<u32>,
}

fn party_code(party: Option<&str>) -> &'static str {
    match party {
        Some("Democratic") => "D",
        Some("Republican") => "R",
        _ => "ID",
    }
}

/// Chamber of the most recent term, else inferred from district/state.
fn roster_chamber(obj: &Map<String, Value>, district: Option<u32>, state: Option<&str>) -> Option<String> {
    let terms = term_list(obj.get("terms"));
    let from_terms = latest(&terms)
        .and_then(|term| term.get("chamber"))
        .and_then(Value::as_str)
        .and_then(|chamber| {
            if chamber.contains("House") {
                Some("House")
            } else if chamber.contains("Senate") {
                Some("Senate")
            } else {
                None
            }
        });

    from_terms
        .or_else(|| {
            if district.is_some() {
                Some("House")
            } else if state.is_some() {
                Some("Senate")
            } else {
                None
            }
        })
        .map(str::to_string)
}

fn roster_entry(entry: &Value, congress: Option<u32>) -> Option<RosterMember> {
    let obj = entry.as_object()?;
    let bioguide_id = str_field(obj, "bioguideId")?.to_string();
    let state = str_field(obj, "state");
    let district = obj.get("district").and_then(as_u32);
    let party = str_field(obj, "partyName");

    Some(RosterMember {
        name: first_str(obj, &["name"]).unwrap_or_else(|| format!("Unknown ({bioguide_id})")),
        state: state.map(str::to_string),
        district,
        party: party.map(str::to_string),
        party_code: party_code(party).to_string(),
        chamber: roster_chamber(obj, district, state),
        congress: obj.get("congress").and_then(as_u32).or(congress),
        bioguide_id,
    })
}

/// Every member, or every member of one congress, sorted by name.
///
/// Pages through the list endpoint until a short page. Any failed page fails
/// the whole roster.
pub async fn fetch_member_roster(transport: &dyn Transport, congress: Option<u32>) -> Result<Vec<RosterMember>, FetchError> {
    let endpoint = match congress {
        Some(congress) => format!("/member/congress/{congress}"),
        None => "/member".to_string(),
    };

    let mut raw: Vec<Value> = Vec::new();
    let mut offset = 0u32;
    loop {
        let params = [("limit", ROSTER_PAGE.to_string()), ("offset", offset.to_string())];
        let payload = transport.get(&endpoint, &params).await.inspect_err(|e| {
            tracing::error!(endpoint, offset, error = %e, "member roster page failed");
        })?;

        let Some(Value::Array(batch)) = payload.get("members") else {
            break;
        };
        if batch.is_empty() {
            break;
        }

        let short = batch.len() < ROSTER_PAGE as usize;
        raw.extend(batch.iter().cloned());
        offset += ROSTER_PAGE;

        if short {
            break;
        }
        if offset >= ROSTER_MAX_OFFSET {
            tracing::warn!(endpoint, offset, "member roster truncated at paging limit");
            break;
        }
    }

    let mut by_id: BTreeMap<String, RosterMember> = BTreeMap::new();
    for member in raw.iter().filter_map(|entry| roster_entry(entry, congress)) {
        by_id.insert(member.bioguide_id.clone(), member);
    }

    let mut roster: Vec<RosterMember> = by_id.into_values().collect();
    roster.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.bioguide_id.cmp(&b.bioguide_id)));

    tracing::info!(endpoint, count = roster.len(), "loaded member roster");
    Ok(roster)
}
