//! Full bill composite.

use legis_core::{Catalog, FetchError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::detail::{fetch_record, legislation_id};
use crate::identity::ItemKind;
use crate::links;
use crate::relation::fetch_sub_resource;
use crate::transport::Transport;
use crate::value::{as_u32, scalar, str_field};

/// Page-size bound for every bill relation except summaries.
const RELATION_LIMIT: u32 = 50;

/// Only the latest summary is kept.
const SUMMARY_LIMIT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cosponsor {
    pub bioguide_id: String,
    pub full_name: Option<String>,
    pub sponsorship_date: Option<String>,
    pub sponsorship_withdrawn_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeRef {
    pub name: Option<String>,
    pub chamber: Option<String>,
    pub system_code: Option<String>,
    pub activities: Option<Value>,
    pub detail_page_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedBill {
    pub congress: Option<u32>,
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub type_code: Option<String>,
    pub title: Option<String>,
    pub relationship_details: Option<Value>,
    pub detail_page_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendmentRef {
    pub congress: Option<u32>,
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub type_code: Option<String>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub latest_action: Option<Value>,
    pub congress_dot_gov_url: Option<String>,
}

/// A bill with every relation attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullBill {
    /// Upstream bill record plus `congressDotGovUrl`.
    pub bill: Map<String, Value>,
    pub actions: Vec<Value>,
    pub cosponsors: Vec<Cosponsor>,
    pub committees: Vec<CommitteeRef>,
    pub related_bills: Vec<RelatedBill>,
    pub amendments: Vec<AmendmentRef>,
    pub summaries: Vec<Value>,
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    str_field(obj, key).map(str::to_string)
}

fn cosponsor(entry: &Value) -> Option<Cosponsor> {
    let obj = entry.as_object()?;
    Some(Cosponsor {
        bioguide_id: text(obj, "bioguideId")?,
        full_name: text(obj, "fullName"),
        sponsorship_date: text(obj, "sponsorshipDate"),
        sponsorship_withdrawn_date: text(obj, "sponsorshipWithdrawnDate"),
    })
}

fn committee_ref(entry: &Value) -> Option<CommitteeRef> {
    let obj = entry.as_object()?;
    let chamber = text(obj, "chamber");
    let system_code = text(obj, "systemCode");
    let detail_page_url = match (&chamber, &system_code) {
        (Some(chamber), Some(code)) => Some(links::committee_page_path(chamber, code)),
        _ => None,
    };
    Some(CommitteeRef {
        name: text(obj, "name"),
        chamber,
        system_code,
        activities: obj.get("activities").cloned(),
        detail_page_url,
    })
}

fn related_bill(entry: &Value) -> Option<RelatedBill> {
    let obj = entry.as_object()?;
    let congress = obj.get("congress").and_then(as_u32);
    let number = scalar(obj.get("number"));
    let type_code = text(obj, "type");
    let detail_page_url = match (congress, &type_code, &number) {
        (Some(congress), Some(type_code), Some(number)) => Some(links::bill_page_path(congress, type_code, number)),
        _ => None,
    };
    Some(RelatedBill {
        congress,
        number,
        type_code,
        title: text(obj, "title"),
        relationship_details: obj.get("relationshipDetails").cloned(),
        detail_page_url,
    })
}

fn amendment_ref(catalog: &Catalog, entry: &Value) -> Option<AmendmentRef> {
    let obj = entry.as_object()?;
    let congress = obj.get("congress").and_then(as_u32);
    let number = scalar(obj.get("number"));
    let type_code = text(obj, "type");
    let congress_dot_gov_url = match (congress, &type_code, &number) {
        (Some(congress), Some(type_code), Some(number)) => {
            links::legislation_url(catalog, ItemKind::Amendment, congress, type_code, number)
        }
        _ => None,
    };
    Some(AmendmentRef {
        congress,
        number,
        type_code,
        description: text(obj, "description"),
        purpose: text(obj, "purpose"),
        latest_action: obj.get("latestAction").cloned(),
        congress_dot_gov_url,
    })
}

/// Fetch a bill and all of its relations.
///
/// Relations are fetched concurrently; any that fail come back empty.
pub async fn fetch_full_bill(
    transport: &dyn Transport, catalog: &Catalog, congress: u32, type_code: &str, number: u32,
) -> Result<FullBill, FetchError> {
    let id = legislation_id(catalog, ItemKind::Bill, congress, type_code, number)?;
    tracing::info!(%id, "fetching full bill");

    let mut bill = fetch_record(transport, &id).await?;

    let (actions, cosponsors, committees, related_bills, amendments, summaries) = tokio::join!(
        fetch_sub_resource(transport, &bill, "actions", RELATION_LIMIT),
        fetch_sub_resource(transport, &bill, "cosponsors", RELATION_LIMIT),
        fetch_sub_resource(transport, &bill, "committees", RELATION_LIMIT),
        fetch_sub_resource(transport, &bill, "relatedBills", RELATION_LIMIT),
        fetch_sub_resource(transport, &bill, "amendments", RELATION_LIMIT),
        fetch_sub_resource(transport, &bill, "summaries", SUMMARY_LIMIT),
    );

    let site_url = links::legislation_url(catalog, ItemKind::Bill, id.congress, &id.type_code, &id.number.to_string());
    bill.insert("congressDotGovUrl".into(), site_url.map_or(Value::Null, Value::String));

    Ok(FullBill {
        bill,
        actions: actions.into_items(),
        cosponsors: cosponsors.into_items().iter().filter_map(cosponsor).collect(),
        committees: committees.into_items().iter().filter_map(committee_ref).collect(),
        related_bills: related_bills.into_items().iter().filter_map(related_bill).collect(),
        amendments: amendments
            .into_items()
            .iter()
            .filter_map(|entry| amendment_ref(catalog, entry))
            .collect(),
        summaries: summaries.into_items(),
    })
}
