//! Committee composite.

use legis_core::{Catalog, FetchError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::links;
use crate::listing::Chamber;
use crate::listing::bills::decorate_bill;
use crate::listing::nominations::decorate_nomination;
use crate::relation::{Relation, fetch_sub_resource};
use crate::transport::Transport;
use crate::value::str_field;

/// Page-size bound for committee relations.
const RELATION_LIMIT: u32 = 15;

/// A committee with its associated items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitteeDetail {
    /// Upstream committee record plus `congressDotGovUrl`.
    pub committee: Map<String, Value>,
    pub bills: Vec<Value>,
    pub reports: Vec<Value>,
    /// Always empty for House committees.
    pub nominations: Vec<Value>,
    pub communications: Vec<Value>,
}

/// Communications are only fetched from a `*-communication` feed.
fn has_communication_feed(committee: &Map<String, Value>) -> bool {
    committee
        .get("communications")
        .and_then(Value::as_object)
        .and_then(|d| str_field(d, "url"))
        .is_some_and(|url| url.contains("-communication"))
}

fn decorate_report(catalog: &Catalog, report: &mut Value) {
    let Some(obj) = report.as_object_mut() else {
        return;
    };
    let url = str_field(obj, "citation").and_then(|citation| links::report_url(catalog, citation));
    obj.insert("congressDotGovUrl".into(), url.map_or(Value::Null, Value::String));
}

fn decorate_communication(comm: &mut Value) {
    if let Some(obj) = comm.as_object_mut() {
        let api_url = obj.get("url").cloned().unwrap_or(Value::Null);
        obj.insert("apiUrl".into(), api_url);
    }
}

fn decorated(relation: Relation, mut decorate: impl FnMut(&mut Value)) -> Vec<Value> {
    let mut items = relation.into_items();
    items.retain(Value::is_object);
    items.iter_mut().for_each(&mut decorate);
    items
}

/// Fetch a committee with bills, reports, nominations and communications.
pub async fn fetch_committee_detail(
    transport: &dyn Transport, catalog: &Catalog, chamber: Chamber, code: &str,
) -> Result<CommitteeDetail, FetchError> {
    tracing::info!(%chamber, code, "fetching committee detail");

    let endpoint = format!("/committee/{chamber}/{code}");
    let mut payload = transport.get(&endpoint, &[]).await?;

    let mut committee = match payload.get_mut("committee").map(Value::take) {
        Some(Value::Object(committee)) => committee,
        _ => {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Invalid committee detail format from API.");
            return Err(FetchError::shape(message));
        }
    };

    let fetch_nominations = chamber != Chamber::House;
    let fetch_communications = has_communication_feed(&committee);

    let (bills, reports, nominations, communications) = tokio::join!(
        fetch_sub_resource(transport, &committee, "bills", RELATION_LIMIT),
        fetch_sub_resource(transport, &committee, "reports", RELATION_LIMIT),
        async {
            if fetch_nominations {
                fetch_sub_resource(transport, &committee, "nominations", RELATION_LIMIT).await
            } else {
                Relation::Absent
            }
        },
        async {
            if fetch_communications {
                fetch_sub_resource(transport, &committee, "communications", RELATION_LIMIT).await
            } else {
                Relation::Absent
            }
        },
    );

    let site_url = links::committee_url(catalog, chamber.as_str(), code);
    committee.insert("congressDotGovUrl".into(), site_url.map_or(Value::Null, Value::String));

    Ok(CommitteeDetail {
        committee,
        bills: decorated(bills, |bill| decorate_bill(catalog, bill)),
        reports: decorated(reports, |report| decorate_report(catalog, report)),
        nominations: decorated(nominations, |nom| decorate_nomination(catalog, nom)),
        communications: decorated(communications, decorate_communication),
    })
}
