//! Member legislation lists and the member profile composite.

use std::collections::BTreeMap;
use std::future::Future;

use legis_core::{Catalog, FetchError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::bounded_map;
use crate::detail::LegislationDetail;
use crate::identity::{LegislationId, resolve};
use crate::listing::MemberDetail;
use crate::transport::Transport;
use crate::value::count_of;

/// Items requested per legislation list; the API's maximum page.
const LEGISLATION_LIMIT: u32 = 250;

/// Which side of sponsorship a list covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sponsorship {
    Sponsored,
    Cosponsored,
}

impl Sponsorship {
    fn endpoint(self, bioguide_id: &str) -> String {
        match self {
            Sponsorship::Sponsored => format!("/member/{bioguide_id}/sponsored-legislation"),
            Sponsorship::Cosponsored => format!("/member/{bioguide_id}/cosponsored-legislation"),
        }
    }

    fn list_keys(self) -> [&'static str; 3] {
        match self {
            Sponsorship::Sponsored => ["sponsoredLegislation", "legislation", "items"],
            Sponsorship::Cosponsored => ["cosponsoredLegislation", "legislation", "items"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sponsorship::Sponsored => "sponsored",
            Sponsorship::Cosponsored => "cosponsored",
        }
    }
}

/// Detailed items of one sponsorship list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislationList {
    pub items: Vec<LegislationDetail>,
    /// Upstream total, which may exceed the items fetched.
    pub count: u64,
}

/// Fetch a member's sponsored or cosponsored items with their details.
///
/// Entries are identified from their URLs and `detail` is called once per
/// identified item, at most `concurrency` at a time. Entries that fail
/// identification or whose detail fetch fails are dropped.
pub async fn fetch_member_legislation<F, Fut>(
    transport: &dyn Transport, catalog: &Catalog, bioguide_id: &str, side: Sponsorship, concurrency: usize, detail: F,
) -> Result<LegislationList, FetchError>
where
    F: Fn(LegislationId) -> Fut,
    Fut: Future<Output = Result<LegislationDetail, FetchError>> + Send + 'static,
{
    tracing::info!(bioguide_id, side = side.as_str(), limit = LEGISLATION_LIMIT, "fetching member legislation");

    let params = [("limit", LEGISLATION_LIMIT.to_string()), ("offset", "0".to_string())];
    let payload = transport.get(&side.endpoint(bioguide_id), &params).await?;

    let entries = side
        .list_keys()
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_array));

    let Some(entries) = entries else {
        return Err(FetchError::shape(format!(
            "Invalid API response structure ({} list)",
            side.as_str()
        )));
    };

    let count = match payload.get("pagination") {
        Some(pagination) if pagination.is_object() => count_of(pagination.get("count")),
        _ => entries.len() as u64,
    };

    let ids: Vec<LegislationId> = entries.iter().filter_map(|entry| resolve(entry, catalog)).collect();
    let skipped = entries.len() - ids.len();
    if skipped > 0 {
        tracing::debug!(bioguide_id, skipped, "list entries could not be identified");
    }

    let details = bounded_map(ids, concurrency, detail).await;

    let items: Vec<LegislationDetail> = details
        .into_iter()
        .filter_map(|result| {
            result
                .inspect_err(|e| tracing::debug!(bioguide_id, error = %e, "dropping item with failed detail"))
                .ok()
        })
        .collect();

    Ok(LegislationList { items, count })
}

/// Member detail with both legislation lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub member: MemberDetail,
    pub sponsored: LegislationList,
    pub cosponsored: LegislationList,
    /// Failed parts by name. A failed list is left empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, FetchError>,
}

impl MemberProfile {
    /// Combine independently fetched parts; only the member record is required.
    pub fn assemble(
        member: Result<MemberDetail, FetchError>, sponsored: Result<LegislationList, FetchError>,
        cosponsored: Result<LegislationList, FetchError>,
    ) -> Result<Self, FetchError> {
        let member = member?;
        let mut failures = BTreeMap::new();

        let mut part = |name: &str, result: Result<LegislationList, FetchError>| match result {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(bioguide_id = %member.bioguide_id, part = name, error = %e, "profile part failed");
                failures.insert(name.to_string(), e);
                LegislationList::default()
            }
        };

        let sponsored = part(Sponsorship::Sponsored.as_str(), sponsored);
        let cosponsored = part(Sponsorship::Cosponsored.as_str(), cosponsored);

        Ok(Self { member, sponsored, cosponsored, failures })
    }
}
