//! Nomination list endpoint.

use legis_core::{Catalog, FetchError};
use serde_json::Value;

use super::{Page, page_params, take_list};
use crate::links;
use crate::transport::Transport;
use crate::value::{as_u32, scalar};

/// Add `detailPageUrl` and `congressDotGovUrl` to a nomination entry.
pub(crate) fn decorate_nomination(catalog: &Catalog, entry: &mut Value) {
    let Some(obj) = entry.as_object_mut() else {
        return;
    };
    let congress = obj.get("congress").and_then(as_u32);
    let number = scalar(obj.get("number"));

    let (detail, site) = match (congress, number) {
        (Some(congress), Some(number)) => (
            Some(links::nomination_page_path(congress, &number)),
            Some(links::nomination_url(catalog, congress, &number)),
        ),
        _ => (None, None),
    };

    obj.insert("detailPageUrl".into(), detail.map_or(Value::Null, Value::String));
    obj.insert("congressDotGovUrl".into(), site.map_or(Value::Null, Value::String));
}

/// Nominations, optionally filtered by congress.
pub async fn fetch_nomination_list(
    transport: &dyn Transport, catalog: &Catalog, congress: Option<u32>, offset: u32, limit: u32,
) -> Result<Page, FetchError> {
    let endpoint = match congress {
        Some(congress) => format!("/nomination/{congress}"),
        None => "/nomination".to_string(),
    };
    let payload = transport.get(&endpoint, &page_params(offset, limit)).await?;
    let (mut items, pagination) = take_list(payload, "nominations")?;
    items.retain(Value::is_object);
    items.iter_mut().for_each(|entry| decorate_nomination(catalog, entry));

    Ok(Page { items, pagination })
}
