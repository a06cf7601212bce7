//! Bill list endpoint.

use legis_core::{Catalog, FetchError};
use serde_json::Value;

use super::{Page, page_params, take_list};
use crate::identity::ItemKind;
use crate::links;
use crate::transport::Transport;
use crate::value::{as_u32, scalar, str_field};

/// Add `detailPageUrl` and `congressDotGovUrl` to one bill list entry.
pub(crate) fn decorate_bill(catalog: &Catalog, entry: &mut Value) {
    let Some(obj) = entry.as_object_mut() else {
        return;
    };

    let congress = obj.get("congress").and_then(as_u32);
    let type_code = str_field(obj, "type").map(str::to_string);
    let number = scalar(obj.get("number"));

    let (detail, site) = match (congress, type_code, number) {
        (Some(congress), Some(type_code), Some(number)) => (
            Some(links::bill_page_path(congress, &type_code, &number)),
            links::legislation_url(catalog, ItemKind::Bill, congress, &type_code, &number),
        ),
        _ => (None, None),
    };

    obj.insert("detailPageUrl".into(), detail.map_or(Value::Null, Value::String));
    obj.insert("congressDotGovUrl".into(), site.map_or(Value::Null, Value::String));
}

/// Bills of one congress, optionally narrowed to one bill type.
pub async fn fetch_bill_list(
    transport: &dyn Transport, catalog: &Catalog, congress: u32, bill_type: Option<&str>, offset: u32, limit: u32,
) -> Result<Page, FetchError> {
    let endpoint = match bill_type {
        Some(code) => {
            if !catalog.is_bill_type(code) {
                return Err(FetchError::invalid_input(format!("Invalid bill type: {code}")));
            }
            format!("/bill/{congress}/{}", code.to_ascii_lowercase())
        }
        None => format!("/bill/{congress}"),
    };

    let payload = transport.get(&endpoint, &page_params(offset, limit)).await?;
    let (mut items, pagination) = take_list(payload, "bills")?;
    items.iter_mut().for_each(|entry| decorate_bill(catalog, entry));

    Ok(Page { items, pagination })
}
