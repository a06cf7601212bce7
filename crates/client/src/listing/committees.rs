//! Committee list endpoint.

use std::fmt;
use std::str::FromStr;

use legis_core::FetchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Page, page_params, take_list};
use crate::links;
use crate::transport::Transport;
use crate::value::str_field;

/// Committee chamber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    House,
    Senate,
    Joint,
}

impl Chamber {
    pub fn as_str(self) -> &'static str {
        match self {
            Chamber::House => "house",
            Chamber::Senate => "senate",
            Chamber::Joint => "joint",
        }
    }
}

impl FromStr for Chamber {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "house" => Ok(Chamber::House),
            "senate" => Ok(Chamber::Senate),
            "joint" => Ok(Chamber::Joint),
            _ => Err(FetchError::invalid_input(format!("Invalid chamber specified: {s}"))),
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Add `detailPageUrl` to an entry carrying `chamber` and `systemCode`.
pub(crate) fn decorate_committee(entry: &mut Value) {
    let Some(obj) = entry.as_object_mut() else {
        return;
    };
    let path = match (str_field(obj, "chamber"), str_field(obj, "systemCode")) {
        (Some(chamber), Some(code)) => Some(links::committee_page_path(chamber, code)),
        _ => None,
    };
    obj.insert("detailPageUrl".into(), path.map_or(Value::Null, Value::String));
}

fn list_endpoint(congress: Option<u32>, chamber: Option<Chamber>) -> String {
    match (congress, chamber) {
        (Some(congress), Some(chamber)) => format!("/committee/{congress}/{chamber}"),
        (Some(congress), None) => format!("/committee/{congress}"),
        (None, Some(chamber)) => format!("/committee/{chamber}"),
        (None, None) => "/committee".to_string(),
    }
}

/// Committees, optionally filtered by congress and chamber.
pub async fn fetch_committee_list(
    transport: &dyn Transport, congress: Option<u32>, chamber: Option<Chamber>, offset: u32, limit: u32,
) -> Result<Page, FetchError> {
    let endpoint = list_endpoint(congress, chamber);
    let payload = transport.get(&endpoint, &page_params(offset, limit)).await?;
    let (mut items, pagination) = take_list(payload, "committees")?;
    items.retain(Value::is_object);
    items.iter_mut().for_each(decorate_committee);

    Ok(Page { items, pagination })
}
