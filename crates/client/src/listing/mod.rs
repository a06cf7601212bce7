//! List endpoints: congresses, bills, committees, nominations, members.
//!
//! Each fetcher issues one GET (the member roster pages through several),
//! checks the list envelope, and decorates entries with detail-page paths and
//! deep links.

pub mod bills;
pub mod committees;
pub mod congress;
pub mod members;
pub mod nominations;

pub use bills::fetch_bill_list;
pub use committees::{Chamber, fetch_committee_list};
pub use congress::{Congress, fetch_congress_list, newest_congress};
pub use members::{MemberDetail, RosterMember, fetch_member_detail, fetch_member_roster};
pub use nominations::fetch_nomination_list;

use legis_core::FetchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a decorated list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Value>,
    /// Upstream pagination block, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Value>,
}

pub(crate) fn page_params(offset: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![("offset", offset.to_string()), ("limit", limit.to_string())]
}

/// Take the list under `key`, or fail with the upstream's own message.
pub(crate) fn take_list(mut payload: Value, key: &str) -> Result<(Vec<Value>, Option<Value>), FetchError> {
    match payload.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => {
            let pagination = payload.get_mut("pagination").map(Value::take).filter(|p| !p.is_null());
            Ok((items, pagination))
        }
        _ => {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| format!("invalid {key} list format"), str::to_string);
            Err(FetchError::shape(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legis_core::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_take_list() {
        let (items, pagination) =
            take_list(json!({"bills": [{"number": "1"}], "pagination": {"count": 1}}), "bills").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(pagination, Some(json!({"count": 1})));
    }

    #[test]
    fn test_take_list_uses_upstream_message() {
        let err = take_list(json!({"message": "No committees"}), "committees").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Shape);
        assert_eq!(err.message, "No committees");

        let err = take_list(json!({"bills": "nope"}), "bills").unwrap_err();
        assert_eq!(err.message, "invalid bills list format");
    }
}
