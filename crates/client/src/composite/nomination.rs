//! Nomination composite.

use legis_core::{Catalog, FetchError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::links;
use crate::listing::committees::decorate_committee;
use crate::relation::fetch_sub_resource;
use crate::transport::Transport;

const RELATION_LIMIT: u32 = 50;

/// A nomination with its actions and referral committees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominationDetail {
    pub nomination: Map<String, Value>,
    pub actions: Vec<Value>,
    pub committees: Vec<Value>,
}

/// Fetch nomination `number` (e.g. `1064` or `1064-1`) of `congress`.
pub async fn fetch_nomination_detail(
    transport: &dyn Transport, catalog: &Catalog, congress: u32, number: &str,
) -> Result<NominationDetail, FetchError> {
    tracing::info!(congress, number, "fetching nomination detail");

    let mut payload = transport.get(&format!("/nomination/{congress}/{number}"), &[]).await?;
    let mut nomination = match payload.get_mut("nomination").map(Value::take) {
        Some(Value::Object(nomination)) => nomination,
        _ => {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Invalid nomination detail format from API.");
            return Err(FetchError::shape(message));
        }
    };

    let (actions, committees) = tokio::join!(
        fetch_sub_resource(transport, &nomination, "actions", RELATION_LIMIT),
        fetch_sub_resource(transport, &nomination, "committees", RELATION_LIMIT),
    );

    let mut committees = committees.into_items();
    committees.retain(Value::is_object);
    committees.iter_mut().for_each(decorate_committee);

    nomination.insert(
        "congressDotGovUrl".into(),
        Value::String(links::nomination_url(catalog, congress, number)),
    );

    Ok(NominationDetail { nomination, actions: actions.into_items(), committees })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use crate::transport::mock::MockTransport;
    use legis_core::ErrorKind;
    use serde_json::json;

    fn nomination() -> Value {
        json!({
            "nomination": {
                "congress": 118,
                "number": 1064,
                "description": "Jane Doe, of Ohio, to be an Ambassador",
                "actions": {"count": 3, "url": "https://api.congress.gov/v3/nomination/118/1064/actions?format=json"},
                "committees": {"count": 1, "url": "https://api.congress.gov/v3/nomination/118/1064/committees?format=json"}
            }
        })
    }

    #[tokio::test]
    async fn test_nomination_detail() {
        let mock = MockTransport::new()
            .with_json("/nomination/118/1064", nomination())
            .with_json(
                "/nomination/118/1064/actions",
                json!({"actions": [{"text": "Received in the Senate"}, {"text": "Referred"}]}),
            )
            .with_json(
                "/nomination/118/1064/committees",
                json!({"committees": [{"name": "Foreign Relations", "chamber": "Senate", "systemCode": "ssfr00"}]}),
            );

        let detail = fetch_nomination_detail(&mock, &Catalog::default(), 118, "1064").await.unwrap();

        assert_eq!(
            detail.nomination["congressDotGovUrl"],
            "https://www.congress.gov/nomination/118th-congress/1064"
        );
        assert_eq!(detail.actions.len(), 2);
        assert_eq!(detail.committees[0]["detailPageUrl"], "/committee/senate/ssfr00");
        assert_eq!(
            mock.last_params("/nomination/118/1064/actions"),
            Some(vec![("limit".into(), "50".into())])
        );
    }

    #[tokio::test]
    async fn test_failed_relation_degrades() {
        let mock = MockTransport::new()
            .with_json("/nomination/118/1064", nomination())
            .with_error(
                "/nomination/118/1064/actions",
                TransportError::Http { endpoint: "/nomination/118/1064/actions".into(), status: 500, message: "boom".into() },
            );

        let detail = fetch_nomination_detail(&mock, &Catalog::default(), 118, "1064").await.unwrap();

        assert!(detail.actions.is_empty());
        assert!(detail.committees.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_nomination() {
        let mock = MockTransport::new();
        let err = fetch_nomination_detail(&mock, &Catalog::default(), 118, "99999").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(mock.total_calls(), 1);
    }
}
