//! Committee tools.

use legis_client::{Chamber, CongressService};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, page_limit};

/// Parameters for the committee_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommitteeListParams {
    pub congress: Option<u32>,

    /// "house", "senate" or "joint".
    pub chamber: Option<String>,

    #[serde(default)]
    pub offset: u32,

    /// Page size, 1 to 100 (default: 20).
    pub limit: Option<u32>,
}

pub async fn committee_list_impl(
    service: &CongressService, params: CommitteeListParams,
) -> Result<CallToolResult, McpError> {
    let chamber = params
        .chamber
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(str::parse::<Chamber>)
        .transpose()?;
    let page = service
        .committee_list(params.congress, chamber, params.offset, page_limit(params.limit))
        .await?;
    json_result(&page)
}

/// Parameters for the committee_detail tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommitteeDetailParams {
    /// "house", "senate" or "joint".
    pub chamber: String,

    /// Committee system code, e.g. hsag00.
    pub code: String,
}

/// Committee with its bills, reports, nominations and communications.
pub async fn committee_detail_impl(
    service: &CongressService, params: CommitteeDetailParams,
) -> Result<CallToolResult, McpError> {
    let chamber: Chamber = params.chamber.parse()?;
    json_result(&service.committee_detail(chamber, &params.code).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{output, service};
    use legis_client::transport::mock::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_committee_list_by_chamber() {
        let (service, mock) = service(MockTransport::new().with_json(
            "/committee/118/house",
            json!({"committees": [{"chamber": "House", "systemCode": "hsag00", "name": "Agriculture"}]}),
        ))
        .await;

        let params = CommitteeListParams { congress: Some(118), chamber: Some("House".into()), offset: 0, limit: None };
        let out = output(&committee_list_impl(&service, params).await.unwrap());

        assert_eq!(out["items"][0]["detailPageUrl"], "/committee/house/hsag00");
        assert_eq!(mock.call_count("/committee/118/house"), 1);
    }

    #[tokio::test]
    async fn test_invalid_chamber() {
        let (service, mock) = service(MockTransport::new()).await;

        let params = CommitteeDetailParams { chamber: "upper".into(), code: "hsag00".into() };
        let err = committee_detail_impl(&service, params).await.unwrap_err();

        assert_eq!(err.code.0, -32602);
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_committee_code_with_query_rejected() {
        let (service, mock) = service(MockTransport::new()).await;

        let params = CommitteeDetailParams { chamber: "house".into(), code: "a?b".into() };
        let err = committee_detail_impl(&service, params).await.unwrap_err();

        assert_eq!(err.code.0, -32602);
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_committee_detail_not_found() {
        let (service, _) = service(MockTransport::new()).await;

        let params = CommitteeDetailParams { chamber: "senate".into(), code: "zz00".into() };
        let err = committee_detail_impl(&service, params).await.unwrap_err();

        assert_eq!(err.code.0, -32001);
    }
}
