//! Nomination tools.

use legis_client::CongressService;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, page_limit};

/// Parameters for the nomination_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NominationListParams {
    pub congress: Option<u32>,

    #[serde(default)]
    pub offset: u32,

    /// Page size, 1 to 100 (default: 20).
    pub limit: Option<u32>,
}

pub async fn nomination_list_impl(
    service: &CongressService, params: NominationListParams,
) -> Result<CallToolResult, McpError> {
    let page = service
        .nomination_list(params.congress, params.offset, page_limit(params.limit))
        .await?;
    json_result(&page)
}

/// Parameters for the nomination_detail tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NominationDetailParams {
    pub congress: u32,

    /// Nomination number, optionally with a part suffix such as 1064-1.
    pub number: String,
}

pub async fn nomination_detail_impl(
    service: &CongressService, params: NominationDetailParams,
) -> Result<CallToolResult, McpError> {
    json_result(&service.nomination_detail(params.congress, &params.number).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{output, service};
    use legis_client::transport::mock::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_nomination_detail() {
        let (service, mock) = service(
            MockTransport::new()
                .with_json("/nomination/118/1064", json!({"nomination": {"congress": 118, "number": 1064}})),
        )
        .await;

        let params = NominationDetailParams { congress: 118, number: " 1064 ".into() };
        let out = output(&nomination_detail_impl(&service, params.clone()).await.unwrap());
        nomination_detail_impl(&service, params).await.unwrap();

        assert_eq!(
            out["nomination"]["congressDotGovUrl"],
            "https://www.congress.gov/nomination/118th-congress/1064"
        );
        assert_eq!(out["actions"], json!([]));
        assert_eq!(mock.call_count("/nomination/118/1064"), 1);
    }

    #[tokio::test]
    async fn test_empty_nomination_number() {
        let (service, _) = service(MockTransport::new()).await;

        let params = NominationDetailParams { congress: 118, number: "  ".into() };
        let err = nomination_detail_impl(&service, params).await.unwrap_err();

        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_nomination_number_with_path_rejected() {
        let (service, mock) = service(MockTransport::new()).await;

        let params = NominationDetailParams { congress: 118, number: "1/../x".into() };
        let err = nomination_detail_impl(&service, params).await.unwrap_err();

        assert_eq!(err.code.0, -32602);
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_nomination_list_default_limit() {
        let (service, mock) = service(MockTransport::new().with_json("/nomination", json!({"nominations": []}))).await;

        let params = NominationListParams { congress: None, offset: 40, limit: Some(0) };
        let out = output(&nomination_list_impl(&service, params).await.unwrap());

        assert_eq!(out["items"], json!([]));
        assert_eq!(
            mock.last_params("/nomination"),
            Some(vec![("offset".into(), "40".into()), ("limit".into(), "20".into())])
        );
    }
}
