//! Congress, bill and amendment tools.

use legis_client::{CongressService, ItemKind};
use legis_core::Error;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, page_limit};

/// Output of congress_list.
#[derive(Debug, Clone, Serialize)]
pub struct CongressListOutput {
    /// Newest congress, or the configured fallback.
    pub current: u32,
    pub congresses: Vec<legis_client::Congress>,
}

pub async fn congress_list_impl(service: &CongressService) -> Result<CallToolResult, McpError> {
    let congresses = service.congress_list().await?;
    let current = service.default_congress().await;
    json_result(&CongressListOutput { current, congresses })
}

/// Parameters for the bill_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BillListParams {
    /// Congress number; defaults to the current congress.
    pub congress: Option<u32>,

    /// Bill type code such as HR, S, HJRES.
    pub bill_type: Option<String>,

    #[serde(default)]
    pub offset: u32,

    /// Page size, 1 to 100 (default: 20).
    pub limit: Option<u32>,
}

pub async fn bill_list_impl(service: &CongressService, params: BillListParams) -> Result<CallToolResult, McpError> {
    let bill_type = params.bill_type.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let page = service
        .bill_list(params.congress, bill_type, params.offset, page_limit(params.limit))
        .await?;
    json_result(&page)
}

/// Parameters for the bill_detail tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BillDetailParams {
    pub congress: u32,

    /// Bill type code such as HR or S.
    pub bill_type: String,

    pub number: u32,
}

/// Bill with actions, cosponsors, committees, related bills, amendments and
/// the latest summary.
pub async fn bill_detail_impl(service: &CongressService, params: BillDetailParams) -> Result<CallToolResult, McpError> {
    let bill = service
        .full_bill(params.congress, params.bill_type.trim(), params.number)
        .await?;
    json_result(&bill)
}

/// Parameters for the legislation_detail tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LegislationDetailParams {
    /// "bill" or "amendment".
    pub kind: String,

    pub congress: u32,

    /// Type code such as HR, S, SAMDT or HAMDT.
    pub type_code: String,

    pub number: u32,
}

fn item_kind(raw: &str) -> Result<ItemKind, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "bill" => Ok(ItemKind::Bill),
        "amendment" => Ok(ItemKind::Amendment),
        _ => Err(Error::InvalidInput(format!("kind must be bill or amendment, got {raw}"))),
    }
}

pub async fn legislation_detail_impl(
    service: &CongressService, params: LegislationDetailParams,
) -> Result<CallToolResult, McpError> {
    let type_code = params.type_code.trim();
    let detail = match item_kind(&params.kind)? {
        ItemKind::Bill => service.bill_detail(params.congress, type_code, params.number).await?,
        ItemKind::Amendment => service.amendment_detail(params.congress, type_code, params.number).await?,
    };
    json_result(&detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{output, service};
    use legis_client::transport::mock::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_congress_list() {
        let (service, _) = service(MockTransport::new().with_json(
            "/congress",
            json!({"congresses": [
                {"name": "118th Congress", "url": "https://api.congress.gov/v3/congress/118", "startYear": "2023"},
                {"name": "119th Congress", "url": "https://api.congress.gov/v3/congress/119"}
            ]}),
        ))
        .await;

        let result = congress_list_impl(&service).await.unwrap();
        let out = output(&result);

        assert_eq!(out["current"], 119);
        assert_eq!(out["congresses"][0]["number"], 119);
        assert_eq!(out["congresses"][1]["start_year"], "2023");
    }

    #[tokio::test]
    async fn test_bill_list_out_of_range_limit() {
        let (service, mock) =
            service(MockTransport::new().with_json("/bill/118/hr", json!({"bills": [], "pagination": {"count": 0}})))
                .await;

        let params = BillListParams { congress: Some(118), bill_type: Some("hr".into()), offset: 0, limit: Some(500) };
        bill_list_impl(&service, params).await.unwrap();

        assert_eq!(
            mock.last_params("/bill/118/hr"),
            Some(vec![("offset".into(), "0".into()), ("limit".into(), "20".into())])
        );
    }

    #[tokio::test]
    async fn test_bill_detail_invalid_type() {
        let (service, mock) = service(MockTransport::new()).await;

        let params = BillDetailParams { congress: 118, bill_type: "XX".into(), number: 1 };
        let err = bill_detail_impl(&service, params).await.unwrap_err();

        assert_eq!(err.code.0, -32602);
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_legislation_detail_amendment() {
        let (service, _) = service(MockTransport::new().with_json(
            "/amendment/119/samdt/2216",
            json!({"amendment": {"purpose": "To improve the bill.", "submittedDate": "2025-06-30"}}),
        ))
        .await;

        let params =
            LegislationDetailParams { kind: "Amendment".into(), congress: 119, type_code: "samdt".into(), number: 2216 };
        let out = output(&legislation_detail_impl(&service, params).await.unwrap());

        assert_eq!(out["title"], "To improve the bill.");
        assert_eq!(out["type_code"], "SAMDT");
        assert_eq!(
            out["external_url"],
            "https://www.congress.gov/amendment/119th-congress/senate-amendment/2216"
        );
    }

    #[tokio::test]
    async fn test_legislation_detail_not_found() {
        let (service, _) = service(MockTransport::new()).await;

        let params = LegislationDetailParams { kind: "bill".into(), congress: 118, type_code: "HR".into(), number: 1 };
        let err = legislation_detail_impl(&service, params).await.unwrap_err();

        assert_eq!(err.code.0, -32001);
    }

    #[test]
    fn test_item_kind() {
        assert!(matches!(item_kind(" BILL "), Ok(ItemKind::Bill)));
        assert!(item_kind("treaty").is_err());
    }
}
