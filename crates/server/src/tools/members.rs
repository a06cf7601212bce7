//! Member tools.

use legis_client::{CongressService, Sponsorship};
use legis_core::Error;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{bioguide_id, json_result};

/// Parameters naming one member.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MemberParams {
    /// Bioguide id, e.g. P000197.
    pub bioguide_id: String,
}

pub async fn member_detail_impl(service: &CongressService, params: MemberParams) -> Result<CallToolResult, McpError> {
    let id = bioguide_id(&params.bioguide_id)?;
    json_result(&service.member_detail(&id).await?)
}

/// Member detail with sponsored and cosponsored legislation.
pub async fn member_profile_impl(service: &CongressService, params: MemberParams) -> Result<CallToolResult, McpError> {
    let id = bioguide_id(&params.bioguide_id)?;
    json_result(&service.member_profile(&id).await?)
}

/// Parameters for the member_legislation tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MemberLegislationParams {
    pub bioguide_id: String,

    /// "sponsored" (default) or "cosponsored".
    pub side: Option<String>,
}

fn sponsorship(raw: Option<&str>) -> Result<Sponsorship, Error> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("sponsored") => Ok(Sponsorship::Sponsored),
        Some("cosponsored") => Ok(Sponsorship::Cosponsored),
        Some(other) => Err(Error::InvalidInput(format!(
            "side must be sponsored or cosponsored, got {other}"
        ))),
    }
}

pub async fn member_legislation_impl(
    service: &CongressService, params: MemberLegislationParams,
) -> Result<CallToolResult, McpError> {
    let id = bioguide_id(&params.bioguide_id)?;
    let side = sponsorship(params.side.as_deref())?;
    json_result(&service.member_legislation(&id, side).await?)
}

/// Parameters for the member_roster tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MemberRosterParams {
    /// Limit the roster to one congress; all members when omitted.
    pub congress: Option<u32>,
}

pub async fn member_roster_impl(
    service: &CongressService, params: MemberRosterParams,
) -> Result<CallToolResult, McpError> {
    json_result(&service.member_roster(params.congress).await?)
}
