//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    bills::{self, BillDetailParams, BillListParams, LegislationDetailParams},
    cache::{CachePurgeParams, purge_impl},
    committees::{self, CommitteeDetailParams, CommitteeListParams},
    members::{self, MemberLegislationParams, MemberParams, MemberRosterParams},
    nominations::{self, NominationDetailParams, NominationListParams},
};

use legis_client::CongressService;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for legis.
#[derive(Clone)]
pub struct LegisServer {
    service: CongressService,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl LegisServer {
    /// Create a new server handler over a shared service.
    pub fn new(service: CongressService) -> Self {
        Self { service, tool_router: Self::tool_router() }
    }

    #[tool(description = "List congresses, newest first, with the current congress number.")]
    async fn congress_list(&self) -> Result<CallToolResult, McpError> {
        bills::congress_list_impl(&self.service).await
    }

    #[tool(description = "List bills of a congress (default: current), optionally of one bill type. Paginated.")]
    async fn bill_list(&self, params: Parameters<BillListParams>) -> Result<CallToolResult, McpError> {
        bills::bill_list_impl(&self.service, params.0).await
    }

    /// Full bill: the bill record plus actions, cosponsors, committees,
    /// related bills, amendments and the latest summary.
    #[tool(
        description = "Get a bill with its actions, cosponsors, committees, related bills, amendments, and latest summary."
    )]
    async fn bill_detail(&self, params: Parameters<BillDetailParams>) -> Result<CallToolResult, McpError> {
        bills::bill_detail_impl(&self.service, params.0).await
    }

    #[tool(description = "Get the core fields of one bill or amendment, including its congress.gov link.")]
    async fn legislation_detail(&self, params: Parameters<LegislationDetailParams>) -> Result<CallToolResult, McpError> {
        bills::legislation_detail_impl(&self.service, params.0).await
    }

    #[tool(description = "Get one member of Congress by bioguide id.")]
    async fn member_detail(&self, params: Parameters<MemberParams>) -> Result<CallToolResult, McpError> {
        members::member_detail_impl(&self.service, params.0).await
    }

    #[tool(description = "Get a member with sponsored and cosponsored legislation. Failed lists are reported, not fatal.")]
    async fn member_profile(&self, params: Parameters<MemberParams>) -> Result<CallToolResult, McpError> {
        members::member_profile_impl(&self.service, params.0).await
    }

    #[tool(description = "List a member's sponsored or cosponsored bills and amendments with details.")]
    async fn member_legislation(&self, params: Parameters<MemberLegislationParams>) -> Result<CallToolResult, McpError> {
        members::member_legislation_impl(&self.service, params.0).await
    }

    #[tool(description = "List all members, or the members of one congress, sorted by name.")]
    async fn member_roster(&self, params: Parameters<MemberRosterParams>) -> Result<CallToolResult, McpError> {
        members::member_roster_impl(&self.service, params.0).await
    }

    #[tool(description = "List committees, optionally by congress and chamber. Paginated.")]
    async fn committee_list(&self, params: Parameters<CommitteeListParams>) -> Result<CallToolResult, McpError> {
        committees::committee_list_impl(&self.service, params.0).await
    }

    #[tool(description = "Get a committee with its bills, reports, nominations, and communications.")]
    async fn committee_detail(&self, params: Parameters<CommitteeDetailParams>) -> Result<CallToolResult, McpError> {
        committees::committee_detail_impl(&self.service, params.0).await
    }

    #[tool(description = "List nominations, optionally of one congress. Paginated.")]
    async fn nomination_list(&self, params: Parameters<NominationListParams>) -> Result<CallToolResult, McpError> {
        nominations::nomination_list_impl(&self.service, params.0).await
    }

    #[tool(description = "Get a nomination with its actions and committees.")]
    async fn nomination_detail(&self, params: Parameters<NominationDetailParams>) -> Result<CallToolResult, McpError> {
        nominations::nomination_detail_impl(&self.service, params.0).await
    }

    /// Purge cache entries.
    ///
    /// This tool removes memo cache entries by expiry, function, or count.
    #[tool(description = "Purge cache entries: expired ones, one function's entries, or all but the newest N.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(self.service.cache(), params.0).await
    }
}

impl ServerHandler for LegisServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "legis".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Legislative data from the congress.gov API: bills, amendments, members, committees, and nominations."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
