//! MCP service implementation using rmcp.
//!
//! This module defines the NewsService struct exposing the news tools and the
//! `news://latest` resource via the MCP protocol using the rmcp framework's macros.

use crate::db::NewsStore;
use crate::error::NewsError;
use crate::tools::news::{
    GetNewsInput, GetNewsItemInput, GetNewsOutput, NewsItemLookup, NewsToolHandler,
    until_cancelled,
};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
        PaginatedRequestParam, ProtocolVersion, RawResource, ReadResourceRequestParam,
        ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use std::future::Future;
use std::sync::Arc;

pub const LATEST_NEWS_URI: &str = "news://latest";
pub const LATEST_NEWS_NAME: &str = "latest_news";

#[derive(Clone)]
pub struct NewsService {
    /// Handler shared by tools and resources
    handler: NewsToolHandler,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl NewsService {
    /// Create a new NewsService over the given query layer.
    pub fn new(store: Arc<dyn NewsStore>) -> Self {
        Self {
            handler: NewsToolHandler::new(store),
            tool_router: Self::tool_router(),
        }
    }

    /// Resources advertised by `resources/list`.
    pub fn resources() -> Vec<Resource> {
        let mut latest = RawResource::new(LATEST_NEWS_URI, LATEST_NEWS_NAME);
        latest.description = Some("Returns the 5 most recent news items.".to_string());
        latest.mime_type = Some("application/json".to_string());
        vec![latest.no_annotation()]
    }

    /// List the most recent news items, giving up when `cancelled` resolves.
    pub async fn list_news(
        &self,
        input: GetNewsInput,
        cancelled: impl Future<Output = ()>,
    ) -> Result<GetNewsOutput, McpError> {
        until_cancelled("get_news", cancelled, self.handler.get_news(input))
            .await
            .map_err(McpError::from)
    }

    /// Look up one news item as a tool result, giving up when `cancelled` resolves.
    pub async fn lookup_news_item(
        &self,
        input: GetNewsItemInput,
        cancelled: impl Future<Output = ()>,
    ) -> Result<CallToolResult, McpError> {
        let lookup =
            until_cancelled("get_news_item", cancelled, self.handler.get_news_item(input)).await?;
        match lookup {
            NewsItemLookup::Found(item) => Ok(CallToolResult::success(vec![Content::json(item)?])),
            NewsItemLookup::NotFound(message) => {
                Ok(CallToolResult::success(vec![Content::text(message)]))
            }
        }
    }

    /// Read a resource by URI, giving up when `cancelled` resolves.
    pub async fn read_resource_uri(
        &self,
        uri: &str,
        cancelled: impl Future<Output = ()>,
    ) -> Result<ReadResourceResult, McpError> {
        match uri {
            LATEST_NEWS_URI => {
                let items = until_cancelled(uri, cancelled, self.handler.latest_news()).await?;
                let text = serde_json::to_string_pretty(&items).map_err(|e| {
                    McpError::from(NewsError::internal(format!(
                        "Failed to serialize news items: {}",
                        e
                    )))
                })?;
                Ok(ReadResourceResult {
                    contents: vec![ResourceContents::text(text, uri)],
                })
            }
            _ => Err(McpError::resource_not_found(
                format!("Unknown resource: {}", uri),
                Some(serde_json::json!({ "uri": uri })),
            )),
        }
    }
}

#[tool_router]
impl NewsService {
    #[tool(
        description = "Get the most recent news entries, newest first.\nlimit: maximum number of items (default 10, clamped to 1-100)."
    )]
    async fn get_news(
        &self,
        Parameters(input): Parameters<GetNewsInput>,
        context: RequestContext<RoleServer>,
    ) -> Result<Json<GetNewsOutput>, McpError> {
        self.list_news(input, context.ct.cancelled()).await.map(Json)
    }

    #[tool(
        description = "Look up a single news item by its integer ID.\nReturns the item, or a message saying no item exists with that ID."
    )]
    async fn get_news_item(
        &self,
        Parameters(input): Parameters<GetNewsItemInput>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.lookup_news_item(input, context.ct.cancelled()).await
    }
}

#[tool_handler]
impl ServerHandler for NewsService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "news-mcp-server".to_owned(),
                title: Some("News MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "You are an assistant that retrieves newsworthy events from a PostgreSQL database.\n\
                \n\
                ## Tools\n\
                - `get_news`: list the most recent items (limit 1-100, default 10)\n\
                - `get_news_item`: fetch one item by `news_id`\n\
                \n\
                ## Resources\n\
                - `news://latest`: the 5 most recent items as JSON"
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(Self::resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_resource_uri(&request.uri, context.ct.cancelled()).await
    }
}
