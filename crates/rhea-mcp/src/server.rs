//! MCP server implementation.
//!
//! This module contains the main server setup using rmcp.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, handler::server::ServerHandler, tool, tool_handler, tool_router};

use crate::context::Context;
use crate::models::{FindDefinitionParams, SymbolParams, UriParams};
use crate::tools::Tools;

/// The rhea MCP server.
///
/// Provides MCP protocol handling over stdio transport.
#[derive(Clone)]
pub struct RheaMcpServer {
    /// Shared project context.
    context: Arc<Context>,
    /// Tool implementations.
    tools: Arc<Tools>,
    /// Tool router for MCP dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RheaMcpServer {
    /// Report index status without waiting for the build.
    #[tool(
        description = "Show the index phase (empty, building, ready), the number of indexed files and parse errors. Returns immediately, even while the first build is running."
    )]
    async fn index_status(&self) -> Result<CallToolResult, McpError> {
        let status = self.tools.index_status();
        Ok(CallToolResult::success(vec![Content::json(status)?]))
    }

    /// Rebuild the whole index.
    #[tool(
        description = "Re-index every Python file in the project and return build statistics, including files that failed to parse."
    )]
    async fn index_build(&self) -> Result<CallToolResult, McpError> {
        match self.tools.index_build().await {
            Ok(stats) => Ok(CallToolResult::success(vec![Content::json(stats)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Rebuild one file.
    #[tool(
        description = "Invalidate and rebuild one file after it changed on disk. A deleted or unparsable file is dropped from the index."
    )]
    async fn index_invalidate(
        &self,
        Parameters(params): Parameters<UriParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.tools.index_invalidate(&params.uri).await {
            Ok(response) => Ok(CallToolResult::success(vec![Content::json(response)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Outline of a module.
    #[tool(
        description = "List the classes, functions, methods and variables declared in a module, in source order, with their containers."
    )]
    async fn document_symbols(
        &self,
        Parameters(params): Parameters<UriParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.tools.document_symbols(&params.uri).await {
            Ok(symbols) => Ok(CallToolResult::success(vec![Content::json(symbols)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Find definitions by name or position.
    #[tool(
        description = "Find where a name is defined. Pass `symbol` (bare like `run` or qualified like `Task.run`), or `uri`, `line` and `column` (0-indexed) to resolve the name at that position."
    )]
    async fn find_definition(
        &self,
        Parameters(params): Parameters<FindDefinitionParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.tools.find_definition(params).await {
            Ok(locations) => Ok(CallToolResult::success(vec![Content::json(locations)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Find every identifier with a given name.
    #[tool(
        description = "Find every identifier with the given name across the project: uses, definitions, attributes, parameters and imports. Textual match, not scope-aware."
    )]
    async fn find_references(
        &self,
        Parameters(params): Parameters<SymbolParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.tools.find_references(params.symbol).await {
            Ok(references) => Ok(CallToolResult::success(vec![Content::json(references)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Imports and dependents of a module.
    #[tool(
        description = "Show the modules a file imports and the project files that import it."
    )]
    async fn import_graph(
        &self,
        Parameters(params): Parameters<UriParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.tools.import_graph(&params.uri).await {
            Ok(graph) => Ok(CallToolResult::success(vec![Content::json(graph)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }
}

impl RheaMcpServer {
    /// Create a server over an opened project context.
    #[must_use]
    pub fn new(context: Context) -> Self {
        let context = Arc::new(context);
        let tools = Arc::new(Tools::new(Arc::clone(&context)));

        Self {
            context,
            tools,
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the context.
    #[must_use]
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }
}

#[tool_handler]
impl ServerHandler for RheaMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "rhea-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Rhea MCP server for Python code intelligence. The project is indexed in the background at startup; check index_status to see progress. Query tools wait for the first build."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::handler::server::ServerHandler;
    use tempfile::TempDir;

    fn server() -> (TempDir, RheaMcpServer) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let context = Context::open(dir.path()).expect("Failed to open context");
        (dir, RheaMcpServer::new(context))
    }

    #[test]
    fn test_server_info() {
        let (_dir, server) = server();
        let info = server.get_info();
        assert_eq!(info.server_info.name, "rhea-mcp");
        assert!(!info.server_info.version.is_empty());
        assert!(info.instructions.is_some());
    }

    #[test]
    fn test_tool_router_has_all_tools() {
        let (_dir, server) = server();
        let tools = server.tool_router.list_all();

        let tool_names: Vec<&str> = tools.iter().map(|t| &*t.name).collect();

        assert!(tool_names.contains(&"index_status"));
        assert!(tool_names.contains(&"index_build"));
        assert!(tool_names.contains(&"index_invalidate"));
        assert!(tool_names.contains(&"document_symbols"));
        assert!(tool_names.contains(&"find_definition"));
        assert!(tool_names.contains(&"find_references"));
        assert!(tool_names.contains(&"import_graph"));
        assert_eq!(tools.len(), 7);
    }

    #[test]
    fn test_context_is_shared_with_tools() {
        let (_dir, server) = server();
        assert!(!server.context().index().is_ready());
        assert_eq!(server.tools.index_status().phase, "empty");
    }
}
