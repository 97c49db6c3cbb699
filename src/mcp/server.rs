use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::{
    config::load_config,
    core::data::{FieldPath, Position},
};

use super::helpers::{EnginePool, json_result, read_source};
use super::types::{
    ConfigDto, ConfigValues, FindUnusedParams, FindUnusedResult, FindUsagesParams,
    FindUsagesResult, GetConfigParams, LocateFieldParams, LocateFieldResult, OriginDto,
    Pagination, ResolveOriginParams, ResolveOriginResult, UsageItem,
};

#[derive(Clone)]
pub struct DictscopeMcpServer {
    tool_router: ToolRouter<Self>,
    engines: Arc<EnginePool>,
}

impl Default for DictscopeMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl DictscopeMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
            engines: Arc::new(EnginePool::default()),
        }
    }

    /// Resolve the dictionary key and field read at a source position
    #[tool(
        description = "Resolve which dictionary key and field path a source position reads (useIntlayer/getIntlayer). Positions are zero-based."
    )]
    pub async fn resolve_origin(
        &self,
        params: Parameters<ResolveOriginParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let origin = self.engines.with_engine(&params.workspace_root_path, |engine| {
            let (path, text) = read_source(engine, &params.file_path)?;
            Ok(engine.resolve_origin(&path, &text, Position::new(params.line, params.character)))
        })?;

        json_result(&ResolveOriginResult {
            found: origin.is_some(),
            origin: origin.map(OriginDto::from),
        })
    }

    /// List every file that reads a dictionary key
    #[tool(
        description = "Find every source file under a project root that reads a dictionary key, with the field paths each file uses. Returns paginated list."
    )]
    pub async fn find_usages(
        &self,
        params: Parameters<FindUsagesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let limit = params.limit.map(|v| v as usize).unwrap_or(20).min(100);
        let offset = params.offset.map(|v| v as usize).unwrap_or(0);

        let usages = self.engines.with_engine(&params.project_root_path, |engine| {
            let root = engine.workspace_root().to_path_buf();
            engine
                .find_usages(&root, &params.key)
                .map_err(|e| McpError::internal_error(format!("Scan failed: {}", e), None))
        })?;

        let total_file_count = usages.len();
        let items: Vec<UsageItem> = usages
            .iter()
            .skip(offset)
            .take(limit)
            .map(UsageItem::from)
            .collect();
        let has_more = offset + items.len() < total_file_count;

        json_result(&FindUsagesResult {
            key: params.key,
            total_file_count,
            items,
            pagination: Pagination {
                offset,
                limit,
                has_more,
            },
        })
    }

    /// Locate a field path inside a dictionary or content declaration file
    #[tool(
        description = "Find the zero-based position of a dotted field path inside a dictionary JSON or content declaration file."
    )]
    pub async fn locate_field(
        &self,
        params: Parameters<LocateFieldParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let position = self.engines.with_engine(&params.workspace_root_path, |engine| {
            let path = engine.absolute(Path::new(&params.file_path));
            Ok(engine.locate_field(&path, &FieldPath::parse(&params.field_path)))
        })?;

        json_result(&LocateFieldResult {
            found: position.is_some(),
            position: position.map(Into::into),
        })
    }

    /// Report unused fields of a content declaration file
    #[tool(
        description = "Report fields of a content declaration file that no source file in the project reads. A dictionary read by nothing is reported as unused as a whole."
    )]
    pub async fn find_unused(
        &self,
        params: Parameters<FindUnusedParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let report = self.engines.with_engine(&params.workspace_root_path, |engine| {
            let (path, text) = read_source(engine, &params.file_path)?;
            engine
                .unused_fields(&path, &text)
                .map_err(|e| McpError::internal_error(format!("Analysis failed: {}", e), None))
        })?;

        json_result(&FindUnusedResult::from(report))
    }

    /// Get the current dictscope configuration
    #[tool(description = "Get the dictscope configuration in effect for a project root.")]
    pub async fn get_config(
        &self,
        params: Parameters<GetConfigParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = Path::new(&params.0.project_root_path);

        let result = load_config(path)
            .map_err(|e| McpError::internal_error(format!("Failed to load config: {}", e), None))?;

        json_result(&ConfigDto {
            from_file: result.from_file,
            config: ConfigValues::from(result.config),
        })
    }
}

#[tool_handler]
impl ServerHandler for DictscopeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Dictscope MCP answers questions about Intlayer dictionaries and the source code that reads them.\n\n\
                 Available tools:\n\
                 1. get_config - Get project configuration\n\
                 2. resolve_origin - Dictionary key and field read at a source position\n\
                 3. find_usages - Files reading a dictionary key (paginated)\n\
                 4. locate_field - Position of a field path in a dictionary or content file\n\
                 5. find_unused - Unused fields of a content declaration file\n\n\
                 Positions are zero-based lines and UTF-16 characters."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Entry point for MCP server
pub fn run_server() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let service = DictscopeMcpServer::new();
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
