//! The srctree MCP server: one tool and one prompt, both returning the
//! JSON tree of a directory filtered by its `.gitignore`.

pub mod ignore_file;
pub mod pattern;
pub mod scan;

use std::collections::HashMap;
use std::future::Future;

use indoc::formatdoc;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorCode, ErrorData, GetPromptRequestParams, GetPromptResult,
        Implementation, ListPromptsResult, PaginatedRequestParams, Prompt, PromptArgument,
        PromptMessage, PromptMessageRole, ServerCapabilities, ServerInfo,
    },
    schemars::JsonSchema,
    service::RequestContext,
    tool, tool_handler, tool_router, RoleServer, ServerHandler,
};
use serde::Deserialize;

use scan::scan_directory;

pub const TREE_PROMPT_NAME: &str = "tree_prompt";

/// Parameters for the get_tree tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTreeParams {
    /// Absolute path to the directory to scan, e.g. `/repo`.
    pub directory: String,
}

#[derive(Clone)]
pub struct SrcTreeServer {
    tool_router: ToolRouter<Self>,
    instructions: String,
    prompts: HashMap<String, Prompt>,
}

impl Default for SrcTreeServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router(router = tool_router)]
impl SrcTreeServer {
    pub fn new() -> Self {
        let instructions = formatdoc! {r#"
            The srctree extension returns the file tree of a directory as JSON.

            Use `get_tree` with an absolute directory path. The result is a nested
            object of {{"name", "type", "children"}} nodes, sorted by name.

            Traversal honors the `.gitignore` at the scanned directory's root and
            always skips hidden directories (names starting with a dot). The
            scanned directory itself is always included.
        "#};

        let mut prompts = HashMap::new();
        prompts.insert(
            TREE_PROMPT_NAME.to_string(),
            Prompt::new(
                TREE_PROMPT_NAME,
                Some("Return the gitignore-filtered file tree of a directory as JSON"),
                Some(vec![PromptArgument::new("directory")
                    .with_description("Absolute path to the directory to scan")
                    .with_required(true)]),
            ),
        );

        Self {
            tool_router: Self::tool_router(),
            instructions,
            prompts,
        }
    }

    /// Resolve a prompt request: validate the name and the required
    /// `directory` argument, then scan. Shared by `get_prompt` and the
    /// tests, which cannot easily construct a `RequestContext`.
    fn render_prompt(
        &self,
        prompt_name: &str,
        arguments: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<GetPromptResult, ErrorData> {
        if !self.prompts.contains_key(prompt_name) {
            return Err(ErrorData::new(
                ErrorCode::INTERNAL_ERROR,
                format!("Prompt '{}' not found", prompt_name),
                None,
            ));
        }

        let directory = match arguments.get("directory").and_then(|v| v.as_str()) {
            Some(directory) if !directory.is_empty() => directory,
            _ => {
                return Err(ErrorData::new(
                    ErrorCode::INVALID_PARAMS,
                    "Missing required argument: 'directory'".to_string(),
                    None,
                ));
            }
        };

        let json = scan_directory(directory);
        let messages = vec![PromptMessage::new_text(PromptMessageRole::User, json)];

        Ok(GetPromptResult::new(messages)
            .with_description(format!("File tree of {}", directory)))
    }

    #[tool(
        name = "get_tree",
        description = "Return the file tree under a directory as JSON. Traversal respects the .gitignore at the directory root and skips hidden directories."
    )]
    pub async fn get_tree(
        &self,
        params: Parameters<GetTreeParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::debug!(directory = %params.0.directory, "get_tree called");
        let json = scan_directory(&params.0.directory);
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for SrcTreeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(
            ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
        )
        .with_server_info(Implementation::new(
            "srctree",
            env!("CARGO_PKG_VERSION").to_owned(),
        ))
        .with_instructions(self.instructions.clone())
    }

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListPromptsResult, ErrorData>> + Send + '_ {
        let prompts: Vec<Prompt> = self.prompts.values().cloned().collect();
        std::future::ready(Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        }))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<GetPromptResult, ErrorData>> + Send + '_ {
        let arguments = request.arguments.unwrap_or_default();
        std::future::ready(self.render_prompt(&request.name, &arguments))
    }
}
