//! MCP server exposing the search tools over stdio.

use crate::state::SearchState;
use crate::tools::list_packages::{ListPackagesRequest, handle_list_packages};
use crate::tools::reload::{ReloadRequest, handle_reload};
use crate::tools::search::{SearchRequest, handle_search};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::borrow::Cow;
use std::sync::Arc;

/// MCP Server for documentation search
#[derive(Clone)]
pub struct SearchServer {
    /// Shared search state (current corpus, config, sources)
    state: Arc<SearchState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SearchServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl SearchServer {
    pub fn new(state: Arc<SearchState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    pub fn state(&self) -> &Arc<SearchState> {
        &self.state
    }

    #[tool(
        description = "Search documentation items across all loaded packages. Accepts exact or partial names ('Packet', 'seq'), path-qualified names ('shared::SequenceManager') and type signatures ('(&[u8]) -> Packet'). Results are ranked: exact name matches first, then prefix, word, signature and description matches.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request)
    }

    #[tool(
        description = "Reload documentation payloads and atomically replace the searchable corpus. Without paths, re-reads the current payload files.",
        input_schema = inline_schema_for_type::<ReloadRequest>()
    )]
    async fn reload(
        &self,
        Parameters(request): Parameters<ReloadRequest>,
    ) -> std::result::Result<String, String> {
        handle_reload(&self.state, request).await
    }

    #[tool(
        description = "List loaded packages with item counts, optionally with rejected packages and load warnings.",
        input_schema = inline_schema_for_type::<ListPackagesRequest>()
    )]
    async fn list_packages(
        &self,
        Parameters(request): Parameters<ListPackagesRequest>,
    ) -> std::result::Result<String, String> {
        handle_list_packages(&self.state, request)
    }
}

#[tool_handler]
impl ServerHandler for SearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docsearch: ranked search over documentation search indexes of one or more packages. \
                 Use search to find items by name, path or signature, list_packages to see what is loaded, \
                 and reload after regenerating documentation."
                    .to_string(),
            )
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

/// Generate an inline JSON schema for MCP tools
///
/// Sets `inline_subschemas = true` so enums such as the item kind render as
/// inline enum lists instead of `$ref` patterns.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let serde_json::Value::Object(json_object) = object else {
        panic!("Schema serialization produced non-object value");
    };

    Arc::new(json_object)
}
