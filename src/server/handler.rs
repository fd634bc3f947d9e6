//! MCP server handler
//!
//! Exposes zone detection and session-scoped zone switching as MCP tools.
//! Every call rebuilds the resolver from configuration, so registry edits
//! are picked up without restarting the server.

use crate::config::AppConfig;
use crate::content::ContentLoader;
use crate::error::{ServerError, ToolResult};
use crate::metrics::UsageLog;
use crate::util::expand_home;
use crate::zones::{DEFAULT_ZONE, ResolvedZone, ZoneResolver};
use rmcp::ErrorData as McpError;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, InitializeResult,
    ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, Tool,
    ToolsCapability,
};
use rmcp::service::{RequestContext, RoleServer};
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::borrow::Cow;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, instrument};

fn default_true() -> bool {
    true
}

/// Arguments for `detect_zone`
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DetectZoneArgs {
    /// Path to check. Defaults to the server's working directory.
    #[serde(default)]
    pub path: Option<String>,
}

/// Arguments for `get_zone_config`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetZoneConfigArgs {
    /// Zone name. If not provided, uses the current zone.
    #[serde(default)]
    pub zone: Option<String>,
    /// Include inherited zone configs. Defaults to true.
    #[serde(default = "default_true")]
    pub include_inheritance: bool,
}

/// Arguments for `switch_zone`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SwitchZoneArgs {
    /// Zone name to switch to (e.g., 'finance', 'career', 'development')
    pub zone: String,
}

/// Tools without arguments
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

/// Static tool metadata
struct ToolSpec {
    name: &'static str,
    description: &'static str,
    schema: fn() -> schemars::Schema,
}

const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "detect_zone",
        description: "Detect the current zone based on working directory. Returns zone name, inheritance chain, and matched pattern.",
        schema: || schemars::schema_for!(DetectZoneArgs),
    },
    ToolSpec {
        name: "get_zone_config",
        description: "Get the behavioral configuration/instructions for a zone. Use this to understand how to behave in the current context.",
        schema: || schemars::schema_for!(GetZoneConfigArgs),
    },
    ToolSpec {
        name: "switch_zone",
        description: "Manually switch to a different zone for this session. Use when the user explicitly requests different behavioral context.",
        schema: || schemars::schema_for!(SwitchZoneArgs),
    },
    ToolSpec {
        name: "list_zones",
        description: "List all available zones with their path patterns and inheritance.",
        schema: || schemars::schema_for!(NoArgs),
    },
    ToolSpec {
        name: "get_metrics",
        description: "Get zone usage metrics - which zones are used most, recent history.",
        schema: || schemars::schema_for!(NoArgs),
    },
    ToolSpec {
        name: "clear_override",
        description: "Clear any manual zone override and return to auto-detection based on working directory.",
        schema: || schemars::schema_for!(NoArgs),
    },
];

/// Zone MCP server handler
#[derive(Clone)]
pub struct ZoneMcpHandler {
    /// Server name for MCP
    name: String,
    /// Server version
    version: String,
    /// Application settings
    config: Arc<AppConfig>,
    /// Directory used when a tool is not given a path
    working_dir: PathBuf,
    /// Zone chosen with `switch_zone`, scoped to this session
    session_zone: Arc<RwLock<Option<String>>>,
}

impl ZoneMcpHandler {
    /// Create a new handler
    pub fn new(config: AppConfig, working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        info!(
            tools = TOOLS.len(),
            working_dir = %working_dir.display(),
            "Initialized zone MCP handler"
        );

        Self {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
            config: Arc::new(config),
            working_dir,
            session_zone: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the number of registered tools
    pub fn tool_count(&self) -> usize {
        TOOLS.len()
    }

    /// The zone chosen with `switch_zone`, if any
    pub fn session_zone(&self) -> Option<String> {
        self.session_zone
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set_session_zone(&self, zone: Option<String>) -> Option<String> {
        let mut guard = self
            .session_zone
            .write()
            .unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, zone)
    }

    /// MCP tool definitions
    pub fn tools(&self) -> Vec<Tool> {
        TOOLS
            .iter()
            .map(|spec| {
                let schema_value = serde_json::to_value((spec.schema)())
                    .unwrap_or_else(|_| serde_json::json!({}));

                let mut input_schema: Map<String, Value> = Map::new();
                input_schema.insert("type".to_string(), Value::String("object".to_string()));

                if let Some(props) = schema_value.get("properties") {
                    input_schema.insert("properties".to_string(), props.clone());
                } else {
                    input_schema.insert("properties".to_string(), Value::Object(Map::new()));
                }
                if let Some(required) = schema_value.get("required") {
                    input_schema.insert("required".to_string(), required.clone());
                }

                Tool {
                    name: Cow::Borrowed(spec.name),
                    description: Some(Cow::Borrowed(spec.description)),
                    input_schema: Arc::new(input_schema),
                    annotations: None,
                    icons: None,
                    meta: None,
                    output_schema: None,
                    title: None,
                }
            })
            .collect()
    }

    /// Execute a tool, returning its JSON payload
    pub fn execute(&self, name: &str, args: Value) -> ToolResult<Value> {
        match name {
            "detect_zone" => self.detect_zone(parse_args(args)?),
            "get_zone_config" => self.get_zone_config(parse_args(args)?),
            "switch_zone" => self.switch_zone(parse_args(args)?),
            "list_zones" => self.list_zones(),
            "get_metrics" => self.get_metrics(),
            "clear_override" => self.clear_override(),
            _ => Err(ServerError::ToolNotFound(name.to_string())),
        }
    }

    fn resolver(&self) -> ZoneResolver {
        ZoneResolver::from_config(&self.config)
    }

    fn content(&self) -> ContentLoader {
        ContentLoader::from_config(&self.config)
    }

    fn usage_log(&self) -> UsageLog {
        UsageLog::from_config(&self.config.metrics)
    }

    fn record(&self, resolved: &ResolvedZone) {
        if self.config.metrics.enabled {
            self.usage_log().record(&resolved.zone, &resolved.path);
        }
    }

    /// Turn a tool path argument into an absolute path
    fn target_path(&self, path: Option<&str>) -> PathBuf {
        match path {
            Some(p) => {
                let expanded = PathBuf::from(expand_home(p, dirs::home_dir().as_deref()));
                if expanded.is_absolute() {
                    expanded
                } else {
                    self.working_dir.join(expanded)
                }
            }
            None => self.working_dir.clone(),
        }
    }

    fn detect_zone(&self, args: DetectZoneArgs) -> ToolResult<Value> {
        let resolver = self.resolver();
        let target = self.target_path(args.path.as_deref());

        let (resolved, session) = match self.session_zone() {
            Some(zone) => (resolver.resolve_named(&zone, &target), true),
            None => {
                let resolved = resolver.resolve(&target);
                self.record(&resolved);
                (resolved, false)
            }
        };

        let mut value = serde_json::to_value(&resolved)?;
        value["session_override"] = Value::Bool(session);
        if let Some(diagnostic) = resolver.diagnostic() {
            value["registry_warning"] = Value::String(diagnostic.to_string());
        }
        Ok(value)
    }

    fn get_zone_config(&self, args: GetZoneConfigArgs) -> ToolResult<Value> {
        let resolver = self.resolver();
        let zone = match args.zone.or_else(|| self.session_zone()) {
            Some(zone) => zone,
            None => resolver.resolve(&self.working_dir).zone,
        };

        let content = self.content();
        let text = if args.include_inheritance {
            content.load_inherited(&zone, resolver.registry())
        } else {
            content.load(&resolver.registry().config_ref(&zone))
        };

        Ok(json!({ "zone": zone, "config": text }))
    }

    fn switch_zone(&self, args: SwitchZoneArgs) -> ToolResult<Value> {
        let zone = args.zone.trim();
        if zone.is_empty() {
            return Err(ServerError::MissingArgument("zone".to_string()));
        }

        let resolver = self.resolver();
        let registry = resolver.registry();
        if zone != DEFAULT_ZONE && !registry.contains(zone) {
            return Err(ServerError::unknown_zone(zone, registry.names()));
        }

        self.set_session_zone(Some(zone.to_string()));
        if self.config.metrics.enabled {
            self.usage_log().record(
                zone,
                &format!("manual_switch:{}", self.working_dir.display()),
            );
        }
        info!(zone, "Switched session zone");

        Ok(json!({
            "success": true,
            "zone": zone,
            "message": format!("Switched to {} zone. Behavioral instructions updated.", zone),
            "config": self.content().load_inherited(zone, registry),
        }))
    }

    fn list_zones(&self) -> ToolResult<Value> {
        let resolver = self.resolver();
        let registry = resolver.registry();

        let zones: Vec<Value> = registry
            .iter()
            .map(|(name, definition)| {
                json!({
                    "name": name,
                    "paths": definition.paths,
                    "inherits": definition.inherits,
                    "config": registry.config_ref(name),
                })
            })
            .collect();

        Ok(json!({ "zones": zones, "current_override": self.session_zone() }))
    }

    fn get_metrics(&self) -> ToolResult<Value> {
        Ok(serde_json::to_value(self.usage_log().summary())?)
    }

    fn clear_override(&self) -> ToolResult<Value> {
        let previous = self.set_session_zone(None);

        let resolved = self.resolver().resolve(&self.working_dir);
        self.record(&resolved);

        Ok(json!({
            "success": true,
            "previous_override": previous,
            "current_zone": resolved.zone,
            "message": format!("Override cleared. Now in auto-detected zone: {}", resolved.zone),
        }))
    }

    /// Execute a tool call and convert the outcome to an MCP result
    fn execute_tool(&self, name: &str, arguments: Option<Map<String, Value>>) -> CallToolResult {
        let args = arguments
            .map(Value::Object)
            .unwrap_or_else(|| serde_json::json!({}));

        let (payload, is_error) = match self.execute(name, args) {
            Ok(value) => (value, false),
            Err(e) => {
                error!(tool = name, error = %e, "Tool execution failed");
                (error_payload(&e), true)
            }
        };

        let text = serde_json::to_string_pretty(&payload)
            .unwrap_or_else(|e| format!("Error: {}", e));

        CallToolResult {
            content: vec![Content::text(text)],
            is_error: Some(is_error),
            meta: None,
            structured_content: None,
        }
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> ToolResult<T> {
    serde_json::from_value(args).map_err(|e| ServerError::InvalidArguments(e.to_string()))
}

/// JSON body describing a tool error
pub fn error_payload(error: &ServerError) -> Value {
    match error {
        ServerError::UnknownZone { available, .. } => json!({
            "error": error.to_string(),
            "available_zones": available,
        }),
        _ => json!({ "error": error.to_string() }),
    }
}

impl ServerHandler for ZoneMcpHandler {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Context zones - detect the working zone and load its behavioral instructions"
                    .to_string(),
            ),
        }
    }

    #[instrument(skip(self, _context))]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        debug!("Listing tools");
        async move {
            Ok(ListToolsResult {
                tools: self.tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        debug!(?request.arguments, "Calling tool");
        async move { Ok(self.execute_tool(&request.name, request.arguments)) }
    }
}

