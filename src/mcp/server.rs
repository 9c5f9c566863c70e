//! Line-delimited JSON-RPC loop exposing `generate_video` to MCP clients.

use super::protocol::*;
use super::tools::{get_tools, GENERATE_VIDEO};
use crate::artifact::DEFAULT_FILENAME;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::request::GenerationRequest;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "reelsmith";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Reelsmith.
pub struct McpServer {
    settings: Settings,
    orchestrator: Option<Orchestrator>,
}

impl McpServer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            orchestrator: None,
        }
    }

    /// Serve stdin/stdout until the client closes its end.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Logs go to stderr so they don't interfere with JSON-RPC
        info!("Reelsmith MCP server starting...");
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock()).await
    }

    /// Answer newline-delimited JSON-RPC requests until the reader is exhausted.
    pub async fn serve<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> anyhow::Result<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"))
                }
            };

            if let Some(response) = response {
                writeln!(writer, "{}", serde_json::to_string(&response)?)?;
                writer.flush()?;
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request. Notifications get no reply.
    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("MCP request: {}", request.method);

        if request.is_notification() {
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    /// Builds the orchestrator on first `initialize`; later calls reuse it.
    fn handle_initialize(&mut self, id: Option<Value>) -> JsonRpcResponse {
        if self.orchestrator.is_none() {
            match Orchestrator::new(self.settings.clone()) {
                Ok(orch) => {
                    self.orchestrator = Some(orch);
                    info!("Orchestrator initialized");
                }
                Err(e) => {
                    error!("Failed to initialize orchestrator: {}", e);
                    return JsonRpcResponse::error(id, SERVER_ERROR, &format!("Init failed: {}", e));
                }
            }
        }

        let result = InitializeResult::new(PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION);
        JsonRpcResponse::from_result(id, &result)
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::from_result(id, &ToolsListResult { tools: get_tools() })
    }

    /// Tool failures are returned as `isError` results, not RPC errors.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let result = match params.name.as_str() {
            GENERATE_VIDEO => self.tool_generate_video(params.arguments).await,
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Generate video tool.
    async fn tool_generate_video(&self, args: Option<Value>) -> ToolCallResult {
        let args = args.unwrap_or(Value::Null);

        let request = match GenerationRequest::new(str_arg(&args, "script"), str_arg(&args, "vibe")) {
            Ok(r) => r,
            Err(e) => return ToolCallResult::error(e.to_string()),
        };

        let output_path = match str_arg(&args, "output_path") {
            "" => PathBuf::from(DEFAULT_FILENAME),
            path => Settings::expand_path(path),
        };

        let orchestrator = match &self.orchestrator {
            Some(o) => o,
            None => return ToolCallResult::error("Server not initialized".to_string()),
        };

        let artifact = match orchestrator.assemble(&request).await {
            Ok(a) => a,
            Err(e) => return ToolCallResult::error(format!("Generation failed ({}): {}", e.kind(), e)),
        };

        if let Err(e) = artifact.save(&output_path).await {
            return ToolCallResult::error(format!(
                "Failed to write {}: {}",
                output_path.display(),
                e
            ));
        }

        let mut text = format!(
            "Saved {:.1}s {}x{} video ({} clips, {} bytes) to {}",
            artifact.metadata.duration_seconds,
            artifact.metadata.width,
            artifact.metadata.height,
            artifact.metadata.clip_count,
            artifact.len(),
            output_path.display()
        );
        if artifact.metadata.truncated {
            text.push_str(". Footage was cut to the duration limit.");
        }
        ToolCallResult::text(text)
    }
}

fn str_arg<'a>(args: &'a Value, name: &str) -> &'a str {
    args.get(name).and_then(|v| v.as_str()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn settings(root: &std::path::Path) -> Settings {
        let mut settings = Settings::default().with_api_key(Some("test-key".into()));
        settings.general.temp_dir = root.to_string_lossy().into_owned();
        settings
    }

    async fn exchange(server: &mut McpServer, input: &str) -> Vec<Value> {
        let mut out = Vec::new();
        server.serve(Cursor::new(input.to_string()), &mut out).await.unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_initialize_and_list_tools() {
        let root = tempfile::tempdir().unwrap();
        let mut server = McpServer::new(settings(root.path()));
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#, "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#, "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#, "\n",
        );

        let replies = exchange(&mut server, input).await;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["result"]["serverInfo"]["name"], "reelsmith");
        let tools = replies[1]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "generate_video");
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["script", "vibe"]));
    }

    #[tokio::test]
    async fn test_initialize_without_key_fails() {
        let root = tempfile::tempdir().unwrap();
        let mut settings = settings(root.path());
        settings.footage.api_key = None;
        let mut server = McpServer::new(settings);

        let replies = exchange(&mut server, r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#).await;
        assert_eq!(replies[0]["error"]["code"], SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_bad_input_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let mut server = McpServer::new(settings(root.path()));
        let input = concat!(
            "not json\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#, "\n",
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"generate_video","arguments":{"script":"Go."}}}"#, "\n",
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"nope"}}"#, "\n",
        );

        let replies = exchange(&mut server, input).await;
        assert_eq!(replies[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(replies[1]["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(replies[2]["result"]["isError"], true);
        assert!(replies[2]["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("vibe"));
        assert_eq!(replies[3]["result"]["isError"], true);
    }
}
