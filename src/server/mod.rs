use anyhow::Result;
use serde_json::{json, Value};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::transcribe::{ExtractionRequest, TranscriptPipeline};

pub mod protocol;

use protocol::{CallToolParams, CallToolResult, Request, Response};

/// Name of the single tool this server exposes
pub const TOOL_NAME: &str = "get_youtube_transcript";

/// Tool descriptor returned by `tools/list`
pub fn tool_descriptor() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": "Extract the subtitle/transcript text from a YouTube video URL. Returns the clean text content of the video's English subtitles (auto-generated or manual). Requires yt-dlp and ffmpeg to be installed on the system.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The YouTube video URL (e.g., https://www.youtube.com/watch?v=VIDEO_ID)"
                },
                "save_to_file": {
                    "type": "boolean",
                    "description": "Whether to save the transcript to a file (default: true). Files are saved to the directory specified by YT_SUBS_DOWNLOAD_DIR environment variable, or ~/Downloads/yts/ if not set.",
                    "default": true
                }
            },
            "required": ["url"]
        }
    })
}

/// Validate `tools/call` arguments for the transcript tool
pub fn parse_arguments(arguments: Option<&Value>) -> std::result::Result<ExtractionRequest, String> {
    let arguments = match arguments {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => return Err("Missing required argument: url".to_string()),
        Some(_) => return Err("Arguments must be an object".to_string()),
    };

    let url = match arguments.get("url") {
        Some(Value::String(url)) if !url.trim().is_empty() => url.trim().to_string(),
        Some(Value::String(_)) => return Err("Argument url must not be empty".to_string()),
        Some(_) => return Err("Argument url must be a string".to_string()),
        None => return Err("Missing required argument: url".to_string()),
    };

    let save_to_file = match arguments.get("save_to_file") {
        Some(Value::Bool(save)) => *save,
        Some(Value::Null) | None => true,
        Some(_) => return Err("Argument save_to_file must be a boolean".to_string()),
    };

    Ok(ExtractionRequest::new(url, save_to_file))
}

/// MCP server exposing the transcript pipeline over line-delimited JSON-RPC
pub struct McpServer {
    pipeline: TranscriptPipeline,
}

impl McpServer {
    pub fn new(pipeline: TranscriptPipeline) -> Self {
        Self { pipeline }
    }

    /// Serve requests from `reader` until EOF or an interrupt signal
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.serve_until(reader, writer, tokio::signal::ctrl_c()).await
    }

    /// Serve requests until EOF or until `shutdown` completes.
    ///
    /// `shutdown` is raced against both reading and handling, so an in-flight
    /// extraction is dropped (and its child process killed) on interrupt.
    pub async fn serve_until<R, W, S>(&self, reader: R, mut writer: W, shutdown: S) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future,
    {
        let mut lines = reader.lines();
        tokio::pin!(shutdown);

        loop {
            let line = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Interrupt received, shutting down");
                    break;
                }
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                tracing::debug!("Input closed, shutting down");
                break;
            };

            let response = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Interrupt received, abandoning in-flight request");
                    break;
                }
                response = self.handle_line(&line) => response,
            };

            if let Some(response) = response {
                let mut payload = serde_json::to_string(&response)?;
                payload.push('\n');
                writer.write_all(payload.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        writer.flush().await?;
        Ok(())
    }

    /// Handle one raw message; `None` when no reply is due
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        if line.trim().is_empty() {
            return None;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Unparseable message: {}", e);
                return Some(Response::error(
                    Value::Null,
                    protocol::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(Response::error(
                    id,
                    protocol::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ))
            }
        };

        self.handle_request(request).await
    }

    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        tracing::debug!("Received {}", request.method);

        if request.is_notification() {
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        if request.jsonrpc.as_deref() != Some(protocol::JSONRPC_VERSION) {
            return Some(Response::error(
                id,
                protocol::INVALID_REQUEST,
                format!("Invalid request: jsonrpc must be \"{}\"", protocol::JSONRPC_VERSION),
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => {
                let client_version = request
                    .params
                    .as_ref()
                    .and_then(|p| p.get("protocolVersion"))
                    .and_then(Value::as_str);
                Response::success(id, protocol::initialize_result(client_version))
            }
            "ping" => Response::success(id, json!({})),
            "tools/list" => Response::success(id, json!({ "tools": [tool_descriptor()] })),
            "tools/call" => self.call_tool(id, request.params).await,
            other => Response::error(
                id,
                protocol::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };

        Some(response)
    }

    async fn call_tool(&self, id: Value, params: Option<Value>) -> Response {
        let params: CallToolParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(params)) => params,
            Ok(None) => {
                return Response::error(id, protocol::INVALID_PARAMS, "Missing tool call parameters")
            }
            Err(e) => {
                return Response::error(id, protocol::INVALID_PARAMS, format!("Invalid tool call parameters: {}", e))
            }
        };

        if params.name != TOOL_NAME {
            return Response::error(
                id,
                protocol::INVALID_PARAMS,
                format!("Unknown tool: {}", params.name),
            );
        }

        let request = match parse_arguments(params.arguments.as_ref()) {
            Ok(request) => request,
            Err(message) => return Response::error(id, protocol::INVALID_PARAMS, message),
        };

        let result = self.pipeline.run(&request).await;
        let text = match result.to_json() {
            Ok(text) => text,
            Err(e) => {
                return Response::error(id, protocol::INTERNAL_ERROR, format!("Failed to serialize result: {}", e))
            }
        };

        let call_result = CallToolResult::text(text, !result.is_success());
        match serde_json::to_value(call_result) {
            Ok(value) => Response::success(id, value),
            Err(e) => Response::error(id, protocol::INTERNAL_ERROR, format!("Failed to serialize result: {}", e)),
        }
    }
}
