//! Function-handler adapter.
//!
//! Accepts a serverless-style HTTP event and answers with the
//! `{statusCode, headers, body, isBase64Encoded}` shape those platforms expect.
//! Video bodies are base64-encoded; error bodies are JSON.

use crate::artifact::VideoArtifact;
use crate::error::ReelError;
use crate::orchestrator::Orchestrator;
use crate::request::{GenerationRequest, RawRequest};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// An inbound HTTP event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandlerEvent {
    #[serde(rename = "httpMethod", alias = "method", default)]
    pub http_method: Option<String>,
    /// Request body, either a JSON document or a string holding one.
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(rename = "isBase64Encoded", default)]
    pub is_base64_encoded: bool,
}

/// The reply handed back to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl HandlerResponse {
    /// A JSON error reply.
    pub fn error(status_code: u16, message: &str, kind: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code,
            headers,
            body: json!({ "error": message, "kind": kind }).to_string(),
            is_base64_encoded: false,
        }
    }

    fn from_error(err: &ReelError) -> Self {
        Self::error(err.status_code(), &err.to_string(), err.kind())
    }

    fn video(artifact: &VideoArtifact) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), artifact.content_type.clone());
        headers.insert("Content-Disposition".to_string(), artifact.content_disposition());
        Self {
            status_code: 200,
            headers,
            body: artifact.to_base64(),
            is_base64_encoded: true,
        }
    }
}

/// Handle one event.
pub async fn handle(orchestrator: &Orchestrator, event: HandlerEvent) -> HandlerResponse {
    let request = match parse_event(event) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match orchestrator.assemble(&request).await {
        Ok(artifact) => {
            info!("Returning {} byte video", artifact.len());
            HandlerResponse::video(&artifact)
        }
        Err(e) => {
            warn!(kind = e.kind(), "Request failed: {}", e);
            HandlerResponse::from_error(&e)
        }
    }
}

/// Check the method and decode the body into a request.
fn parse_event(event: HandlerEvent) -> std::result::Result<GenerationRequest, HandlerResponse> {
    let method = event.http_method.as_deref().unwrap_or("POST");
    if !method.eq_ignore_ascii_case("POST") {
        return Err(HandlerResponse::error(405, "Method not allowed", "method_not_allowed"));
    }

    let raw = decode_body(event.body, event.is_base64_encoded)
        .map_err(|msg| HandlerResponse::error(400, &msg, "invalid_request"))?;

    GenerationRequest::try_from(raw).map_err(|e| HandlerResponse::from_error(&e))
}

fn decode_body(body: Option<Value>, base64_encoded: bool) -> std::result::Result<RawRequest, String> {
    let text = match body {
        None | Some(Value::Null) => return Ok(RawRequest::default()),
        Some(Value::String(text)) => text,
        Some(value) => {
            return serde_json::from_value(value).map_err(|e| format!("Invalid JSON body: {}", e))
        }
    };

    let text = if base64_encoded {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(text.trim())
            .map_err(|e| format!("Invalid base64 body: {}", e))?;
        String::from_utf8(bytes).map_err(|e| format!("Body is not UTF-8: {}", e))?
    } else {
        text
    };

    if text.trim().is_empty() {
        return Ok(RawRequest::default());
    }
    serde_json::from_str(&text).map_err(|e| format!("Invalid JSON body: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(value: Value) -> HandlerEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_non_post_is_rejected() {
        let response = parse_event(event(json!({ "httpMethod": "GET" }))).unwrap_err();
        assert_eq!(response.status_code, 405);
        assert!(response.body.contains("Method not allowed"));

        let response = parse_event(event(json!({ "method": "put", "body": "{}" }))).unwrap_err();
        assert_eq!(response.status_code, 405);
    }

    #[test]
    fn test_string_body_is_parsed() {
        let request = parse_event(event(json!({
            "httpMethod": "POST",
            "body": "{\"script\": \"Never give up. Go.\", \"vibe\": \"ocean\"}"
        })))
        .unwrap();
        assert_eq!(request.vibe, "ocean");
        assert_eq!(request.caption(), "Never give up.");
    }

    #[test]
    fn test_object_and_base64_bodies() {
        let request = parse_event(event(json!({
            "method": "post",
            "body": { "script": "Go.", "vibe": "forest" }
        })))
        .unwrap();
        assert_eq!(request.vibe, "forest");

        let encoded = base64::engine::general_purpose::STANDARD
            .encode(r#"{"script": "Go.", "vibe": "city"}"#);
        let request = parse_event(event(json!({
            "httpMethod": "POST",
            "body": encoded,
            "isBase64Encoded": true
        })))
        .unwrap();
        assert_eq!(request.vibe, "city");
    }

    #[test]
    fn test_bad_or_incomplete_body_is_400() {
        let response = parse_event(event(json!({ "httpMethod": "POST", "body": "{not json" }))).unwrap_err();
        assert_eq!(response.status_code, 400);

        let response = parse_event(event(json!({
            "httpMethod": "POST",
            "body": "{\"script\": \"Go.\"}"
        })))
        .unwrap_err();
        assert_eq!(response.status_code, 400);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["kind"], "invalid_request");
        assert!(body["error"].as_str().unwrap().contains("vibe"));

        let response = parse_event(event(json!({ "httpMethod": "POST" }))).unwrap_err();
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_handle_rejects_before_pipeline() {
        let root = tempfile::tempdir().unwrap();
        let mut settings = crate::config::Settings::default().with_api_key(Some("test-key".into()));
        settings.general.temp_dir = root.path().to_string_lossy().into_owned();
        let orchestrator = Orchestrator::new(settings).unwrap();

        let response = handle(&orchestrator, event(json!({ "httpMethod": "DELETE" }))).await;
        assert_eq!(response.status_code, 405);

        let response = handle(&orchestrator, event(json!({ "httpMethod": "POST", "body": "{}" }))).await;
        assert_eq!(response.status_code, 400);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_error_mapping_keeps_kind() {
        let err = ReelError::FootageDiscovery {
            status: 401,
            message: "bad key".into(),
        };
        let response = HandlerResponse::from_error(&err);
        assert_eq!(response.status_code, 500);
        assert!(!response.is_base64_encoded);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["kind"], "footage_discovery");
    }

    #[test]
    fn test_video_response_shape() {
        let artifact = VideoArtifact::mp4(
            b"hello".to_vec(),
            crate::artifact::ArtifactMetadata {
                session_id: uuid::Uuid::nil(),
                width: 1080,
                height: 1920,
                duration_seconds: 10.0,
                clip_count: 1,
                truncated: false,
            },
        );
        let response = HandlerResponse::video(&artifact);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["isBase64Encoded"], true);
        assert_eq!(value["body"], "aGVsbG8=");
        assert_eq!(value["headers"]["Content-Type"], "video/mp4");
        assert_eq!(
            value["headers"]["Content-Disposition"],
            "attachment; filename=\"motivational_video.mp4\""
        );
    }
}
