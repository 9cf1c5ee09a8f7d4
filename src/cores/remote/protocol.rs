use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::cores::resources::FetchedResource;

pub const REMOTE_ERROR_FALLBACK: &str = "Remote space reported an error";

// ------------------------------------------ Space metadata ------------------------------------------
#[derive(Deserialize, Debug, Default)]
pub struct SpaceConfig {
    #[serde(default)]
    pub api_prefix: String,
    #[allow(dead_code)]
    pub version: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SpaceHost {
    pub host: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct ApiInfo {
    #[serde(default)]
    pub named_endpoints: HashMap<String, EndpointInfo>,
}

#[derive(Deserialize, Debug, Default)]
pub struct EndpointInfo {
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ParameterInfo {
    pub parameter_name: Option<String>,
    #[serde(default)]
    pub parameter_has_default: bool,
    #[serde(default)]
    pub parameter_default: Value,
}

#[derive(Deserialize, Debug)]
pub struct SubmitResponse {
    pub event_id: String,
}

// ------------------------------------------ Helpers ------------------------------------------

/// Default host of a Hugging Face space, e.g. `owner/My_Space.1` -> `https://owner-my-space-1.hf.space`.
pub fn space_subdomain(space: &str) -> String {
    let subdomain: String = space
        .to_lowercase()
        .chars()
        .map(|c| if c == '/' || c == '.' || c == '_' { '-' } else { c })
        .collect();
    format!("https://{}.hf.space", subdomain)
}

pub fn is_absolute_url(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{}", endpoint)
    }
}

/// Lays named arguments out in the positional order the endpoint declares.
///
/// Missing parameters take the declared default, or null. Without a
/// parameter list the arguments are sent in insertion order.
pub fn order_arguments(parameters: Option<&[ParameterInfo]>, args: &Map<String, Value>) -> Vec<Value> {
    let parameters = match parameters {
        Some(parameters) if !parameters.is_empty() => parameters,
        _ => return args.values().cloned().collect(),
    };

    parameters
        .iter()
        .map(|param| {
            let supplied = param.parameter_name.as_ref().and_then(|name| args.get(name));
            match supplied {
                Some(value) => value.clone(),
                None if param.parameter_has_default => param.parameter_default.clone(),
                None => Value::Null,
            }
        })
        .collect()
}

/// Reference to an uploaded file in the shape Gradio components accept.
pub fn file_data(host: &str, prefix: &str, path: &str, resource: &FetchedResource) -> Value {
    json!({
        "path": path,
        "url": format!("{}{}/file={}", host, prefix, path),
        "orig_name": resource.file_name,
        "size": resource.bytes.len(),
        "mime_type": resource.content_type,
        "meta": { "_type": "gradio.FileData" }
    })
}

/// Extracts the result of a finished call from its server-sent event stream.
pub fn parse_event_stream(body: &str) -> Result<Value, String> {
    for block in body.split("\n\n").flat_map(|b| b.split("\r\n\r\n")) {
        let mut event = "";
        let mut data_lines: Vec<&str> = Vec::new();
        for line in block.lines() {
            let line = line.trim_end_matches('\r');
            if let Some(name) = line.strip_prefix("event:") {
                event = name.trim();
            } else if let Some(data) = line.strip_prefix("data:") {
                data_lines.push(data.strip_prefix(' ').unwrap_or(data));
            }
        }
        let data = data_lines.join("\n");

        match event {
            "complete" => {
                return serde_json::from_str(&data)
                    .map_err(|err| format!("Failed to parse remote result: {}", err));
            }
            "error" => return Err(remote_error_message(&data)),
            _ => continue,
        }
    }
    Err("Remote stream ended without a result".to_string())
}

fn remote_error_message(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::String(message)) if !message.is_empty() => message,
        Ok(Value::Null) | Ok(Value::String(_)) => REMOTE_ERROR_FALLBACK.to_string(),
        Ok(other) => other
            .get("message")
            .or_else(|| other.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
        Err(_) if data.trim().is_empty() => REMOTE_ERROR_FALLBACK.to_string(),
        Err(_) => data.trim().to_string(),
    }
}
