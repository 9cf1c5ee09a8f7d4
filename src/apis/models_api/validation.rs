use actix_web::{web, HttpResponse};
use reqwest::Url;
use serde_json::{Map, Value};
use std::fmt;

use crate::apis::schemas::ErrorResponse;
use crate::cores::image_models::registry::{ModelDescriptor, ModelRegistry};
use crate::cores::resources::media_kind;
use crate::cores::tasks::registry::{ResourceInput, TaskDescriptor};

// Reasons a request is rejected before anything is dispatched. All map to 400.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    InvalidBody(String),
    MissingModel { available: Vec<String> },
    UnknownModel { model: String, available: Vec<String> },
    MissingField { field: String },
    MissingResource { field: String, kind: String },
    InvalidUrl { field: String, kind: String },
}

impl RequestError {
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            RequestError::InvalidBody(detail) => {
                ErrorResponse::new("Invalid request body", format!("Request body must be a JSON object: {}", detail))
            }
            RequestError::MissingModel { available } => {
                ErrorResponse::new("No model specified", "Please provide a model name")
                    .with_available_models(available.clone())
            }
            RequestError::UnknownModel { model, available } => {
                ErrorResponse::new("Invalid model", format!("Model '{}' not found", model))
                    .with_available_models(available.clone())
            }
            RequestError::MissingField { field } => {
                ErrorResponse::new(format!("No {} provided", field), format!("Please provide a {} in the request body", field))
            }
            RequestError::MissingResource { field, kind } => {
                ErrorResponse::new(format!("No {} URL provided", kind), format!("Please provide a {} in the request body", field))
            }
            RequestError::InvalidUrl { kind, .. } => {
                ErrorResponse::new("Invalid URL format", format!("Please provide a valid {} URL", kind))
            }
        }
    }

    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(self.to_error_response())
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.to_error_response();
        write!(f, "{}: {}", response.error, response.message)
    }
}

impl std::error::Error for RequestError {}

// Query values such as `width=512` or `randomize_seed=false` keep their JSON type.
fn query_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Number(_)) | Ok(value @ Value::Bool(_)) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Collects request fields from the query string and the JSON body; body fields win.
pub fn request_fields(query: &str, body: &[u8]) -> Result<Map<String, Value>, RequestError> {
    let mut fields = Map::new();

    if !query.is_empty() {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(query)
            .map_err(|err| RequestError::InvalidBody(err.to_string()))?;
        for (key, raw) in pairs.into_inner() {
            fields.insert(key, query_value(&raw));
        }
    }

    if body.iter().any(|b| !b.is_ascii_whitespace()) {
        let parsed: Value = serde_json::from_slice(body)
            .map_err(|err| RequestError::InvalidBody(err.to_string()))?;
        match parsed {
            Value::Object(map) => fields.extend(map),
            _ => return Err(RequestError::InvalidBody("expected an object".to_string())),
        }
    }

    Ok(fields)
}

/// Non-empty text value of a field; numbers are accepted as their text form.
pub fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Checks a generation request in order: model present, model known, prompt present.
pub fn validate_generation<'a>(registry: &'a ModelRegistry, fields: &Map<String, Value>) -> Result<(&'a ModelDescriptor, String), RequestError> {
    let model = text_field(fields, "model").ok_or_else(|| RequestError::MissingModel {
        available: registry.list_identifiers(),
    })?;

    let descriptor = registry.lookup(&model).ok_or_else(|| RequestError::UnknownModel {
        model: model.clone(),
        available: registry.list_identifiers(),
    })?;

    let prompt = text_field(fields, "prompt").ok_or_else(|| RequestError::MissingField {
        field: "prompt".to_string(),
    })?;

    Ok((descriptor, prompt))
}

/// Checks a task request in order: resource URLs present, required fields present, URLs well formed.
pub fn validate_task(task: &TaskDescriptor, fields: &Map<String, Value>) -> Result<Vec<(ResourceInput, Url)>, RequestError> {
    let mut supplied = Vec::new();
    for input in &task.resources {
        match text_field(fields, &input.field) {
            Some(raw) => supplied.push((input, raw)),
            None if input.optional => continue,
            None => {
                return Err(RequestError::MissingResource {
                    field: input.field.clone(),
                    kind: media_kind(&input.media_prefix),
                })
            }
        }
    }

    for field in &task.required {
        if text_field(fields, field).is_none() {
            return Err(RequestError::MissingField { field: field.clone() });
        }
    }

    supplied
        .into_iter()
        .map(|(input, raw)| {
            Url::parse(&raw)
                .map(|url| (input.clone(), url))
                .map_err(|_| RequestError::InvalidUrl {
                    field: input.field.clone(),
                    kind: media_kind(&input.media_prefix),
                })
        })
        .collect()
}
