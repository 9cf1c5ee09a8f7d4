use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::cores::image_models::registry::ModelDescriptor;
use crate::cores::tasks::registry::TaskDescriptor;

// Documents the body accepted by /generate. Handlers read it as a loose JSON object,
// so any default parameter of the model (width, seed, ...) may be sent alongside.
#[allow(dead_code)]
#[derive(Deserialize, Serialize, ToSchema)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ImageGenerationResponse {
    pub success: bool,
    pub model: String,
    #[schema(value_type = Object)]
    pub data: Value,  // Raw outputs of the remote space.
    #[schema(value_type = Object)]
    pub parameters: Map<String, Value>,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TaskResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: Value,
    #[schema(value_type = Object)]
    pub parameters: Map<String, Value>,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ModelInfo {
    pub name: String,
    pub service_locator: String,
    pub operation: String,
    pub description: String,
    #[schema(value_type = Object)]
    pub default_params: Map<String, Value>,
    #[schema(value_type = Object)]
    pub example_usage: Map<String, Value>,
}

impl From<&ModelDescriptor> for ModelInfo {
    fn from(model: &ModelDescriptor) -> Self {
        ModelInfo {
            name: model.name.clone(),
            service_locator: model.space.clone(),
            operation: model.endpoint.clone(),
            description: model.description.clone(),
            default_params: model.default_params.clone(),
            example_usage: model.example_usage.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ModelsResponse {
    pub success: bool,
    pub total_models: usize,
    pub models: Vec<ModelInfo>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TaskInfo {
    pub name: String,
    pub route: String,
    pub service_locator: String,
    pub operation: String,
    pub description: String,
    pub resource_fields: Vec<String>,
    pub required_fields: Vec<String>,
}

impl From<&TaskDescriptor> for TaskInfo {
    fn from(task: &TaskDescriptor) -> Self {
        TaskInfo {
            name: task.name.clone(),
            route: task.route.clone(),
            service_locator: task.space.clone(),
            operation: task.endpoint.clone(),
            description: task.description.clone(),
            resource_fields: task.resources.iter().map(|r| r.field.clone()).collect(),
            required_fields: task.required.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TasksResponse {
    pub success: bool,
    pub total_tasks: usize,
    pub tasks: Vec<TaskInfo>,
}
