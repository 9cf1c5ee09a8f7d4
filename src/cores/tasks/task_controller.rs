use log::{debug, info};
use reqwest::Url;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::cores::image_models::shapers::RemoteCallArgs;
use crate::cores::remote::remote_controller::{RemoteCall, RemoteInvoker};
use crate::cores::resources::{FetchError, ResourceFetcher};
use crate::cores::tasks::registry::{ResourceInput, TaskDescriptor};

#[derive(Debug, Clone, PartialEq)]
pub enum TaskFailure {
    Fetch(FetchError),
    Remote(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub data: Value,
    pub parameters: Map<String, Value>,
}

// Null and "" count as not provided; false and 0 are real values.
fn is_provided(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Builds the remote arguments of a task and the parameter echo for the response.
pub fn shape_task_arguments(task: &TaskDescriptor, fields: &Map<String, Value>) -> (RemoteCallArgs, Map<String, Value>) {
    let mut args = Map::new();
    let mut echo = Map::new();
    for spec in &task.arguments {
        let supplied = fields.get(spec.request_field());
        let value = if is_provided(supplied) {
            supplied.cloned()
        } else {
            spec.default.clone()
        };
        if let Some(value) = value {
            args.insert(spec.name.clone(), value.clone());
            echo.insert(spec.request_field().to_string(), value);
        }
    }
    (args, echo)
}

/// Picks one output of the remote result list when the task asks for it.
pub fn select_output(data: Value, output_index: Option<usize>) -> Value {
    match (output_index, data) {
        (Some(index), Value::Array(mut items)) => {
            if index < items.len() {
                items.swap_remove(index)
            } else {
                Value::Null
            }
        }
        (_, data) => data,
    }
}

pub struct TaskRunner {
    fetcher: ResourceFetcher,
    invoker: Arc<dyn RemoteInvoker>,
}

impl TaskRunner {
    pub fn new(fetcher: ResourceFetcher, invoker: Arc<dyn RemoteInvoker>) -> Self {
        TaskRunner { fetcher, invoker }
    }

    /// Runs a validated task request. `sources` pairs each supplied resource input with its parsed URL.
    pub async fn run(&self, task: &TaskDescriptor, fields: &Map<String, Value>, sources: &[(ResourceInput, Url)]) -> Result<TaskOutcome, TaskFailure> {
        let (args, mut parameters) = shape_task_arguments(task, fields);
        let mut call = RemoteCall::new(&task.space, &task.endpoint, args);

        for (input, url) in sources {
            let resource = self.fetcher
                .fetch_typed_resource(url, &input.media_prefix)
                .await
                .map_err(TaskFailure::Fetch)?;
            call = call.with_file(&input.argument, resource);
            let source = fields.get(&input.field).cloned().unwrap_or_else(|| Value::String(url.to_string()));
            parameters.insert(input.echo_key().to_string(), source);
        }

        info!("Running {} on {}{}", task.name, task.space, task.endpoint);
        debug!("Parameters: {}", Value::Object(call.args.clone()));

        let data = self.invoker.invoke(call).await.map_err(TaskFailure::Remote)?;
        Ok(TaskOutcome {
            data: select_output(data, task.output_index),
            parameters,
        })
    }
}
