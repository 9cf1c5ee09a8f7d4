use log::{debug, info};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::cores::image_models::params::{merge, EffectiveParameters};
use crate::cores::image_models::registry::{ModelDescriptor, ModelRegistry};
use crate::cores::image_models::shapers::{ArgumentShaper, RemoteCallArgs};
use crate::cores::remote::remote_controller::{RemoteCall, RemoteInvoker};

// Everything needed to dispatch one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedGeneration {
    pub effective: EffectiveParameters,
    pub args: RemoteCallArgs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub data: Value,
    pub parameters: Map<String, Value>,
}

/// Dispatches generation requests to the space registered for each model.
pub struct ImageGenerator {
    registry: Arc<ModelRegistry>,
    shaper: ArgumentShaper,
    invoker: Arc<dyn RemoteInvoker>,
}

impl ImageGenerator {
    pub fn new(registry: Arc<ModelRegistry>, shaper: ArgumentShaper, invoker: Arc<dyn RemoteInvoker>) -> Self {
        ImageGenerator { registry, shaper, invoker }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn prepare(&self, model: &ModelDescriptor, prompt: &str, overrides: &Map<String, Value>) -> PreparedGeneration {
        let effective = merge(&model.default_params, overrides);
        let args = self.shaper.shape(&model.name, &effective, prompt);
        PreparedGeneration { effective, args }
    }

    pub async fn generate(&self, model: &ModelDescriptor, prompt: &str, overrides: &Map<String, Value>) -> Result<GenerationOutcome, String> {
        let prepared = self.prepare(model, prompt, overrides);

        info!("Generating image with {}...", model.name);
        if !self.shaper.has_rule(&model.name) {
            info!("No shaping rule for {}, passing parameters through", model.name);
        }
        debug!("Parameters: {}", Value::Object(prepared.args.clone()));

        let call = RemoteCall::new(&model.space, &model.endpoint, prepared.args);
        let data = self.invoker.invoke(call).await?;

        Ok(GenerationOutcome {
            data,
            parameters: echo_parameters(&model.name, prompt, &prepared.effective),
        })
    }
}

/// `{ model, prompt, ...effective }` as reported back to the caller.
pub fn echo_parameters(model: &str, prompt: &str, effective: &EffectiveParameters) -> Map<String, Value> {
    let mut parameters = Map::new();
    parameters.insert("model".to_string(), Value::String(model.to_string()));
    parameters.insert("prompt".to_string(), Value::String(prompt.to_string()));
    for (key, value) in effective {
        if key == "model" || key == "prompt" {
            continue;
        }
        parameters.insert(key.clone(), value.clone());
    }
    parameters
}
