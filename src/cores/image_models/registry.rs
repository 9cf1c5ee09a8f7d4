use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::error::Error;
use std::fs;

// A hosted image generation model and the defaults it is called with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    pub name: String,
    pub space: String,       // Hugging Face space id or absolute base URL.
    pub endpoint: String,    // Named endpoint of the space, such as "/infer".
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default)]
    pub default_params: Map<String, Value>,
    #[serde(default)]
    pub example_usage: Map<String, Value>,
}

fn default_description() -> String {
    "AI image generation model".to_string()
}

/// Immutable lookup table from model identifier to descriptor.
///
/// Built once at startup and shared read-only between workers.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Vec<ModelDescriptor>,
}

impl ModelRegistry {
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        let mut registry = ModelRegistry { models: Vec::new() };
        for model in models {
            registry.insert(model);
        }
        registry
    }

    /// The models the gateway ships with.
    pub fn builtin() -> Self {
        ModelRegistry::new(builtin_models())
    }

    /// Built-in models plus the entries of a YAML list of descriptors.
    ///
    /// An entry named like a built-in model replaces it.
    pub fn with_file(path: &str) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read image models file {}: {}", path, err))?;
        let extra: Vec<ModelDescriptor> = serde_yaml::from_str(&contents)
            .map_err(|err| format!("Failed to parse image models file {}: {}", path, err))?;

        let mut registry = ModelRegistry::builtin();
        for model in extra {
            registry.insert(model);
        }
        Ok(registry)
    }

    fn insert(&mut self, model: ModelDescriptor) {
        match self.models.iter_mut().find(|m| m.name == model.name) {
            Some(existing) => *existing = model,
            None => self.models.push(model),
        }
    }

    pub fn lookup(&self, identifier: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == identifier)
    }

    pub fn list_identifiers(&self) -> Vec<String> {
        self.models.iter().map(|m| m.name.clone()).collect()
    }

    pub fn descriptors(&self) -> &[ModelDescriptor] {
        &self.models
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn builtin_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor {
            name: "stable-diffusion".to_string(),
            space: "stabilityai/stable-diffusion".to_string(),
            endpoint: "/infer".to_string(),
            description: "Stability AI Stable Diffusion - Classic text-to-image model".to_string(),
            default_params: object(json!({
                "prompt": "",
                "negative": "",
                "scale": 7.5
            })),
            example_usage: object(json!({
                "prompt": "A beautiful landscape with mountains and sunset",
                "negative": "blurry, low quality, distorted",
                "scale": 7.5
            })),
        },
        ModelDescriptor {
            name: "flux-dev".to_string(),
            space: "black-forest-labs/FLUX.1-dev".to_string(),
            endpoint: "/infer".to_string(),
            description: "FLUX.1 Dev - High-quality balanced generation model".to_string(),
            default_params: object(json!({
                "seed": 0,
                "randomize_seed": true,
                "width": 1024,
                "height": 1024,
                "guidance_scale": 3.5,
                "num_inference_steps": 28
            })),
            example_usage: object(json!({
                "prompt": "A photorealistic portrait of a person",
                "seed": 42,
                "randomize_seed": false,
                "width": 1024,
                "height": 1024,
                "guidance_scale": 3.5,
                "num_inference_steps": 28
            })),
        },
        ModelDescriptor {
            name: "flux-schnell".to_string(),
            space: "black-forest-labs/FLUX.1-schnell".to_string(),
            endpoint: "/infer".to_string(),
            description: "FLUX.1 Schnell - Fast 4-step generation model".to_string(),
            default_params: object(json!({
                "seed": 0,
                "randomize_seed": true,
                "width": 1024,
                "height": 1024,
                "num_inference_steps": 4
            })),
            example_usage: object(json!({
                "prompt": "A cute cat sitting on a chair",
                "seed": 0,
                "randomize_seed": true,
                "width": 1024,
                "height": 1024,
                "num_inference_steps": 4
            })),
        },
        ModelDescriptor {
            name: "midjourney".to_string(),
            space: "ijohn07/Midjourney".to_string(),
            endpoint: "/run".to_string(),
            description: "Midjourney Style - Artistic and aesthetic image generation".to_string(),
            default_params: object(json!({
                "negative_prompt": "",
                "use_negative_prompt": true,
                "style": "2560 x 1440",
                "seed": 0,
                "width": 512,
                "height": 512,
                "guidance_scale": 0.1,
                "randomize_seed": true
            })),
            example_usage: object(json!({
                "prompt": "A mystical landscape with floating islands",
                "negative_prompt": "blurry, low quality",
                "use_negative_prompt": true,
                "style": "2560 x 1440",
                "seed": 42,
                "width": 512,
                "height": 512,
                "guidance_scale": 0.1,
                "randomize_seed": false
            })),
        },
    ]
}
