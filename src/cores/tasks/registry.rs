use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::error::Error;
use std::fs;

// A request field holding the URL of media to download and upload to the space.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceInput {
    pub field: String,
    pub argument: String,
    pub media_prefix: String,  // Expected content-type prefix, e.g. "image/".
    #[serde(default)]
    pub optional: bool,
    pub echo_as: Option<String>,
}

impl ResourceInput {
    pub fn echo_key(&self) -> &str {
        self.echo_as.as_deref().unwrap_or(&self.field)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    pub name: String,           // Argument name on the remote endpoint.
    pub field: Option<String>,  // Request field feeding it, when named differently.
    pub default: Option<Value>,
}

impl ArgumentSpec {
    pub fn request_field(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.name)
    }
}

// A single-purpose space exposed on its own route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskDescriptor {
    pub name: String,
    pub route: String,
    pub space: String,
    pub endpoint: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resources: Vec<ResourceInput>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
    pub output_index: Option<usize>,
    #[serde(default = "default_success_message")]
    pub success_message: String,
    #[serde(default = "default_failure_message")]
    pub failure_message: String,
}

fn default_success_message() -> String {
    "Request processed successfully".to_string()
}

fn default_failure_message() -> String {
    "Request processing failed".to_string()
}

#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<TaskDescriptor>,
}

impl TaskRegistry {
    pub fn new(tasks: Vec<TaskDescriptor>) -> Self {
        let mut registry = TaskRegistry { tasks: Vec::new() };
        for task in tasks {
            registry.insert(task);
        }
        registry
    }

    pub fn builtin() -> Self {
        TaskRegistry::new(builtin_tasks())
    }

    /// Built-in tasks plus those declared in a YAML file; same-named entries replace built-ins.
    pub fn with_file(path: &str) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read tasks file {}: {}", path, err))?;
        let extra: Vec<TaskDescriptor> = serde_yaml::from_str(&contents)
            .map_err(|err| format!("Failed to parse tasks file {}: {}", path, err))?;

        let mut registry = TaskRegistry::builtin();
        for task in extra {
            registry.insert(task);
        }
        Ok(registry)
    }

    fn insert(&mut self, task: TaskDescriptor) {
        match self.tasks.iter_mut().find(|t| t.name == task.name) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&TaskDescriptor> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn tasks(&self) -> &[TaskDescriptor] {
        &self.tasks
    }
}

fn argument(name: &str, default: Value) -> ArgumentSpec {
    ArgumentSpec { name: name.to_string(), field: None, default: Some(default) }
}

fn required_argument(name: &str, field: &str) -> ArgumentSpec {
    ArgumentSpec { name: name.to_string(), field: Some(field.to_string()), default: None }
}

fn image_input(field: &str, argument: &str, optional: bool, echo_as: Option<&str>) -> ResourceInput {
    ResourceInput {
        field: field.to_string(),
        argument: argument.to_string(),
        media_prefix: "image/".to_string(),
        optional,
        echo_as: echo_as.map(str::to_string),
    }
}

fn builtin_tasks() -> Vec<TaskDescriptor> {
    vec![
        TaskDescriptor {
            name: "bg-remover".to_string(),
            route: "/bg-remover".to_string(),
            space: "ZhengPeng7/BiRefNet_demo".to_string(),
            endpoint: "/image".to_string(),
            description: "BiRefNet - Background removal".to_string(),
            resources: vec![image_input("url", "images", false, Some("source_url"))],
            required: vec![],
            arguments: vec![
                argument("resolution", json!("1024x1024")),
                argument("weights_file", json!("General")),
            ],
            output_index: Some(0),
            success_message: "Image processed successfully".to_string(),
            failure_message: "Image processing failed".to_string(),
        },
        TaskDescriptor {
            name: "image-generate".to_string(),
            route: "/image/generate".to_string(),
            space: "black-forest-labs/FLUX.1-schnell".to_string(),
            endpoint: "/infer".to_string(),
            description: "FLUX.1 Schnell - Fast text-to-image".to_string(),
            resources: vec![],
            required: vec!["prompt".to_string()],
            arguments: vec![
                required_argument("prompt", "prompt"),
                argument("seed", json!(0)),
            ],
            output_index: None,
            success_message: "Image Generated successfully".to_string(),
            failure_message: "Image Generate failed".to_string(),
        },
        TaskDescriptor {
            name: "text-to-svg".to_string(),
            route: "/svg/generate".to_string(),
            space: "multimodalart/OmniSVG-3B".to_string(),
            endpoint: "/gradio_text_to_svg".to_string(),
            description: "OmniSVG - Text to SVG".to_string(),
            resources: vec![],
            required: vec!["prompt".to_string()],
            arguments: vec![required_argument("text_description", "prompt")],
            output_index: None,
            success_message: "SVG generated successfully".to_string(),
            failure_message: "SVG generation failed".to_string(),
        },
        TaskDescriptor {
            name: "illusion".to_string(),
            route: "/image/illusion".to_string(),
            space: "AP123/IllusionDiffusion".to_string(),
            endpoint: "/inference".to_string(),
            description: "IllusionDiffusion - Hide a control image inside a generated scene".to_string(),
            resources: vec![image_input("url", "control_image", false, Some("source_url"))],
            required: vec!["prompt".to_string()],
            arguments: vec![
                required_argument("prompt", "prompt"),
                argument("negative_prompt", json!("low quality")),
                argument("guidance_scale", json!(7.5)),
                argument("controlnet_conditioning_scale", json!(0.8)),
                argument("control_guidance_start", json!(0)),
                argument("control_guidance_end", json!(1)),
                argument("upscaler_strength", json!(1)),
                argument("seed", json!(-1)),
                argument("sampler", json!("Euler")),
            ],
            output_index: None,
            success_message: "Illusion generated successfully".to_string(),
            failure_message: "Illusion generation failed".to_string(),
        },
        TaskDescriptor {
            name: "instant-id".to_string(),
            route: "/image/instant-id".to_string(),
            space: "InstantX/InstantID".to_string(),
            endpoint: "/generate_image".to_string(),
            description: "InstantID - Identity-preserving stylized portraits".to_string(),
            resources: vec![
                image_input("face_url", "face_image_path", false, None),
                image_input("pose_url", "pose_image_path", true, None),
            ],
            required: vec![],
            arguments: vec![
                argument("prompt", json!("")),
                argument("negative_prompt", json!("(lowres, low quality, worst quality:1.2), (text:1.2), watermark, (frame:1.2), deformed, ugly, deformed eyes, blur, out of focus, blurry, monochrome")),
                argument("style_name", json!("Spring Festival")),
                argument("num_steps", json!(30)),
                argument("identitynet_strength_ratio", json!(0.8)),
                argument("adapter_strength_ratio", json!(0.8)),
                argument("canny_strength", json!(0.4)),
                argument("depth_strength", json!(0.4)),
                argument("controlnet_selection", json!(["depth"])),
                argument("guidance_scale", json!(5)),
                argument("seed", json!(42)),
                argument("scheduler", json!("EulerDiscreteScheduler")),
                argument("enable_LCM", json!(false)),
                argument("enhance_face_region", json!(true)),
            ],
            output_index: None,
            success_message: "Portrait generated successfully".to_string(),
            failure_message: "Portrait generation failed".to_string(),
        },
    ]
}
