use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use crate::configs::settings::Config;
use crate::cores::image_models::image_controller::ImageGenerator;
use crate::cores::image_models::registry::ModelRegistry;
use crate::cores::image_models::shapers::ArgumentShaper;
use crate::cores::remote::gradio::GradioClient;
use crate::cores::remote::remote_controller::RemoteInvoker;
use crate::cores::resources::ResourceFetcher;
use crate::cores::tasks::registry::TaskRegistry;
use crate::cores::tasks::task_controller::TaskRunner;

// Read-only collaborators shared by every request handler.
pub struct AppState {
    pub generator: ImageGenerator,
    pub tasks: Arc<TaskRegistry>,
    pub runner: TaskRunner,
}

impl AppState {
    pub fn new(models: ModelRegistry, tasks: TaskRegistry, invoker: Arc<dyn RemoteInvoker>, fetcher: ResourceFetcher) -> Self {
        AppState {
            generator: ImageGenerator::new(Arc::new(models), ArgumentShaper::builtin(), invoker.clone()),
            tasks: Arc::new(tasks),
            runner: TaskRunner::new(fetcher, invoker),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Box<dyn Error>> {
        let models = match &config.image_models_file {
            Some(path) => ModelRegistry::with_file(path)?,
            None => ModelRegistry::builtin(),
        };
        let tasks = match &config.tasks_file {
            Some(path) => TaskRegistry::with_file(path)?,
            None => TaskRegistry::builtin(),
        };

        let invoker = GradioClient::new(&config.huggingface_api_key, Duration::from_secs(config.remote_timeout_secs))?
            .with_hub_url(&config.huggingface_hub_url);
        let fetcher = ResourceFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;

        Ok(AppState::new(models, tasks, Arc::new(invoker), fetcher))
    }
}
