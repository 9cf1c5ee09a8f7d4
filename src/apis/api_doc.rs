use utoipa::OpenApi;

use crate::apis::models_api;
use crate::apis::models_api::schemas::{ImageGenerationRequest, ImageGenerationResponse, ModelInfo, ModelsResponse, TaskInfo, TaskResponse, TasksResponse};
use crate::apis::schemas::{ErrorResponse, StatusResponse};


#[derive(OpenApi)]
#[openapi(
    paths(
        models_api::status::index,
        models_api::image::generate,
        models_api::image::models,
        models_api::tasks::list_tasks,
        models_api::tasks::run_named_task,
    ),
    components(
        schemas(ImageGenerationRequest,ImageGenerationResponse,ModelInfo,ModelsResponse,TaskInfo,TaskResponse,TasksResponse,ErrorResponse,StatusResponse)
    )
)]

pub struct ApiDoc;
