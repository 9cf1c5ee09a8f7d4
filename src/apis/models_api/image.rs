use actix_web::{get, route, web, HttpRequest, HttpResponse, Responder};
use log::{error, warn};

use crate::apis::models_api::schemas::{ImageGenerationResponse, ModelInfo, ModelsResponse};
use crate::apis::models_api::validation::{request_fields, validate_generation};
use crate::apis::schemas::ErrorResponse;
use crate::apis::state::AppState;
use crate::cores::image_models::params::overrides_from_request;

// Configure the actix_web service routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate)
       .service(models)
       .service(
           web::scope("/api/v1/image")
               .service(generate)
               .service(models)
       );
}

#[utoipa::path(
    post,
    path = "/generate",
    request_body = ImageGenerationRequest,
    responses(
        (status = 200, body = ImageGenerationResponse),
        (status = 400, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
// Handle GET and POST requests for /generate.
#[route("/generate", method = "GET", method = "POST")]
pub async fn generate(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> impl Responder {
    // 1. Validate the required fields.
    let validated = request_fields(req.query_string(), &body)
        .and_then(|fields| validate_generation(state.generator.registry(), &fields).map(|v| (v, fields)));
    let ((model, prompt), fields) = match validated {
        Ok(validated) => validated,
        Err(err) => {
            warn!("Rejected image generation request: {}", err);
            return err.to_response();
        }
    };

    // 2. Merge the caller overrides into the model defaults and send the request
    let overrides = overrides_from_request(&fields);
    let response = state.generator.generate(model, &prompt, &overrides).await;

    // 3. Wrap the remote result in the response envelope
    match response {
        Ok(outcome) => HttpResponse::Ok().json(ImageGenerationResponse {
            success: true,
            model: model.name.clone(),
            data: outcome.data,
            parameters: outcome.parameters,
            message: format!("Image generated successfully with {}", model.name),
        }),
        Err(err) => {
            error!("Error in image generation with {}: {}", model.name, err);
            HttpResponse::InternalServerError().json(ErrorResponse::new(err, "Image generation failed"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/models",
    responses(
        (status = 200, body = ModelsResponse),
    )
)]
// Lists the registered image generation models with their defaults and an example body.
#[get("/models")]
pub async fn models(state: web::Data<AppState>) -> impl Responder {
    let models: Vec<ModelInfo> = state.generator
        .registry()
        .descriptors()
        .iter()
        .map(ModelInfo::from)
        .collect();

    HttpResponse::Ok().json(ModelsResponse {
        success: true,
        total_models: models.len(),
        models,
    })
}
