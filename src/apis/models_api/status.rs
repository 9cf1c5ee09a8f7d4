use actix_web::{get, web, HttpResponse, Responder};

use crate::apis::schemas::StatusResponse;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
       .service(health);
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, body = StatusResponse),
    )
)]
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        success: true,
        message: "server is working".to_string(),
    })
}

#[get("/health")]
pub async fn health() -> impl Responder {
    "OK"
}
