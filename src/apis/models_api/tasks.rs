use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use log::{error, warn};

use crate::apis::models_api::schemas::{TaskInfo, TaskResponse, TasksResponse};
use crate::apis::models_api::validation::{request_fields, validate_task};
use crate::apis::schemas::ErrorResponse;
use crate::apis::state::AppState;
use crate::cores::tasks::registry::{TaskDescriptor, TaskRegistry};
use crate::cores::tasks::task_controller::TaskFailure;

// Name of the task served by a dedicated route.
#[derive(Clone)]
struct TaskName(String);

// Configure the actix_web service routes. Every task is reachable at its own
// route and at /tasks/{name}.
pub fn configure(cfg: &mut web::ServiceConfig, tasks: &TaskRegistry) {
    cfg.service(list_tasks)
       .service(run_named_task);
    for task in tasks.tasks() {
        cfg.service(
            web::resource(task.route.as_str())
                .app_data(web::Data::new(TaskName(task.name.clone())))
                .route(web::post().to(run_routed_task))
        );
    }
}

#[utoipa::path(
    get,
    path = "/tasks",
    responses(
        (status = 200, body = TasksResponse),
    )
)]
#[get("/tasks")]
pub async fn list_tasks(state: web::Data<AppState>) -> impl Responder {
    let tasks: Vec<TaskInfo> = state.tasks.tasks().iter().map(TaskInfo::from).collect();
    HttpResponse::Ok().json(TasksResponse {
        success: true,
        total_tasks: tasks.len(),
        tasks,
    })
}

#[utoipa::path(
    post,
    path = "/tasks/{name}",
    params(("name" = String, Path, description = "Registered task name")),
    responses(
        (status = 200, body = TaskResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[post("/tasks/{name}")]
pub async fn run_named_task(path: web::Path<String>, req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> impl Responder {
    let name = path.into_inner();
    match state.tasks.lookup(&name) {
        Some(task) => run_task(task, &req, &body, &state).await,
        None => HttpResponse::NotFound().json(ErrorResponse::new(
            "Unknown task",
            format!("Task '{}' not found", name),
        )),
    }
}

async fn run_routed_task(name: web::Data<TaskName>, req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> HttpResponse {
    match state.tasks.lookup(&name.0) {
        Some(task) => run_task(task, &req, &body, &state).await,
        None => HttpResponse::NotFound().json(ErrorResponse::new(
            "Unknown task",
            format!("Task '{}' not found", name.0),
        )),
    }
}

async fn run_task(task: &TaskDescriptor, req: &HttpRequest, body: &[u8], state: &AppState) -> HttpResponse {
    // 1. Validate the required fields.
    let validated = request_fields(req.query_string(), body)
        .and_then(|fields| validate_task(task, &fields).map(|sources| (fields, sources)));
    let (fields, sources) = match validated {
        Ok(validated) => validated,
        Err(err) => {
            warn!("Rejected {} request: {}", task.name, err);
            return err.to_response();
        }
    };

    // 2. Fetch the source media and call the space
    let response = state.runner.run(task, &fields, &sources).await;

    // 3. Wrap the result in the response envelope
    match response {
        Ok(outcome) => HttpResponse::Ok().json(TaskResponse {
            success: true,
            data: outcome.data,
            parameters: outcome.parameters,
            message: task.success_message.clone(),
        }),
        Err(TaskFailure::Fetch(err)) => {
            error!("Task {} could not fetch its input: {}", task.name, err);
            let body = ErrorResponse::new(err.to_string(), task.failure_message.clone());
            if err.is_client_error() {
                HttpResponse::BadRequest().json(body)
            } else {
                HttpResponse::InternalServerError().json(body)
            }
        }
        Err(TaskFailure::Remote(err)) => {
            error!("Task {} failed: {}", task.name, err);
            HttpResponse::InternalServerError().json(ErrorResponse::new(err, task.failure_message.clone()))
        }
    }
}
