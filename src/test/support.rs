use actix_web::{web, App, HttpServer};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::apis::state::AppState;
use crate::cores::image_models::registry::ModelRegistry;
use crate::cores::remote::remote_controller::{RemoteCall, RemoteInvoker};
use crate::cores::resources::ResourceFetcher;
use crate::cores::tasks::registry::TaskRegistry;

// Stands in for a hosted space: records every call and answers with a fixed result.
pub struct RecordingInvoker {
    calls: Mutex<Vec<RemoteCall>>,
    result: Result<Value, String>,
}

impl RecordingInvoker {
    pub fn ok(result: Value) -> Arc<Self> {
        Arc::new(RecordingInvoker { calls: Mutex::new(Vec::new()), result: Ok(result) })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(RecordingInvoker { calls: Mutex::new(Vec::new()), result: Err(message.to_string()) })
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteInvoker for RecordingInvoker {
    async fn invoke(&self, call: RemoteCall) -> Result<Value, String> {
        self.calls.lock().unwrap().push(call);
        self.result.clone()
    }
}

pub fn app_state(invoker: Arc<RecordingInvoker>) -> web::Data<AppState> {
    let fetcher = ResourceFetcher::new(Duration::from_secs(5)).unwrap();
    web::Data::new(AppState::new(ModelRegistry::builtin(), TaskRegistry::builtin(), invoker, fetcher))
}

/// Serves `configure` on an ephemeral local port and returns its base URL.
pub fn spawn_server<F>(configure: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();
    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    format!("http://{}", addr)
}

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

/// Local media host: an image, an HTML page and a missing path.
pub fn spawn_media_server() -> String {
    spawn_server(|cfg: &mut web::ServiceConfig| {
        cfg.route("/photo.png", web::get().to(|| async {
            actix_web::HttpResponse::Ok().content_type("image/png").body(PNG_BYTES)
        }))
        .route("/clip.wav", web::get().to(|| async {
            actix_web::HttpResponse::Ok().content_type("audio/wav").body(&b"RIFF"[..])
        }))
        .route("/page.html", web::get().to(|| async {
            actix_web::HttpResponse::Ok().content_type("text/html").body("<html></html>")
        }))
        .route("/missing.png", web::get().to(|| async {
            actix_web::HttpResponse::NotFound().finish()
        }));
    })
}
