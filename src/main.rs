use actix_web::{web, App, HttpServer};
use actix_cors::Cors;
use log::info;
use std::{fs::File, io::BufReader};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod apis;
mod cores;
mod configs;
mod middleware;
mod utils;

use crate::apis::api_doc::ApiDoc;
use crate::apis::state::AppState;
use crate::configs::settings::Config;
use crate::middleware::access_log::AccessLog;

#[cfg(test)]
mod test;

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

fn load_tls_config(config: &Config) -> std::io::Result<rustls::ServerConfig> {
    let mut certs_file = BufReader::new(File::open(&config.server_cert_file)?);
    let mut key_file = BufReader::new(File::open(&config.key_file)?);

    let tls_certs = rustls_pemfile::certs(&mut certs_file)
        .collect::<Result<Vec<_>, _>>()?;
    let tls_key = rustls_pemfile::private_key(&mut key_file)?
        .ok_or_else(|| io_error("TLS setup failed", format!("no private key in {}", config.key_file)))?;

    // set up TLS config options
    rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(tls_certs, tls_key)
        .map_err(|err| io_error("TLS setup failed", err))
}

fn cors_policy(origin: &str) -> Cors {
    let cors = if origin == "*" {
        Cors::default().allow_any_origin()
    } else {
        Cors::default().allowed_origin(origin)
    };
    cors.allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec!["Content-Type", "Authorization", "User-Agent"])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::load_config().map_err(|err| io_error("Config load failed", err))?;
    utils::log::init_logging(&config.log_config_file).map_err(|err| io_error("Logger setup failed", err))?;

    let state = web::Data::new(AppState::from_config(&config).map_err(|err| io_error("Startup failed", err))?);
    info!(
        "Loaded {} image models and {} tasks",
        state.generator.registry().list_identifiers().len(),
        state.tasks.tasks().len()
    );

    let cors_origin = config.cors_origin.clone();
    let app_state = state.clone();
    let server = HttpServer::new(move || {
        let tasks = app_state.tasks.clone();
        App::new()
            .app_data(app_state.clone())
            .wrap(cors_policy(&cors_origin))
            .wrap(AccessLog)
            .configure(apis::models_api::status::configure)
            .configure(apis::models_api::image::configure)
            .configure(|cfg| apis::models_api::tasks::configure(cfg, &tasks))
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()))
    });

    // Set the port number
    let bind_address = (config.host.as_str(), config.port);
    let server = if config.https_enabled {
        info!("Starting server at https://{}:{}", config.host, config.port);
        server.bind_rustls_0_23(bind_address, load_tls_config(&config)?)?
    } else {
        info!("Starting server at http://{}:{}", config.host, config.port);
        server.bind(bind_address)?
    };

    server.run().await
}
