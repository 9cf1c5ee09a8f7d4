use actix_web::HttpRequest;
use chrono::Local;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::fs::metadata;

const CONSOLE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

/// Initializes log4rs from its YAML file, or logs to the console when the file is absent.
pub fn init_logging(config_file: &str) -> Result<(), Box<dyn Error>> {
    if metadata(config_file).is_ok() {
        log4rs::init_file(config_file, Default::default())
            .map_err(|err| format!("Failed to load log config {}: {}", config_file, err))?;
        return Ok(());
    }

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .map_err(|err| format!("Failed to build log config: {}", err))?;
    log4rs::init_config(config)
        .map_err(|err| format!("Failed to install logger: {}", err))?;
    Ok(())
}

// Function for access log and error log
pub fn log_request(req: &HttpRequest, status_code: u16, error_message: Option<&str>) -> String {
    let referer = req.headers()
        .get("Referer")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let user_agent = req.headers()
        .get("User-Agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let client_ip = req.peer_addr().map(|addr| addr.ip().to_string()).unwrap_or_else(|| "unknown".to_string());
    let request_method = req.method().as_str().to_string();
    let request_uri = req.uri().to_string();
    let http_version = format!("{:?}", req.version());
    let time = Local::now().format("%d/%b/%Y:%H:%M:%S %z");

    let access = format!(
        "{client_ip} - - [{time}] \"{request_method} {request_uri} {http_version}\" {status_code} \"{referer}\" \"{user_agent}\"",
    );
    match error_message {
        // Error log format
        Some(msg) => format!("{} \"{}\"", access, msg),
        // Access log format
        None => access,
    }
}
