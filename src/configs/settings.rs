use serde::Deserialize;
use std::env;
use std::error::Error;
use std::fs::{self, metadata};

use crate::cores::remote::gradio::HUGGINGFACE_HUB_URL;

// ---------------------------------------------- Config ----------------------------------------------
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub huggingface_api_key: String,
    pub huggingface_hub_url: String,
    pub cors_origin: String,
    pub remote_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub image_models_file: Option<String>,
    pub tasks_file: Option<String>,
    pub log_config_file: String,
    pub https_enabled: bool,
    pub server_cert_file: String,
    pub key_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 8000,
            huggingface_api_key: "".to_string(),
            huggingface_hub_url: HUGGINGFACE_HUB_URL.to_string(),
            cors_origin: "*".to_string(),
            remote_timeout_secs: 300,
            fetch_timeout_secs: 60,
            image_models_file: None,
            tasks_file: None,
            log_config_file: "src/configs/log4rs.yaml".to_string(),
            https_enabled: false,
            server_cert_file: "/etc/spacegate/https/server.crt".to_string(),
            key_file: "/etc/spacegate/https/server.key".to_string(),
        }
    }
}

impl Config {
    /// Loads the YAML configuration, then applies `.env` and process environment overrides.
    pub fn load_config() -> Result<Config, Box<dyn Error>> {
        dotenv::dotenv().ok();

        let mut config = match config_path() {
            Some(path) => Config::from_file(&path)?,
            None => Config::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Config, Box<dyn Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read config file {}: {}", path, err))?;
        Config::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Config, Box<dyn Error>> {
        // An empty document deserializes to unit, not to a mapping.
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("HUGGINGFACE_API_KEY") {
            self.huggingface_api_key = key;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|err| format!("Invalid PORT value '{}': {}", port, err))?;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.cors_origin = origin;
        }
        Ok(())
    }
}

fn config_path() -> Option<String> {
    if let Ok(path) = env::var("SPACEGATE_CONFIG") {
        return Some(path);
    }
    ["/etc/spacegate/configs.yaml", "src/configs/configs.yaml"]
        .iter()
        .find(|path| metadata(path).is_ok())
        .map(|path| path.to_string())
}
