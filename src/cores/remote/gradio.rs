use async_trait::async_trait;
use log::{info, warn};
use reqwest::{multipart, Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;

use crate::cores::remote::protocol::{
    file_data, is_absolute_url, normalize_endpoint, order_arguments, parse_event_stream,
    space_subdomain, ApiInfo, ParameterInfo, SpaceConfig, SpaceHost, SubmitResponse,
};
use crate::cores::remote::remote_controller::{RemoteCall, RemoteInvoker};
use crate::cores::resources::FetchedResource;

pub const HUGGINGFACE_HUB_URL: &str = "https://huggingface.co";

/// Calls hosted Gradio apps through their HTTP queue API.
pub struct GradioClient {
    client: Client,
    token: String,
    hub_url: String,
}

impl GradioClient {
    pub fn new(token: &str, timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| format!("Failed to build HTTP client: {}", err))?;
        Ok(GradioClient {
            client,
            token: token.to_string(),
            hub_url: HUGGINGFACE_HUB_URL.to_string(),
        })
    }

    pub fn with_hub_url(mut self, hub_url: &str) -> Self {
        self.hub_url = hub_url.trim_end_matches('/').to_string();
        self
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }

    // 1. Find the base URL serving the space
    async fn resolve_host(&self, space: &str) -> String {
        if is_absolute_url(space) {
            return space.trim_end_matches('/').to_string();
        }

        let url = format!("{}/api/spaces/{}/host", self.hub_url, space);
        let resolved = match self.authorized(self.client.get(&url)).send().await {
            Ok(resp) if resp.status().is_success() => resp.json::<SpaceHost>().await.ok(),
            Ok(resp) => {
                warn!("Host lookup for {} returned {}", space, resp.status());
                None
            }
            Err(err) => {
                warn!("Host lookup for {} failed: {}", space, err);
                None
            }
        };

        match resolved {
            Some(space_host) => space_host.host.trim_end_matches('/').to_string(),
            None => space_subdomain(space),
        }
    }

    // 2. Read the app config, which tells whether the API lives under a prefix
    async fn api_prefix(&self, host: &str) -> Result<String, String> {
        let response = self.authorized(self.client.get(format!("{}/config", host)))
            .send()
            .await
            .map_err(|err| format!("Failed to connect to {}: {}", host, err))?;

        if !response.status().is_success() {
            return Err(format!("Space at {} returned non-success status: {}", host, response.status()));
        }

        let config: SpaceConfig = response.json().await.unwrap_or_default();
        Ok(config.api_prefix.trim_end_matches('/').to_string())
    }

    // 3. Fetch the declared parameters of the endpoint
    async fn endpoint_parameters(&self, host: &str, prefix: &str, endpoint: &str) -> Option<Vec<ParameterInfo>> {
        let response = self.authorized(self.client.get(format!("{}{}/info", host, prefix)))
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let mut info: ApiInfo = response.json().await.ok()?;
        info.named_endpoints.remove(endpoint).map(|e| e.parameters)
    }

    // 4. Upload a binary input and return the file reference to pass instead
    async fn upload(&self, host: &str, prefix: &str, resource: &FetchedResource) -> Result<Value, String> {
        let part = multipart::Part::bytes(resource.bytes.to_vec())
            .file_name(resource.file_name.clone())
            .mime_str(&resource.content_type)
            .map_err(|err| format!("Invalid content type {}: {}", resource.content_type, err))?;
        let form = multipart::Form::new().part("files", part);

        let response = self.authorized(self.client.post(format!("{}{}/upload", host, prefix)))
            .multipart(form)
            .send()
            .await
            .map_err(|err| format!("Upload failed: {}", err))?;
        if !response.status().is_success() {
            return Err(format!("Upload returned non-success status: {}", response.status()));
        }

        let paths: Vec<String> = response.json()
            .await
            .map_err(|err| format!("Failed to parse upload response: {}", err))?;
        let path = paths.first().ok_or_else(|| "Upload returned no file path".to_string())?;
        Ok(file_data(host, prefix, path, resource))
    }

    // 5. Queue the call, then read its event stream until it completes
    async fn submit(&self, host: &str, prefix: &str, endpoint: &str, data: Vec<Value>) -> Result<String, String> {
        let response = self.authorized(self.client.post(format!("{}{}/call{}", host, prefix, endpoint)))
            .header("Content-Type", "application/json")
            .json(&json!({ "data": data }))
            .send()
            .await
            .map_err(|err| format!("Request failed: {}", err))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(format!("API returned non-success status: {} {}", status, detail).trim_end().to_string());
        }

        let submitted: SubmitResponse = response.json()
            .await
            .map_err(|err| format!("Failed to parse response: {}", err))?;
        Ok(submitted.event_id)
    }

    async fn await_result(&self, host: &str, prefix: &str, endpoint: &str, event_id: &str) -> Result<Value, String> {
        let response = self.authorized(self.client.get(format!("{}{}/call{}/{}", host, prefix, endpoint, event_id)))
            .send()
            .await
            .map_err(|err| format!("Request failed: {}", err))?;

        if !response.status().is_success() {
            return Err(format!("API returned non-success status: {}", response.status()));
        }

        let body = response.text()
            .await
            .map_err(|err| format!("Failed to read response: {}", err))?;
        parse_event_stream(&body)
    }
}

#[async_trait]
impl RemoteInvoker for GradioClient {
    async fn invoke(&self, call: RemoteCall) -> Result<Value, String> {
        let endpoint = normalize_endpoint(&call.endpoint);

        info!("Connecting to {}...", call.space);
        let host = self.resolve_host(&call.space).await;
        let prefix = self.api_prefix(&host).await?;

        let mut args = call.args;
        for (argument, resource) in &call.files {
            let reference = self.upload(&host, &prefix, resource).await?;
            args.insert(argument.clone(), reference);
        }

        let parameters = self.endpoint_parameters(&host, &prefix, &endpoint).await;
        if parameters.is_none() {
            warn!("No parameter info for {}{}, sending arguments in request order", call.space, endpoint);
        }
        let data = order_arguments(parameters.as_deref(), &args);

        let event_id = self.submit(&host, &prefix, &endpoint, data).await?;
        self.await_result(&host, &prefix, &endpoint, &event_id).await
    }
}
