use async_trait::async_trait;
use serde_json::Value;

use crate::cores::image_models::shapers::RemoteCallArgs;
use crate::cores::resources::FetchedResource;

// One request/response call against a hosted space.
#[derive(Debug, Clone)]
pub struct RemoteCall {
    pub space: String,
    pub endpoint: String,
    pub args: RemoteCallArgs,
    pub files: Vec<(String, FetchedResource)>,  // Argument name and the bytes to upload for it.
}

impl RemoteCall {
    pub fn new(space: &str, endpoint: &str, args: RemoteCallArgs) -> Self {
        RemoteCall {
            space: space.to_string(),
            endpoint: endpoint.to_string(),
            args,
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, argument: &str, resource: FetchedResource) -> Self {
        self.files.push((argument.to_string(), resource));
        self
    }
}

/// Issues a remote call and returns the raw output list.
///
/// Every failure mode collapses into one error message; nothing is retried.
#[async_trait]
pub trait RemoteInvoker: Send + Sync {
    async fn invoke(&self, call: RemoteCall) -> Result<Value, String>;
}
