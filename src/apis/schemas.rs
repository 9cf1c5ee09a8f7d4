use serde::Serialize;
use utoipa::ToSchema;

// ------------------------------------------ General Error API ------------------------------------------
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_models: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
            message: message.into(),
            available_models: None,
        }
    }

    pub fn with_available_models(mut self, models: Vec<String>) -> Self {
        self.available_models = Some(models);
        self
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}
