use std::borrow::Cow;

use axum::http::StatusCode;
use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCategory {
    Unknown,
    InvalidArgument,
    NotFound,
    PayloadTooLarge,
}

impl ErrorCategory {
    pub fn to_status_code(self) -> StatusCode {
        match self {
            ErrorCategory::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCategory::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

/// Error payload. Clients read `error`; `instanceId` ties a response to the
/// server log line describing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub category: ErrorCategory,
    pub error_code: Cow<'static, str>,
    pub instance_id: String,
    #[serde(rename = "error")]
    pub message: Cow<'static, str>,
}

impl ApiError {
    pub fn with_message(
        category: ErrorCategory,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            category,
            error_code: code.into(),
            instance_id: nanoid::nanoid!(),
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<Cow<'static, str>>) -> Self {
        Self::with_message(ErrorCategory::Unknown, "unknown", message)
    }

    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::with_message(ErrorCategory::InvalidArgument, "invalidArgument", message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::with_message(ErrorCategory::NotFound, "notFound", message)
    }

    pub fn payload_too_large(message: impl Into<Cow<'static, str>>) -> Self {
        Self::with_message(ErrorCategory::PayloadTooLarge, "payloadTooLarge", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.category.to_status_code();
        (status_code, Json(self)).into_response()
    }
}

/// A scale factor as sent by clients, either `1.5` or `"1.5"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleValue {
    Number(f64),
    Text(String),
}

impl ScaleValue {
    pub fn is_blank(&self) -> bool {
        matches!(self, ScaleValue::Text(text) if text.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomizeModelRequest {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub scale: Option<ScaleValue>,
    #[serde(default)]
    pub texture_prompt: Option<String>,
    #[serde(default)]
    pub model_filename: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestoreModelRequest {
    #[serde(default)]
    pub model_filename: Option<String>,
}

/// Returned by every call that changes or adds a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    pub message: String,
    pub model_url: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListModelsResponse {
    pub models: Vec<ModelEntry>,
}
