use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::TypedHeader;
use bytes::Bytes;
use headers::ContentLength;
use tokio::task;
use tracing::{error, info};

use model_api::{
    ApiError, CustomizeModelRequest, ListModelsResponse, ModelResponse, RestoreModelRequest,
    ScaleValue,
};
use model_edit::{Color, Customization, Customizer, EditError, ErrorKind, ScaleFactor};

use crate::models::{is_allowed, model_url, secure_filename, ModelStore};

pub struct ApiState {
    customizer: Customizer,
    store: ModelStore,
    max_upload_bytes: usize,
}

impl ApiState {
    pub fn new(customizer: Customizer, store: ModelStore, max_upload_bytes: usize) -> Arc<Self> {
        Arc::new(Self {
            customizer,
            store,
            max_upload_bytes,
        })
    }
}

fn edit_error(err: EditError) -> ApiError {
    let api_error = match err.kind() {
        ErrorKind::NotFound => ApiError::not_found("Model not found"),
        _ if err.is_invalid_input() => ApiError::invalid_argument(err.to_string()),
        _ => ApiError::unknown(err.to_string()),
    };
    error!(instance_id = %api_error.instance_id, "request failed: {}", err);
    api_error
}

fn join_error(err: task::JoinError) -> ApiError {
    let api_error = ApiError::unknown("internal error");
    error!(instance_id = %api_error.instance_id, "worker task failed: {}", err);
    api_error
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("File too large")
    } else {
        ApiError::invalid_argument(err.body_text())
    }
}

/// Resolves the model a request names, making sure it exists.
fn existing_model(state: &ApiState, requested: Option<&str>) -> Result<(String, PathBuf), ApiError> {
    let name = state.store.file_name(requested).to_owned();
    let Some(path) = state.store.path_for(&name) else {
        return Err(ApiError::invalid_argument("invalid model filename"));
    };
    if !path.is_file() {
        return Err(ApiError::not_found("Model not found"));
    }
    Ok((name, path))
}

fn parse_customization(request: CustomizeModelRequest) -> Result<Customization, EditError> {
    let color = request
        .color
        .filter(|color| !color.is_empty())
        .map(|color| color.parse::<Color>())
        .transpose()?;
    let scale = match request.scale {
        Some(scale) if scale.is_blank() => None,
        Some(ScaleValue::Number(factor)) => Some(ScaleFactor::new(factor)?),
        Some(ScaleValue::Text(text)) => Some(ScaleFactor::parse(&text)?),
        None => None,
    };
    let texture_prompt = request.texture_prompt.filter(|prompt| !prompt.trim().is_empty());
    Ok(Customization::new(color, scale, texture_prompt))
}

async fn list_models(State(state): State<Arc<ApiState>>) -> Result<Json<ListModelsResponse>, ApiError> {
    let models = task::spawn_blocking(move || state.store.list())
        .await
        .map_err(join_error)?
        .map_err(|err| {
            let api_error = ApiError::unknown("failed to list models");
            error!(instance_id = %api_error.instance_id, "failed to list models: {}", err);
            api_error
        })?;
    Ok(Json(ListModelsResponse { models }))
}

async fn upload_model(
    State(state): State<Arc<ApiState>>,
    content_length: Option<TypedHeader<ContentLength>>,
    mut multipart: Multipart,
) -> Result<Json<ModelResponse>, ApiError> {
    if let Some(TypedHeader(ContentLength(length))) = content_length {
        if length > state.max_upload_bytes as u64 {
            return Err(ApiError::payload_too_large("File too large"));
        }
    }

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let data = field
            .bytes()
            .await
            .map_err(multipart_error)?;
        upload = Some((file_name, data));
        break;
    }

    let Some((file_name, data)) = upload else {
        return Err(ApiError::invalid_argument("No file provided"));
    };
    if file_name.is_empty() {
        return Err(ApiError::invalid_argument("No file selected"));
    }
    let file_name = secure_filename(&file_name);
    if !is_allowed(&file_name) {
        return Err(ApiError::invalid_argument("Invalid file type"));
    }
    let Some(path) = state.store.path_for(&file_name) else {
        return Err(ApiError::invalid_argument("Invalid file type"));
    };

    let worker = state.clone();
    task::spawn_blocking(move || worker.customizer.install(&path, &data))
        .await
        .map_err(join_error)?
        .map_err(edit_error)?;
    info!(model = %file_name, "uploaded model");

    Ok(Json(ModelResponse {
        message: "File uploaded successfully".to_owned(),
        model_url: model_url(&file_name),
    }))
}

async fn customize_model(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CustomizeModelRequest>,
) -> Result<Json<ModelResponse>, ApiError> {
    let (name, path) = existing_model(&state, request.model_filename.as_deref())?;
    let customization = parse_customization(request).map_err(edit_error)?;

    let worker = state.clone();
    let report = task::spawn_blocking(move || worker.customizer.customize(&path, &customization))
        .await
        .map_err(join_error)?
        .map_err(edit_error)?;
    info!(model = %name, edits = report.applied.len(), "customized model");

    Ok(Json(ModelResponse {
        message: "3D model customized!".to_owned(),
        model_url: model_url(&name),
    }))
}

async fn restore_model(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<RestoreModelRequest>,
) -> Result<Json<ModelResponse>, ApiError> {
    let (name, path) = existing_model(&state, request.model_filename.as_deref())?;

    let worker = state.clone();
    let restored = task::spawn_blocking(move || worker.customizer.revert(&path))
        .await
        .map_err(join_error)?
        .map_err(edit_error)?;

    let message = if restored {
        "3D model restored to its original upload"
    } else {
        "3D model has no edits to undo"
    };
    Ok(Json(ModelResponse {
        message: message.to_owned(),
        model_url: model_url(&name),
    }))
}

pub fn new_api(max_upload_bytes: usize) -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/list-models", get(list_models))
        .route("/api/upload-model", post(upload_model))
        .route("/api/customize-model", post(customize_model))
        .route("/api/restore-model", post(restore_model))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
