//! Typed operations of the exercise API. Each call validates its own input
//! before touching the network and its response before returning.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use validator::Validate;

use crate::config::Config;
use crate::error::{input_validation_error, ApiError};
use crate::models::{
    AiConversionResponse, Category, Exercise, ExerciseCreate, ExerciseList, ExerciseQuery,
    ExerciseStats, ExerciseUpdate, UploadFile,
};
use crate::services::http::{parse, parse_validated, ApiClient, ApiRequest, RequestBody};

/// AI inference is slow; conversion calls get an extended deadline.
pub const AI_CONVERSION_TIMEOUT: Duration = Duration::from_millis(120_000);

/// Media types accepted for handwriting uploads.
pub const VALID_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub struct ExerciseService {
    client: ApiClient,
}

impl ExerciseService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: ApiClient::new(config),
        }
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Lists exercises with optional title/category/page/size filters.
    /// Absent filters are omitted from the query string entirely.
    pub async fn list(&self, query: &ExerciseQuery) -> Result<ExerciseList, ApiError> {
        let mut params: Vec<(&'static str, String)> = Vec::new();
        if let Some(title) = &query.title {
            // An empty title filter is treated as absent, never sent as
            // an empty-string param.
            if !title.is_empty() {
                params.push(("title", title.clone()));
            }
        }
        if let Some(category) = query.category {
            params.push(("category", category.as_str().to_string()));
        }
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(size) = query.size {
            params.push(("size", size.to_string()));
        }

        let body = self
            .call_expecting_body(
                "/exercises",
                ApiRequest {
                    query: params,
                    ..Default::default()
                },
            )
            .await?;
        parse_validated(body)
    }

    /// Fetches a single exercise. An unknown id surfaces the backend error
    /// envelope with whatever status the backend chose.
    pub async fn get(&self, id: &str) -> Result<Exercise, ApiError> {
        let body = self
            .call_expecting_body(&format!("/exercises/{}", id), ApiRequest::default())
            .await?;
        parse_validated(body)
    }

    /// Creates an exercise. A local validation failure short-circuits
    /// without making any network call.
    pub async fn create(&self, input: &ExerciseCreate) -> Result<Exercise, ApiError> {
        input.validate()?;

        let body = self
            .call_expecting_body(
                "/exercises",
                ApiRequest {
                    method: Method::POST,
                    body: json_body(input)?,
                    ..Default::default()
                },
            )
            .await?;
        parse_validated(body)
    }

    /// Applies a partial update. Mirrors the backend's partial-update
    /// semantics: no local pre-validation of the patch.
    pub async fn update(&self, id: &str, patch: &ExerciseUpdate) -> Result<Exercise, ApiError> {
        let body = self
            .call_expecting_body(
                &format!("/exercises/{}", id),
                ApiRequest {
                    method: Method::PUT,
                    body: json_body(patch)?,
                    ..Default::default()
                },
            )
            .await?;
        parse_validated(body)
    }

    /// Deletes an exercise. Success is the absence of an error.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .api_call(
                &format!("/exercises/{}", id),
                ApiRequest {
                    method: Method::DELETE,
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    /// Fetches the closed category list. Every element is checked against
    /// the enumeration; one unknown value fails the whole call.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let body = self
            .call_expecting_body("/exercises/categories", ApiRequest::default())
            .await?;
        parse(body)
    }

    pub async fn stats(&self) -> Result<ExerciseStats, ApiError> {
        let body = self
            .call_expecting_body("/exercises/stats", ApiRequest::default())
            .await?;
        parse(body)
    }

    /// Submits handwriting images for AI conversion. Rejects up front, with
    /// zero network calls, on an empty file list or a non-image media type.
    pub async fn convert_images(
        &self,
        files: &[UploadFile],
    ) -> Result<AiConversionResponse, ApiError> {
        let form = build_files_form(files)?;

        let body = self
            .call_expecting_body(
                "/exercises/ai-conversion",
                ApiRequest {
                    method: Method::POST,
                    body: RequestBody::Multipart(form),
                    timeout: AI_CONVERSION_TIMEOUT,
                    ..Default::default()
                },
            )
            .await?;
        parse_validated(body)
    }

    async fn call_expecting_body(
        &self,
        endpoint: &str,
        request: ApiRequest,
    ) -> Result<Value, ApiError> {
        self.client
            .api_call(endpoint, request)
            .await?
            .ok_or_else(|| ApiError::ResponseValidation {
                reason: format!("empty response body from {}", endpoint),
            })
    }
}

fn json_body<T: Serialize>(value: &T) -> Result<RequestBody, ApiError> {
    let value = serde_json::to_value(value)
        .map_err(|e| input_validation_error("body", "encode", e.to_string()))?;
    Ok(RequestBody::Json(value))
}

/// Builds the multipart form for conversion uploads, all files under the
/// `files` field, after the local media-type guards.
pub(crate) fn build_files_form(files: &[UploadFile]) -> Result<Form, ApiError> {
    if files.is_empty() {
        return Err(input_validation_error(
            "files",
            "missing",
            "No files provided for AI conversion".to_string(),
        ));
    }

    for file in files {
        if !VALID_IMAGE_TYPES.contains(&file.content_type.as_str()) {
            return Err(input_validation_error(
                "files",
                "invalid_type",
                format!(
                    "Invalid file type: {}. Please upload an image file.",
                    file.content_type
                ),
            ));
        }
    }

    let mut form = Form::new();
    for file in files {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| input_validation_error("files", "invalid_type", e.to_string()))?;
        form = form.part("files", part);
    }
    Ok(form)
}
