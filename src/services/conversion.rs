//! Privileged AI-conversion action, invoked from a submission flow. It never
//! unwinds into its caller: every outcome is a tagged value the UI can
//! render without exception handling.
//!
//! This path does not reuse [`ApiClient::api_call`]: it drives the validated
//! fetch primitive directly under its own, longer deadline. Once dispatched
//! it runs to completion or to that deadline; a local UI "cancel" cannot
//! retract it.
//!
//! [`ApiClient::api_call`]: crate::services::http::ApiClient::api_call

use std::time::Duration;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{AiConversionResponse, UploadFile};
use crate::services::exercises::build_files_form;
use crate::services::http::validated_fetch;

/// Independent deadline of the action, sized for AI inference latency.
pub const CONVERSION_ACTION_TIMEOUT: Duration = Duration::from_millis(180_000);

/// Tagged result of the conversion action.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Success(AiConversionResponse),
    Failure { error: String },
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success(_))
    }
}

/// Converts uploaded handwriting images into a structured exercise under the
/// fixed 180 s action deadline.
pub async fn convert_handwriting(config: &Config, files: Vec<UploadFile>) -> ConversionOutcome {
    convert_handwriting_with_deadline(config, files, CONVERSION_ACTION_TIMEOUT).await
}

/// Deadline-parameterized entry point backing [`convert_handwriting`].
pub async fn convert_handwriting_with_deadline(
    config: &Config,
    files: Vec<UploadFile>,
    deadline: Duration,
) -> ConversionOutcome {
    match tokio::time::timeout(deadline, submit(config, &files)).await {
        Err(_) => {
            tracing::warn!(
                deadline_ms = deadline.as_millis() as u64,
                "AI conversion action timed out"
            );
            ConversionOutcome::Failure {
                error: "Request timed out".to_string(),
            }
        }
        Ok(Ok(data)) => {
            tracing::info!(
                category = %data.category,
                confidence = data.confidence_score,
                "AI conversion completed"
            );
            ConversionOutcome::Success(data)
        }
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "AI conversion action failed");
            ConversionOutcome::Failure {
                error: err.to_string(),
            }
        }
    }
}

async fn submit(config: &Config, files: &[UploadFile]) -> Result<AiConversionResponse, ApiError> {
    let form = build_files_form(files)?;
    let url = format!(
        "{}/exercises/ai-conversion",
        config.api_base_url.trim_end_matches('/')
    );
    let request = reqwest::Client::new().post(&url).multipart(form);
    validated_fetch(request, None).await
}
