//! Low-level HTTP plumbing: the timeout/cancellation-aware API call and the
//! schema-validated fetch primitive every typed operation is built on.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use validator::Validate;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::ApiErrorBody;

/// Default deadline for a single API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Request body accepted by [`ApiClient::api_call`]. Multipart bodies carry
/// no explicit content type so the transport can set its own boundary.
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(reqwest::multipart::Form),
}

/// Options for a single API call. Caller headers are merged over a default
/// JSON content type.
pub struct ApiRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Vec<(&'static str, String)>,
    pub body: RequestBody,
    pub timeout: Duration,
}

impl Default for ApiRequest {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Thin client over one backend base URL. Holds no per-request state: every
/// call owns its own deadline and can run concurrently with any other.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config.api_base_url.clone())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Issues one request against `endpoint` under an abortable deadline and
    /// normalizes every failure into [`ApiError`].
    ///
    /// A 2xx response with no body (204, or zero content length) resolves to
    /// `Ok(None)`; any other 2xx resolves to the parsed JSON value, schema
    /// validation being left to the caller.
    pub async fn api_call(
        &self,
        endpoint: &str,
        request: ApiRequest,
    ) -> Result<Option<Value>, ApiError> {
        let ApiRequest {
            method,
            headers,
            query,
            body,
            timeout,
        } = request;

        let url = self.endpoint_url(endpoint);
        let mut builder = self.http.request(method, &url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match body {
            RequestBody::Empty => {
                builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            }
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };
        builder = builder.headers(headers);

        tracing::debug!(%url, timeout_ms = timeout.as_millis() as u64, "issuing API call");

        // Dropping the pending send on deadline is the abort: the connection
        // is torn down and the timer is released on every exit path, so a
        // late transport resolution can never reach a completion handler
        // twice.
        let response = match tokio::time::timeout(timeout, builder.send()).await {
            Err(_) => {
                tracing::warn!(%url, "API call exceeded its deadline");
                return Err(ApiError::Timeout { timeout });
            }
            Ok(Err(source)) => {
                tracing::warn!(%url, error = %source, "transport failure");
                return Err(ApiError::Network { source });
            }
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if !status.is_success() {
            let error = http_error(status, response).await;
            tracing::warn!(%url, status = status.as_u16(), "API call failed");
            return Err(error);
        }

        if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Ok(None);
        }

        let value = response
            .json::<Value>()
            .await
            .map_err(|source| ApiError::Network { source })?;
        Ok(Some(value))
    }
}

/// Issues a prepared request, surfaces non-2xx as an HTTP error, then parses,
/// optionally unwraps an envelope via `extract`, and decodes the body into a
/// fully bound-checked `T`.
///
/// Used directly (without [`ApiClient::api_call`]) by callers that manage
/// their own deadline, such as the privileged conversion action.
pub async fn validated_fetch<T>(
    request: reqwest::RequestBuilder,
    extract: Option<fn(Value) -> Value>,
) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let response = request
        .send()
        .await
        .map_err(|source| ApiError::Network { source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(http_error(status, response).await);
    }

    let raw = response
        .json::<Value>()
        .await
        .map_err(|source| ApiError::Network { source })?;
    let value = match extract {
        Some(extract) => extract(raw),
        None => raw,
    };
    parse_validated(value)
}

/// Decodes an untyped JSON value into `T`. A shape mismatch (missing field,
/// wrong type, unknown enum variant) is a response-validation failure, never
/// a transport one.
pub fn parse<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::ResponseValidation {
        reason: e.to_string(),
    })
}

/// [`parse`] followed by bound checks (lengths, ranges, struct invariants).
pub fn parse_validated<T: DeserializeOwned + Validate>(value: Value) -> Result<T, ApiError> {
    let typed: T = parse(value)?;
    typed
        .validate()
        .map_err(|e| ApiError::ResponseValidation {
            reason: e.to_string(),
        })?;
    Ok(typed)
}

pub(crate) async fn http_error(status: StatusCode, response: reqwest::Response) -> ApiError {
    let fallback = format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );
    // Prefer the backend error envelope; synthesize from the status text
    // when the body is not parseable.
    let body = response.json::<ApiErrorBody>().await.ok();
    let detail = body
        .as_ref()
        .map(|b| b.detail.clone())
        .unwrap_or(fallback);
    ApiError::Http {
        status: status.as_u16(),
        detail,
        body,
    }
}
