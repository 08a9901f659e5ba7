//! HTTP routing layer.
//!
//! Thin glue over the redaction engine: one JSON endpoint for raw text, one
//! multipart endpoint for document uploads, and a liveness probe.  All
//! responses use the `{success, data}` / `{error, message}` envelope.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartError, rejection::JsonRejection, DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use pii_redactor::{EngineError, RedactionEngine, RedactionResult};
use text_extract::{ExtractError, TextExtractor};

use crate::upload::{TempUpload, UploadError, MAX_UPLOAD_BYTES};

// ---------------------------------------------------------------------------
// State & router
// ---------------------------------------------------------------------------

/// Shared application state.  The engine and extractor are immutable after
/// startup, so concurrent requests need no coordination.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RedactionEngine>,
    pub extractor: Arc<dyn TextExtractor>,
    pub upload_dir: PathBuf,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/pii/redact", post(redact_text))
        .route(
            "/api/pii/redact-file",
            post(redact_file).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 16 * 1024)),
        )
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response envelope & error mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ApiSuccess<T: Serialize> {
    success: bool,
    data: T,
}

impl<T: Serialize> ApiSuccess<T> {
    fn new(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// An error response: HTTP status plus the `{error, message}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Bad Request",
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "Internal Server Error",
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "error": self.error, "message": self.message })),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidInput => Self::bad_request("Invalid text input provided"),
            EngineError::RegexCompile(_) => Self::internal(e.to_string()),
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::UnsupportedFormat(_) => Self {
                status: StatusCode::BAD_REQUEST,
                error: "Invalid file type",
                message: e.to_string(),
            },
            ExtractError::Io(_) | ExtractError::Tool { .. } => {
                error!(error = %e, "text extraction failed");
                Self::internal(e.to_string())
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::TooLarge { .. } => Self {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                error: "File too large",
                message: e.to_string(),
            },
            UploadError::DisallowedType(_) => Self {
                status: StatusCode::BAD_REQUEST,
                error: "Invalid file type",
                message: e.to_string(),
            },
            UploadError::Io(_) => Self::internal(e.to_string()),
        }
    }
}

/// Multipart read failures are the caller's fault, except when the body blew
/// past the size limit, which keeps the same status as an over-cap stored
/// upload.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            error: "File too large",
            message: format!("upload exceeds the maximum of {MAX_UPLOAD_BYTES} bytes"),
        };
    }
    ApiError::bad_request(format!("malformed multipart body: {e}"))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK", "message": "PII redaction API is running" }))
}

#[derive(Debug, Deserialize)]
struct RedactRequest {
    #[serde(default)]
    text: Option<String>,
}

async fn redact_text(
    State(state): State<AppState>,
    payload: Result<Json<RedactRequest>, JsonRejection>,
) -> Result<Json<ApiSuccess<RedactionResult>>, ApiError> {
    // A malformed body (or a non-string `text`) is the caller's fault, not a
    // server error.
    let Json(req) =
        payload.map_err(|e| ApiError::bad_request(format!("invalid request body: {e}")))?;
    let text = req
        .text
        .ok_or_else(|| ApiError::bad_request("Text field is required and must be a string"))?;

    let result = state.engine.redact(&text)?;
    info!(
        matches = result.total_matches,
        confidence = result.aggregate_confidence,
        "text redacted"
    );
    Ok(ApiSuccess::new(result))
}

async fn redact_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiSuccess<RedactionResult>>, ApiError> {
    // Take the first field that carries a filename.
    let mut stored: Option<TempUpload> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        stored = Some(
            TempUpload::store(
                &state.upload_dir,
                &filename,
                content_type.as_deref(),
                &bytes,
            )
            .await?,
        );
        break;
    }

    let upload = stored.ok_or_else(|| ApiError::bad_request("A file upload is required"))?;

    // The upload is removed when `upload` drops, error paths included.
    let text = state.extractor.extract_text(upload.path()).await?;
    let result = state.engine.redact(&text)?;
    info!(
        matches = result.total_matches,
        confidence = result.aggregate_confidence,
        "document redacted"
    );
    Ok(ApiSuccess::new(result))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::path::Path;
    use tower::ServiceExt;

    struct StubExtractor(&'static str);

    #[async_trait]
    impl TextExtractor for StubExtractor {
        async fn extract_text(&self, _path: &Path) -> Result<String, ExtractError> {
            Ok(self.0.to_string())
        }
    }

    fn app(extracted: &'static str) -> Router {
        router(AppState {
            engine: Arc::new(RedactionEngine::new().unwrap()),
            extractor: Arc::new(StubExtractor(extracted)),
            upload_dir: std::env::temp_dir().join("invoice-scrub-route-tests"),
        })
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app("")
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "OK");
    }

    #[tokio::test]
    async fn missing_text_field_is_bad_request() {
        let response = app("")
            .oneshot(json_post("/api/pii/redact", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Bad Request");
    }

    #[tokio::test]
    async fn non_string_text_is_bad_request() {
        let response = app("")
            .oneshot(json_post("/api/pii/redact", json!({ "text": 123 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_text_is_bad_request() {
        let response = app("")
            .oneshot(json_post("/api/pii/redact", json!({ "text": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn redacts_text_end_to_end() {
        let response = app("")
            .oneshot(json_post(
                "/api/pii/redact",
                json!({ "text": "Email: john.doe@example.com" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        let data = &json["data"];
        assert!(data["redactedText"]
            .as_str()
            .unwrap()
            .contains("[EMAIL_ADDRESS]"));
        assert_eq!(data["totalMatches"], 1);
        assert_eq!(data["redactedFields"][0]["type"], "email");
    }

    fn multipart_post(filename: &str, content_type: &str) -> Request<Body> {
        let boundary = "route-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             fake-document-bytes\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/pii/redact-file")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn redacts_uploaded_document() {
        let response = app("Account Number: 1234567890")
            .oneshot(multipart_post("bill.pdf", "application/pdf"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["data"]["redactedText"]
            .as_str()
            .unwrap()
            .contains("[ACCOUNT_NUMBER]"));
    }

    #[tokio::test]
    async fn oversize_upload_is_payload_too_large() {
        let boundary = "route-test-boundary";
        let mut body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"big.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend(std::iter::repeat(b'0').take(MAX_UPLOAD_BYTES + 1024 * 1024));
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/pii/redact-file")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app("").oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["error"], "File too large");
    }

    #[tokio::test]
    async fn rejects_disallowed_upload_type() {
        let response = app("")
            .oneshot(multipart_post("payload.exe", "application/octet-stream"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid file type");
    }

    #[tokio::test]
    async fn missing_file_field_is_bad_request() {
        let boundary = "route-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             no file here\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/pii/redact-file")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app("").oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
