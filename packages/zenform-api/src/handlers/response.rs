//! Response types and helpers for HTTP endpoints.

use hyper::{body::Bytes, Response};
use serde::Serialize;

use crate::router::RouterError;

/// Consistent API response wrapper for success responses
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always true for success responses
    pub success: bool,
    /// Response data
    pub data: T,
}

/// Consistent API error response wrapper
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error code (HTTP status code as string)
    pub code: String,
    /// Error message
    pub message: String,
    /// Optional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Consistent error response wrapper
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false for error responses
    pub success: bool,
    /// Error information
    pub error: ApiError,
}

/// Helper to create success response
pub fn success_response<T: Serialize>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

/// Helper to create error response
pub fn error_response(code: u16, message: String, details: Option<String>) -> ErrorResponse {
    ErrorResponse {
        success: false,
        error: ApiError {
            code: code.to_string(),
            message,
            details,
        },
    }
}

/// Builds a 200 JSON response wrapping `data`.
pub fn json_response<T: Serialize>(data: T) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(&success_response(data))
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(200, "application/json", json)
}

/// Builds a 200 HTML page around a rendered fragment.
pub fn html_response(title: &str, fragment: &str) -> Result<Response<Bytes>, RouterError> {
    let page = format!(
        "<!DOCTYPE html>\n<html><head><meta charset='utf-8' /><title>{title}</title></head>\
         <body><h1>{title}</h1>{fragment}</body></html>",
        title = html_escape::encode_text(title),
    );
    build_response(200, "text/html; charset=utf-8", page.into_bytes())
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(
    status: u16,
    content_type: &str,
    body: Vec<u8>,
) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .body(Bytes::from(body))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}
