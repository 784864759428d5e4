//! Request utilities for HTTP endpoints.

use std::error::Error;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use percent_encoding::percent_decode_str;
use tokio::time;

use crate::router::RouterError;
use zenform_core::error::{EngineError, StorageError};

/// Query parameter selecting JSON output.
pub const FORMAT_PARAM: &str = "format";

/// Helper function to read request body with timeout
///
/// Reading stops as soon as the body grows past `max_bytes`.
pub async fn read_request_body_with_timeout<B>(
    body: B,
    timeout_ms: u64,
    max_bytes: usize,
) -> Result<Bytes, RouterError>
where
    B: Body,
    B::Error: Into<Box<dyn Error + Send + Sync>>,
{
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let collected = time::timeout(timeout_duration, Limited::new(body, max_bytes).collect())
        .await
        .map_err(|_| RouterError::Timeout)?;
    match collected {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(RouterError::BadRequest(
            format!("Request body exceeds the {} byte limit", max_bytes),
        )),
        Err(e) => Err(RouterError::InternalError(format!(
            "Failed to read request body: {}",
            e
        ))),
    }
}

/// Decodes one `application/x-www-form-urlencoded` component.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Parses a query string or urlencoded form body into ordered pairs.
///
/// Pairs without `=` get an empty value; empty segments are skipped.
pub fn parse_form_pairs(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

/// Whether the pairs ask for JSON output.
pub fn wants_json(pairs: &[(String, String)]) -> bool {
    pairs
        .iter()
        .any(|(key, value)| key == FORMAT_PARAM && value.eq_ignore_ascii_case("json"))
}

/// Map EngineError to appropriate RouterError
pub fn map_engine_error_to_router_error(e: EngineError) -> RouterError {
    match e {
        EngineError::TableNotFound(_)
        | EngineError::Storage(StorageError::TableNotFound { .. })
        | EngineError::Storage(StorageError::RecordNotFound { .. }) => {
            RouterError::NotFound(e.to_string())
        }
        EngineError::Storage(StorageError::NoKeySupplied { .. })
        | EngineError::Storage(StorageError::NoOptionSet { .. }) => {
            RouterError::BadRequest(e.to_string())
        }
        _ => RouterError::InternalError(format!("Engine error: {}", e)),
    }
}
