//! HTTP endpoint implementations.

pub mod request_utils;
pub mod response;

pub use response::{error_response, success_response, ApiError, ApiResponse, ErrorResponse};

use hyper::{body::Bytes, Method, Response};
use tracing::{debug, warn};

use crate::router::{AppState, RouterError};
use request_utils::{map_engine_error_to_router_error, parse_form_pairs, wants_json};
use response::{html_response, json_response};
use zenform_core::view::html;
use zenform_core::RequestContext;

/// Request parts a handler needs once the body has been read.
#[derive(Debug)]
pub struct IncomingRequest<'a> {
    pub method: &'a Method,
    pub query: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub body: Bytes,
}

impl IncomingRequest<'_> {
    /// Query parameters followed by urlencoded body parameters.
    ///
    /// Multipart bodies are rejected; uploads never enter through this layer.
    pub fn pairs(&self) -> Result<Vec<(String, String)>, RouterError> {
        let mut pairs = parse_form_pairs(self.query.unwrap_or(""));
        if self.body.is_empty() {
            return Ok(pairs);
        }

        let media_type = self
            .content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());
        match media_type.as_deref() {
            Some("application/x-www-form-urlencoded") | None => {
                let body = std::str::from_utf8(&self.body).map_err(|e| {
                    RouterError::BadRequest(format!("Request body is not valid UTF-8: {}", e))
                })?;
                pairs.extend(parse_form_pairs(body));
                Ok(pairs)
            }
            Some(other) => Err(RouterError::UnsupportedMediaType(format!(
                "Cannot decode request body of type '{}'",
                other
            ))),
        }
    }
}

/// Lists the served tables.
pub fn index(
    request: &IncomingRequest<'_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let pairs = request.pairs()?;
    let names: Vec<&str> = state.engine.table_names().collect();
    if wants_json(&pairs) {
        return json_response(names);
    }

    let links: String = names
        .iter()
        .map(|name| {
            format!(
                "<li><a href='{}'>{}</a></li>",
                html_escape::encode_single_quoted_attribute(name),
                html_escape::encode_text(name)
            )
        })
        .collect();
    html_response("Tables", &format!("<ul class='zx_mnu'>{}</ul>", links))
}

/// Serves one admin request against `table`.
pub fn table(
    table: &str,
    request: &IncomingRequest<'_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let schema_table = state
        .engine
        .table(table)
        .ok_or_else(|| RouterError::NotFound(format!("Table '{}' not found", table)))?;

    let pairs = request.pairs()?;
    let json = wants_json(&pairs);
    let ctx = RequestContext::from_pairs(schema_table, pairs);
    debug!(table, method = %request.method, action = ctx.action.as_str(), "Dispatching request");

    let response = state.engine.handle(table, ctx).map_err(|e| {
        warn!(table, error = %e, "Request failed");
        map_engine_error_to_router_error(e)
    })?;

    if json {
        json_response(&response)
    } else {
        html_response(table, &html::render(&response.view, &response.report))
    }
}
