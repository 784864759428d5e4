//! Matchit routing configuration.

use std::sync::Arc;

use hyper::{body::Bytes, Method, Request, Response, Uri};
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;

use crate::handlers;
use crate::handlers::request_utils::read_request_body_with_timeout;
use zenform_core::config::ServerConfig;
use zenform_core::Engine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Request engine over the configured tables
    pub engine: Arc<Engine>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with the index and table routes.
    pub fn new(engine: Arc<Engine>, config: Arc<ServerConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/", RouteHandler::Index)
            .expect("Failed to insert / route");
        router
            .insert("/{table}", RouteHandler::Table)
            .expect("Failed to insert /{table} route");

        Self {
            inner: router,
            state: AppState { engine, config },
        }
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Arguments
    /// * `req` - HTTP request
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an error.
    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Bytes>, RouterError> {
        let (parts, body) = req.into_parts();
        let body = read_request_body_with_timeout(
            body,
            self.state.config.request_timeout_ms,
            self.state.config.max_body_bytes,
        )
        .await?;
        let content_type = parts
            .headers
            .get(hyper::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        self.dispatch(&parts.method, &parts.uri, content_type, body)
    }

    /// Dispatches a request whose body has already been read.
    pub fn dispatch(
        &self,
        method: &Method,
        uri: &Uri,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<Response<Bytes>, RouterError> {
        let path = uri.path();
        match self.inner.at(path) {
            Ok(matched) => {
                let request = handlers::IncomingRequest {
                    method,
                    query: uri.query(),
                    content_type,
                    body,
                };
                match matched.value {
                    RouteHandler::Index => {
                        if *method == Method::GET {
                            handlers::index(&request, &self.state)
                        } else {
                            Err(RouterError::MethodNotAllowed)
                        }
                    }
                    RouteHandler::Table => {
                        let table = matched
                            .params
                            .get("table")
                            .map(|t| percent_decode_str(t).decode_utf8_lossy().into_owned())
                            .unwrap_or_default();
                        if *method == Method::GET || *method == Method::POST {
                            handlers::table(&table, &request, &self.state)
                        } else {
                            Err(RouterError::MethodNotAllowed)
                        }
                    }
                }
            }
            Err(_) => Err(RouterError::NotFound(format!(
                "No route found for {}",
                path
            ))),
        }
    }
}

/// Route handler function.
enum RouteHandler {
    Index,
    Table,
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
    UnsupportedMediaType(String),
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::UnsupportedMediaType(msg) => write!(f, "Unsupported Media Type: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl RouterError {
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
            RouterError::UnsupportedMediaType(_) => 415,
        }
    }
}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let message = match &err {
            RouterError::MethodNotAllowed => "Method Not Allowed".to_string(),
            RouterError::Timeout => "Request Timeout".to_string(),
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg)
            | RouterError::UnsupportedMediaType(msg) => msg.clone(),
        };

        let error_response = handlers::error_response(status, message, None);
        let body = serde_json::to_vec(&error_response)
            .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":{{\"code\":\"500\",\"message\":\"Failed to serialize error: {}\",\"details\":null}}}}", e).into_bytes());

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(500)
                    .body(Bytes::from("Internal Server Error"))
                    .expect("Failed to build fallback error response")
            })
    }
}
