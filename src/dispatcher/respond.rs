use serde_json::Value;
use std::sync::Arc;

use crate::request::HeaderVec;
use crate::response::Response;

/// Shapes an action's raw payload into the body the API promises.
///
/// Implemented for plain closures as well, so a host can inject
/// `|payload| Ok(payload)` to disable enveloping.
pub trait ResponseBuilder: Send + Sync {
    fn build(&self, payload: Value) -> anyhow::Result<Value>;
}

impl<F> ResponseBuilder for F
where
    F: Fn(Value) -> anyhow::Result<Value> + Send + Sync,
{
    fn build(&self, payload: Value) -> anyhow::Result<Value> {
        self(payload)
    }
}

/// Writes a built payload into the outgoing response.
pub trait ResponseFormatter: Send + Sync {
    fn format(&self, base: Response, payload: Value) -> Response;
}

impl<F> ResponseFormatter for F
where
    F: Fn(Response, Value) -> Response + Send + Sync,
{
    fn format(&self, base: Response, payload: Value) -> Response {
        self(base, payload)
    }
}

/// Default builder: wraps the payload in a `{"data": ...}` envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeBuilder;

impl ResponseBuilder for EnvelopeBuilder {
    fn build(&self, payload: Value) -> anyhow::Result<Value> {
        Ok(serde_json::json!({ "data": payload }))
    }
}

/// Default formatter: JSON body with the content-type header set; the base
/// response's status and headers are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl ResponseFormatter for JsonFormatter {
    fn format(&self, base: Response, payload: Value) -> Response {
        let mut response = base;
        response.set_header("content-type", "application/json".to_string());
        response.body = payload;
        response
    }
}

/// The neutral response a formatter starts from: 200, no headers, null body.
#[must_use]
pub(super) fn base_response() -> Response {
    Response::new(200, HeaderVec::new(), Value::Null)
}

// Keep the Arc alias local; the dispatcher stores both services this way.
pub(super) type SharedBuilder = Arc<dyn ResponseBuilder>;
pub(super) type SharedFormatter = Arc<dyn ResponseFormatter>;
