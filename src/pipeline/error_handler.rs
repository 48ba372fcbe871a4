use tracing::warn;

use super::context::EntityContext;
use crate::request::Request;
use crate::response::Response;

/// Pluggable responses for the pipeline's two expected short-circuits.
///
/// Callers customize the HTTP shape of "no key resolved" and "record not
/// found" without touching pipeline logic; both return ordinary responses.
pub trait EntityErrorHandler: Send + Sync {
    /// No primary key could be resolved for the operation.
    fn primary_key_not_found(&self, ctx: &EntityContext, req: &Request) -> Response;

    /// The key resolved but no record exists under it.
    fn entity_not_found(&self, ctx: &EntityContext, req: &Request) -> Response;
}

/// Default handler: 400 for a missing key (the request is malformed), 404 for
/// a missing record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEntityErrorHandler;

impl EntityErrorHandler for DefaultEntityErrorHandler {
    fn primary_key_not_found(&self, ctx: &EntityContext, req: &Request) -> Response {
        warn!(
            request_id = %req.request_id,
            entity = ctx.entity(),
            path = %req.path,
            "No primary key resolved"
        );
        Response::error(
            400,
            &format!("no primary key resolved for `{}`", ctx.entity()),
        )
    }

    fn entity_not_found(&self, ctx: &EntityContext, req: &Request) -> Response {
        warn!(
            request_id = %req.request_id,
            entity = ctx.entity(),
            pk = ?ctx.primary_key(),
            "Entity not found"
        );
        Response::error(404, &format!("`{}` not found", ctx.entity()))
    }
}
