use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::config::EntityConfig;
use super::context::{EntityContext, PrimaryKey};
use super::error::PipelineError;
use super::error_handler::{DefaultEntityErrorHandler, EntityErrorHandler};
use super::pks::PkFinder;
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::store::{QueryFactory, Record};

/// The downstream handler an entity operation delegates to.
pub type Next<'a> = Box<dyn FnOnce(Request) -> Result<Response, Error> + 'a>;

/// Middleware-shaped entity operations over one record type.
///
/// Constructed once with the query factory and error handler, then invoked
/// per request with a route's [`EntityConfig`]. Dependencies are explicit
/// constructor arguments; there is no service container behind this type.
pub struct EntityPipeline<R: Record> {
    queries: Arc<dyn QueryFactory<R>>,
    errors: Arc<dyn EntityErrorHandler>,
}

impl<R: Record> EntityPipeline<R> {
    /// Create a pipeline with the default error handler.
    #[must_use]
    pub fn new(queries: Arc<dyn QueryFactory<R>>) -> Self {
        Self {
            queries,
            errors: Arc::new(DefaultEntityErrorHandler),
        }
    }

    /// Replace the handler that answers the two expected short-circuits.
    #[must_use]
    pub fn with_error_handler(mut self, errors: Arc<dyn EntityErrorHandler>) -> Self {
        self.errors = errors;
        self
    }

    /// Instantiate a new empty record, hydrate it from the request, and store
    /// it under the configured attribute name.
    pub fn create(
        &self,
        config: &EntityConfig<R>,
        mut req: Request,
        next: Next<'_>,
    ) -> Result<Response, Error> {
        let mut record = R::default();
        debug!(
            request_id = %req.request_id,
            entity = R::ENTITY,
            "Record instantiated"
        );

        config.run_before_create(&mut record, &req)?;

        if config.hydrates() {
            let merged = req.merged_params();
            let allowed = config.allowed_fields(&merged, &req.method);
            debug!(
                request_id = %req.request_id,
                entity = R::ENTITY,
                field_count = allowed.len(),
                "Hydrating new record from request"
            );
            record.hydrate(&allowed);
        }

        config.run_after_create(&mut record, &req)?;

        info!(
            request_id = %req.request_id,
            entity = R::ENTITY,
            attribute = config.attribute(),
            "Record created and stored on request"
        );
        req.attributes.insert(config.attribute(), record);
        next(req)
    }

    /// Fetch an existing record by primary key and store it under the
    /// configured attribute name.
    ///
    /// Short-circuits to the error handler when no key resolves or no record
    /// exists; never calls the lookup with an unresolved key.
    pub fn fetch(
        &self,
        config: &EntityConfig<R>,
        mut req: Request,
        next: Next<'_>,
    ) -> Result<Response, Error> {
        let mut ctx = EntityContext::new(R::ENTITY, req.request_id);

        // Most common case: the key is a route parameter.
        if let Some(raw) = req.route_param(config.pk_param()) {
            ctx.set_primary_key(PrimaryKey::One(Value::String(raw.to_string())));
        }

        let query = self.queries.create_query();
        let query = config.run_before_fetch(query, &req, &mut ctx)?;

        // The hook had the last word on the key; re-read it.
        let pk = match ctx.primary_key().as_one() {
            Some(pk) => pk.clone(),
            None => return Ok(self.errors.primary_key_not_found(&ctx, &req)),
        };

        let start = Instant::now();
        let record = query.find_by_pk(&pk).map_err(PipelineError::Store)?;
        let mut record = match record {
            Some(record) => record,
            None => return Ok(self.errors.entity_not_found(&ctx, &req)),
        };
        info!(
            request_id = %req.request_id,
            entity = R::ENTITY,
            pk = %pk,
            latency_ms = start.elapsed().as_millis() as u64,
            "Record fetched"
        );

        if config.hydrates() {
            let merged = req.merged_params();
            let allowed = config.allowed_fields(&merged, &req.method);
            debug!(
                request_id = %req.request_id,
                entity = R::ENTITY,
                field_count = allowed.len(),
                "Hydrating fetched record from request"
            );
            record.hydrate(&allowed);
        }

        config.run_after_fetch(&mut record, &req)?;

        req.attributes.insert(config.attribute(), record);
        next(req)
    }

    /// Fetch a batch of records by key set and store the resulting
    /// [`RecordSet`](crate::store::RecordSet) under the configured attribute
    /// name.
    ///
    /// The key set comes from the configured query parameter - repeated
    /// entries or a JSON-encoded array - or, on mutating requests with no
    /// query keys, from a recursive search of the parsed body.
    pub fn fetch_collection(
        &self,
        config: &EntityConfig<R>,
        mut req: Request,
        next: Next<'_>,
    ) -> Result<Response, Error> {
        let mut ctx = EntityContext::new(R::ENTITY, req.request_id);
        ctx.set_primary_key(PrimaryKey::Many(Self::resolve_pks(config, &req)));

        let query = self.queries.create_query();
        let query = config.run_before_fetch(query, &req, &mut ctx)?;

        let pks = ctx.primary_key().values();
        if pks.is_empty() {
            return Ok(self.errors.primary_key_not_found(&ctx, &req));
        }

        let start = Instant::now();
        let records = query.find_by_pks(&pks).map_err(PipelineError::Store)?;
        info!(
            request_id = %req.request_id,
            entity = R::ENTITY,
            requested = pks.len(),
            found = records.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Record collection fetched"
        );

        if config.hydrates() {
            // No defined merge semantics for a batch; fail loudly.
            return Err(PipelineError::CollectionHydration { entity: R::ENTITY }.into());
        }

        req.attributes.insert(config.attribute(), records);
        next(req)
    }

    /// Resolve the key set for a collection fetch.
    fn resolve_pks(config: &EntityConfig<R>, req: &Request) -> Vec<Value> {
        let raw = req.query_param_values(config.pk_param());
        let mut pks = match raw.as_slice() {
            [] => Vec::new(),
            [single] => decode_pk_param(single),
            many => many
                .iter()
                .map(|v| Value::String((*v).to_string()))
                .collect(),
        };

        if pks.is_empty() && req.is_mutation() {
            if let Some(body) = &req.body {
                pks = PkFinder::new([config.pk_param()]).find(body);
                if !pks.is_empty() {
                    debug!(
                        request_id = %req.request_id,
                        entity = R::ENTITY,
                        key_count = pks.len(),
                        "Primary keys discovered in request body"
                    );
                }
            }
        }

        if pks.is_empty() {
            warn!(
                request_id = %req.request_id,
                entity = R::ENTITY,
                pk_param = config.pk_param(),
                "No primary keys resolved for collection fetch"
            );
        }
        pks
    }
}

/// Decode a single query value into a key set: a JSON-encoded array yields
/// its elements, anything else is a one-element set.
fn decode_pk_param(raw: &str) -> Vec<Value> {
    if raw.trim_start().starts_with('[') {
        if let Ok(Value::Array(items)) = serde_json::from_str(raw) {
            return items;
        }
    }
    if raw.is_empty() {
        Vec::new()
    } else {
        vec![Value::String(raw.to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_json_array() {
        assert_eq!(
            decode_pk_param(r#"["1","2"]"#),
            vec![Value::String("1".into()), Value::String("2".into())]
        );
    }

    #[test]
    fn test_decode_scalar_is_single_key() {
        assert_eq!(decode_pk_param("7"), vec![Value::String("7".into())]);
    }

    #[test]
    fn test_decode_malformed_array_falls_back_to_literal() {
        assert_eq!(
            decode_pk_param("[oops"),
            vec![Value::String("[oops".into())]
        );
    }

    #[test]
    fn test_decode_empty_is_empty() {
        assert!(decode_pk_param("").is_empty());
    }
}
