use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::binding::{self, BoundArgs, ParamBinding};
use super::error::DispatchError;
use super::respond::{
    base_response, EnvelopeBuilder, JsonFormatter, SharedBuilder, SharedFormatter,
};
use crate::error::Error;
use crate::request::{ParamVec, Request};
use crate::response::Response;
use crate::service::{
    ParamQueryModifier, QueryPagination, RequestPagination, RequestQueryModifier,
};

/// What an action invocation produced.
///
/// A `Response` is used verbatim; a `Payload` passes through the injected
/// response builder and formatter.
#[derive(Debug)]
pub enum ActionOutcome {
    Response(Response),
    Payload(Value),
}

type ActionFn = Box<dyn Fn(&Request, &BoundArgs) -> anyhow::Result<ActionOutcome> + Send + Sync>;
type ClosureFn = Box<dyn Fn(&Request, &ParamVec) -> anyhow::Result<ActionOutcome> + Send + Sync>;

enum Target {
    /// A bare closure, invoked with the request and the route arguments.
    Closure(ClosureFn),
    /// An action method with a statically declared binding table.
    Method {
        bindings: Vec<ParamBinding>,
        handler: ActionFn,
    },
}

/// Dispatches requests to registered action targets.
///
/// All dependencies - the two request services and the response
/// builder/formatter pair - are injected at construction; registration
/// validates binding tables so misdeclared actions fail at startup.
pub struct ActionDispatcher {
    actions: HashMap<String, Target>,
    pagination: Arc<dyn RequestPagination>,
    query_modifier: Arc<dyn RequestQueryModifier>,
    response_builder: SharedBuilder,
    response_formatter: SharedFormatter,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionDispatcher {
    /// Create a dispatcher with the default services: query-parameter
    /// pagination, `sort`/`filter_*` query modifiers, envelope building, and
    /// JSON formatting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            pagination: Arc::new(QueryPagination::default()),
            query_modifier: Arc::new(ParamQueryModifier::default()),
            response_builder: Arc::new(EnvelopeBuilder),
            response_formatter: Arc::new(JsonFormatter),
        }
    }

    #[must_use]
    pub fn with_pagination(mut self, pagination: Arc<dyn RequestPagination>) -> Self {
        self.pagination = pagination;
        self
    }

    #[must_use]
    pub fn with_query_modifier(mut self, query_modifier: Arc<dyn RequestQueryModifier>) -> Self {
        self.query_modifier = query_modifier;
        self
    }

    #[must_use]
    pub fn with_response_builder(mut self, builder: SharedBuilder) -> Self {
        self.response_builder = builder;
        self
    }

    #[must_use]
    pub fn with_response_formatter(mut self, formatter: SharedFormatter) -> Self {
        self.response_formatter = formatter;
        self
    }

    /// Register a bare closure target.
    ///
    /// Replacing an existing registration under the same name is allowed;
    /// the previous target is dropped.
    pub fn register_closure<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&Request, &ParamVec) -> anyhow::Result<ActionOutcome> + Send + Sync + 'static,
    {
        self.insert(name, Target::Closure(Box::new(handler)));
    }

    /// Register an action method with its binding table.
    ///
    /// The table is validated here, at registration time; a duplicate
    /// parameter name is a configuration error.
    pub fn register_action<F>(
        &mut self,
        name: &str,
        bindings: Vec<ParamBinding>,
        handler: F,
    ) -> Result<(), DispatchError>
    where
        F: Fn(&Request, &BoundArgs) -> anyhow::Result<ActionOutcome> + Send + Sync + 'static,
    {
        binding::validate(name, &bindings)?;
        self.insert(
            name,
            Target::Method {
                bindings,
                handler: Box::new(handler),
            },
        );
        Ok(())
    }

    fn insert(&mut self, name: &str, target: Target) {
        if self.actions.insert(name.to_string(), target).is_some() {
            warn!(action = name, "Replaced existing action registration");
        } else {
            info!(
                action = name,
                total_actions = self.actions.len(),
                "Action registered"
            );
        }
    }

    #[must_use]
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Resolve and invoke the named action for this request.
    pub fn dispatch(&self, name: &str, req: &Request) -> Result<Response, Error> {
        debug!(
            request_id = %req.request_id,
            action = name,
            available_actions = self.actions.len(),
            "Action lookup"
        );

        let target = self.actions.get(name).ok_or_else(|| {
            error!(request_id = %req.request_id, action = name, "Action not found");
            DispatchError::UnknownAction {
                action: name.to_string(),
            }
        })?;

        let start = Instant::now();
        let outcome = match target {
            Target::Closure(handler) => handler(req, &req.route_params),
            Target::Method { bindings, handler } => {
                let args = binding::resolve(
                    name,
                    bindings,
                    req,
                    self.pagination.as_ref(),
                    self.query_modifier.as_ref(),
                )?;
                debug!(
                    request_id = %req.request_id,
                    action = name,
                    bound_args = args.len(),
                    "Parameters bound"
                );
                handler(req, &args)
            }
        };

        let outcome = outcome.map_err(|source| DispatchError::Action {
            action: name.to_string(),
            source,
        })?;

        let response = match outcome {
            ActionOutcome::Response(response) => response,
            ActionOutcome::Payload(payload) => {
                let built = self.response_builder.build(payload).map_err(|source| {
                    DispatchError::ResponseBuild {
                        action: name.to_string(),
                        source,
                    }
                })?;
                self.response_formatter.format(base_response(), built)
            }
        };

        info!(
            request_id = %req.request_id,
            action = name,
            status = response.status,
            latency_ms = start.elapsed().as_millis() as u64,
            "Action dispatched"
        );
        Ok(response)
    }
}
