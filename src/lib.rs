//! # Hydrant
//!
//! **Hydrant** is a request-to-record pipeline for Rust web services: it sits between an
//! HTTP framework and a persistence layer, pulls primary keys and field data out of
//! incoming requests, fetches or instantiates the matching records, and dispatches to
//! action handlers through statically declared parameter binding.
//!
//! ## Overview
//!
//! Hydrant is middleware, not a framework. The HTTP server, routing, and the real query
//! engine stay outside; the crate consumes them through small traits and provides the
//! glue a CRUD service otherwise rewrites per route:
//!
//! - **[`pipeline`]** - middleware-shaped entity operations: `create`, `fetch`, and
//!   `fetch_collection`, with before/after hooks, allow-list hydration, and pluggable
//!   not-found handling
//! - **[`dispatcher`]** - action dispatch with per-parameter binding tables resolved
//!   against route arguments, request parameters, attributes, injected services, and
//!   uploaded files
//! - **[`request`]** / **[`response`]** - the request/response abstraction the rest of
//!   the crate is written against
//! - **[`store`]** - the persistence seam (`Record`, `RecordQuery`, `QueryFactory`)
//!   plus an in-memory store for tests and demos
//! - **[`service`]** - injected request services: pagination windows and query
//!   modifiers derived from request parameters
//! - **[`view`]** - the client-side half: an async collection view that binds an
//!   in-memory collection to a renderer, one ready-signalled item at a time
//!
//! ## Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host as Host framework
//!     participant Pipeline as EntityPipeline
//!     participant Store as RecordQuery
//!     participant Dispatcher as ActionDispatcher
//!     participant Action as Action handler
//!
//!     Host->>Pipeline: fetch(config, request, next)
//!     Pipeline->>Pipeline: resolve primary key<br/>(route params, before_fetch hook)
//!     alt Key unresolved
//!         Pipeline-->>Host: primary_key_not_found response
//!     end
//!     Pipeline->>Store: find_by_pk(pk)
//!     alt No record
//!         Pipeline-->>Host: entity_not_found response
//!     end
//!     Pipeline->>Pipeline: hydrate allow-listed fields<br/>(query + body, body wins)
//!     Pipeline->>Dispatcher: next(request + record attribute)
//!     Dispatcher->>Dispatcher: resolve binding table<br/>(route, params, attributes, services)
//!     Dispatcher->>Action: invoke with BoundArgs
//!     Action-->>Dispatcher: Response or payload
//!     Dispatcher->>Dispatcher: ResponseBuilder + ResponseFormatter
//!     Dispatcher-->>Host: Response
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hydrant::dispatcher::{ActionDispatcher, ActionOutcome, ParamBinding};
//! use hydrant::request::Request;
//! use http::Method;
//! use serde_json::json;
//!
//! let mut dispatcher = ActionDispatcher::new();
//! dispatcher
//!     .register_action(
//!         "pet.show",
//!         vec![ParamBinding::scalar("id")],
//!         |_req, args| {
//!             let id = args.scalar("id").cloned().unwrap_or_default();
//!             Ok(ActionOutcome::Payload(json!({ "id": id })))
//!         },
//!     )
//!     .unwrap();
//!
//! let req = Request::new(Method::GET, "/pets/7").with_route_param("id", "7");
//! let resp = dispatcher.dispatch("pet.show", &req).unwrap();
//! assert_eq!(resp.status, 200);
//! ```
//!
//! ## Error Model
//!
//! Missing primary keys and records that do not exist are *expected* outcomes: they are
//! routed to an [`pipeline::EntityErrorHandler`] that returns an ordinary response.
//! Binding a parameter that nothing can satisfy is a programming error and fails the
//! dispatch immediately. Everything else - store failures, hook failures, response
//! building failures - propagates as [`Error`] to the host framework's error boundary.

pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod service;
pub mod store;
pub mod view;

pub use error::Error;
pub use ids::RequestId;
pub use request::Request;
pub use response::Response;
