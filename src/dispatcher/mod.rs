//! # Dispatcher Module
//!
//! Action dispatch: resolving a registered target and invoking it with
//! arguments bound from the request.
//!
//! ## Overview
//!
//! Targets come in two shapes. A *closure* is invoked with the request and
//! the route arguments, positionally. An *action method* declares a binding
//! table: one [`ParamBinding`] per parameter, naming where its value comes
//! from. The table is validated when the action is registered, so a
//! misdeclared handler fails at startup instead of mid-request.
//!
//! ## Binding resolution
//!
//! Per parameter, in order:
//!
//! - **scalar** - route arguments, then merged request parameters (query +
//!   body, body wins), then scalar request attributes, then the declared
//!   default; otherwise the dispatch fails naming the parameter and action
//! - **attribute** - the typed request attribute under the parameter's exact
//!   name (this is how pipeline-fetched records reach handlers)
//! - **pagination** / **query_modifier** - the constructor-injected service,
//!   materialized against the current request
//! - **upload** - the first uploaded file on the request
//!
//! ## Response normalization
//!
//! An action may return a [`Response`](crate::Response) verbatim, or a JSON
//! payload that is passed through the injected [`ResponseBuilder`] and
//! [`ResponseFormatter`]. The defaults wrap payloads in a `{"data": ...}`
//! envelope and emit `application/json`.
//!
//! There is no retry and no partial binding: the first unresolvable
//! parameter aborts the whole request with
//! [`DispatchError::MissingParameter`].

mod binding;
mod core;
mod error;
mod respond;

pub use binding::{BindingSource, BoundArgs, BoundValue, ParamBinding};
pub use core::{ActionDispatcher, ActionOutcome};
pub use error::DispatchError;
pub use respond::{EnvelopeBuilder, JsonFormatter, ResponseBuilder, ResponseFormatter};
