//! # Request Module
//!
//! The crate's view of the HTTP framework it sits inside. Hydrant never parses
//! wire bytes; the host adapter builds a [`Request`] from whatever server it
//! runs on, and everything downstream - the entity pipeline, the dispatcher,
//! parameter binding - is written against this one type.
//!
//! ## Parameter storage
//!
//! Route and query parameters use [`ParamVec`], a stack-allocated vector of
//! `(Arc<str>, String)` pairs. Lookups are last-write-wins: `?limit=10&limit=20`
//! resolves to `20`, and a route with shadowed parameter names resolves to the
//! innermost one.
//!
//! ## Attributes
//!
//! [`Attributes`] is the typed per-request channel that hydrated records travel
//! through: the entity pipeline stores a record under a configured name, and
//! the dispatcher's binding table reads it back out for the action handler.

mod attributes;
mod core;
mod uploads;

pub use attributes::{AttributeValue, Attributes};
pub use core::{
    parse_query_params, HeaderVec, ParamVec, Request, MAX_INLINE_HEADERS, MAX_INLINE_PARAMS,
};
pub use uploads::UploadedFile;
