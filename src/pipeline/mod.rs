//! # Pipeline Module
//!
//! The entity pipeline: middleware-shaped operations that turn incoming
//! request data into hydrated records before the action handler runs.
//!
//! ## Overview
//!
//! Each operation takes an [`EntityConfig`], the [`Request`](crate::Request),
//! and a `next` handler, and either delegates downstream with the record(s)
//! stored as a request attribute or short-circuits with a response:
//!
//! - [`EntityPipeline::create`] - instantiate an empty record and merge
//!   allow-listed request fields into it
//! - [`EntityPipeline::fetch`] - resolve a primary key, look the record up,
//!   optionally hydrate it
//! - [`EntityPipeline::fetch_collection`] - resolve a key set (query
//!   parameters, JSON-encoded arrays, or recursive body search) and look up
//!   the batch
//!
//! ## Expected outcomes vs. errors
//!
//! An unresolvable primary key and a record that does not exist are expected,
//! recoverable outcomes: the pipeline routes them to the configured
//! [`EntityErrorHandler`] and returns its response without calling `next`.
//! Store failures, hook failures, and the unsupported collection-hydration
//! path are errors and propagate to the host's error boundary.
//!
//! ## Hooks
//!
//! Per-entity extension points are optional callbacks on the config, invoked
//! when present: `before_create` / `after_create` around instantiation,
//! `before_fetch` (which may rewrite the query or enforce the primary key)
//! and `after_fetch` around lookups, and `allowed_fields`, the allow-list
//! that decides which request fields may ever reach a record.

mod config;
mod context;
mod core;
mod error;
mod error_handler;
mod pks;

pub use config::{ConfigError, EntityConfig, EntityConfigBuilder};
pub use context::{EntityContext, PrimaryKey};
pub use core::{EntityPipeline, Next};
pub use error::PipelineError;
pub use error_handler::{DefaultEntityErrorHandler, EntityErrorHandler};
pub use pks::PkFinder;
