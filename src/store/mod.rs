//! # Store Module
//!
//! The persistence seam. Hydrant never talks to a database; it talks to these
//! traits, and the host wires them to its real ORM:
//!
//! - [`Record`] - an active record: a mutable bag of persisted fields with a
//!   primary key once saved
//! - [`RecordQuery`] - a one-shot lookup: `find_by_pk` / `find_by_pks`, with
//!   [`QuerySpec`](crate::service::QuerySpec) modifiers applied beforehand
//! - [`QueryFactory`] - creates the query a fetch operation will run; the
//!   `before_fetch` hook may rewrite it before execution
//!
//! [`MemoryStore`] is a thread-safe in-memory implementation of the whole seam
//! used by this crate's tests and by hosts that want a fixture backend.

mod core;
mod memory;
mod query;

pub use core::{Record, RecordSet, StoreError};
pub use memory::MemoryStore;
pub use query::{QueryFactory, RecordQuery};
