use serde_json::Value;

use super::{Record, RecordSet, StoreError};
use crate::service::QuerySpec;

/// A one-shot record lookup.
///
/// Queries are created by a [`QueryFactory`], optionally rewritten by the
/// pipeline's `before_fetch` hook and narrowed by a
/// [`QuerySpec`](crate::service::QuerySpec), then consumed by exactly one
/// lookup call.
pub trait RecordQuery<R: Record>: Send {
    /// Narrow the query with sort/filter modifiers derived from the request.
    fn apply(&mut self, spec: &QuerySpec);

    /// Look up a single record by primary key.
    ///
    /// `Ok(None)` means the key resolved to nothing; that is an expected
    /// outcome, not an error.
    fn find_by_pk(self: Box<Self>, pk: &Value) -> Result<Option<R>, StoreError>;

    /// Look up a batch of records by primary key, preserving key order.
    fn find_by_pks(self: Box<Self>, pks: &[Value]) -> Result<RecordSet<R>, StoreError>;
}

/// Creates the query a fetch operation will run.
///
/// This is the seam route-level customization hangs off: a host maps each
/// entity type to a factory, and the factory decides what a "base query" means
/// (visibility scoping, soft-delete filtering, joins the ORM needs).
pub trait QueryFactory<R: Record>: Send + Sync {
    fn create_query(&self) -> Box<dyn RecordQuery<R>>;
}
