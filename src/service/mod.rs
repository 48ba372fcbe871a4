//! # Service Module
//!
//! Request-derived services the dispatcher injects into action handlers
//! through service bindings. Each one is a small trait with a default
//! implementation driven purely by request parameters; hosts swap in their own
//! when the defaults don't fit.
//!
//! - [`RequestPagination`] turns `page` / `per_page` parameters into a capped
//!   [`PageWindow`]
//! - [`RequestQueryModifier`] turns `sort` / `filter_*` parameters into a
//!   [`QuerySpec`] consumed by
//!   [`RecordQuery::apply`](crate::store::RecordQuery::apply)

mod pagination;
mod query_modifier;

pub use pagination::{PageWindow, QueryPagination, RequestPagination};
pub use query_modifier::{
    FieldFilter, ParamQueryModifier, QuerySpec, RequestQueryModifier, SortKey, SortOrder,
};
