//! # View Module
//!
//! The client-side half of the crate: a collection view that binds an
//! in-memory collection to a renderer, with the rendering surface itself
//! (DOM, TUI, anything) abstracted behind [`ItemRenderer`].
//!
//! ## Lifecycle
//!
//! [`CollectionView::initialize`] resolves two independent async dependencies
//! - the optional [`CollectionSource`] and the [`ItemRenderer`] - before
//! proceeding, then optionally fetches remote data and renders, per
//! [`ViewOptions`].
//!
//! ## Sequential rendering
//!
//! Rendering is strictly one item at a time, in collection order: each item's
//! `render_item` future resolves when that item's view signals ready, and the
//! next item only starts after that. The aggregate [`CollectionView::render`]
//! future resolves once every item has signalled ready at least once, then a
//! [`ViewEvent::Ready`] is emitted unless suppressed.
//!
//! ## Failure
//!
//! A failed remote fetch tears the partially-constructed view down and fails
//! the pending operation with [`ViewError::Fetch`] - one failure signal, no
//! resolved-then-thrown ambiguity. There is no retry and no cancellation:
//! once a fetch or render sequence starts there is no abort path.

mod core;
mod error;
mod traits;

pub use core::{CollectionView, ViewEvent, ViewOptions};
pub use error::ViewError;
pub use traits::{CollectionSource, ItemRenderer};
