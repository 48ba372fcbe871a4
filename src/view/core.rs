use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::error::ViewError;
use super::traits::{CollectionSource, ItemRenderer};

/// Events a collection view emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// Initial render completed: every item signalled ready.
    Ready,
}

/// Collection view behavior switches.
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    /// Fetch remote data during initialization.
    pub auto_fetch: bool,
    /// Render during initialization.
    pub auto_render: bool,
    /// Suppress the [`ViewEvent::Ready`] emission after render.
    pub prevent_ready: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            auto_fetch: false,
            auto_render: true,
            prevent_ready: false,
        }
    }
}

/// A view bound to an in-memory collection, re-rendering items as the
/// collection mutates.
///
/// Single-threaded cooperative scheduling: all work happens on the caller's
/// task through awaited futures; there are no parallel fetches and no
/// cancellation.
pub struct CollectionView<T> {
    options: ViewOptions,
    items: Vec<T>,
    source: Option<Arc<dyn CollectionSource<T>>>,
    renderer: Arc<dyn ItemRenderer<T>>,
    rendered: bool,
    events: broadcast::Sender<ViewEvent>,
}

impl<T: Send + Sync + 'static> CollectionView<T> {
    /// Resolve the view's two async dependencies, then fetch and/or render
    /// per the options.
    ///
    /// The dependencies resolve concurrently but initialization proceeds only
    /// once both are available.
    pub async fn initialize<SF, RF>(
        options: ViewOptions,
        source: SF,
        renderer: RF,
    ) -> Result<Self, ViewError>
    where
        SF: Future<Output = Result<Option<Arc<dyn CollectionSource<T>>>, ViewError>>,
        RF: Future<Output = Result<Arc<dyn ItemRenderer<T>>, ViewError>>,
    {
        let (source, renderer) = futures::try_join!(source, renderer)?;
        let mut view = Self::with_parts(options, source, renderer);
        debug!(
            auto_fetch = options.auto_fetch,
            auto_render = options.auto_render,
            "Collection view dependencies resolved"
        );

        if view.options.auto_fetch {
            if view.options.auto_render {
                view.fetch_and_render().await?;
            } else {
                view.fetch().await?;
            }
        } else if view.options.auto_render {
            view.render().await?;
        }
        Ok(view)
    }

    /// Assemble a view from already-resolved parts without fetching or
    /// rendering.
    #[must_use]
    pub fn with_parts(
        options: ViewOptions,
        source: Option<Arc<dyn CollectionSource<T>>>,
        renderer: Arc<dyn ItemRenderer<T>>,
    ) -> Self {
        let (events, _) = broadcast::channel(8);
        Self {
            options,
            items: Vec::new(),
            source,
            renderer,
            rendered: false,
            events,
        }
    }

    /// Replace the collection from the remote source.
    ///
    /// On failure the view is torn down and the error is returned - the one
    /// and only failure signal.
    pub async fn fetch(&mut self) -> Result<(), ViewError> {
        let source = match &self.source {
            Some(source) => Arc::clone(source),
            None => return Ok(()),
        };
        match source.fetch().await {
            Ok(items) => {
                info!(item_count = items.len(), "Collection fetched");
                self.items = items;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Collection fetch failed; tearing view down");
                self.renderer.teardown().await;
                self.rendered = false;
                self.items.clear();
                Err(err)
            }
        }
    }

    /// Fetch (when a source is configured) and render.
    pub async fn fetch_and_render(&mut self) -> Result<(), ViewError> {
        self.fetch().await?;
        self.render().await
    }

    /// Render the collection, one ready-signalled item at a time.
    ///
    /// Resolves only after every item view has signalled ready, in collection
    /// order; an empty collection renders the empty region instead. Emits
    /// [`ViewEvent::Ready`] unless suppressed by the options.
    pub async fn render(&mut self) -> Result<(), ViewError> {
        self.renderer.clear().await?;

        if self.items.is_empty() {
            self.renderer.render_empty().await?;
        } else {
            for (index, item) in self.items.iter().enumerate() {
                self.renderer.render_item(index, item).await?;
                debug!(index, "Item view ready");
            }
        }

        self.rendered = true;
        if !self.options.prevent_ready {
            // No subscribers is fine; the send result is informational only.
            let _ = self.events.send(ViewEvent::Ready);
        }
        info!(item_count = self.items.len(), "Collection rendered");
        Ok(())
    }

    /// Append an item; when the view is already rendered, only the new item
    /// is rendered (clearing the empty region if this is the first item).
    pub async fn add_item(&mut self, item: T) -> Result<(), ViewError> {
        let was_empty = self.items.is_empty();
        self.items.push(item);
        if self.rendered {
            if was_empty {
                self.renderer.clear().await?;
            }
            let index = self.items.len() - 1;
            if let Some(item) = self.items.last() {
                let renderer = Arc::clone(&self.renderer);
                renderer.render_item(index, item).await?;
            }
        }
        Ok(())
    }

    /// Remove the item at `index`; when the view is already rendered, the
    /// remaining collection re-renders (including the empty region when the
    /// collection empties).
    pub async fn remove_item(&mut self, index: usize) -> Result<Option<T>, ViewError> {
        if index >= self.items.len() {
            return Ok(None);
        }
        let removed = self.items.remove(index);
        if self.rendered {
            self.render().await?;
        }
        Ok(Some(removed))
    }

    /// Subscribe to view events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the collection wholesale without rendering.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }
}
