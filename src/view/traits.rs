use async_trait::async_trait;

use super::error::ViewError;

/// Remote source of collection items.
#[async_trait]
pub trait CollectionSource<T>: Send + Sync {
    /// Fetch the full item set. There is no pagination or cancellation at
    /// this seam; a failed fetch fails the whole view operation.
    async fn fetch(&self) -> Result<Vec<T>, ViewError>;
}

/// The rendering surface for one collection view.
///
/// `render_item` is the ready signal: its future must resolve only once the
/// item's view is ready, because the collection view renders the next item
/// strictly after the previous one resolved.
#[async_trait]
pub trait ItemRenderer<T>: Send + Sync {
    /// Render one item at its collection position; resolve on ready.
    async fn render_item(&self, index: usize, item: &T) -> Result<(), ViewError>;

    /// Render the empty-collection region.
    async fn render_empty(&self) -> Result<(), ViewError> {
        Ok(())
    }

    /// Empty the rendered regions before a re-render.
    async fn clear(&self) -> Result<(), ViewError> {
        Ok(())
    }

    /// Destroy the partially-constructed view after a failed fetch.
    async fn teardown(&self) {}
}
