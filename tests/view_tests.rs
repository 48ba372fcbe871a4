use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use hydrant::view::{CollectionSource, CollectionView, ItemRenderer, ViewError, ViewEvent, ViewOptions};

mod tracing_util;
use tracing_util::TestTracing;

/// Renderer that logs region and item events, with a real await inside
/// `render_item` so out-of-order scheduling would show up in the log.
struct RecordingRenderer {
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingRenderer {
    fn new() -> (Arc<Self>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (
            Arc::new(Self {
                log: Arc::clone(&log),
            }),
            log,
        )
    }

    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl ItemRenderer<String> for RecordingRenderer {
    async fn render_item(&self, index: usize, item: &String) -> Result<(), ViewError> {
        self.push(format!("start:{index}:{item}"));
        // The item view takes time to become ready.
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.push(format!("ready:{index}:{item}"));
        Ok(())
    }

    async fn render_empty(&self) -> Result<(), ViewError> {
        self.push("empty".to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ViewError> {
        self.push("clear".to_string());
        Ok(())
    }

    async fn teardown(&self) {
        self.push("teardown".to_string());
    }
}

struct StaticSource(Vec<String>);

#[async_trait]
impl CollectionSource<String> for StaticSource {
    async fn fetch(&self) -> Result<Vec<String>, ViewError> {
        Ok(self.0.clone())
    }
}

struct FailingSource;

#[async_trait]
impl CollectionSource<String> for FailingSource {
    async fn fetch(&self) -> Result<Vec<String>, ViewError> {
        Err(ViewError::fetch("remote said no"))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[tokio::test]
async fn test_render_resolves_after_every_item_ready_in_order() {
    let _tracing = TestTracing::init();
    let (renderer, log) = RecordingRenderer::new();
    let mut view = CollectionView::<String>::with_parts(ViewOptions::default(), None, renderer);
    view.set_items(strings(&["a", "b", "c"]));

    let mut events = view.subscribe();
    view.render().await.unwrap();

    // Strictly sequential: item N+1 starts only after item N signalled ready.
    let log = log.lock().unwrap().clone();
    assert_eq!(
        log,
        vec![
            "clear", "start:0:a", "ready:0:a", "start:1:b", "ready:1:b", "start:2:c", "ready:2:c",
        ]
    );
    assert!(matches!(events.try_recv(), Ok(ViewEvent::Ready)));
}

#[tokio::test]
async fn test_initialize_resolves_dependencies_then_fetches_and_renders() {
    let _tracing = TestTracing::init();
    let (renderer, log) = RecordingRenderer::new();
    let options = ViewOptions {
        auto_fetch: true,
        ..ViewOptions::default()
    };

    let view = CollectionView::initialize(
        options,
        async {
            Ok(Some(
                Arc::new(StaticSource(strings(&["x", "y"]))) as Arc<dyn CollectionSource<String>>
            ))
        },
        async { Ok(renderer as Arc<dyn ItemRenderer<String>>) },
    )
    .await
    .unwrap();

    assert_eq!(view.items(), strings(&["x", "y"]).as_slice());
    assert!(view.is_rendered());
    let log = log.lock().unwrap().clone();
    assert!(log.contains(&"ready:1:y".to_string()));
}

#[tokio::test]
async fn test_initialize_can_fetch_without_rendering() {
    let _tracing = TestTracing::init();
    let (renderer, log) = RecordingRenderer::new();
    let options = ViewOptions {
        auto_fetch: true,
        auto_render: false,
        ..ViewOptions::default()
    };

    let view = CollectionView::initialize(
        options,
        async {
            Ok(Some(
                Arc::new(StaticSource(strings(&["x"]))) as Arc<dyn CollectionSource<String>>
            ))
        },
        async { Ok(renderer as Arc<dyn ItemRenderer<String>>) },
    )
    .await
    .unwrap();

    assert_eq!(view.len(), 1);
    assert!(!view.is_rendered());
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_tears_down_and_fails_the_operation() {
    let _tracing = TestTracing::init();
    let (renderer, log) = RecordingRenderer::new();
    let options = ViewOptions {
        auto_fetch: true,
        ..ViewOptions::default()
    };

    let result = CollectionView::initialize(
        options,
        async { Ok(Some(Arc::new(FailingSource) as Arc<dyn CollectionSource<String>>)) },
        async { Ok(renderer as Arc<dyn ItemRenderer<String>>) },
    )
    .await;

    assert!(matches!(result, Err(ViewError::Fetch { .. })));
    let log = log.lock().unwrap().clone();
    assert_eq!(log, vec!["teardown"]);
}

#[tokio::test]
async fn test_dependency_load_failure_surfaces() {
    let _tracing = TestTracing::init();

    let result = CollectionView::<String>::initialize(
        ViewOptions::default(),
        async { Ok(None) },
        async { Err(ViewError::load("no item view defined")) },
    )
    .await;

    assert_eq!(result.err(), Some(ViewError::load("no item view defined")));
}

#[tokio::test]
async fn test_empty_collection_renders_empty_region() {
    let _tracing = TestTracing::init();
    let (renderer, log) = RecordingRenderer::new();
    let mut view = CollectionView::<String>::with_parts(ViewOptions::default(), None, renderer);

    let mut events = view.subscribe();
    view.render().await.unwrap();

    assert_eq!(log.lock().unwrap().clone(), vec!["clear", "empty"]);
    assert!(matches!(events.try_recv(), Ok(ViewEvent::Ready)));
}

#[tokio::test]
async fn test_prevent_ready_suppresses_the_event() {
    let _tracing = TestTracing::init();
    let (renderer, _log) = RecordingRenderer::new();
    let options = ViewOptions {
        prevent_ready: true,
        ..ViewOptions::default()
    };
    let mut view = CollectionView::<String>::with_parts(options, None, renderer);
    view.set_items(strings(&["a"]));

    let mut events = view.subscribe();
    view.render().await.unwrap();
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_add_item_renders_only_the_new_item() {
    let _tracing = TestTracing::init();
    let (renderer, log) = RecordingRenderer::new();
    let mut view = CollectionView::<String>::with_parts(ViewOptions::default(), None, renderer);
    view.set_items(strings(&["a"]));
    view.render().await.unwrap();
    log.lock().unwrap().clear();

    view.add_item("b".to_string()).await.unwrap();
    assert_eq!(log.lock().unwrap().clone(), vec!["start:1:b", "ready:1:b"]);
}

#[tokio::test]
async fn test_add_item_to_empty_rendered_view_clears_empty_region() {
    let _tracing = TestTracing::init();
    let (renderer, log) = RecordingRenderer::new();
    let mut view = CollectionView::<String>::with_parts(ViewOptions::default(), None, renderer);
    view.render().await.unwrap();
    log.lock().unwrap().clear();

    view.add_item("a".to_string()).await.unwrap();
    assert_eq!(
        log.lock().unwrap().clone(),
        vec!["clear", "start:0:a", "ready:0:a"]
    );
}

#[tokio::test]
async fn test_remove_item_rerenders_remaining_collection() {
    let _tracing = TestTracing::init();
    let (renderer, log) = RecordingRenderer::new();
    let mut view = CollectionView::<String>::with_parts(ViewOptions::default(), None, renderer);
    view.set_items(strings(&["a", "b"]));
    view.render().await.unwrap();
    log.lock().unwrap().clear();

    let removed = view.remove_item(0).await.unwrap();
    assert_eq!(removed, Some("a".to_string()));
    assert_eq!(
        log.lock().unwrap().clone(),
        vec!["clear", "start:0:b", "ready:0:b"]
    );

    let removed = view.remove_item(0).await.unwrap();
    assert_eq!(removed, Some("b".to_string()));
    assert_eq!(
        log.lock().unwrap().clone(),
        vec!["clear", "start:0:b", "ready:0:b", "clear", "empty"]
    );
}

#[tokio::test]
async fn test_remove_out_of_range_is_none() {
    let _tracing = TestTracing::init();
    let (renderer, _log) = RecordingRenderer::new();
    let mut view = CollectionView::<String>::with_parts(ViewOptions::default(), None, renderer);
    assert_eq!(view.remove_item(3).await.unwrap(), None);
}
