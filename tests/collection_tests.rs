use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::Method;
use serde_json::{json, Value};

use hydrant::pipeline::{EntityConfig, EntityPipeline, PipelineError};
use hydrant::request::Request;
use hydrant::response::Response;
use hydrant::store::RecordSet;
use hydrant::Error;

mod common;
mod tracing_util;

use common::{allow_name_species, seeded_store, Pet};
use tracing_util::TestTracing;

fn collection_config(pk_param: &str) -> EntityConfig<Pet> {
    EntityConfig::<Pet>::builder()
        .inject_as("pets")
        .pk_param(pk_param)
        .build()
        .unwrap()
}

/// Run a collection fetch and capture the names of the records that reached
/// `next`.
fn fetched_names(req: Request, config: &EntityConfig<Pet>) -> (u16, Vec<String>) {
    let pipeline = EntityPipeline::new(Arc::new(seeded_store()));
    let names = Arc::new(std::sync::Mutex::new(Vec::new()));
    let names_in_next = Arc::clone(&names);

    let resp = pipeline
        .fetch_collection(
            config,
            req,
            Box::new(move |req| {
                let pets = req
                    .attributes
                    .get::<RecordSet<Pet>>("pets")
                    .expect("pets attribute");
                let mut captured = names_in_next.lock().unwrap();
                *captured = pets.iter().map(|p| p.name.clone()).collect();
                Ok(Response::json(200, pets.to_value()))
            }),
        )
        .unwrap();

    let names = names.lock().unwrap().clone();
    (resp.status, names)
}

#[test]
fn test_json_encoded_and_repeated_params_resolve_same_keys() {
    let _tracing = TestTracing::init();
    let config = collection_config("pks");

    let json_form = Request::new(Method::GET, "/pets").with_query_param("pks", r#"["1","2"]"#);
    let repeated_form = Request::new(Method::GET, "/pets?pks[]=1&pks[]=2");

    let (status_a, names_a) = fetched_names(json_form, &config);
    let (status_b, names_b) = fetched_names(repeated_form, &config);

    assert_eq!(status_a, 200);
    assert_eq!(status_b, 200);
    assert_eq!(names_a, vec!["Rex", "Whiskers"]);
    assert_eq!(names_a, names_b);
}

#[test]
fn test_collection_preserves_requested_order() {
    let _tracing = TestTracing::init();
    let config = collection_config("pks");
    let req = Request::new(Method::GET, "/pets").with_query_param("pks", r#"["3","1"]"#);
    let (_, names) = fetched_names(req, &config);
    assert_eq!(names, vec!["Bubbles", "Rex"]);
}

#[test]
fn test_post_discovers_nested_body_keys() {
    let _tracing = TestTracing::init();
    let config = collection_config("pks");
    let req = Request::new(Method::POST, "/pets/bulk")
        .with_body(json!({ "filter": { "pks": [1, 3] }, "reason": "adoption day" }));
    let (status, names) = fetched_names(req, &config);
    assert_eq!(status, 200);
    assert_eq!(names, vec!["Rex", "Bubbles"]);
}

#[test]
fn test_get_does_not_search_body_for_keys() {
    let _tracing = TestTracing::init();
    let config = collection_config("pks");
    // Same body, but a non-mutating method: the body is not searched.
    let req = Request::new(Method::GET, "/pets").with_body(json!({ "pks": [1, 3] }));
    let (status, names) = fetched_names(req, &config);
    assert_eq!(status, 400);
    assert!(names.is_empty());
}

#[test]
fn test_missing_keys_short_circuit_without_lookup() {
    let _tracing = TestTracing::init();
    let lookups = Arc::new(AtomicUsize::new(0));

    struct CountingFactory {
        store: hydrant::store::MemoryStore<Pet>,
        lookups: Arc<AtomicUsize>,
    }

    struct CountingQuery {
        inner: Box<dyn hydrant::store::RecordQuery<Pet>>,
        lookups: Arc<AtomicUsize>,
    }

    impl hydrant::store::RecordQuery<Pet> for CountingQuery {
        fn apply(&mut self, spec: &hydrant::service::QuerySpec) {
            self.inner.apply(spec);
        }

        fn find_by_pk(
            self: Box<Self>,
            pk: &Value,
        ) -> Result<Option<Pet>, hydrant::store::StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_pk(pk)
        }

        fn find_by_pks(
            self: Box<Self>,
            pks: &[Value],
        ) -> Result<RecordSet<Pet>, hydrant::store::StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_pks(pks)
        }
    }

    impl hydrant::store::QueryFactory<Pet> for CountingFactory {
        fn create_query(&self) -> Box<dyn hydrant::store::RecordQuery<Pet>> {
            Box::new(CountingQuery {
                inner: self.store.create_query(),
                lookups: Arc::clone(&self.lookups),
            })
        }
    }

    let pipeline = EntityPipeline::new(Arc::new(CountingFactory {
        store: seeded_store(),
        lookups: Arc::clone(&lookups),
    }));
    let config = collection_config("pks");

    let req = Request::new(Method::GET, "/pets");
    let resp = pipeline
        .fetch_collection(&config, req, Box::new(|_| panic!("next must not run")))
        .unwrap();

    assert_eq!(resp.status, 400);
    assert_eq!(lookups.load(Ordering::SeqCst), 0);
}

#[test]
fn test_collection_hydration_fails_fast() {
    let _tracing = TestTracing::init();
    let pipeline = EntityPipeline::new(Arc::new(seeded_store()));
    let config = EntityConfig::<Pet>::builder()
        .inject_as("pets")
        .pk_param("pks")
        .hydrate(true)
        .allowed_fields(allow_name_species)
        .build()
        .unwrap();

    let req = Request::new(Method::PUT, "/pets")
        .with_query_param("pks", r#"["1","2"]"#)
        .with_body(json!({ "name": "Renamed" }));
    let err = pipeline
        .fetch_collection(&config, req, Box::new(|_| panic!("next must not run")))
        .unwrap_err();

    match err {
        Error::Pipeline(PipelineError::CollectionHydration { entity }) => {
            assert_eq!(entity, "pet");
        }
        other => panic!("unexpected error: {other}"),
    }
}
