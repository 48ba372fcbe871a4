use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::{QueryFactory, Record, RecordQuery, RecordSet, StoreError};
use crate::service::{QuerySpec, SortOrder};

/// Canonical string form of a primary key, so `7`, `"7"`, and `7.0`-free JSON
/// numbers address the same row regardless of which form the request carried.
fn key_of(pk: &Value) -> String {
    match pk {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    a == b || key_of(a) == key_of(b)
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => key_of(x).cmp(&key_of(y)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

struct State<R> {
    rows: BTreeMap<String, R>,
    next_id: i64,
}

/// Thread-safe in-memory record store.
///
/// Implements the whole persistence seam for tests, demos, and fixture
/// backends: rows are kept in a map keyed by canonical primary key, and new
/// records get sequential integer keys on save.
pub struct MemoryStore<R> {
    state: Arc<RwLock<State<R>>>,
}

impl<R> Clone for MemoryStore<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> MemoryStore<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Persist a record, assigning a sequential integer key if it is new.
    pub fn save(&self, record: &mut R) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Backend {
            message: "store lock poisoned".to_string(),
        })?;
        let pk = match record.primary_key() {
            Some(pk) => pk,
            None => {
                let id = state.next_id;
                state.next_id += 1;
                let pk = Value::from(id);
                record.set_primary_key(pk.clone());
                pk
            }
        };
        debug!(entity = R::ENTITY, pk = %pk, "Record saved");
        state.rows.insert(key_of(&pk), record.clone());
        Ok(())
    }

    /// Remove the record stored under `pk`.
    pub fn delete(&self, pk: &Value) -> Result<Option<R>, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Backend {
            message: "store lock poisoned".to_string(),
        })?;
        Ok(state.rows.remove(&key_of(pk)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.rows.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, pk: &Value) -> Result<Option<R>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::Backend {
            message: "store lock poisoned".to_string(),
        })?;
        Ok(state.rows.get(&key_of(pk)).cloned())
    }
}

impl<R: Record> QueryFactory<R> for MemoryStore<R> {
    fn create_query(&self) -> Box<dyn RecordQuery<R>> {
        Box::new(MemoryQuery {
            store: self.clone(),
            spec: QuerySpec::default(),
        })
    }
}

/// Query over a [`MemoryStore`]; filters are equality checks against the
/// record's serialized fields, sort keys apply to batch lookups.
struct MemoryQuery<R> {
    store: MemoryStore<R>,
    spec: QuerySpec,
}

impl<R: Record> MemoryQuery<R> {
    fn matches(&self, record: &R) -> bool {
        if self.spec.filters.is_empty() {
            return true;
        }
        let fields = record.to_value();
        self.spec.filters.iter().all(|filter| {
            fields
                .get(&filter.field)
                .is_some_and(|v| values_equal(v, &filter.value))
        })
    }

    fn sort(&self, records: &mut [R]) {
        // Stable sort applied per key in reverse declaration order gives
        // multi-key ordering with the first key most significant.
        for key in self.spec.sort.iter().rev() {
            records.sort_by(|a, b| {
                let ordering = compare_fields(
                    a.to_value().get(&key.field),
                    b.to_value().get(&key.field),
                );
                match key.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
    }
}

impl<R: Record> RecordQuery<R> for MemoryQuery<R> {
    fn apply(&mut self, spec: &QuerySpec) {
        self.spec.sort.extend(spec.sort.iter().cloned());
        self.spec.filters.extend(spec.filters.iter().cloned());
    }

    fn find_by_pk(self: Box<Self>, pk: &Value) -> Result<Option<R>, StoreError> {
        let record = self.store.get(pk)?;
        Ok(record.filter(|r| self.matches(r)))
    }

    fn find_by_pks(self: Box<Self>, pks: &[Value]) -> Result<RecordSet<R>, StoreError> {
        let mut records = Vec::with_capacity(pks.len());
        for pk in pks {
            if let Some(record) = self.store.get(pk)? {
                if self.matches(&record) {
                    records.push(record);
                }
            }
        }
        self.sort(&mut records);
        Ok(RecordSet::new(records))
    }
}
