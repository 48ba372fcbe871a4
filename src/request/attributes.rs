use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased attribute value.
pub type AttributeValue = Arc<dyn Any + Send + Sync>;

/// Typed per-request attribute map.
///
/// Attributes are how upstream middleware hands values to downstream handlers:
/// the entity pipeline stores fetched records here under a configured name, and
/// the dispatcher's binding table resolves attribute bindings against it.
/// Values are stored behind `Arc`, so reading an attribute never clones the
/// underlying record.
#[derive(Default, Clone)]
pub struct Attributes {
    entries: HashMap<String, AttributeValue>,
}

impl Attributes {
    /// Store a value under `name`, replacing any previous entry.
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.entries.insert(name.into(), Arc::new(value));
    }

    /// Store an already-shared value under `name`.
    pub fn insert_shared(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.entries.insert(name.into(), value);
    }

    /// Fetch the attribute under `name` as a `T`, if present and of that type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.entries
            .get(name)
            .cloned()
            .and_then(|v| v.downcast::<T>().ok())
    }

    /// Fetch a scalar attribute stored as a [`serde_json::Value`].
    ///
    /// Scalar binding reads through this accessor; records and other typed
    /// attributes are invisible to it.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.entries
            .get(name)
            .and_then(|v| (**v).downcast_ref::<Value>())
    }

    /// Fetch the raw shared value under `name`.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<AttributeValue> {
        self.entries.get(name).cloned()
    }

    /// Remove and return the entry under `name`.
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.entries.remove(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
