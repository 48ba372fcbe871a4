use serde_json::{Map, Value};
use std::fmt;

/// An active record: one persisted row with load/save behavior attached by the
/// host's ORM.
///
/// The pipeline needs very little from a record: a name for logging and error
/// responses, primary-key access, field hydration, and serialization for
/// response payloads. `Default` is the "new empty record" constructor the
/// create operation uses; `Clone` lets handlers take an owned copy of a record
/// shared through request attributes.
pub trait Record: Default + Clone + Send + Sync + 'static {
    /// Entity name used in logs and error responses (e.g. `"pet"`).
    const ENTITY: &'static str;

    /// The record's primary key, or `None` while the record is new.
    fn primary_key(&self) -> Option<Value>;

    /// Assign the primary key, typically when a store persists a new record.
    fn set_primary_key(&mut self, pk: Value);

    /// Merge the given fields into the record.
    ///
    /// Callers are responsible for allow-listing: the pipeline only ever
    /// passes fields that survived the configured allow-list callback.
    fn hydrate(&mut self, fields: &Map<String, Value>);

    /// Serialize the record for response payloads.
    fn to_value(&self) -> Value;

    /// A record is new until it has been saved under a primary key.
    fn is_new(&self) -> bool {
        self.primary_key().is_none()
    }
}

/// Ordered sequence of records from a multi-key lookup.
///
/// Preserves the order keys were requested in; missing keys simply produce no
/// entry.
#[derive(Debug, Clone)]
pub struct RecordSet<R> {
    records: Vec<R>,
}

impl<R: Record> RecordSet<R> {
    #[must_use]
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<R> {
        self.records
    }

    /// Serialize every record, in order.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(self.records.iter().map(Record::to_value).collect())
    }
}

impl<R: Record> Default for RecordSet<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R> IntoIterator for RecordSet<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a RecordSet<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Failure surface of the store backend.
///
/// These are unexpected conditions - a record that simply does not exist is
/// `Ok(None)` from the query, not an error - so the pipeline propagates them
/// uncaught to the host's error boundary.
#[derive(Debug)]
pub enum StoreError {
    /// The backend failed to execute the lookup or write.
    Backend { message: String },
    /// A write needed a primary key the record could not provide.
    MissingPrimaryKey { entity: &'static str },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Backend { message } => write!(f, "store backend error: {message}"),
            StoreError::MissingPrimaryKey { entity } => {
                write!(f, "cannot persist `{entity}` without a primary key")
            }
        }
    }
}

impl std::error::Error for StoreError {}
