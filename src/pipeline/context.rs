use serde_json::Value;

use crate::ids::RequestId;

/// The primary key state of an entity operation.
///
/// Invariant: a fetch never executes a lookup while the key is unresolved -
/// the pipeline short-circuits to the error handler instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryKey {
    /// No key resolved yet.
    Unset,
    /// A single-record key.
    One(Value),
    /// A key set for a batch lookup.
    Many(Vec<Value>),
}

impl PrimaryKey {
    /// Whether a lookup may proceed. An empty key set counts as unresolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            PrimaryKey::Unset => false,
            PrimaryKey::One(_) => true,
            PrimaryKey::Many(pks) => !pks.is_empty(),
        }
    }

    /// The single-record key, if that is what this is.
    #[must_use]
    pub fn as_one(&self) -> Option<&Value> {
        match self {
            PrimaryKey::One(pk) => Some(pk),
            _ => None,
        }
    }

    /// Every key this resolves to: one, many, or none.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        match self {
            PrimaryKey::Unset => Vec::new(),
            PrimaryKey::One(pk) => vec![pk.clone()],
            PrimaryKey::Many(pks) => pks.clone(),
        }
    }
}

/// Per-request context of one entity operation.
///
/// Created at the start of each pipeline operation, mutated by the
/// `before_fetch` hook (which may enforce or rewrite the primary key), and
/// handed to the error handler when an operation short-circuits.
#[derive(Debug, Clone)]
pub struct EntityContext {
    entity: &'static str,
    request_id: RequestId,
    pk: PrimaryKey,
}

impl EntityContext {
    #[must_use]
    pub fn new(entity: &'static str, request_id: RequestId) -> Self {
        Self {
            entity,
            request_id,
            pk: PrimaryKey::Unset,
        }
    }

    #[must_use]
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn primary_key(&self) -> &PrimaryKey {
        &self.pk
    }

    pub fn set_primary_key(&mut self, pk: PrimaryKey) {
        self.pk = pk;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_key_set_is_unresolved() {
        assert!(!PrimaryKey::Unset.is_resolved());
        assert!(!PrimaryKey::Many(vec![]).is_resolved());
        assert!(PrimaryKey::One(json!(1)).is_resolved());
        assert!(PrimaryKey::Many(vec![json!(1)]).is_resolved());
    }

    #[test]
    fn test_values_flattens_all_forms() {
        assert!(PrimaryKey::Unset.values().is_empty());
        assert_eq!(PrimaryKey::One(json!(1)).values(), vec![json!(1)]);
        assert_eq!(
            PrimaryKey::Many(vec![json!(1), json!(2)]).values(),
            vec![json!(1), json!(2)]
        );
    }
}
