use std::fmt;

use crate::store::StoreError;

/// Entity pipeline failure.
///
/// Expected outcomes (unresolvable key, record not found) never surface here;
/// they are routed to the [`EntityErrorHandler`](super::EntityErrorHandler)
/// and produce ordinary responses.
#[derive(Debug)]
pub enum PipelineError {
    /// An extension hook returned an error.
    Hook {
        entity: &'static str,
        stage: &'static str,
        source: anyhow::Error,
    },
    /// The store backend failed.
    Store(StoreError),
    /// Hydration was requested for a collection fetch. There is no defined
    /// merge semantics for hydrating a batch of records from one parameter
    /// set, so this path fails loudly instead of silently skipping.
    CollectionHydration { entity: &'static str },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Hook {
                entity,
                stage,
                source,
            } => write!(f, "`{stage}` hook failed for entity `{entity}`: {source}"),
            PipelineError::Store(e) => write!(f, "{e}"),
            PipelineError::CollectionHydration { entity } => write!(
                f,
                "collection hydration is not supported (entity `{entity}`)"
            ),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Hook { source, .. } => Some(source.as_ref()),
            PipelineError::Store(e) => Some(e),
            PipelineError::CollectionHydration { .. } => None,
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        PipelineError::Store(e)
    }
}
