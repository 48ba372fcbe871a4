use std::fmt;

use crate::dispatcher::DispatchError;
use crate::pipeline::PipelineError;
use crate::store::StoreError;

/// Crate-level error.
///
/// The middleware chain has one fallible surface: an entity operation, the
/// dispatch behind it, or the store underneath can fail, and the host
/// framework's error boundary receives whichever it was. Expected outcomes
/// (missing key, record not found) never appear here - those are routed to an
/// [`EntityErrorHandler`](crate::pipeline::EntityErrorHandler) and produce
/// ordinary responses.
#[derive(Debug)]
pub enum Error {
    /// Entity pipeline failure (hook error, store error, unsupported path).
    Pipeline(PipelineError),
    /// Action dispatch failure (unknown action, unresolvable parameter,
    /// handler or response-building error).
    Dispatch(DispatchError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Pipeline(e) => write!(f, "entity pipeline error: {e}"),
            Error::Dispatch(e) => write!(f, "dispatch error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Pipeline(e) => Some(e),
            Error::Dispatch(e) => Some(e),
        }
    }
}

impl From<PipelineError> for Error {
    fn from(e: PipelineError) -> Self {
        Error::Pipeline(e)
    }
}

impl From<DispatchError> for Error {
    fn from(e: DispatchError) -> Self {
        Error::Dispatch(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Pipeline(PipelineError::Store(e))
    }
}
