use std::fmt;

/// Action dispatch failure.
///
/// Binding failures are programming/configuration errors: the request aborts
/// immediately, there is no fallback resolution.
#[derive(Debug)]
pub enum DispatchError {
    /// No action registered under the requested name.
    UnknownAction { action: String },
    /// A declared parameter resolved to nothing and had no default.
    MissingParameter { parameter: String, action: String },
    /// A binding table declared the same parameter twice.
    DuplicateParameter { parameter: String, action: String },
    /// The action handler itself failed.
    Action {
        action: String,
        source: anyhow::Error,
    },
    /// The response builder rejected the action's payload.
    ResponseBuild {
        action: String,
        source: anyhow::Error,
    },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnknownAction { action } => {
                write!(f, "no action registered under `{action}`")
            }
            DispatchError::MissingParameter { parameter, action } => {
                write!(
                    f,
                    "missing or null required parameter `{parameter}` in `{action}`"
                )
            }
            DispatchError::DuplicateParameter { parameter, action } => {
                write!(
                    f,
                    "parameter `{parameter}` declared more than once in `{action}`"
                )
            }
            DispatchError::Action { action, source } => {
                write!(f, "action `{action}` failed: {source}")
            }
            DispatchError::ResponseBuild { action, source } => {
                write!(f, "building response for `{action}` failed: {source}")
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Action { source, .. } | DispatchError::ResponseBuild { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}
