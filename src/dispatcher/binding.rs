use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::error::DispatchError;
use crate::request::{AttributeValue, Request, UploadedFile};
use crate::service::{PageWindow, QuerySpec, RequestPagination, RequestQueryModifier};

/// Where one declared parameter's value comes from.
#[derive(Debug, Clone)]
pub enum BindingSource {
    /// Route arguments → merged request parameters → scalar attributes →
    /// the declared default.
    Scalar { default: Option<Value> },
    /// The typed request attribute under the parameter's exact name.
    Attribute,
    /// The injected pagination service, materialized for this request.
    Pagination,
    /// The injected query-modifier service, materialized for this request.
    QueryModifier,
    /// The first uploaded file on the request.
    Upload,
}

/// One entry of an action's binding table.
#[derive(Debug, Clone)]
pub struct ParamBinding {
    pub name: Arc<str>,
    pub source: BindingSource,
}

impl ParamBinding {
    #[must_use]
    pub fn scalar(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            source: BindingSource::Scalar { default: None },
        }
    }

    #[must_use]
    pub fn scalar_with_default(name: &str, default: Value) -> Self {
        Self {
            name: Arc::from(name),
            source: BindingSource::Scalar {
                default: Some(default),
            },
        }
    }

    #[must_use]
    pub fn attribute(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            source: BindingSource::Attribute,
        }
    }

    #[must_use]
    pub fn pagination(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            source: BindingSource::Pagination,
        }
    }

    #[must_use]
    pub fn query_modifier(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            source: BindingSource::QueryModifier,
        }
    }

    #[must_use]
    pub fn upload(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            source: BindingSource::Upload,
        }
    }
}

/// A resolved argument.
pub enum BoundValue {
    Scalar(Value),
    Attribute(AttributeValue),
    Pagination(PageWindow),
    Query(QuerySpec),
    Upload(UploadedFile),
}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            BoundValue::Attribute(_) => f.write_str("Attribute(..)"),
            BoundValue::Pagination(w) => f.debug_tuple("Pagination").field(w).finish(),
            BoundValue::Query(q) => f.debug_tuple("Query").field(q).finish(),
            BoundValue::Upload(u) => f.debug_tuple("Upload").field(&u.file_name).finish(),
        }
    }
}

/// The resolved argument list handed to an action handler, with typed
/// accessors keyed by the declared parameter names.
#[derive(Debug, Default)]
pub struct BoundArgs {
    values: Vec<(Arc<str>, BoundValue)>,
}

impl BoundArgs {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.values
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// A scalar argument as JSON.
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        match self.get(name)? {
            BoundValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// A scalar argument as a string slice, when it is a JSON string.
    #[must_use]
    pub fn scalar_str(&self, name: &str) -> Option<&str> {
        self.scalar(name).and_then(Value::as_str)
    }

    /// An attribute argument downcast to its concrete type - typically the
    /// record or record set the entity pipeline stored.
    #[must_use]
    pub fn record<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        match self.get(name)? {
            BoundValue::Attribute(v) => Arc::clone(v).downcast::<T>().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn pagination(&self, name: &str) -> Option<PageWindow> {
        match self.get(name)? {
            BoundValue::Pagination(w) => Some(*w),
            _ => None,
        }
    }

    #[must_use]
    pub fn query_spec(&self, name: &str) -> Option<&QuerySpec> {
        match self.get(name)? {
            BoundValue::Query(q) => Some(q),
            _ => None,
        }
    }

    #[must_use]
    pub fn upload(&self, name: &str) -> Option<&UploadedFile> {
        match self.get(name)? {
            BoundValue::Upload(u) => Some(u),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validate a binding table at registration time.
pub(super) fn validate(action: &str, bindings: &[ParamBinding]) -> Result<(), DispatchError> {
    for (i, binding) in bindings.iter().enumerate() {
        if bindings[..i].iter().any(|b| b.name == binding.name) {
            return Err(DispatchError::DuplicateParameter {
                parameter: binding.name.to_string(),
                action: action.to_string(),
            });
        }
    }
    Ok(())
}

/// Resolve a binding table against a request.
pub(super) fn resolve(
    action: &str,
    bindings: &[ParamBinding],
    req: &Request,
    pagination: &dyn RequestPagination,
    query_modifier: &dyn RequestQueryModifier,
) -> Result<BoundArgs, DispatchError> {
    // Merged once, shared by every scalar binding.
    let mut merged = None;
    let mut values = Vec::with_capacity(bindings.len());

    for binding in bindings {
        let name = binding.name.as_ref();
        let value = match &binding.source {
            BindingSource::Scalar { default } => {
                let merged = merged.get_or_insert_with(|| req.merged_params());
                let resolved = req
                    .route_param(name)
                    .map(|v| Value::String(v.to_string()))
                    .or_else(|| merged.get(name).cloned())
                    .or_else(|| req.attributes.get_value(name).cloned())
                    .or_else(|| default.clone());
                match resolved {
                    Some(v) => BoundValue::Scalar(v),
                    None => return Err(missing(name, action)),
                }
            }
            BindingSource::Attribute => match req.attributes.raw(name) {
                Some(v) => BoundValue::Attribute(v),
                None => return Err(missing(name, action)),
            },
            BindingSource::Pagination => BoundValue::Pagination(pagination.window(req)),
            BindingSource::QueryModifier => BoundValue::Query(query_modifier.modifiers(req)),
            BindingSource::Upload => match req.uploads.first() {
                Some(u) => BoundValue::Upload(u.clone()),
                None => return Err(missing(name, action)),
            },
        };
        values.push((Arc::clone(&binding.name), value));
    }

    Ok(BoundArgs { values })
}

fn missing(parameter: &str, action: &str) -> DispatchError {
    DispatchError::MissingParameter {
        parameter: parameter.to_string(),
        action: action.to_string(),
    }
}
