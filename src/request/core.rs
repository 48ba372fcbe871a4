use http::Method;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::debug;

use super::{Attributes, UploadedFile};
use crate::ids::RequestId;

/// Maximum route/query parameters before heap allocation.
/// Most CRUD routes carry well under 8 parameters.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated parameter storage.
///
/// Names use `Arc<str>` because they repeat across requests (route definitions,
/// well-known query keys) and clone in O(1); values are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Stack-allocated header storage, same layout as [`ParamVec`] with a larger
/// inline capacity.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Parse query-string parameters from a path or raw query string.
///
/// Everything after the first `?` is form-decoded. A `name[]` key (the
/// PHP-style array convention) is normalized to repeated `name` entries, so
/// `pks[]=1&pks[]=2` and `pks=1&pks=2` produce the same [`ParamVec`]. Order
/// and duplicates are preserved; use the last-write-wins getters for scalar
/// access and [`Request::query_param_values`] for multi-value access.
#[must_use]
pub fn parse_query_params(path: &str) -> ParamVec {
    let query = match path.split_once('?') {
        Some((_, q)) => q,
        None if path.contains('=') => path,
        None => return ParamVec::new(),
    };
    let mut params = ParamVec::new();
    for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
        let name = k.strip_suffix("[]").unwrap_or(&k);
        params.push((Arc::from(name), v.to_string()));
    }
    params
}

/// A parsed HTTP request as the pipeline and dispatcher see it.
///
/// Built by the host adapter once per incoming request and threaded through
/// the middleware chain by value. Mutability is deliberate: the entity
/// pipeline writes fetched records into [`Request::attributes`] before
/// delegating downstream.
#[derive(Debug, Clone)]
pub struct Request {
    /// Correlation id, logged on every pipeline and dispatch event.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request path without the query string.
    pub path: String,
    /// Parameters extracted from the matched route (e.g. `{id}`).
    pub route_params: ParamVec,
    /// Query-string parameters.
    pub query_params: ParamVec,
    /// HTTP headers, lowercase names.
    pub headers: HeaderVec,
    /// Request body parsed as JSON, if any.
    pub body: Option<Value>,
    /// Uploaded files, in multipart order.
    pub uploads: Vec<UploadedFile>,
    /// Typed per-request attributes.
    pub attributes: Attributes,
}

impl Request {
    /// Create a request for the given method and path.
    ///
    /// A query string in `path` is split off and parsed into
    /// [`Request::query_params`].
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        let query_params = parse_query_params(path);
        let path = path.split('?').next().unwrap_or("/").to_string();
        Self {
            request_id: RequestId::new(),
            method,
            path,
            route_params: ParamVec::new(),
            query_params,
            headers: HeaderVec::new(),
            body: None,
            uploads: Vec::new(),
            attributes: Attributes::default(),
        }
    }

    #[must_use]
    pub fn with_route_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.route_params.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn with_query_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query_params.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .push((Arc::from(name.to_ascii_lowercase().as_str()), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_upload(mut self, upload: UploadedFile) -> Self {
        self.uploads.push(upload);
        self
    }

    /// Get a route parameter by name (last write wins).
    #[inline]
    #[must_use]
    pub fn route_param(&self, name: &str) -> Option<&str> {
        self.route_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name (last write wins).
    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every query value registered under `name`, in order of appearance.
    #[must_use]
    pub fn query_param_values(&self, name: &str) -> Vec<&str> {
        self.query_params
            .iter()
            .filter(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Get a header by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Query parameters merged with the fields of a JSON-object body.
    ///
    /// Body fields win on key collision. Non-object bodies contribute nothing.
    /// This is the parameter set hydration and scalar binding read from.
    #[must_use]
    pub fn merged_params(&self) -> Map<String, Value> {
        let mut merged = Map::new();
        for (k, v) in &self.query_params {
            merged.insert(k.to_string(), Value::String(v.clone()));
        }
        if let Some(Value::Object(fields)) = &self.body {
            for (k, v) in fields {
                merged.insert(k.clone(), v.clone());
            }
        }
        debug!(
            request_id = %self.request_id,
            param_count = merged.len(),
            "Request parameters merged"
        );
        merged
    }

    /// Whether this request uses a mutating HTTP method
    /// (POST, PUT, PATCH, DELETE).
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self.method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_query_params() {
        let q = parse_query_params("/p?x=1&y=2");
        assert_eq!(q.len(), 2);
        assert_eq!(q[0].1, "1");
        assert_eq!(q[1].1, "2");
    }

    #[test]
    fn test_array_suffix_normalized() {
        let req = Request::new(Method::GET, "/pets?pks[]=1&pks[]=2");
        assert_eq!(req.query_param_values("pks"), vec!["1", "2"]);
    }

    #[test]
    fn test_last_write_wins() {
        let req = Request::new(Method::GET, "/pets?limit=10&limit=20");
        assert_eq!(req.query_param("limit"), Some("20"));
    }

    #[test]
    fn test_merged_params_body_wins() {
        let req = Request::new(Method::POST, "/pets?name=query&species=cat")
            .with_body(json!({ "name": "body" }));
        let merged = req.merged_params();
        assert_eq!(merged.get("name"), Some(&json!("body")));
        assert_eq!(merged.get("species"), Some(&json!("cat")));
    }

    #[test]
    fn test_non_object_body_contributes_nothing() {
        let req = Request::new(Method::POST, "/pets?a=1").with_body(json!([1, 2]));
        assert_eq!(req.merged_params().len(), 1);
    }
}
