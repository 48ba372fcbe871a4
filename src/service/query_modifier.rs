use serde_json::Value;

use crate::request::Request;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One sort key: a field name and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

impl SortKey {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// One equality filter: a field name and the value it must hold.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    #[must_use]
    pub fn new(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

/// Declarative query modifiers derived from a request, consumed by
/// [`RecordQuery::apply`](crate::store::RecordQuery::apply).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub sort: Vec<SortKey>,
    pub filters: Vec<FieldFilter>,
}

impl QuerySpec {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sort.is_empty() && self.filters.is_empty()
    }
}

/// Derives a [`QuerySpec`] from a request.
pub trait RequestQueryModifier: Send + Sync {
    fn modifiers(&self, req: &Request) -> QuerySpec;
}

/// Default query modifier.
///
/// `sort=-name,species` becomes descending `name` then ascending `species`;
/// every `filter_<field>=<value>` parameter becomes an equality filter.
#[derive(Debug, Clone)]
pub struct ParamQueryModifier {
    pub sort_param: String,
    pub filter_prefix: String,
}

impl Default for ParamQueryModifier {
    fn default() -> Self {
        Self {
            sort_param: "sort".to_string(),
            filter_prefix: "filter_".to_string(),
        }
    }
}

impl RequestQueryModifier for ParamQueryModifier {
    fn modifiers(&self, req: &Request) -> QuerySpec {
        let mut spec = QuerySpec::default();
        if let Some(sort) = req.query_param(&self.sort_param) {
            for field in sort.split(',').filter(|s| !s.is_empty()) {
                match field.strip_prefix('-') {
                    Some(name) if !name.is_empty() => spec.sort.push(SortKey::desc(name)),
                    None => spec.sort.push(SortKey::asc(field)),
                    Some(_) => {}
                }
            }
        }
        for (name, value) in &req.query_params {
            if let Some(field) = name.strip_prefix(&self.filter_prefix) {
                if !field.is_empty() {
                    spec.filters
                        .push(FieldFilter::new(field, Value::String(value.clone())));
                }
            }
        }
        spec
    }
}
