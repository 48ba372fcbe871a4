use serde_json::Value;

/// Recursive primary-key finder.
///
/// Searches a parsed JSON document for values stored under any of the
/// configured key names, at any nesting depth, and returns them in document
/// order. Arrays under a matching key are flattened one level; container
/// values under a matching key are ignored rather than guessed at.
///
/// Used by collection fetches on mutating requests whose key set arrives in
/// the body instead of the query string, e.g. a bulk delete posting
/// `{"filter": {"pks": [4, 8]}}`.
#[derive(Debug, Clone)]
pub struct PkFinder {
    keys: Vec<String>,
}

impl PkFinder {
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Collect every key value found anywhere in `doc`.
    #[must_use]
    pub fn find(&self, doc: &Value) -> Vec<Value> {
        let mut found = Vec::new();
        self.walk(doc, &mut found);
        found
    }

    fn walk(&self, value: &Value, found: &mut Vec<Value>) {
        match value {
            Value::Object(fields) => {
                for (name, v) in fields {
                    if self.keys.iter().any(|k| k == name) {
                        Self::collect(v, found);
                    } else {
                        self.walk(v, found);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, found);
                }
            }
            _ => {}
        }
    }

    fn collect(value: &Value, found: &mut Vec<Value>) {
        match value {
            Value::Array(items) => {
                found.extend(items.iter().filter(|v| Self::is_scalar(v)).cloned());
            }
            v if Self::is_scalar(v) => found.push(v.clone()),
            _ => {}
        }
    }

    fn is_scalar(value: &Value) -> bool {
        matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_finds_top_level_scalar() {
        let finder = PkFinder::new(["id"]);
        assert_eq!(finder.find(&json!({ "id": 7 })), vec![json!(7)]);
    }

    #[test]
    fn test_finds_nested_array() {
        let finder = PkFinder::new(["pks"]);
        let doc = json!({ "filter": { "pks": ["4", "8"] }, "other": 1 });
        assert_eq!(finder.find(&doc), vec![json!("4"), json!("8")]);
    }

    #[test]
    fn test_collects_across_array_items_in_order() {
        let finder = PkFinder::new(["id"]);
        let doc = json!([{ "id": 1 }, { "nested": { "id": 2 } }]);
        assert_eq!(finder.find(&doc), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_ignores_container_values_under_key() {
        let finder = PkFinder::new(["id"]);
        let doc = json!({ "id": { "not": "a key" } });
        assert!(finder.find(&doc).is_empty());
    }

    #[test]
    fn test_no_match_is_empty() {
        let finder = PkFinder::new(["pks"]);
        assert!(finder.find(&json!({ "a": [1, 2] })).is_empty());
    }
}
