//! Recursive removal of empty values from a built document.

use serde_json::{Map, Value};

use crate::mapping::{CONTEXT_KEY, TYPE_KEY};

/// Top-level keys that are never pruned.
pub const EXEMPT_KEYS: [&str; 2] = [CONTEXT_KEY, TYPE_KEY];

/// Strip nulls, empty strings, empty arrays and empty objects, bottom-up.
///
/// A nested object left holding only JSON-LD keywords (such as a
/// CategoryCode reduced to its `@type`) counts as empty. The top-level
/// `@context` and `@type` entries are kept as they are. Pruning an already
/// pruned document returns it unchanged.
pub fn prune(doc: Value) -> Value {
    match doc {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                if EXEMPT_KEYS.contains(&key.as_str()) {
                    out.insert(key, value);
                } else if let Some(value) = prune_value(value) {
                    out.insert(key, value);
                }
            }
            Value::Object(out)
        }
        other => prune_value(other).unwrap_or(Value::Null),
    }
}

fn prune_value(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) => {
            let kept: Vec<Value> = items.into_iter().filter_map(prune_value).collect();
            (!kept.is_empty()).then_some(Value::Array(kept))
        }
        Value::Object(map) => {
            let kept: Map<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| prune_value(v).map(|v| (k, v)))
                .collect();
            let has_data = kept.keys().any(|k| !is_keyword(k));
            has_data.then_some(Value::Object(kept))
        }
        other => Some(other),
    }
}

fn is_keyword(key: &str) -> bool {
    key.starts_with('@')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_removes_nulls_and_empty_containers() {
        let doc = json!({
            "@context": "http://schema.org",
            "@type": ["BioChemEntity", "Sample"],
            "name": null,
            "identifier": ["MMP1"],
            "dataset": [],
            "extra": {}
        });

        assert_eq!(
            prune(doc),
            json!({
                "@context": "http://schema.org",
                "@type": ["BioChemEntity", "Sample"],
                "identifier": ["MMP1"]
            })
        );
    }

    #[test]
    fn test_empty_string_is_pruned() {
        let doc = json!({"@context": "c", "@type": ["T"], "description": ""});

        assert_eq!(prune(doc), json!({"@context": "c", "@type": ["T"]}));
    }

    #[test]
    fn test_nested_null_members_are_pruned() {
        let doc = json!({
            "@context": "c",
            "@type": ["T"],
            "additionalProperty": [{
                "@type": "PropertyValue",
                "name": "Organism",
                "value": "X",
                "valueReference": [{
                    "@type": "CategoryCode",
                    "name": "X",
                    "codeValue": null,
                    "url": null
                }]
            }]
        });

        assert_eq!(
            prune(doc)["additionalProperty"][0]["valueReference"],
            json!([{"@type": "CategoryCode", "name": "X"}])
        );
    }

    #[test]
    fn test_keyword_only_objects_collapse() {
        let doc = json!({
            "@context": "c",
            "@type": ["T"],
            "additionalProperty": [{
                "@type": "PropertyValue",
                "name": "Organism",
                "value": "X",
                "valueReference": [{
                    "@type": "CategoryCode",
                    "name": null,
                    "codeValue": null,
                    "url": null
                }]
            }]
        });

        assert_eq!(
            prune(doc)["additionalProperty"],
            json!([{"@type": "PropertyValue", "name": "Organism", "value": "X"}])
        );
    }

    #[test]
    fn test_exempt_constants_survive() {
        let doc = json!({
            "@context": "http://schema.org",
            "@type": [],
            "identifier": [],
            "name": null
        });

        assert_eq!(
            prune(doc),
            json!({"@context": "http://schema.org", "@type": []})
        );
    }

    #[test]
    fn test_prune_is_idempotent() {
        let doc = json!({
            "@context": "c",
            "@type": ["T"],
            "identifier": [null, "A", ""],
            "nested": {"a": {"b": null}, "c": [[], {}]},
            "flag": false,
            "count": 0
        });

        let once = prune(doc);
        let twice = prune(once.clone());

        assert_eq!(once, twice);
        assert_eq!(
            once,
            json!({"@context": "c", "@type": ["T"], "identifier": ["A"], "flag": false, "count": 0})
        );
    }
}
