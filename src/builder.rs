//! JSON-LD document construction from a flat record and a mapping table.
//!
//! [`build`] produces the full, unpruned document. Scalar fields that do not
//! resolve are emitted as `null` and CategoryCode members that do not resolve
//! are emitted as `null`; [`prune`](crate::prune::prune) removes them
//! afterwards.

use serde_json::{Map, Value};

use crate::mapping::{
    CategoryCodeDescriptor, FieldMapping, MappingSpec, PropertyDescriptor, CONTEXT_KEY, TYPE_KEY,
};
use crate::record::FlatRecord;

pub const PROPERTY_VALUE_TYPE: &str = "PropertyValue";
pub const CATEGORY_CODE_TYPE: &str = "CategoryCode";

/// Build the unpruned JSON-LD document for one record.
pub fn build(flat: &FlatRecord, spec: &MappingSpec) -> Value {
    let mut doc = Map::new();

    doc.insert(CONTEXT_KEY.to_string(), Value::String(spec.context.clone()));
    doc.insert(
        TYPE_KEY.to_string(),
        Value::Array(spec.types.iter().cloned().map(Value::String).collect()),
    );

    for field in &spec.fields {
        let value = match field {
            FieldMapping::Scalar { source, .. } => resolve(flat, source),
            FieldMapping::List { sources, .. } => Value::Array(
                sources
                    .iter()
                    .filter_map(|s| flat.get(s))
                    .map(|v| Value::String(v.to_string()))
                    .collect(),
            ),
            FieldMapping::AdditionalProperty { properties, .. } => Value::Array(
                properties
                    .iter()
                    .filter_map(|p| property_value(flat, p))
                    .collect(),
            ),
        };

        doc.insert(field.key().to_string(), value);
    }

    Value::Object(doc)
}

fn resolve(flat: &FlatRecord, field: &str) -> Value {
    flat.get(field)
        .map(|v| Value::String(v.to_string()))
        .unwrap_or(Value::Null)
}

/// A PropertyValue is only emitted when its value field resolves.
fn property_value(flat: &FlatRecord, descriptor: &PropertyDescriptor) -> Option<Value> {
    let value = flat.get(&descriptor.value)?;

    let mut prop = Map::new();
    prop.insert("@type".to_string(), Value::String(PROPERTY_VALUE_TYPE.to_string()));
    prop.insert("name".to_string(), Value::String(descriptor.name.clone()));
    prop.insert("value".to_string(), Value::String(value.to_string()));

    if !descriptor.value_reference.is_empty() {
        let codes = descriptor
            .value_reference
            .iter()
            .map(|r| category_code(flat, r))
            .collect();
        prop.insert("valueReference".to_string(), Value::Array(codes));
    }

    Some(Value::Object(prop))
}

fn category_code(flat: &FlatRecord, descriptor: &CategoryCodeDescriptor) -> Value {
    let member = |field: &Option<String>| {
        field
            .as_deref()
            .map(|f| resolve(flat, f))
            .unwrap_or(Value::Null)
    };

    let mut code = Map::new();
    code.insert("@type".to_string(), Value::String(CATEGORY_CODE_TYPE.to_string()));
    code.insert("name".to_string(), member(&descriptor.name));
    code.insert("codeValue".to_string(), member(&descriptor.code_value));
    code.insert("url".to_string(), member(&descriptor.url));

    Value::Object(code)
}
