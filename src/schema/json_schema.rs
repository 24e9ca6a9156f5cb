use super::shape::{Kind, ObjectShape, UnionShape};
use serde_json::{Map, Value, json};

/// Renders a shape as a JSON Schema fragment.
pub fn kind_schema(kind: &Kind) -> Value {
    match kind {
        Kind::String => json!({ "type": "string" }),
        Kind::Bool => json!({ "type": "boolean" }),
        Kind::Number { min, max } => {
            let mut schema = Map::new();
            schema.insert("type".into(), json!("number"));
            if let Some(min) = min {
                schema.insert("minimum".into(), json!(min));
            }
            if let Some(max) = max {
                schema.insert("maximum".into(), json!(max));
            }
            Value::Object(schema)
        }
        Kind::Integer { min, max } => {
            let mut schema = Map::new();
            schema.insert("type".into(), json!("integer"));
            schema.insert("minimum".into(), json!(min.unwrap_or(0)));
            if let Some(max) = max {
                schema.insert("maximum".into(), json!(max));
            }
            Value::Object(schema)
        }
        Kind::UintLike => json!({
            "anyOf": [
                { "type": "integer", "minimum": 0, "maximum": u32::MAX },
                { "type": "string", "pattern": "^[0-9]+$" }
            ]
        }),
        Kind::OneOf(allowed) => json!({ "type": "string", "enum": allowed }),
        Kind::Literal(value) => json!({ "type": "string", "const": value }),
        Kind::Map(values) => json!({
            "type": "object",
            "additionalProperties": kind_schema(values)
        }),
        Kind::Any => json!({}),
        Kind::List { item, max_items } => {
            let mut schema = Map::new();
            schema.insert("type".into(), json!("array"));
            schema.insert("items".into(), kind_schema(item));
            if let Some(max) = max_items {
                schema.insert("maxItems".into(), json!(max));
            }
            Value::Object(schema)
        }
        Kind::Object(shape) => object_schema(shape),
        Kind::Union(shape) => union_schema(shape),
    }
}

pub fn object_schema(shape: &ObjectShape) -> Value {
    object_schema_with(shape, None, &[])
}

/// Like [`object_schema`], with an optional discriminator property and
/// extra required field names.
pub(crate) fn object_schema_with(
    shape: &ObjectShape,
    tag: Option<(&str, &str)>,
    also_required: &[&str],
) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    if let Some((name, value)) = tag {
        properties.insert(name.to_string(), json!({ "type": "string", "const": value }));
        required.push(name.to_string());
    }
    for field in shape.fields {
        properties.insert(field.name.to_string(), kind_schema(&field.kind));
        if field.required || also_required.contains(&field.name) {
            required.push(field.name.to_string());
        }
    }

    json!({
        "type": "object",
        "title": shape.name,
        "properties": properties,
        "required": required,
    })
}

fn union_schema(shape: &UnionShape) -> Value {
    let variants: Vec<Value> = shape
        .variants
        .iter()
        .map(|(tag, variant)| object_schema_with(variant, Some((shape.tag, tag)), &[]))
        .collect();
    json!({ "title": shape.name, "oneOf": variants })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{EDGE, NODE};

    #[test]
    fn edge_schema_lists_required_fields() {
        let schema = object_schema(&EDGE);
        assert_eq!(schema["required"], json!(["id", "transition_condition"]));
        assert_eq!(
            schema["properties"]["transition_condition"]["oneOf"][1]["properties"]["equations"]["maxItems"],
            json!(50)
        );
    }

    #[test]
    fn node_union_pins_the_type_tag() {
        let schema = kind_schema(&Kind::Union(&NODE));
        let variants = schema["oneOf"].as_array().unwrap();
        assert_eq!(variants.len(), 11);
        assert_eq!(variants[1]["properties"]["type"]["const"], json!("end"));
        assert_eq!(variants[1]["required"], json!(["type", "id"]));
    }
}
