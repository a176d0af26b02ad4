//! Type coercion of `example` and enum texts stored as plain strings.

use serde_json::{Number, Value};

use crate::content::schema::SchemaItem;

/// How an example text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    Boolean,
    Integer,
    Number,
    /// Embedded JSON (object, array and allOf schemas, media types).
    Json,
    Text,
}

impl ExampleKind {
    /// Interpretation used for a schema's own `example` field.
    pub fn of_schema(schema: &SchemaItem) -> Self {
        match schema {
            SchemaItem::Boolean(_) => ExampleKind::Boolean,
            SchemaItem::Integer(_) => ExampleKind::Integer,
            SchemaItem::Number(_) => ExampleKind::Number,
            SchemaItem::Object(_) | SchemaItem::Array(_) | SchemaItem::AllOf(_) => {
                ExampleKind::Json
            }
            _ => ExampleKind::Text,
        }
    }
}

/// Coerce `raw` according to `kind`.
///
/// Only [`ExampleKind::Json`] can fail; scalars that do not parse fall back
/// to the raw string.
pub fn coerce(kind: ExampleKind, raw: &str) -> Result<Value, serde_json::Error> {
    let trimmed = raw.trim();
    let scalar = match kind {
        ExampleKind::Json => return serde_json::from_str(raw),
        ExampleKind::Text => None,
        ExampleKind::Boolean => match trimmed {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        ExampleKind::Integer => trimmed
            .parse::<i64>()
            .ok()
            .map(Value::from)
            .or_else(|| float(trimmed)),
        ExampleKind::Number => float(trimmed),
    };
    Ok(scalar.unwrap_or_else(|| {
        if kind != ExampleKind::Text {
            log::warn!("example '{raw}' is not a valid {kind:?}, keeping it as text");
        }
        Value::String(raw.to_string())
    }))
}

fn float(text: &str) -> Option<Value> {
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Example of a parameter, typed by the schema it links to.
///
/// Booleans compare strictly against `"true"`.
pub fn parameter_example(schema: Option<&SchemaItem>, raw: &str) -> Value {
    match schema {
        Some(SchemaItem::Boolean(_)) => Value::Bool(raw == "true"),
        Some(SchemaItem::Integer(_)) => scalar(ExampleKind::Integer, raw),
        Some(SchemaItem::Number(_)) => scalar(ExampleKind::Number, raw),
        _ => Value::String(raw.to_string()),
    }
}

fn scalar(kind: ExampleKind, raw: &str) -> Value {
    coerce(kind, raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Values of a comma separated `acceptedValues` field.
pub fn enum_values(kind: ExampleKind, raw: &str) -> Vec<Value> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| scalar(kind, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn coerces_scalars() {
        assert_eq!(coerce(ExampleKind::Boolean, "true").unwrap(), json!(true));
        assert_eq!(coerce(ExampleKind::Boolean, "false").unwrap(), json!(false));
        assert_eq!(coerce(ExampleKind::Integer, "42").unwrap(), json!(42));
        assert_eq!(coerce(ExampleKind::Number, "1.5").unwrap(), json!(1.5));
        assert_eq!(coerce(ExampleKind::Text, "42").unwrap(), json!("42"));
    }

    #[test]
    fn unparseable_scalars_fall_back_to_text() {
        assert_eq!(coerce(ExampleKind::Boolean, "yes").unwrap(), json!("yes"));
        assert_eq!(coerce(ExampleKind::Integer, "many").unwrap(), json!("many"));
    }

    #[test]
    fn json_examples_parse_or_fail() {
        assert_eq!(
            coerce(ExampleKind::Json, r#"{"id": 1, "tags": ["a"]}"#).unwrap(),
            json!({"id": 1, "tags": ["a"]})
        );
        assert!(coerce(ExampleKind::Json, "{id: 1").is_err());
    }

    #[test]
    fn parameter_examples_follow_linked_schema() {
        let integer = SchemaItem::Integer(Default::default());
        let number = SchemaItem::Number(Default::default());
        let boolean = SchemaItem::Boolean(Default::default());
        assert_eq!(parameter_example(Some(&integer), "10"), json!(10));
        assert_eq!(parameter_example(Some(&number), "0.25"), json!(0.25));
        assert_eq!(parameter_example(Some(&boolean), "True"), json!(false));
        assert_eq!(parameter_example(None, "abc"), json!("abc"));
    }

    #[test]
    fn splits_enum_values() {
        assert_eq!(enum_values(ExampleKind::Integer, "1, 2,,3 "), vec![json!(1), json!(2), json!(3)]);
        assert_eq!(enum_values(ExampleKind::Text, "asc,desc"), vec![json!("asc"), json!("desc")]);
        assert!(enum_values(ExampleKind::Text, "").is_empty());
    }
}
