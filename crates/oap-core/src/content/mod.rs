//! The content graph exported from the CMS and read-only access to it.

pub mod item;
pub mod schema;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{LoadError, ResolveError};
use item::*;
use schema::*;

/// Operation recorded by the exporter when the specification was removed.
pub const DELETE_OPERATION: &str = "delete";

/// Placeholder for an unset callout type or code sample language.
pub const NOT_SPECIFIED: &str = "not_specified";

/// All items of one export, keyed by codename.
#[derive(Debug, Clone, Default)]
pub struct ContentGraph {
    items: IndexMap<String, ContentItem>,
}

macro_rules! typed_getter {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $ty:ty, $expected:expr) => {
        $(#[$meta])*
        pub fn $name(&self, codename: &str) -> Result<&$ty, ResolveError> {
            match self.get(codename)? {
                ContentItem::$variant(inner) => Ok(inner),
                other => Err(ResolveError::UnexpectedItemType {
                    codename: codename.to_string(),
                    expected: $expected,
                    found: other.content_type().to_string(),
                }),
            }
        }
    };
}

impl ContentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, codename: impl Into<String>, item: ContentItem) {
        self.items.insert(codename.into(), item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentItem)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up an item, failing with `MissingChildItem` when it is absent.
    pub fn get(&self, codename: &str) -> Result<&ContentItem, ResolveError> {
        self.items
            .get(codename)
            .ok_or_else(|| ResolveError::MissingChildItem {
                codename: codename.to_string(),
            })
    }

    typed_getter!(specification, Specification, Specification, "a specification");
    typed_getter!(category, Category, Category, "a category");
    typed_getter!(path_operation, PathOperation, PathOperation, "a path operation");
    typed_getter!(parameter, Parameter, Parameter, "a parameter");
    typed_getter!(request_body, RequestBody, RequestBody, "a request body");
    typed_getter!(response, Response, Response, "a response");
    typed_getter!(server, Server, Server, "a server");
    typed_getter!(contact, Contact, Contact, "a contact");
    typed_getter!(license, License, License, "a license");
    typed_getter!(security_scheme, SecurityScheme, SecurityScheme, "a security scheme");
    typed_getter!(discriminator, Discriminator, Discriminator, "a discriminator");
    typed_getter!(
        discriminator_map_item,
        DiscriminatorMapItem,
        DiscriminatorMapItem,
        "a discriminator map item"
    );
    typed_getter!(callout, Callout, Callout, "a callout");
    typed_getter!(code_sample, CodeSample, CodeSample, "a code sample");
    typed_getter!(code_samples, CodeSamples, CodeSamples, "a code samples group");
    typed_getter!(
        /// Look up a schema node of any variant.
        schema,
        Schema,
        SchemaItem,
        "a schema"
    );
}

/// A preprocessed export: the graph plus the codename of its root item.
#[derive(Debug, Clone)]
pub struct ContentPackage {
    pub specification_codename: String,
    pub operation: Option<String>,
    pub graph: ContentGraph,
}

impl ContentPackage {
    /// True when the exporter signalled that the specification was deleted.
    pub fn is_delete(&self) -> bool {
        self.operation
            .as_deref()
            .is_some_and(|op| op.eq_ignore_ascii_case(DELETE_OPERATION))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPackage {
    zapi_specification_codename: String,
    #[serde(default)]
    operation: Option<String>,
    #[serde(default)]
    items: IndexMap<String, serde_json::Value>,
}

/// Parse an export from JSON.
pub fn from_json(input: &str) -> Result<ContentPackage, LoadError> {
    let raw: RawPackage = serde_json::from_str(input)?;
    build_package(raw)
}

/// Parse an export from YAML.
pub fn from_yaml(input: &str) -> Result<ContentPackage, LoadError> {
    let raw: RawPackage = serde_yaml_ng::from_str(input)?;
    build_package(raw)
}

fn build_package(raw: RawPackage) -> Result<ContentPackage, LoadError> {
    let mut graph = ContentGraph::new();
    for (codename, value) in raw.items {
        let item = item_from_value(&codename, value)?;
        graph.insert(codename, item);
    }
    Ok(ContentPackage {
        specification_codename: raw.zapi_specification_codename,
        operation: raw.operation,
        graph,
    })
}

/// Convert one raw export record into a typed item.
pub fn item_from_value(codename: &str, value: serde_json::Value) -> Result<ContentItem, LoadError> {
    let invalid = |message: String| LoadError::InvalidItem {
        codename: codename.to_string(),
        message,
    };

    let content_type = value
        .get("contentType")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| invalid("missing contentType".to_string()))?
        .to_string();

    macro_rules! typed {
        ($wrap:expr) => {
            serde_json::from_value(value)
                .map($wrap)
                .map_err(|e| invalid(e.to_string()))?
        };
    }

    let item = match content_type.as_str() {
        SPECIFICATION => typed!(ContentItem::Specification),
        CATEGORY => typed!(ContentItem::Category),
        PATH_OPERATION => typed!(ContentItem::PathOperation),
        PARAMETER => typed!(ContentItem::Parameter),
        REQUEST_BODY => typed!(ContentItem::RequestBody),
        RESPONSE => typed!(ContentItem::Response),
        SERVER => typed!(ContentItem::Server),
        CONTACT => typed!(ContentItem::Contact),
        LICENSE => typed!(ContentItem::License),
        SECURITY_SCHEME => typed!(ContentItem::SecurityScheme),
        DISCRIMINATOR => typed!(ContentItem::Discriminator),
        DISCRIMINATOR_MAP_ITEM => typed!(ContentItem::DiscriminatorMapItem),
        CALLOUT => typed!(ContentItem::Callout),
        CODE_SAMPLE => typed!(ContentItem::CodeSample),
        CODE_SAMPLES => typed!(ContentItem::CodeSamples),
        SCHEMA_ALL_OF => typed!(|s| ContentItem::Schema(SchemaItem::AllOf(s))),
        SCHEMA_ANY_OF => typed!(|s| ContentItem::Schema(SchemaItem::AnyOf(s))),
        SCHEMA_ARRAY => typed!(|s| ContentItem::Schema(SchemaItem::Array(s))),
        SCHEMA_BOOLEAN => typed!(|s| ContentItem::Schema(SchemaItem::Boolean(s))),
        SCHEMA_INTEGER => typed!(|s| ContentItem::Schema(SchemaItem::Integer(s))),
        SCHEMA_NUMBER => typed!(|s| ContentItem::Schema(SchemaItem::Number(s))),
        SCHEMA_OBJECT => typed!(|s| ContentItem::Schema(SchemaItem::Object(s))),
        SCHEMA_ONE_OF => typed!(|s| ContentItem::Schema(SchemaItem::OneOf(s))),
        SCHEMA_STRING => typed!(|s| ContentItem::Schema(SchemaItem::String(s))),
        PROPERTY_REFERENCE => {
            typed!(|s| ContentItem::Schema(SchemaItem::PropertyReference(s)))
        }
        _ => ContentItem::Unknown { content_type },
    };
    Ok(item)
}

/// `Some(value)` unless the text is empty or only whitespace.
pub fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// The single selected option of a multiple-choice element.
///
/// Zero or several selections count as "not set".
pub fn single_choice(values: &[String]) -> Option<&str> {
    match values {
        [only] => Some(only.as_str()),
        _ => None,
    }
}

/// A boolean stored as a single-choice element (`["true"]` / `["false"]`).
pub fn boolean_choice(values: &[String]) -> Option<bool> {
    single_choice(values).map(|value| value == "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "zapiSpecificationCodename": "api",
        "items": {
            "api": { "contentType": "zapi_specification", "title": "Delivery API", "version": "2" },
            "limit": { "contentType": "zapi_parameter", "name": "limit", "location": ["query"], "schema": ["int"] },
            "int": { "contentType": "zapi_schema__integer", "name": "", "minimum": 1, "maximum": null },
            "odd": { "contentType": "article", "title": "Not part of the API" }
        }
    }"#;

    #[test]
    fn parses_typed_items() {
        let package = from_json(EXPORT).unwrap();
        assert_eq!(package.specification_codename, "api");
        assert!(!package.is_delete());
        assert_eq!(package.graph.len(), 4);

        let spec = package.graph.specification("api").unwrap();
        assert_eq!(spec.title, "Delivery API");
        assert!(spec.categories.is_empty());

        match package.graph.schema("int").unwrap() {
            SchemaItem::Integer(s) => {
                assert_eq!(s.minimum.as_ref().and_then(|n| n.as_i64()), Some(1));
                assert!(s.maximum.is_none());
            }
            other => panic!("expected integer schema, got {}", other.content_type()),
        }
    }

    #[test]
    fn unknown_content_types_are_kept() {
        let package = from_json(EXPORT).unwrap();
        let item = package.graph.get("odd").unwrap();
        assert_eq!(item.content_type(), "article");
        assert!(matches!(item, ContentItem::Unknown { .. }));
    }

    #[test]
    fn missing_item_is_reported() {
        let package = from_json(EXPORT).unwrap();
        let err = package.graph.get("nope").unwrap_err();
        assert!(matches!(err, ResolveError::MissingChildItem { codename } if codename == "nope"));
    }

    #[test]
    fn wrong_item_type_is_reported() {
        let package = from_json(EXPORT).unwrap();
        let err = package.graph.parameter("int").unwrap_err();
        match err {
            ResolveError::UnexpectedItemType { found, .. } => {
                assert_eq!(found, "zapi_schema__integer");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn parses_yaml_exports() {
        let yaml = r#"
zapiSpecificationCodename: api
operation: delete
items:
  api:
    contentType: zapi_specification
    title: Delivery API
"#;
        let package = from_yaml(yaml).unwrap();
        assert!(package.is_delete());
        assert_eq!(package.graph.specification("api").unwrap().title, "Delivery API");
    }

    #[test]
    fn missing_content_type_is_invalid() {
        let json = r#"{ "zapiSpecificationCodename": "api", "items": { "api": { "title": "x" } } }"#;
        assert!(matches!(
            from_json(json),
            Err(LoadError::InvalidItem { codename, .. }) if codename == "api"
        ));
    }

    #[test]
    fn choice_helpers() {
        let one = vec!["true".to_string()];
        let two = vec!["a".to_string(), "b".to_string()];
        assert_eq!(boolean_choice(&one), Some(true));
        assert_eq!(boolean_choice(&[]), None);
        assert_eq!(single_choice(&two), None);
        assert_eq!(non_empty(" "), None);
        assert_eq!(non_empty("text").as_deref(), Some("text"));
    }
}
