//! Schema-bearing content items.

use serde::Deserialize;

use super::non_empty;

pub const SCHEMA_ALL_OF: &str = "zapi_schema__allof";
pub const SCHEMA_ANY_OF: &str = "zapi_schema__anyof";
pub const SCHEMA_ARRAY: &str = "zapi_schema__array";
pub const SCHEMA_BOOLEAN: &str = "zapi_schema__boolean";
pub const SCHEMA_INTEGER: &str = "zapi_schema__integer";
pub const SCHEMA_NUMBER: &str = "zapi_schema__number";
pub const SCHEMA_OBJECT: &str = "zapi_schema__object";
pub const SCHEMA_ONE_OF: &str = "zapi_schema__oneof";
pub const SCHEMA_STRING: &str = "zapi_schema__string";
pub const PROPERTY_REFERENCE: &str = "zapi_property_referencing_a_schema";

/// Fields shared by every schema variant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaCommon {
    /// Declared component name; empty means "use the codename".
    pub name: String,
    pub description: String,
    pub example: String,
}

/// `nullable` / `readOnly` / `writeOnly` flags as stored in the export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertyFlags {
    pub nullable: Vec<String>,
    pub readonly: Vec<String>,
    pub writeonly: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllOfSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    /// Rich text of member schemas.
    pub schemas: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnyOfSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    #[serde(flatten)]
    pub flags: PropertyFlags,
    /// Linked member schemas.
    pub schemas: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArraySchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    /// Rich text holding exactly one element schema.
    pub items: String,
    pub unique_items: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BooleanSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    #[serde(flatten)]
    pub flags: PropertyFlags,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegerSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    #[serde(flatten)]
    pub flags: PropertyFlags,
    pub accepted_values: String,
    pub format: Vec<String>,
    pub default_value: Option<serde_json::Number>,
    pub minimum: Option<serde_json::Number>,
    pub maximum: Option<serde_json::Number>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    #[serde(flatten)]
    pub flags: PropertyFlags,
    pub accepted_values: String,
    pub format: Vec<String>,
    pub minimum: Option<serde_json::Number>,
    pub maximum: Option<serde_json::Number>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    pub properties: String,
    pub additional_properties: String,
    /// Comma separated property names.
    pub required: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OneOfSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    pub schemas: String,
    /// Rich text holding at most one `zapi_discriminator` item.
    pub discriminator: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StringSchema {
    #[serde(flatten)]
    pub common: SchemaCommon,
    #[serde(flatten)]
    pub flags: PropertyFlags,
    pub accepted_values: String,
    pub format: String,
    pub default_value: String,
    pub min_length: Option<serde_json::Number>,
    pub max_length: Option<serde_json::Number>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyReference {
    #[serde(flatten)]
    pub common: SchemaCommon,
    pub schema: Vec<String>,
}

/// A schema node of the content graph.
#[derive(Debug, Clone)]
pub enum SchemaItem {
    AllOf(AllOfSchema),
    AnyOf(AnyOfSchema),
    Array(ArraySchema),
    Boolean(BooleanSchema),
    Integer(IntegerSchema),
    Number(NumberSchema),
    Object(ObjectSchema),
    OneOf(OneOfSchema),
    String(StringSchema),
    PropertyReference(PropertyReference),
}

impl SchemaItem {
    pub fn content_type(&self) -> &'static str {
        match self {
            SchemaItem::AllOf(_) => SCHEMA_ALL_OF,
            SchemaItem::AnyOf(_) => SCHEMA_ANY_OF,
            SchemaItem::Array(_) => SCHEMA_ARRAY,
            SchemaItem::Boolean(_) => SCHEMA_BOOLEAN,
            SchemaItem::Integer(_) => SCHEMA_INTEGER,
            SchemaItem::Number(_) => SCHEMA_NUMBER,
            SchemaItem::Object(_) => SCHEMA_OBJECT,
            SchemaItem::OneOf(_) => SCHEMA_ONE_OF,
            SchemaItem::String(_) => SCHEMA_STRING,
            SchemaItem::PropertyReference(_) => PROPERTY_REFERENCE,
        }
    }

    pub fn common(&self) -> &SchemaCommon {
        match self {
            SchemaItem::AllOf(s) => &s.common,
            SchemaItem::AnyOf(s) => &s.common,
            SchemaItem::Array(s) => &s.common,
            SchemaItem::Boolean(s) => &s.common,
            SchemaItem::Integer(s) => &s.common,
            SchemaItem::Number(s) => &s.common,
            SchemaItem::Object(s) => &s.common,
            SchemaItem::OneOf(s) => &s.common,
            SchemaItem::String(s) => &s.common,
            SchemaItem::PropertyReference(s) => &s.common,
        }
    }

    /// The deduplication and `$ref` key: the declared name, else the codename.
    pub fn identifier(&self, codename: &str) -> String {
        non_empty(&self.common().name).unwrap_or_else(|| codename.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_schema(name: &str) -> SchemaItem {
        SchemaItem::String(StringSchema {
            common: SchemaCommon {
                name: name.to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn identifier_prefers_declared_name() {
        assert_eq!(string_schema("User").identifier("n1a2b3"), "User");
    }

    #[test]
    fn identifier_falls_back_to_codename() {
        assert_eq!(string_schema("").identifier("n1a2b3"), "n1a2b3");
        assert_eq!(string_schema("   ").identifier("n1a2b3"), "n1a2b3");
    }
}
