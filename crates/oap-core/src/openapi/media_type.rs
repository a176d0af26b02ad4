use serde::Serialize;

use super::schema::SchemaOrRef;

/// A media type entry of a request body or response `content` map.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    /// Parsed from the item's JSON example text; omitted when it is malformed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}
