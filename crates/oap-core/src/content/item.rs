use serde::Deserialize;

use super::schema::SchemaItem;
use crate::rich_text::{self, ChildRef};

pub const SPECIFICATION: &str = "zapi_specification";
pub const CATEGORY: &str = "zapi_category";
pub const PATH_OPERATION: &str = "zapi_path_operation";
pub const PARAMETER: &str = "zapi_parameter";
pub const REQUEST_BODY: &str = "zapi_request_body";
pub const RESPONSE: &str = "zapi_response";
pub const SERVER: &str = "zapi_server";
pub const CONTACT: &str = "zapi_contact";
pub const LICENSE: &str = "zapi_license";
pub const SECURITY_SCHEME: &str = "zapi_security_scheme";
pub const DISCRIMINATOR: &str = "zapi_discriminator";
pub const DISCRIMINATOR_MAP_ITEM: &str = "zapi_discriminator__map_item";
pub const CALLOUT: &str = "callout";
pub const CODE_SAMPLE: &str = "code_sample";
pub const CODE_SAMPLES: &str = "code_samples";

/// A typed content item from the export, dispatched on its `contentType`.
#[derive(Debug, Clone)]
pub enum ContentItem {
    Specification(Specification),
    Category(Category),
    PathOperation(PathOperation),
    Parameter(Parameter),
    RequestBody(RequestBody),
    Response(Response),
    Server(Server),
    Contact(Contact),
    License(License),
    SecurityScheme(SecurityScheme),
    Discriminator(Discriminator),
    DiscriminatorMapItem(DiscriminatorMapItem),
    Callout(Callout),
    CodeSample(CodeSample),
    CodeSamples(CodeSamples),
    Schema(SchemaItem),
    /// A content type this processor does not know; kept so errors can name it.
    Unknown { content_type: String },
}

impl ContentItem {
    pub fn content_type(&self) -> &str {
        match self {
            ContentItem::Specification(_) => SPECIFICATION,
            ContentItem::Category(_) => CATEGORY,
            ContentItem::PathOperation(_) => PATH_OPERATION,
            ContentItem::Parameter(_) => PARAMETER,
            ContentItem::RequestBody(_) => REQUEST_BODY,
            ContentItem::Response(_) => RESPONSE,
            ContentItem::Server(_) => SERVER,
            ContentItem::Contact(_) => CONTACT,
            ContentItem::License(_) => LICENSE,
            ContentItem::SecurityScheme(_) => SECURITY_SCHEME,
            ContentItem::Discriminator(_) => DISCRIMINATOR,
            ContentItem::DiscriminatorMapItem(_) => DISCRIMINATOR_MAP_ITEM,
            ContentItem::Callout(_) => CALLOUT,
            ContentItem::CodeSample(_) => CODE_SAMPLE,
            ContentItem::CodeSamples(_) => CODE_SAMPLES,
            ContentItem::Schema(schema) => schema.content_type(),
            ContentItem::Unknown { content_type } => content_type,
        }
    }
}

/// A relationship field stored either as linked items or as rich text.
///
/// Linked-item lists only ever reference independently addressable items, so
/// every entry is reported with `is_item == true`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChildField {
    Linked(Vec<String>),
    RichText(String),
}

impl Default for ChildField {
    fn default() -> Self {
        ChildField::Linked(Vec::new())
    }
}

impl ChildField {
    pub fn children(&self) -> Vec<ChildRef> {
        match self {
            ChildField::Linked(codenames) => codenames
                .iter()
                .map(|codename| ChildRef::linked(codename))
                .collect(),
            ChildField::RichText(field) => rich_text::extract_children(field),
        }
    }
}

/// The root item describing the whole API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Specification {
    pub title: String,
    pub version: String,
    pub description: String,
    pub terms_of_service: String,
    pub contact: Vec<String>,
    pub license: Vec<String>,
    pub servers: String,
    pub categories: Vec<String>,
    pub security: Vec<String>,
    pub api_status: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub name: String,
    pub description: String,
    pub path_operations: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathOperation {
    pub name: String,
    /// Used verbatim as the `operationId`.
    pub url: String,
    pub path_operation: Vec<String>,
    pub path: String,
    pub description: String,
    pub parameters: ChildField,
    pub request_body: String,
    pub responses: String,
    pub code_samples: Vec<String>,
    pub deprecated: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub location: Vec<String>,
    pub required: Vec<String>,
    pub deprecated: Vec<String>,
    pub explode: Vec<String>,
    pub style: Vec<String>,
    pub schema: Vec<String>,
    pub example: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestBody {
    pub description: String,
    pub media_type: Vec<String>,
    pub schema: String,
    pub example: String,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    pub description: String,
    pub media_type: Vec<String>,
    pub http_status: Vec<String>,
    pub schema: String,
    pub headers: Vec<String>,
    pub example: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Server {
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub name: String,
    pub url: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct License {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityScheme {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub scheme_type: Vec<String>,
    pub api_key_location: Vec<String>,
    pub api_key_name: String,
    pub scheme: String,
    pub bearer_format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Discriminator {
    pub property_name: String,
    /// Rich text of `zapi_discriminator__map_item` children.
    pub mapping: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscriminatorMapItem {
    pub discriminator_value: String,
    pub schema: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Callout {
    pub content: String,
    #[serde(rename = "type")]
    pub callout_type: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeSample {
    pub code: String,
    pub programming_language: Vec<String>,
    pub platform: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeSamples {
    pub code_samples: Vec<String>,
}
