use indexmap::IndexMap;
use serde::Serialize;

use super::media_type::MediaType;
use super::{ComponentSection, component_ref};

/// A request body definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub content: IndexMap<String, MediaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// A reference or inline request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RequestBody),
}

impl RequestBodyOrRef {
    pub fn component(name: &str) -> Self {
        RequestBodyOrRef::Ref {
            ref_path: component_ref(ComponentSection::RequestBodies, name),
        }
    }
}
