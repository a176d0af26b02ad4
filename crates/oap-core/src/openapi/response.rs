use indexmap::IndexMap;
use serde::Serialize;

use super::media_type::MediaType;
use super::parameter::Header;
use super::{ComponentSection, component_ref};

/// A response definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Response {
    pub description: String,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}

impl ResponseOrRef {
    pub fn component(name: &str) -> Self {
        ResponseOrRef::Ref {
            ref_path: component_ref(ComponentSection::Responses, name),
        }
    }
}
