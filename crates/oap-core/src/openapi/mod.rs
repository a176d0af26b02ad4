//! The OpenAPI 3.0 document produced by the assembler.
//!
//! Every map is an [`indexmap::IndexMap`] so that serialized output follows
//! the order in which the content graph was traversed.

pub mod components;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod security;
pub mod server;
pub mod spec;

use std::fmt;

/// Version string written into every generated document.
pub const OPENAPI_VERSION: &str = "3.0.2";

/// A section of the `components` object that can be the target of a `$ref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentSection {
    Schemas,
    Parameters,
    RequestBodies,
    Responses,
}

impl ComponentSection {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentSection::Schemas => "schemas",
            ComponentSection::Parameters => "parameters",
            ComponentSection::RequestBodies => "requestBodies",
            ComponentSection::Responses => "responses",
        }
    }
}

impl fmt::Display for ComponentSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a local `$ref` path like `#/components/schemas/Foo`.
pub fn component_ref(section: ComponentSection, name: &str) -> String {
    format!("#/components/{section}/{name}")
}
