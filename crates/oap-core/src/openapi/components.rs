use indexmap::IndexMap;
use serde::Serialize;

use super::parameter::Parameter;
use super::request_body::RequestBody;
use super::response::Response;
use super::schema::SchemaOrRef;
use super::security::SecurityScheme;

/// Components object holding the shared definitions collected during a run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Components {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(
        rename = "requestBodies",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_bodies: IndexMap<String, RequestBody>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaOrRef>,

    #[serde(
        rename = "securitySchemes",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
            && self.request_bodies.is_empty()
            && self.responses.is_empty()
            && self.schemas.is_empty()
            && self.security_schemes.is_empty()
    }
}
