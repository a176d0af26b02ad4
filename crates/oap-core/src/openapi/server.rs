use serde::Serialize;

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
