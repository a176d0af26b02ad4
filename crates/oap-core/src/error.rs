use thiserror::Error;

/// Failures while reading a content export.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid content item '{codename}': {message}")]
    InvalidItem { codename: String, message: String },
}

/// Structural faults that abort a generation run.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("specification item '{0}' is not present in the content graph")]
    MissingRoot(String),

    #[error("child item '{codename}' is not present in the content graph")]
    MissingChildItem { codename: String },

    #[error("invalid child '{codename}' of type '{content_type}' inside rich text element")]
    InvalidChildType {
        codename: String,
        content_type: String,
    },

    #[error("item '{codename}' has type '{found}', expected {expected}")]
    UnexpectedItemType {
        codename: String,
        expected: &'static str,
        found: String,
    },

    #[error("field '{field}' of item '{codename}' holds {count} entries, at most one is allowed")]
    AmbiguousSingleton {
        field: &'static str,
        codename: String,
        count: usize,
    },

    #[error(
        "schema identifier '{identifier}' is declared by both '{first}' and '{second}'"
    )]
    SchemaNameCollision {
        identifier: String,
        first: String,
        second: String,
    },

    #[error("path operation '{codename}' has unsupported HTTP method '{method}'")]
    InvalidHttpMethod { codename: String, method: String },

    #[error("field '{field}' of item '{codename}' has invalid value '{value}'")]
    InvalidFieldValue {
        codename: String,
        field: &'static str,
        value: String,
    },
}
