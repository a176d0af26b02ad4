use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level project configuration loaded from `.oap.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OapConfig {
    /// Preprocessed content export (JSON or YAML).
    pub input: String,
    /// Target document; empty writes to stdout.
    pub output: String,
    pub format: OutputFormat,
    pub singletons: SingletonPolicy,
    pub schema_names: SchemaNamePolicy,
}

impl Default for OapConfig {
    fn default() -> Self {
        Self {
            input: "export.json".to_string(),
            output: String::new(),
            format: OutputFormat::Json,
            singletons: SingletonPolicy::Lenient,
            schema_names: SchemaNamePolicy::Reuse,
        }
    }
}

impl OapConfig {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            singletons: self.singletons,
            schema_names: self.schema_names,
        }
    }
}

/// Serialization of the generated document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// What to do when a field meant to hold one entry holds several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingletonPolicy {
    /// Keep the first entry (or treat as absent) and log a warning.
    #[default]
    Lenient,
    /// Fail with `AmbiguousSingleton`.
    Strict,
}

/// What to do when two schema items share one identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaNamePolicy {
    /// The first resolution wins and is reused for later items.
    #[default]
    Reuse,
    /// Fail with `SchemaNameCollision`.
    Error,
}

/// Knobs consumed by the resolution engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub singletons: SingletonPolicy,
    pub schema_names: SchemaNamePolicy,
}

impl ResolveOptions {
    /// Strict singletons and no shared identifiers.
    pub fn strict() -> Self {
        Self {
            singletons: SingletonPolicy::Strict,
            schema_names: SchemaNamePolicy::Error,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oap.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OapConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: OapConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oap configuration
input: export.json      # preprocessed content export (.json or .yaml)
output: openapi.json    # leave empty to print to stdout
format: json            # json | yaml

singletons: lenient     # lenient | strict (several entries in a one-entry field)
schema_names: reuse     # reuse | error (two schema items with the same name)
"#
}
