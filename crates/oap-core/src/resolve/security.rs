use super::ResolutionContext;
use crate::content::{non_empty, single_choice};
use crate::error::ResolveError;
use crate::openapi::security::{ApiKeyLocation, SecurityScheme, SecuritySchemeType};
use crate::rich_text::LabelMode;

impl ResolutionContext<'_> {
    /// Resolve a security scheme item into its component name and body.
    pub fn security_scheme(&mut self, codename: &str) -> Result<(String, SecurityScheme), ResolveError> {
        let graph = self.graph;
        let item = graph.security_scheme(codename)?;
        let name = non_empty(&item.name).unwrap_or_else(|| codename.to_string());

        let scheme_type = single_choice(&item.scheme_type)
            .and_then(SecuritySchemeType::parse)
            .ok_or_else(|| ResolveError::InvalidFieldValue {
                codename: codename.to_string(),
                field: "type",
                value: item.scheme_type.join(","),
            })?;
        let location = match single_choice(&item.api_key_location) {
            Some(value) => Some(ApiKeyLocation::parse(value).ok_or_else(|| {
                ResolveError::InvalidFieldValue {
                    codename: codename.to_string(),
                    field: "apiKeyLocation",
                    value: value.to_string(),
                }
            })?),
            None => None,
        };

        let scheme = SecurityScheme {
            scheme_type,
            description: self.describe(&item.description, LabelMode::CalloutsOnly)?,
            name: non_empty(&item.api_key_name),
            location,
            scheme: non_empty(&item.scheme),
            bearer_format: non_empty(&item.bearer_format),
        };
        Ok((name, scheme))
    }
}
