use indexmap::IndexMap;

use super::ResolutionContext;
use crate::content::item::Response as ResponseItem;
use crate::content::{non_empty, single_choice};
use crate::error::ResolveError;
use crate::openapi::response::{Response, ResponseOrRef};
use crate::rich_text::{self, LabelMode};

const DEFAULT_STATUS: &str = "default";

/// Component key of a response item.
pub fn response_key(codename: &str) -> String {
    format!("response_{codename}")
}

/// Normalize a status code the way a leading-integer parse would:
/// `"200 OK"` becomes `"200"`; `default` is kept.
fn status_key(codename: &str, item: &ResponseItem) -> Result<String, ResolveError> {
    let invalid = || ResolveError::InvalidFieldValue {
        codename: codename.to_string(),
        field: "httpStatus",
        value: item.http_status.join(","),
    };
    let status = single_choice(&item.http_status).ok_or_else(invalid)?.trim();
    if status.eq_ignore_ascii_case(DEFAULT_STATUS) {
        return Ok(DEFAULT_STATUS.to_string());
    }
    let digits: String = status.chars().take_while(char::is_ascii_digit).collect();
    digits
        .parse::<u16>()
        .map(|code| code.to_string())
        .map_err(|_| invalid())
}

impl ResolutionContext<'_> {
    /// Resolve an operation's responses keyed by status code.
    pub fn responses(&mut self, field: &str) -> Result<IndexMap<String, ResponseOrRef>, ResolveError> {
        let graph = self.graph;
        let mut responses = IndexMap::new();
        for child in rich_text::extract_children(field) {
            let item = graph.response(&child.codename)?;
            let status = status_key(&child.codename, item)?;

            let response = if child.is_item {
                let key = response_key(&child.codename);
                if !self.components.responses.contains_key(&key) {
                    let response = self.build_response(&child.codename, item)?;
                    self.components.responses.insert(key.clone(), response);
                }
                ResponseOrRef::component(&key)
            } else {
                ResponseOrRef::Response(self.build_response(&child.codename, item)?)
            };
            if responses.insert(status.clone(), response).is_some() {
                log::warn!("status '{status}' is declared more than once, keeping the last response");
            }
        }
        Ok(responses)
    }

    fn build_response(&mut self, codename: &str, item: &ResponseItem) -> Result<Response, ResolveError> {
        let description = self
            .describe(&item.description, LabelMode::CalloutsOnly)?
            .unwrap_or_default();

        let graph = self.graph;
        let mut headers = IndexMap::new();
        for header in &item.headers {
            let parameter = graph.parameter(header)?;
            let name = non_empty(&parameter.name).unwrap_or_else(|| header.clone());
            headers.insert(name, self.header(header, parameter)?);
        }

        let mut content = IndexMap::new();
        match item.media_type.as_slice() {
            [] => {}
            [media_type] => {
                let media = self.media_type(codename, &item.schema, &item.example)?;
                content.insert(media_type.clone(), media);
            }
            several => log::warn!(
                "response '{codename}' declares {} media types, content is omitted",
                several.len()
            ),
        }

        Ok(Response {
            description,
            headers,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::ResolveOptions;
    use crate::content::from_json;
    use crate::notify::CollectingNotifier;

    fn embedded(rel: &str, codename: &str) -> String {
        format!(
            r#"<object type="application/kenticocloud" data-type="item" data-rel="{rel}" data-codename="{codename}"></object>"#
        )
    }

    const ITEMS: &str = r#"{
        "zapiSpecificationCodename": "api",
        "items": {
            "ok": { "contentType": "zapi_response", "httpStatus": ["200 OK"], "description": "<p>Done</p>",
                    "mediaType": ["application/json"], "example": "[1, 2]", "headers": ["rate"] },
            "fallback": { "contentType": "zapi_response", "httpStatus": ["default"],
                          "mediaType": ["application/json", "text/plain"], "example": "[1]" },
            "odd": { "contentType": "zapi_response", "httpStatus": ["teapot"] },
            "rate": { "contentType": "zapi_parameter", "name": "X-Rate-Limit", "location": ["header"],
                      "required": ["true"], "schema": ["int"], "example": "100" },
            "int": { "contentType": "zapi_schema__integer" }
        }
    }"#;

    #[test]
    fn responses_are_keyed_by_status() {
        let graph = from_json(ITEMS).unwrap().graph;
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        let field = format!("{}{}", embedded("link", "ok"), embedded("component", "fallback"));
        let responses = ctx.responses(&field).unwrap();
        assert_eq!(responses.keys().collect::<Vec<_>>(), vec!["200", "default"]);
        assert_eq!(responses["200"], ResponseOrRef::component("response_ok"));

        match &responses["default"] {
            ResponseOrRef::Response(response) => {
                assert_eq!(response.description, "");
                assert!(response.content.is_empty());
            }
            other => panic!("expected inline response, got {other:?}"),
        }

        let components = ctx.into_components();
        let ok = &components.responses["response_ok"];
        assert_eq!(ok.description, "Done");
        assert_eq!(ok.content["application/json"].example, Some(json!([1, 2])));
        let rate = &ok.headers["X-Rate-Limit"];
        assert_eq!(rate.required, Some(true));
        assert_eq!(rate.example, Some(json!(100)));
        assert!(components.parameters.is_empty());
    }

    #[test]
    fn unparseable_status_is_rejected() {
        let graph = from_json(ITEMS).unwrap().graph;
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        let err = ctx.responses(&embedded("link", "odd")).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidFieldValue { field: "httpStatus", .. }));
    }
}
