use indexmap::IndexMap;

use super::ResolutionContext;
use super::example::ExampleKind;
use crate::content::item::RequestBody as RequestBodyItem;
use crate::content::{boolean_choice, non_empty};
use crate::error::ResolveError;
use crate::openapi::media_type::MediaType;
use crate::openapi::request_body::{RequestBody, RequestBodyOrRef};
use crate::rich_text::{self, LabelMode};

/// Component key of a request body item.
pub fn request_body_key(codename: &str) -> String {
    format!("requestBody_{codename}")
}

impl ResolutionContext<'_> {
    /// Resolve the single request body embedded in an operation.
    pub fn request_body(
        &mut self,
        operation: &str,
        field: &str,
    ) -> Result<Option<RequestBodyOrRef>, ResolveError> {
        let children = rich_text::extract_children(field);
        let Some(child) = self.exactly_one("requestBody", operation, &children)? else {
            return Ok(None);
        };
        let graph = self.graph;
        let item = graph.request_body(&child.codename)?;

        if !child.is_item {
            let body = self.build_request_body(&child.codename, item)?;
            return Ok(Some(RequestBodyOrRef::RequestBody(body)));
        }
        let key = request_body_key(&child.codename);
        if !self.components.request_bodies.contains_key(&key) {
            let body = self.build_request_body(&child.codename, item)?;
            self.components.request_bodies.insert(key.clone(), body);
        }
        Ok(Some(RequestBodyOrRef::component(&key)))
    }

    fn build_request_body(
        &mut self,
        codename: &str,
        item: &RequestBodyItem,
    ) -> Result<RequestBody, ResolveError> {
        let description = self.describe(&item.description, LabelMode::CalloutsOnly)?;
        let mut content = IndexMap::new();
        if let Some(media_type) = item.media_type.first() {
            let media = self.media_type(codename, &item.schema, &item.example)?;
            content.insert(media_type.clone(), media);
        }
        Ok(RequestBody {
            description,
            content,
            required: boolean_choice(&item.required),
        })
    }

    /// A `content` entry: the field's single schema plus a JSON example.
    pub(crate) fn media_type(
        &mut self,
        codename: &str,
        schema: &str,
        example: &str,
    ) -> Result<MediaType, ResolveError> {
        let schema = self.single_schema("schema", codename, schema)?;
        let example = match non_empty(example) {
            Some(raw) => self.example(codename, ExampleKind::Json, &raw),
            None => None,
        };
        Ok(MediaType { schema, example })
    }
}
