//! Rich-text fields: child extraction and conversion to commonmark.
//!
//! A field is tokenized once, embedded children are swapped for typed
//! markers, the remaining HTML is rendered to markdown and the markers are
//! finally spliced back in as the comment/JSX placeholders the reference
//! site understands.

pub mod html;
mod labels;
mod markdown;

pub use labels::{LabelMode, SchemaReferences};

use crate::content::ContentGraph;
use crate::error::ResolveError;
use html::{Element, Token};

const EMBEDDED_TYPE: &str = "application/kenticocloud";

/// One child referenced from a relationship field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRef {
    pub codename: String,
    /// `true` for linked items (may be promoted to a component), `false` for
    /// components that only exist inside their parent (always inlined).
    pub is_item: bool,
}

impl ChildRef {
    pub fn linked(codename: &str) -> Self {
        ChildRef {
            codename: codename.to_string(),
            is_item: true,
        }
    }

    pub fn component(codename: &str) -> Self {
        ChildRef {
            codename: codename.to_string(),
            is_item: false,
        }
    }
}

/// The child an element embeds, if it is an embedded-object element.
pub fn embedded_child(element: &Element) -> Option<ChildRef> {
    if !matches!(element.name.as_str(), "p" | "object") {
        return None;
    }
    if element.attribute("type") != Some(EMBEDDED_TYPE)
        || element.attribute("data-type") != Some("item")
    {
        return None;
    }
    let codename = element
        .attribute("data-codename")
        .filter(|c| !c.trim().is_empty())?;
    match element.attribute("data-rel") {
        Some("link") => Some(ChildRef::linked(codename)),
        Some("component") => Some(ChildRef::component(codename)),
        _ => None,
    }
}

/// Children embedded in a rich-text field, in document order.
pub fn extract_children(field: &str) -> Vec<ChildRef> {
    html::tokenize(field)
        .iter()
        .filter_map(|token| match token {
            Token::Open(element) => embedded_child(element),
            _ => None,
        })
        .collect()
}

/// Render a rich-text field to commonmark with resolved placeholders.
///
/// Returns an empty string for fields that hold no visible content.
pub fn render(
    field: &str,
    mode: LabelMode,
    graph: &ContentGraph,
    schemas: &mut dyn SchemaReferences,
) -> Result<String, ResolveError> {
    if field.trim().is_empty() {
        return Ok(String::new());
    }
    let nodes = labels::label(html::tokenize(field), mode, graph, schemas)?;
    let segments = markdown::convert(nodes);
    labels::resolve(segments, graph)
}
