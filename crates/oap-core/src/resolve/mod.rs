//! Resolution of content items into OpenAPI objects.
//!
//! A [`ResolutionContext`] is created per generation run. It owns the
//! component registries and the schema identity map, so repeated references
//! to the same item resolve once and cycles terminate.

pub mod example;
mod parameter;
mod request_body;
mod response;
mod schema;
mod security;

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::config::{ResolveOptions, SingletonPolicy};
use crate::content::{ContentGraph, non_empty};
use crate::error::ResolveError;
use crate::notify::{NotificationEvent, Notifier};
use crate::openapi::components::Components;
use crate::openapi::schema::SchemaOrRef;
use crate::rich_text::{self, ChildRef, LabelMode, SchemaReferences};

pub use schema::SchemaEntry;

/// Where a schema identifier is in its resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolutionState {
    InProgress,
    Resolved,
}

/// Run-scoped resolution state: registries, identity map and side channel.
pub struct ResolutionContext<'a> {
    graph: &'a ContentGraph,
    specification: String,
    options: ResolveOptions,
    notifier: &'a mut dyn Notifier,
    components: Components,
    states: HashMap<String, ResolutionState>,
    processed: HashMap<String, SchemaEntry>,
    /// First codename seen for each identifier.
    owners: HashMap<String, String>,
    /// Identifiers re-entered while in progress, in discovery order.
    recursive: IndexSet<String>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        graph: &'a ContentGraph,
        specification: &str,
        options: ResolveOptions,
        notifier: &'a mut dyn Notifier,
    ) -> Self {
        Self {
            graph,
            specification: specification.to_string(),
            options,
            notifier,
            components: Components::default(),
            states: HashMap::new(),
            processed: HashMap::new(),
            owners: HashMap::new(),
            recursive: IndexSet::new(),
        }
    }

    pub fn graph(&self) -> &'a ContentGraph {
        self.graph
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Identifiers that were reached again while still being resolved.
    pub fn recursive_identifiers(&self) -> impl Iterator<Item = &str> {
        self.recursive.iter().map(String::as_str)
    }

    /// Render a rich-text description; `None` when nothing visible remains.
    pub fn describe(&mut self, field: &str, mode: LabelMode) -> Result<Option<String>, ResolveError> {
        let graph = self.graph;
        let text = rich_text::render(field, mode, graph, self)?;
        Ok(non_empty(&text))
    }

    /// Promote inline bodies of recursive identifiers that have no component
    /// yet, so every `$ref` emitted for a cycle has a target.
    pub fn finalize(&mut self) {
        for identifier in &self.recursive {
            if self.components.schemas.contains_key(identifier) {
                continue;
            }
            let Some(entry) = self.processed.get(identifier) else {
                continue;
            };
            let self_reference = SchemaOrRef::component(identifier);
            if entry.schema == self_reference {
                continue;
            }
            log::debug!("promoting recursive schema '{identifier}' into components");
            self.components
                .schemas
                .insert(identifier.clone(), entry.schema.clone());
        }
    }

    pub fn into_components(self) -> Components {
        self.components
    }

    /// The single entry of a field that expects one; extra entries follow
    /// the singleton policy and keep the first.
    pub(crate) fn single_slot<'c, T>(
        &self,
        field: &'static str,
        codename: &str,
        entries: &'c [T],
    ) -> Result<Option<&'c T>, ResolveError> {
        if entries.len() > 1 {
            self.ambiguous(field, codename, entries.len())?;
        }
        Ok(entries.first())
    }

    /// Like [`Self::single_slot`], but extra entries leave the field absent.
    pub(crate) fn exactly_one<'c, T>(
        &self,
        field: &'static str,
        codename: &str,
        entries: &'c [T],
    ) -> Result<Option<&'c T>, ResolveError> {
        match entries {
            [only] => Ok(Some(only)),
            [] => Ok(None),
            _ => {
                self.ambiguous(field, codename, entries.len())?;
                Ok(None)
            }
        }
    }

    fn ambiguous(&self, field: &'static str, codename: &str, count: usize) -> Result<(), ResolveError> {
        match self.options.singletons {
            SingletonPolicy::Strict => Err(ResolveError::AmbiguousSingleton {
                field,
                codename: codename.to_string(),
                count,
            }),
            SingletonPolicy::Lenient => {
                log::warn!(
                    "field '{field}' of '{codename}' holds {count} entries where one is expected"
                );
                Ok(())
            }
        }
    }

    fn notify_malformed_example(&mut self, codename: &str, error: &serde_json::Error) {
        log::warn!("example of '{codename}' is not valid JSON: {error}");
        let event = NotificationEvent::malformed_example(&self.specification, codename, error);
        self.notifier.notify(event);
    }
}

impl SchemaReferences for ResolutionContext<'_> {
    /// Descriptions always point at `components.schemas`, so an inline
    /// body is promoted even when the schema was embedded as a component.
    fn schema_identifier(&mut self, child: &ChildRef) -> Result<String, ResolveError> {
        let entry = self.resolve_child(child)?;
        if entry.schema != SchemaOrRef::component(&entry.identifier) {
            self.promote(&entry.identifier);
        }
        Ok(entry.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolveOptions;
    use crate::notify::CollectingNotifier;

    #[test]
    fn single_slot_keeps_first_when_lenient() {
        let graph = ContentGraph::new();
        let mut notifier = CollectingNotifier::new();
        let ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);
        let entries = ["a", "b"];
        assert_eq!(ctx.single_slot("items", "arr", &entries).unwrap(), Some(&"a"));
        assert_eq!(ctx.exactly_one("contact", "api", &entries).unwrap(), None);
    }

    #[test]
    fn described_schemas_always_have_a_component() {
        let graph = crate::content::from_json(
            r#"{ "zapiSpecificationCodename": "api", "items": {
                "pet": { "contentType": "zapi_schema__object", "name": "Pet" },
                "tag": { "contentType": "zapi_schema__string", "name": "Tag" }
            } }"#,
        )
        .unwrap()
        .graph;
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        ctx.resolve_child(&ChildRef::component("pet")).unwrap();
        assert_eq!(ctx.schema_identifier(&ChildRef::linked("pet")).unwrap(), "Pet");
        assert_eq!(ctx.schema_identifier(&ChildRef::component("tag")).unwrap(), "Tag");

        let components = ctx.into_components();
        assert_eq!(components.schemas.keys().collect::<Vec<_>>(), vec!["Pet", "Tag"]);
    }

    #[test]
    fn singletons_fail_when_strict() {
        let graph = ContentGraph::new();
        let mut notifier = CollectingNotifier::new();
        let ctx = ResolutionContext::new(&graph, "api", ResolveOptions::strict(), &mut notifier);
        let entries = ["a", "b", "c"];
        let err = ctx.single_slot("items", "arr", &entries).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::AmbiguousSingleton { field: "items", count: 3, .. }
        ));
        assert_eq!(ctx.exactly_one("contact", "api", &entries[..1]).unwrap(), Some(&"a"));
    }
}
