use indexmap::IndexMap;
use serde_json::Value;

use super::example::{self, ExampleKind};
use super::{ResolutionContext, ResolutionState};
use crate::config::SchemaNamePolicy;
use crate::content::schema::{PropertyFlags, SchemaItem};
use crate::content::{boolean_choice, non_empty, single_choice};
use crate::error::ResolveError;
use crate::openapi::schema::{Discriminator, Schema, SchemaOrRef, SchemaType};
use crate::openapi::{ComponentSection, component_ref};
use crate::rich_text::{self, ChildRef, LabelMode};

/// A resolved schema child together with the identifier it is keyed by.
///
/// For promoted items `schema` is a `$ref`; for components it is the body.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub identifier: String,
    pub schema: SchemaOrRef,
}

impl SchemaEntry {
    fn reference(identifier: &str) -> Self {
        SchemaEntry {
            identifier: identifier.to_string(),
            schema: SchemaOrRef::component(identifier),
        }
    }
}

impl ResolutionContext<'_> {
    /// Resolve one schema child through the identity map.
    ///
    /// Linked items are registered under `components.schemas` and returned
    /// as a `$ref`; components are returned inline. Re-entering an
    /// identifier that is still in progress yields a `$ref` stub.
    pub fn resolve_child(&mut self, child: &ChildRef) -> Result<SchemaEntry, ResolveError> {
        let graph = self.graph;
        let item = graph.schema(&child.codename)?;
        let identifier = item.identifier(&child.codename);
        self.claim_identifier(&identifier, &child.codename)?;

        match self.states.get(&identifier) {
            Some(ResolutionState::InProgress) => {
                log::debug!("cycle through schema '{identifier}'");
                self.recursive.insert(identifier.clone());
                return Ok(SchemaEntry::reference(&identifier));
            }
            Some(ResolutionState::Resolved) => {
                if let Some(entry) = self.processed.get(&identifier) {
                    if child.is_item && entry.schema.ref_path().is_none() {
                        return Ok(self.promote(&identifier));
                    }
                    return Ok(entry.clone());
                }
            }
            None => {}
        }

        self.states
            .insert(identifier.clone(), ResolutionState::InProgress);
        let entry = if child.is_item {
            let reference = SchemaEntry::reference(&identifier);
            self.processed.insert(identifier.clone(), reference.clone());
            let body = self.resolve_schema(&child.codename, item)?;
            self.components.schemas.insert(identifier.clone(), body);
            reference
        } else {
            let body = self.resolve_schema(&child.codename, item)?;
            let entry = SchemaEntry {
                identifier: identifier.clone(),
                schema: body,
            };
            self.processed.insert(identifier.clone(), entry.clone());
            entry
        };
        self.states.insert(identifier, ResolutionState::Resolved);
        Ok(entry)
    }

    /// Move an inline body that was resolved earlier into
    /// `components.schemas`; later uses of the identifier get the `$ref`.
    pub(crate) fn promote(&mut self, identifier: &str) -> SchemaEntry {
        let reference = SchemaEntry::reference(identifier);
        if let Some(previous) = self
            .processed
            .insert(identifier.to_string(), reference.clone())
        {
            if previous.schema != reference.schema
                && !self.components.schemas.contains_key(identifier)
            {
                log::debug!("promoting inline schema '{identifier}' into components");
                self.components
                    .schemas
                    .insert(identifier.to_string(), previous.schema);
            }
        }
        reference
    }

    fn claim_identifier(&mut self, identifier: &str, codename: &str) -> Result<(), ResolveError> {
        match self.owners.get(identifier) {
            None => {
                self.owners
                    .insert(identifier.to_string(), codename.to_string());
                Ok(())
            }
            Some(owner) if owner == codename => Ok(()),
            Some(owner) => match self.options.schema_names {
                SchemaNamePolicy::Error => Err(ResolveError::SchemaNameCollision {
                    identifier: identifier.to_string(),
                    first: owner.clone(),
                    second: codename.to_string(),
                }),
                SchemaNamePolicy::Reuse => {
                    log::debug!(
                        "schema '{codename}' shares identifier '{identifier}' with '{owner}', reusing"
                    );
                    Ok(())
                }
            },
        }
    }

    /// Build the body of a schema item, dispatching on its variant.
    pub(crate) fn resolve_schema(
        &mut self,
        codename: &str,
        item: &SchemaItem,
    ) -> Result<SchemaOrRef, ResolveError> {
        let common = item.common();
        let mut schema = Schema {
            description: self.describe(&common.description, LabelMode::CalloutsOnly)?,
            ..Schema::default()
        };
        if non_empty(&common.example).is_some() {
            schema.example = self.example(codename, ExampleKind::of_schema(item), &common.example);
        }

        match item {
            SchemaItem::AllOf(s) => {
                schema.all_of = self.schema_list(&s.schemas)?;
            }
            SchemaItem::AnyOf(s) => {
                apply_flags(&mut schema, &s.flags);
                schema.any_of = s
                    .schemas
                    .iter()
                    .map(|linked| -> Result<SchemaOrRef, ResolveError> {
                        Ok(self.resolve_child(&ChildRef::linked(linked))?.schema)
                    })
                    .collect::<Result<_, _>>()?;
            }
            SchemaItem::Array(s) => {
                schema.schema_type = Some(SchemaType::Array);
                schema.items = self
                    .single_schema("items", codename, &s.items)?
                    .map(Box::new);
                schema.unique_items = boolean_choice(&s.unique_items);
            }
            SchemaItem::Boolean(s) => {
                schema.schema_type = Some(SchemaType::Boolean);
                apply_flags(&mut schema, &s.flags);
            }
            SchemaItem::Integer(s) => {
                schema.schema_type = Some(SchemaType::Integer);
                apply_flags(&mut schema, &s.flags);
                schema.enum_values = example::enum_values(ExampleKind::Integer, &s.accepted_values);
                schema.format = single_choice(&s.format).map(str::to_string);
                schema.default_value = s.default_value.clone().map(Value::Number);
                schema.minimum = s.minimum.clone();
                schema.maximum = s.maximum.clone();
            }
            SchemaItem::Number(s) => {
                schema.schema_type = Some(SchemaType::Number);
                apply_flags(&mut schema, &s.flags);
                schema.enum_values = example::enum_values(ExampleKind::Number, &s.accepted_values);
                schema.format = single_choice(&s.format).map(str::to_string);
                schema.minimum = s.minimum.clone();
                schema.maximum = s.maximum.clone();
            }
            SchemaItem::Object(s) => {
                schema.schema_type = Some(SchemaType::Object);
                schema.properties = self.schema_map(&s.properties)?;
                schema.additional_properties = self
                    .single_schema("additionalProperties", codename, &s.additional_properties)?
                    .map(Box::new);
                schema.required = s
                    .required
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            SchemaItem::OneOf(s) => {
                schema.one_of = self.schema_list(&s.schemas)?;
                schema.discriminator = self.discriminator(codename, &s.discriminator)?;
            }
            SchemaItem::String(s) => {
                schema.schema_type = Some(SchemaType::String);
                apply_flags(&mut schema, &s.flags);
                schema.enum_values = example::enum_values(ExampleKind::Text, &s.accepted_values);
                schema.format = non_empty(&s.format);
                schema.default_value = non_empty(&s.default_value).map(Value::String);
                schema.min_length = s.min_length.as_ref().and_then(|n| n.as_u64());
                schema.max_length = s.max_length.as_ref().and_then(|n| n.as_u64());
            }
            SchemaItem::PropertyReference(s) => {
                return match self.single_slot("schema", codename, &s.schema)? {
                    Some(linked) => Ok(self.resolve_child(&ChildRef::linked(linked))?.schema),
                    None => Ok(schema.into()),
                };
            }
        }
        Ok(schema.into())
    }

    /// Resolve every child of a rich-text field in document order.
    fn schema_entries(&mut self, field: &str) -> Result<Vec<SchemaEntry>, ResolveError> {
        rich_text::extract_children(field)
            .iter()
            .map(|child| self.resolve_child(child))
            .collect()
    }

    /// `allOf` / `oneOf` members: entries without their identifiers.
    pub(crate) fn schema_list(&mut self, field: &str) -> Result<Vec<SchemaOrRef>, ResolveError> {
        Ok(self
            .schema_entries(field)?
            .into_iter()
            .map(|entry| entry.schema)
            .collect())
    }

    /// `properties`: entries keyed by identifier.
    fn schema_map(&mut self, field: &str) -> Result<IndexMap<String, SchemaOrRef>, ResolveError> {
        Ok(self
            .schema_entries(field)?
            .into_iter()
            .map(|entry| (entry.identifier, entry.schema))
            .collect())
    }

    /// A slot holding exactly one schema (`items`, `additionalProperties`,
    /// media type `schema`).
    pub(crate) fn single_schema(
        &mut self,
        slot: &'static str,
        codename: &str,
        field: &str,
    ) -> Result<Option<SchemaOrRef>, ResolveError> {
        let children = rich_text::extract_children(field);
        match self.single_slot(slot, codename, &children)? {
            Some(child) => Ok(Some(self.resolve_child(child)?.schema)),
            None => Ok(None),
        }
    }

    fn discriminator(
        &mut self,
        codename: &str,
        field: &str,
    ) -> Result<Option<Discriminator>, ResolveError> {
        let children = rich_text::extract_children(field);
        let Some(child) = self.single_slot("discriminator", codename, &children)? else {
            return Ok(None);
        };
        let graph = self.graph;
        let item = graph.discriminator(&child.codename)?;

        let mut mapping = IndexMap::new();
        for map_child in rich_text::extract_children(&item.mapping) {
            let map_item = graph.discriminator_map_item(&map_child.codename)?;
            let Some(linked) = self.single_slot("schema", &map_child.codename, &map_item.schema)?
            else {
                continue;
            };
            let entry = self.resolve_child(&ChildRef::linked(linked))?;
            let target = entry
                .schema
                .ref_path()
                .map(str::to_string)
                .unwrap_or_else(|| component_ref(ComponentSection::Schemas, &entry.identifier));
            mapping.insert(map_item.discriminator_value.clone(), target);
        }

        Ok(Some(Discriminator {
            property_name: item.property_name.clone(),
            mapping,
        }))
    }

    /// Coerce an example; malformed JSON is reported and dropped.
    pub(crate) fn example(&mut self, codename: &str, kind: ExampleKind, raw: &str) -> Option<Value> {
        match example::coerce(kind, raw) {
            Ok(value) => Some(value),
            Err(error) => {
                self.notify_malformed_example(codename, &error);
                None
            }
        }
    }
}

fn apply_flags(schema: &mut Schema, flags: &PropertyFlags) {
    schema.nullable = boolean_choice(&flags.nullable);
    schema.read_only = boolean_choice(&flags.readonly);
    schema.write_only = boolean_choice(&flags.writeonly);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolveOptions;
    use crate::content::from_json;
    use crate::notify::CollectingNotifier;

    fn graph(items: &str) -> crate::content::ContentGraph {
        from_json(&format!(
            r#"{{ "zapiSpecificationCodename": "api", "items": {items} }}"#
        ))
        .unwrap()
        .graph
    }

    fn component(codename: &str) -> String {
        format!(
            r#"<object type=\"application/kenticocloud\" data-type=\"item\" data-rel=\"component\" data-codename=\"{codename}\"></object>"#
        )
    }

    fn link(codename: &str) -> String {
        format!(
            r#"<object type=\"application/kenticocloud\" data-type=\"item\" data-rel=\"link\" data-codename=\"{codename}\"></object>"#
        )
    }

    #[test]
    fn linked_items_are_promoted_once() {
        let graph = graph(
            r#"{ "user": { "contentType": "zapi_schema__string", "name": "UserId", "format": "uuid" } }"#,
        );
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        let first = ctx.resolve_child(&ChildRef::linked("user")).unwrap();
        let second = ctx.resolve_child(&ChildRef::linked("user")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.schema.ref_path(), Some("#/components/schemas/UserId"));

        let components = ctx.into_components();
        assert_eq!(components.schemas.len(), 1);
        let body = components.schemas["UserId"].as_schema().unwrap();
        assert_eq!(body.schema_type, Some(SchemaType::String));
        assert_eq!(body.format.as_deref(), Some("uuid"));
    }

    #[test]
    fn components_stay_inline() {
        let graph = graph(r#"{ "n1": { "contentType": "zapi_schema__boolean", "nullable": ["true"] } }"#);
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        let entry = ctx.resolve_child(&ChildRef::component("n1")).unwrap();
        assert_eq!(entry.identifier, "n1");
        let body = entry.schema.as_schema().unwrap();
        assert_eq!(body.schema_type, Some(SchemaType::Boolean));
        assert_eq!(body.nullable, Some(true));
        assert!(ctx.components().schemas.is_empty());
    }

    #[test]
    fn linked_use_promotes_earlier_inline_body() {
        let graph = graph(r#"{ "pet": { "contentType": "zapi_schema__object", "name": "Pet" } }"#);
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        let inline = ctx.resolve_child(&ChildRef::component("pet")).unwrap();
        assert!(inline.schema.as_schema().is_some());
        assert!(ctx.components().schemas.is_empty());

        let linked = ctx.resolve_child(&ChildRef::linked("pet")).unwrap();
        assert_eq!(linked.schema.ref_path(), Some("#/components/schemas/Pet"));
        assert_eq!(ctx.components().schemas["Pet"], inline.schema);

        let again = ctx.resolve_child(&ChildRef::component("pet")).unwrap();
        assert_eq!(again, linked);
    }

    #[test]
    fn self_reference_terminates_with_ref() {
        let items = format!(
            r#"{{
                "a": {{ "contentType": "zapi_schema__object", "name": "A", "properties": "{}" }},
                "self_prop": {{ "contentType": "zapi_property_referencing_a_schema", "name": "self", "schema": ["a"] }}
            }}"#,
            component("self_prop")
        );
        let graph = graph(&items);
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        ctx.resolve_child(&ChildRef::linked("a")).unwrap();
        assert_eq!(ctx.recursive_identifiers().collect::<Vec<_>>(), vec!["A"]);
        ctx.finalize();

        let components = ctx.into_components();
        let a = components.schemas["A"].as_schema().unwrap();
        assert_eq!(
            a.properties["self"].ref_path(),
            Some("#/components/schemas/A")
        );
    }

    #[test]
    fn inline_cycles_are_promoted_on_finalize() {
        let items = format!(
            r#"{{
                "node": {{ "contentType": "zapi_schema__object", "name": "Node", "properties": "{}" }},
                "children": {{ "contentType": "zapi_schema__array", "name": "children", "items": "{}" }}
            }}"#,
            component("children"),
            component("node")
        );
        let graph = graph(&items);
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        let entry = ctx.resolve_child(&ChildRef::component("node")).unwrap();
        let node = entry.schema.as_schema().unwrap();
        let children = node.properties["children"].as_schema().unwrap();
        assert_eq!(
            children.items.as_deref().and_then(SchemaOrRef::ref_path),
            Some("#/components/schemas/Node")
        );
        assert!(ctx.components().schemas.is_empty());

        ctx.finalize();
        let components = ctx.into_components();
        assert_eq!(components.schemas.keys().collect::<Vec<_>>(), vec!["Node"]);
    }

    #[test]
    fn entry_shaping() {
        let items = format!(
            r#"{{
                "pet": {{ "contentType": "zapi_schema__object", "name": "Pet", "required": "id, name,", "properties": "{}{}" }},
                "id": {{ "contentType": "zapi_schema__integer", "name": "id", "acceptedValues": "1,2", "minimum": 1 }},
                "name": {{ "contentType": "zapi_schema__string", "name": "name", "minLength": 1 }},
                "either": {{ "contentType": "zapi_schema__oneof", "schemas": "{}{}" }},
                "any": {{ "contentType": "zapi_schema__anyof", "schemas": ["pet"] }}
            }}"#,
            component("id"),
            link("name"),
            link("pet"),
            component("id"),
        );
        let graph = graph(&items);
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        let either = ctx.resolve_child(&ChildRef::component("either")).unwrap();
        let either = either.schema.as_schema().unwrap();
        assert_eq!(either.one_of.len(), 2);
        assert_eq!(either.one_of[0].ref_path(), Some("#/components/schemas/Pet"));
        assert_eq!(
            either.one_of[1].as_schema().unwrap().schema_type,
            Some(SchemaType::Integer)
        );

        let any = ctx.resolve_child(&ChildRef::component("any")).unwrap();
        assert_eq!(
            any.schema.as_schema().unwrap().any_of[0].ref_path(),
            Some("#/components/schemas/Pet")
        );

        let components = ctx.into_components();
        let pet = components.schemas["Pet"].as_schema().unwrap();
        assert_eq!(pet.required, vec!["id", "name"]);
        assert_eq!(pet.properties.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(pet.properties["name"].ref_path(), Some("#/components/schemas/name"));
        let id = pet.properties["id"].as_schema().unwrap();
        assert_eq!(id.enum_values, vec![serde_json::json!(1), serde_json::json!(2)]);
        assert_eq!(id.minimum.as_ref().and_then(|n| n.as_i64()), Some(1));
        let name = components.schemas["name"].as_schema().unwrap();
        assert_eq!(name.min_length, Some(1));
    }

    #[test]
    fn several_items_follow_singleton_policy() {
        let items = format!(
            r#"{{
                "list": {{ "contentType": "zapi_schema__array", "items": "{}{}" }},
                "a": {{ "contentType": "zapi_schema__string" }},
                "b": {{ "contentType": "zapi_schema__integer" }}
            }}"#,
            component("a"),
            component("b"),
        );
        let graph = graph(&items);

        let mut notifier = CollectingNotifier::new();
        let mut lenient = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);
        let entry = lenient.resolve_child(&ChildRef::component("list")).unwrap();
        let items = entry.schema.as_schema().unwrap().items.as_deref().unwrap();
        assert_eq!(items.as_schema().unwrap().schema_type, Some(SchemaType::String));

        let mut notifier = CollectingNotifier::new();
        let mut strict = ResolutionContext::new(&graph, "api", ResolveOptions::strict(), &mut notifier);
        let err = strict.resolve_child(&ChildRef::component("list")).unwrap_err();
        assert!(matches!(err, ResolveError::AmbiguousSingleton { field: "items", .. }));
    }

    #[test]
    fn identifier_collisions_follow_naming_policy() {
        let items = r#"{
            "first": { "contentType": "zapi_schema__string", "name": "Shared" },
            "second": { "contentType": "zapi_schema__integer", "name": "Shared" }
        }"#;
        let graph = graph(items);

        let mut notifier = CollectingNotifier::new();
        let mut reuse = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);
        reuse.resolve_child(&ChildRef::linked("first")).unwrap();
        reuse.resolve_child(&ChildRef::linked("second")).unwrap();
        let components = reuse.into_components();
        assert_eq!(
            components.schemas["Shared"].as_schema().unwrap().schema_type,
            Some(SchemaType::String)
        );

        let mut notifier = CollectingNotifier::new();
        let mut strict = ResolutionContext::new(&graph, "api", ResolveOptions::strict(), &mut notifier);
        strict.resolve_child(&ChildRef::linked("first")).unwrap();
        let err = strict.resolve_child(&ChildRef::linked("second")).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::SchemaNameCollision { ref first, ref second, .. }
                if first == "first" && second == "second"
        ));
    }

    #[test]
    fn malformed_object_example_is_dropped_and_reported() {
        let graph = graph(
            r#"{ "obj": { "contentType": "zapi_schema__object", "example": "{ not json" },
                 "flag": { "contentType": "zapi_schema__boolean", "example": "true" } }"#,
        );
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        let obj = ctx.resolve_child(&ChildRef::component("obj")).unwrap();
        assert!(obj.schema.as_schema().unwrap().example.is_none());
        let flag = ctx.resolve_child(&ChildRef::component("flag")).unwrap();
        assert_eq!(flag.schema.as_schema().unwrap().example, Some(Value::Bool(true)));

        drop(ctx);
        assert_eq!(notifier.events.len(), 1);
        assert!(notifier.events[0].data.text.contains("obj"));
    }

    #[test]
    fn discriminator_maps_values_to_refs() {
        let items = format!(
            r#"{{
                "pet": {{ "contentType": "zapi_schema__oneof", "name": "Pet", "schemas": "{}", "discriminator": "{}" }},
                "cat": {{ "contentType": "zapi_schema__object", "name": "Cat" }},
                "disc": {{ "contentType": "zapi_discriminator", "propertyName": "kind", "mapping": "{}" }},
                "cat_map": {{ "contentType": "zapi_discriminator__map_item", "discriminatorValue": "cat", "schema": ["cat"] }}
            }}"#,
            link("cat"),
            component("disc"),
            component("cat_map"),
        );
        let graph = graph(&items);
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        let pet = ctx.resolve_child(&ChildRef::component("pet")).unwrap();
        let discriminator = pet.schema.as_schema().unwrap().discriminator.clone().unwrap();
        assert_eq!(discriminator.property_name, "kind");
        assert_eq!(discriminator.mapping["cat"], "#/components/schemas/Cat");
    }

    #[test]
    fn discriminator_targets_exist_when_members_are_inline() {
        let items = format!(
            r#"{{
                "pet": {{ "contentType": "zapi_schema__oneof", "name": "Pet", "schemas": "{}", "discriminator": "{}" }},
                "dog": {{ "contentType": "zapi_schema__object", "name": "Dog" }},
                "disc": {{ "contentType": "zapi_discriminator", "propertyName": "kind", "mapping": "{}" }},
                "dog_map": {{ "contentType": "zapi_discriminator__map_item", "discriminatorValue": "dog", "schema": ["dog"] }}
            }}"#,
            component("dog"),
            component("disc"),
            component("dog_map"),
        );
        let graph = graph(&items);
        let mut notifier = CollectingNotifier::new();
        let mut ctx = ResolutionContext::new(&graph, "api", ResolveOptions::default(), &mut notifier);

        let pet = ctx.resolve_child(&ChildRef::component("pet")).unwrap();
        let pet = pet.schema.as_schema().unwrap();
        assert_eq!(pet.one_of[0].as_schema().unwrap().schema_type, Some(SchemaType::Object));
        let discriminator = pet.discriminator.clone().unwrap();
        assert_eq!(discriminator.mapping["dog"], "#/components/schemas/Dog");
        assert!(ctx.components().schemas.contains_key("Dog"));
    }
}
