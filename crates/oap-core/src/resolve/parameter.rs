use super::ResolutionContext;
use super::example::parameter_example;
use crate::content::item::{ChildField, Parameter as ParameterItem};
use crate::content::{boolean_choice, non_empty, single_choice};
use crate::error::ResolveError;
use crate::openapi::parameter::{Header, Parameter, ParameterLocation, ParameterOrRef};
use crate::rich_text::{ChildRef, LabelMode};

impl ResolutionContext<'_> {
    /// Resolve an operation's parameters in field order.
    ///
    /// Linked parameters are registered once under their name and referenced;
    /// components are inlined.
    pub fn parameters(&mut self, field: &ChildField) -> Result<Vec<ParameterOrRef>, ResolveError> {
        let graph = self.graph;
        let mut parameters = Vec::new();
        for child in field.children() {
            let item = graph.parameter(&child.codename)?;
            let name = non_empty(&item.name).unwrap_or_else(|| child.codename.clone());

            if !child.is_item {
                let parameter = self.build_parameter(&child.codename, &name, item)?;
                parameters.push(ParameterOrRef::Parameter(Box::new(parameter)));
                continue;
            }
            if !self.components.parameters.contains_key(&name) {
                let parameter = self.build_parameter(&child.codename, &name, item)?;
                self.components.parameters.insert(name.clone(), parameter);
            }
            parameters.push(ParameterOrRef::component(&name));
        }
        Ok(parameters)
    }

    fn build_parameter(
        &mut self,
        codename: &str,
        name: &str,
        item: &ParameterItem,
    ) -> Result<Parameter, ResolveError> {
        let location = single_choice(&item.location)
            .and_then(ParameterLocation::parse)
            .ok_or_else(|| ResolveError::InvalidFieldValue {
                codename: codename.to_string(),
                field: "location",
                value: item.location.join(","),
            })?;
        let header = self.header(codename, item)?;

        Ok(Parameter {
            name: name.to_string(),
            location,
            description: header.description,
            required: header.required,
            deprecated: header.deprecated,
            style: single_choice(&item.style).map(str::to_string),
            explode: boolean_choice(&item.explode),
            schema: header.schema,
            example: header.example,
        })
    }

    /// The location-independent part of a parameter item.
    pub(crate) fn header(&mut self, codename: &str, item: &ParameterItem) -> Result<Header, ResolveError> {
        let description = self.describe(&item.description, LabelMode::CalloutsOnly)?;

        let graph = self.graph;
        let (schema, linked_schema) = match self.single_slot("schema", codename, &item.schema)? {
            Some(linked) => {
                let entry = self.resolve_child(&ChildRef::linked(linked))?;
                (Some(entry.schema), Some(graph.schema(linked)?))
            }
            None => (None, None),
        };
        let example = non_empty(&item.example).map(|raw| parameter_example(linked_schema, &raw));

        Ok(Header {
            description,
            required: boolean_choice(&item.required),
            deprecated: boolean_choice(&item.deprecated),
            schema,
            example,
        })
    }
}
