//! Embedded children: labelling them as markers and splicing their output.

use crate::content::item::ContentItem;
use crate::content::{ContentGraph, NOT_SPECIFIED, single_choice};
use crate::error::ResolveError;
use crate::openapi::{ComponentSection, component_ref};

use super::html::Token;
use super::markdown::{Segment, fix_up};
use super::{ChildRef, embedded_child};

/// Which embedded children a description may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Callouts, code samples and schema references (operations, tags, info).
    AllChildren,
    /// Only callouts; other known children are dropped.
    CalloutsOnly,
}

/// Resolves a schema embedded in prose and returns its identifier.
pub trait SchemaReferences {
    fn schema_identifier(&mut self, child: &ChildRef) -> Result<String, ResolveError>;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Html(Token),
    Marker(Marker),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SampleMarker {
    pub codename: String,
    pub languages: Vec<String>,
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Marker {
    Callout { category: String, codename: String },
    CodeSample(SampleMarker),
    CodeSampleGroup(Vec<SampleMarker>),
    SchemaReference { identifier: String },
}

/// Tracks the body of an embedded element until its closing tag.
struct Skip {
    name: String,
    depth: usize,
}

impl Skip {
    /// Returns `true` once the element is closed.
    fn advance(&mut self, token: &Token) -> bool {
        match token {
            Token::Open(element) if element.name == self.name && !element.self_closing => {
                self.depth += 1;
                false
            }
            Token::Close(name) if *name == self.name => {
                if self.depth == 0 {
                    return true;
                }
                self.depth -= 1;
                false
            }
            _ => false,
        }
    }
}

pub(crate) fn label(
    tokens: Vec<Token>,
    mode: LabelMode,
    graph: &ContentGraph,
    schemas: &mut dyn SchemaReferences,
) -> Result<Vec<Node>, ResolveError> {
    let mut nodes = Vec::with_capacity(tokens.len());
    let mut skipping: Option<Skip> = None;

    for token in tokens {
        if let Some(skip) = skipping.as_mut() {
            if skip.advance(&token) {
                skipping = None;
            }
            continue;
        }

        let embedded = match &token {
            Token::Open(element) => embedded_child(element).map(|child| (child, element)),
            _ => None,
        };
        let Some((child, element)) = embedded else {
            nodes.push(Node::Html(token));
            continue;
        };

        if !element.self_closing {
            skipping = Some(Skip {
                name: element.name.clone(),
                depth: 0,
            });
        }
        if let Some(marker) = label_child(&child, mode, graph, schemas)? {
            nodes.push(Node::Marker(marker));
        }
    }
    Ok(nodes)
}

fn label_child(
    child: &ChildRef,
    mode: LabelMode,
    graph: &ContentGraph,
    schemas: &mut dyn SchemaReferences,
) -> Result<Option<Marker>, ResolveError> {
    let marker = match graph.get(&child.codename)? {
        ContentItem::Callout(callout) => Marker::Callout {
            category: single_choice(&callout.callout_type)
                .unwrap_or(NOT_SPECIFIED)
                .to_string(),
            codename: child.codename.clone(),
        },
        ContentItem::CodeSample(_) | ContentItem::CodeSamples(_) | ContentItem::Schema(_)
            if mode == LabelMode::CalloutsOnly =>
        {
            log::debug!("dropping '{}' from a callouts-only description", child.codename);
            return Ok(None);
        }
        ContentItem::CodeSample(sample) => Marker::CodeSample(SampleMarker {
            codename: child.codename.clone(),
            languages: sample.programming_language.clone(),
            platforms: sample.platform.clone(),
        }),
        ContentItem::CodeSamples(group) => {
            let samples = group
                .code_samples
                .iter()
                .map(|codename| {
                    graph.code_sample(codename).map(|sample| SampleMarker {
                        codename: codename.clone(),
                        languages: sample.programming_language.clone(),
                        platforms: sample.platform.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Marker::CodeSampleGroup(samples)
        }
        ContentItem::Schema(_) => Marker::SchemaReference {
            identifier: schemas.schema_identifier(child)?,
        },
        other => {
            return Err(ResolveError::InvalidChildType {
                codename: child.codename.clone(),
                content_type: other.content_type().to_string(),
            });
        }
    };
    Ok(Some(marker))
}

/// Render segments to the final description text.
pub(crate) fn resolve(segments: Vec<Segment>, graph: &ContentGraph) -> Result<String, ResolveError> {
    let mut parts = Vec::with_capacity(segments.len());
    for segment in segments {
        let part = match segment {
            Segment::Text(text) => fix_up(&text),
            Segment::Marker(marker) => render_marker(&marker, graph)?,
        };
        if !part.is_empty() {
            parts.push(part);
        }
    }
    Ok(parts.join("\n\n"))
}

fn render_marker(marker: &Marker, graph: &ContentGraph) -> Result<String, ResolveError> {
    Ok(match marker {
        Marker::Callout { category, codename } => {
            let body = graph
                .callout(codename)?
                .content
                .replace("{~", "<code>")
                .replace("~}", "</code>");
            format!("<!--Callout type={category}-->{body}<!--Callout-end-->")
        }
        Marker::CodeSample(sample) => render_sample(sample, graph)?,
        Marker::CodeSampleGroup(samples) => {
            let rendered = samples
                .iter()
                .map(|sample| render_sample(sample, graph))
                .collect::<Result<Vec<_>, _>>()?;
            format!("<!--CodeSamples-->\n{}\n<!--CodeSamples-end-->", rendered.join("\n"))
        }
        Marker::SchemaReference { identifier } => format!(
            "<SchemaDefinition schemaRef=\"{}\" showReadOnly={{true}} showWriteOnly={{true}} />",
            component_ref(ComponentSection::Schemas, identifier)
        ),
    })
}

fn render_sample(sample: &SampleMarker, graph: &ContentGraph) -> Result<String, ResolveError> {
    let code = &graph.code_sample(&sample.codename)?.code;
    let language = sample
        .languages
        .first()
        .map(|language| fence_language(language))
        .unwrap_or_default();
    Ok(format!(
        "<!--CodeSample programmingLanguage={} platform={}-->\n```{language}\n{code}\n```\n<!--CodeSample-end-->",
        sample.languages.join(","),
        sample.platforms.join(","),
    ))
}

/// Info-string token for a fenced block.
pub(crate) fn fence_language(language: &str) -> String {
    match language.trim() {
        "C#" => "csharp".to_string(),
        "CSS" | "cURL" | "shell" => String::new(),
        other => other.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::from_json;
    use crate::rich_text::render;

    /// Reports identifiers without registering anything.
    struct Identifiers<'a>(&'a ContentGraph);

    impl SchemaReferences for Identifiers<'_> {
        fn schema_identifier(&mut self, child: &ChildRef) -> Result<String, ResolveError> {
            Ok(self.0.schema(&child.codename)?.identifier(&child.codename))
        }
    }

    fn embedded(codename: &str) -> String {
        format!(
            r#"<p type="application/kenticocloud" data-type="item" data-rel="component" data-codename="{codename}"></p>"#
        )
    }

    fn graph() -> ContentGraph {
        from_json(
            r#"{
            "zapiSpecificationCodename": "api",
            "items": {
                "note": { "contentType": "callout", "type": ["info"], "content": "<p>Use {~id~}</p>" },
                "mixed": { "contentType": "callout", "type": ["info", "warning"], "content": "<p>Both</p>" },
                "csharp": { "contentType": "code_sample", "code": "var x = 1;", "programmingLanguage": ["C#"], "platform": [".NET"] },
                "curl": { "contentType": "code_sample", "code": "curl -X GET", "programmingLanguage": ["cURL"], "platform": [] },
                "samples": { "contentType": "code_samples", "codeSamples": ["curl", "csharp"] },
                "user": { "contentType": "zapi_schema__object", "name": "User" },
                "server": { "contentType": "zapi_server", "url": "https://x" }
            }
        }"#,
        )
        .unwrap()
        .graph
    }

    fn render_all(field: &str, mode: LabelMode) -> Result<String, ResolveError> {
        let graph = graph();
        let mut identifiers = Identifiers(&graph);
        render(field, mode, &graph, &mut identifiers)
    }

    #[test]
    fn callouts_are_spliced_with_inline_code() {
        let field = format!("<p>Before</p>{}<p>After</p>", embedded("note"));
        assert_eq!(
            render_all(&field, LabelMode::AllChildren).unwrap(),
            "Before\n\n<!--Callout type=info--><p>Use <code>id</code></p><!--Callout-end-->\n\nAfter"
        );
    }

    #[test]
    fn callouts_with_several_types_are_not_specified() {
        assert_eq!(
            render_all(&embedded("mixed"), LabelMode::AllChildren).unwrap(),
            "<!--Callout type=not_specified--><p>Both</p><!--Callout-end-->"
        );
    }

    #[test]
    fn code_sample_groups_keep_list_order() {
        let rendered = render_all(&embedded("samples"), LabelMode::AllChildren).unwrap();
        insta::assert_snapshot!(rendered, @r"
        <!--CodeSamples-->
        <!--CodeSample programmingLanguage=cURL platform=-->
        ```
        curl -X GET
        ```
        <!--CodeSample-end-->
        <!--CodeSample programmingLanguage=C# platform=.NET-->
        ```csharp
        var x = 1;
        ```
        <!--CodeSample-end-->
        <!--CodeSamples-end-->
        ");
    }

    #[test]
    fn schema_references_become_schema_definitions() {
        let field = format!("<h2>Model</h2>{}", embedded("user"));
        assert_eq!(
            render_all(&field, LabelMode::AllChildren).unwrap(),
            "## Model\n\n<SchemaDefinition schemaRef=\"#/components/schemas/User\" showReadOnly={true} showWriteOnly={true} />"
        );
    }

    #[test]
    fn callouts_only_drops_other_children() {
        let field = format!("<p>Text</p>{}{}{}", embedded("csharp"), embedded("user"), embedded("note"));
        assert_eq!(
            render_all(&field, LabelMode::CalloutsOnly).unwrap(),
            "Text\n\n<!--Callout type=info--><p>Use <code>id</code></p><!--Callout-end-->"
        );
    }

    #[test]
    fn unknown_children_are_rejected() {
        let err = render_all(&embedded("server"), LabelMode::CalloutsOnly).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidChildType { ref codename, ref content_type }
                if codename == "server" && content_type == "zapi_server"
        ));
    }

    #[test]
    fn missing_children_are_rejected() {
        let err = render_all(&embedded("ghost"), LabelMode::AllChildren).unwrap_err();
        assert!(matches!(err, ResolveError::MissingChildItem { ref codename } if codename == "ghost"));
    }

    #[test]
    fn normalizes_fence_languages() {
        assert_eq!(fence_language("C#"), "csharp");
        assert_eq!(fence_language("shell"), "");
        assert_eq!(fence_language("CSS"), "");
        assert_eq!(fence_language("JavaScript"), "javascript");
    }
}
