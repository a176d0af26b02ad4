//! Assembly of a complete OpenAPI document from a content package.

use indexmap::IndexMap;

use crate::config::ResolveOptions;
use crate::content::item::{PathOperation, Specification};
use crate::content::{ContentPackage, NOT_SPECIFIED, boolean_choice, non_empty, single_choice};
use crate::error::ResolveError;
use crate::notify::Notifier;
use crate::openapi::OPENAPI_VERSION;
use crate::openapi::operation::{CodeSample, HttpMethod, Operation, PathItem};
use crate::openapi::security::SecurityRequirement;
use crate::openapi::server::Server;
use crate::openapi::spec::{Contact, Info, License, OpenApiSpec, Tag};
use crate::resolve::ResolutionContext;
use crate::rich_text::{self, LabelMode};

/// Generate the OpenAPI document for the package's specification item.
///
/// Each call uses fresh registries, so the same package always yields the
/// same document.
pub fn generate(
    package: &ContentPackage,
    options: ResolveOptions,
    notifier: &mut dyn Notifier,
) -> Result<OpenApiSpec, ResolveError> {
    let graph = &package.graph;
    let root = &package.specification_codename;
    let specification = graph.specification(root).map_err(|err| match err {
        ResolveError::MissingChildItem { .. } => ResolveError::MissingRoot(root.clone()),
        other => other,
    })?;
    log::debug!("generating specification '{root}' from {} items", graph.len());

    let mut ctx = ResolutionContext::new(graph, root, options, notifier);
    let info = info(&mut ctx, root, specification)?;
    let servers = servers(&ctx, &specification.servers)?;
    let (tags, operations) = tags(&mut ctx, specification)?;
    let paths = paths(&mut ctx, operations)?;
    ctx.finalize();

    let security_scheme = match ctx.exactly_one("security", root, &specification.security)? {
        Some(codename) => Some(ctx.security_scheme(codename)?),
        None => None,
    };
    let mut components = ctx.into_components();
    let security = security_scheme.map(|(name, scheme)| {
        components.security_schemes.insert(name.clone(), scheme);
        let mut requirement = SecurityRequirement::new();
        requirement.insert(name, Vec::new());
        vec![requirement]
    });

    Ok(OpenApiSpec {
        openapi: OPENAPI_VERSION.to_string(),
        info,
        servers,
        tags,
        paths,
        components,
        security,
        api_status: specification.api_status.first().cloned(),
    })
}

fn info(
    ctx: &mut ResolutionContext<'_>,
    root: &str,
    specification: &Specification,
) -> Result<Info, ResolveError> {
    let graph = ctx.graph();
    let description = ctx.describe(&specification.description, LabelMode::AllChildren)?;

    let contact = match ctx.exactly_one("contact", root, &specification.contact)? {
        Some(codename) => {
            let contact = graph.contact(codename)?;
            Some(Contact {
                name: non_empty(&contact.name),
                url: non_empty(&contact.url),
                email: non_empty(&contact.email),
            })
        }
        None => None,
    };
    let license = match ctx.exactly_one("license", root, &specification.license)? {
        Some(codename) => {
            let license = graph.license(codename)?;
            Some(License {
                name: license.name.clone(),
                url: non_empty(&license.url),
            })
        }
        None => None,
    };

    Ok(Info {
        title: specification.title.clone(),
        description,
        version: specification.version.clone(),
        terms_of_service: non_empty(&specification.terms_of_service),
        contact,
        license,
    })
}

fn servers(ctx: &ResolutionContext<'_>, field: &str) -> Result<Vec<Server>, ResolveError> {
    let graph = ctx.graph();
    rich_text::extract_children(field)
        .iter()
        .map(|child| -> Result<Server, ResolveError> {
            let server = graph.server(&child.codename)?;
            Ok(Server {
                url: server.url.clone(),
                description: non_empty(&server.description),
            })
        })
        .collect()
}

/// One tag per category, plus every distinct operation with the names of
/// the categories listing it.
fn tags(
    ctx: &mut ResolutionContext<'_>,
    specification: &Specification,
) -> Result<(Vec<Tag>, IndexMap<String, Vec<String>>), ResolveError> {
    let graph = ctx.graph();
    let mut tags = Vec::new();
    let mut operations: IndexMap<String, Vec<String>> = IndexMap::new();

    for codename in &specification.categories {
        let category = graph.category(codename)?;
        tags.push(Tag {
            name: category.name.clone(),
            description: ctx.describe(&category.description, LabelMode::AllChildren)?,
        });
        for operation in &category.path_operations {
            let categories = operations.entry(operation.clone()).or_default();
            if !categories.contains(&category.name) {
                categories.push(category.name.clone());
            }
        }
    }
    Ok((tags, operations))
}

fn paths(
    ctx: &mut ResolutionContext<'_>,
    operations: IndexMap<String, Vec<String>>,
) -> Result<IndexMap<String, PathItem>, ResolveError> {
    let graph = ctx.graph();
    let mut paths: IndexMap<String, PathItem> = IndexMap::new();

    for (codename, tags) in operations {
        let item = graph.path_operation(&codename)?;
        let method = single_choice(&item.path_operation)
            .and_then(HttpMethod::parse)
            .ok_or_else(|| ResolveError::InvalidHttpMethod {
                codename: codename.clone(),
                method: item.path_operation.join(","),
            })?;
        let path = item.path.trim().to_string();
        log::debug!("resolving {} {path} from '{codename}'", method.as_str());

        let operation = operation(ctx, &codename, item, tags)?;
        let slot = paths.entry(path.clone()).or_default().slot_mut(method);
        if slot.is_some() {
            log::warn!("{} {path} is defined twice, '{codename}' replaces it", method.as_str());
        }
        *slot = Some(operation);
    }
    Ok(paths)
}

fn operation(
    ctx: &mut ResolutionContext<'_>,
    codename: &str,
    item: &PathOperation,
    tags: Vec<String>,
) -> Result<Operation, ResolveError> {
    let description = ctx.describe(&item.description, LabelMode::AllChildren)?;
    let parameters = ctx.parameters(&item.parameters)?;
    let request_body = ctx.request_body(codename, &item.request_body)?;
    let responses = ctx.responses(&item.responses)?;
    let code_samples = code_samples(ctx, codename, item)?;

    Ok(Operation {
        summary: non_empty(&item.name),
        description,
        operation_id: non_empty(&item.url),
        tags,
        parameters,
        request_body,
        responses,
        deprecated: boolean_choice(&item.deprecated),
        code_samples,
    })
}

/// `x-code-samples` from the operation's single code samples group.
fn code_samples(
    ctx: &ResolutionContext<'_>,
    codename: &str,
    item: &PathOperation,
) -> Result<Vec<CodeSample>, ResolveError> {
    let graph = ctx.graph();
    let Some(group) = ctx.exactly_one("codeSamples", codename, &item.code_samples)? else {
        return Ok(Vec::new());
    };
    graph
        .code_samples(group)?
        .code_samples
        .iter()
        .map(|sample| -> Result<CodeSample, ResolveError> {
            let sample = graph.code_sample(sample)?;
            Ok(CodeSample {
                lang: single_choice(&sample.programming_language)
                    .unwrap_or(NOT_SPECIFIED)
                    .to_string(),
                source: sample.code.clone(),
            })
        })
        .collect()
}
