use std::collections::BTreeMap;
use std::path::Path;

use boxen_model::BoxModel;
use minijinja::{Environment, ErrorKind};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::{RenderRequest, TemplateRenderer};

pub const TEMPLATE_EXTENSION: &str = "j2";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {name} not found")]
    NotFound { name: String },
    #[error("failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Store-relative path of a template: `<vendor>/<model>/<version>/<scope>/.../<name>.j2`.
pub fn template_path(model: &BoxModel, scopes: &[String], template: &str) -> String {
    let mut segments = Vec::with_capacity(scopes.len() + 4);
    segments.push(model.vendor.as_str());
    segments.push(model.model.as_str());
    segments.push(model.version.as_str());
    segments.extend(scopes.iter().map(String::as_str));
    format!("{}/{template}.{TEMPLATE_EXTENSION}", segments.join("/"))
}

#[derive(Serialize)]
struct TemplateData<'a> {
    model: &'a BoxModel,
    context: &'a BTreeMap<String, Value>,
    command: &'a str,
    args: &'a [String],
    scopes: &'a [String],
    #[serde(flatten)]
    vars: &'a BTreeMap<String, Value>,
}

/// minijinja-backed template store, loaded lazily from disk or seeded in memory.
pub struct TemplateStore {
    env: Environment<'static>,
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore").finish_non_exhaustive()
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env
}

fn classify_error(name: &str, error: minijinja::Error) -> TemplateError {
    if error.kind() == ErrorKind::TemplateNotFound {
        TemplateError::NotFound {
            name: name.to_string(),
        }
    } else {
        TemplateError::Render {
            name: name.to_string(),
            source: error,
        }
    }
}

impl TemplateStore {
    /// Templates are read from `root` on first use and cached afterwards.
    pub fn from_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        tracing::debug!(template_root = %root.display(), "using filesystem template store");
        let mut env = base_environment();
        env.set_loader(minijinja::path_loader(root));
        Self { env }
    }

    pub fn from_sources<I, N, S>(sources: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = base_environment();
        for (name, source) in sources {
            let name = name.into();
            env.add_template_owned(name.clone(), source.into())
                .map_err(|error| classify_error(&name, error))?;
        }
        Ok(Self { env })
    }
}

impl TemplateRenderer for TemplateStore {
    fn render(&self, request: &RenderRequest<'_>) -> Result<String, TemplateError> {
        let name = template_path(request.model, request.scopes, request.template);
        let template = self
            .env
            .get_template(&name)
            .map_err(|error| classify_error(&name, error))?;
        let data = TemplateData {
            model: request.model,
            context: request.context,
            command: request.command,
            args: request.args,
            scopes: request.scopes,
            vars: request.vars,
        };
        template
            .render(&data)
            .map_err(|error| classify_error(&name, error))
    }
}
