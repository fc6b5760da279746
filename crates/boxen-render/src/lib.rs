//! Output rendering for simulated CLIs.
//!
//! Resolves command output templates by vendor, model, version and menu
//! scope path, then evaluates them with minijinja against the box model and
//! the session context.

pub mod template_store;

pub use template_store::{template_path, TemplateError, TemplateStore, TEMPLATE_EXTENSION};

use std::collections::BTreeMap;

use boxen_model::BoxModel;
use serde_json::Value;

/// Everything a template may refer to while rendering one piece of output.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub template: &'a str,
    pub scopes: &'a [String],
    pub command: &'a str,
    pub args: &'a [String],
    pub model: &'a BoxModel,
    pub context: &'a BTreeMap<String, Value>,
    pub vars: &'a BTreeMap<String, Value>,
}

/// Trait contract for the rendering collaborator.
pub trait TemplateRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<String, TemplateError>;
}
