use std::fmt;

use boxen_model::BoxModel;
use thiserror::Error;

use crate::{CommandError, Context, Session};

/// Runs a complete CLI session over `session`.
pub type CliEntryPoint = fn(&mut Session<'_>, &mut Context) -> Result<(), CommandError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot find CLI extension for {vendor}, {model}, {version}")]
pub struct ExtensionNotFoundError {
    pub vendor: String,
    pub model: String,
    pub version: String,
}

/// Static registration record of one vendor CLI.
#[derive(Clone, Copy)]
pub struct CliImplementation {
    pub vendor: &'static str,
    pub model: &'static str,
    pub version: &'static str,
    pub run: CliEntryPoint,
}

impl fmt::Debug for CliImplementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliImplementation")
            .field("vendor", &self.vendor)
            .field("model", &self.model)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl CliImplementation {
    pub fn matches(&self, vendor: &str, model: &str, version: &str) -> bool {
        self.vendor == vendor && self.model == model && self.version == version
    }

    pub fn serves(&self, model: &BoxModel) -> bool {
        self.matches(&model.vendor, &model.model, &model.version)
    }
}

/// First registered CLI matching vendor, model and version exactly.
pub fn find_cli<'r>(
    registry: &'r [CliImplementation],
    vendor: &str,
    model: &str,
    version: &str,
) -> Result<&'r CliImplementation, ExtensionNotFoundError> {
    let found = registry
        .iter()
        .find(|cli| cli.matches(vendor, model, version));
    match found {
        Some(cli) => {
            tracing::debug!(vendor, model, version, "found CLI implementation");
            Ok(cli)
        }
        None => Err(ExtensionNotFoundError {
            vendor: vendor.to_string(),
            model: model.to_string(),
            version: version.to_string(),
        }),
    }
}
