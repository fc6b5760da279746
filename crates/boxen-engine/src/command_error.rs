use boxen_model::ModelError;
use boxen_render::TemplateError;
use thiserror::Error;

use crate::processor::Flow;

/// Failures raised while dispatching a command line.
///
/// `Syntax` is always recovered by the menu level that produced it. Template
/// and model failures inside ordinary commands are turned into `Syntax` by
/// the dispatcher; only terminal i/o failures end a session abnormally.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid command: {command}")]
    Syntax { command: String },
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    pub fn syntax(command: impl Into<String>) -> Self {
        Self::Syntax {
            command: command.into(),
        }
    }
}

pub type CommandResult = Result<Flow, CommandError>;
