//! Hierarchical command-processor engine for simulated network equipment.
//!
//! One `CommandProcessor` runs per active menu level. Each reads a line per
//! cycle, resolves it against a statically declared command table, and lets
//! handlers descend into nested menus. Leaving menus is expressed as a typed
//! `Flow` value returned up the stack rather than as an error.

pub mod command_error;
pub mod command_table;
pub mod context;
pub mod credentials;
pub mod factory;
pub mod processor;
pub mod scope_path;
pub mod tokenizer;

pub use command_error::{CommandError, CommandResult};
pub use command_table::{CommandTable, Handler, Resolution};
pub use context::Context;
pub use credentials::{find_credential, verify_pending_login, PENDING_USERNAME_KEY};
pub use factory::{find_cli, CliEntryPoint, CliImplementation, ExtensionNotFoundError};
pub use processor::{
    run_session, CommandProcessor, Flow, Invocation, LoopOptions, LoopOutcome, Menu, Session,
    Terminal, Vars,
};
pub use scope_path::ScopePath;
pub use tokenizer::{dissect, parse_line, Expect, ParsedLine, COMMENT_MARKER, NEGATION_MARKER};
