use crate::processor::{Invocation, Terminal};
use crate::{CommandResult, Context};

/// Command handler bound to a menu type.
pub type Handler<M> = fn(&mut M, &mut Terminal<'_, '_>, &Invocation, &mut Context) -> CommandResult;

struct CommandEntry<M> {
    name: &'static str,
    handler: Handler<M>,
}

/// Outcome of looking a verb up in a [`CommandTable`].
pub enum Resolution<M> {
    Command {
        name: &'static str,
        handler: Handler<M>,
    },
    Unknown(Handler<M>),
    Default,
}

/// Ordered verb-to-handler table declared once per menu type.
///
/// Entries are kept sorted by name. A verb resolves to the first entry whose
/// name starts with it, so when several commands share a prefix the
/// alphabetically smallest one wins.
pub struct CommandTable<M> {
    entries: Vec<CommandEntry<M>>,
    unknown: Option<Handler<M>>,
    line: Option<Handler<M>>,
}

impl<M> Default for CommandTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> CommandTable<M> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            unknown: None,
            line: None,
        }
    }

    /// Registers `name`, replacing an earlier entry with the same name.
    pub fn command(mut self, name: &'static str, handler: Handler<M>) -> Self {
        match self.entries.binary_search_by(|entry| entry.name.cmp(name)) {
            Ok(index) => self.entries[index].handler = handler,
            Err(index) => self.entries.insert(index, CommandEntry { name, handler }),
        }
        self
    }

    /// Hook invoked for verbs matching no declared command.
    pub fn on_unknown(mut self, handler: Handler<M>) -> Self {
        self.unknown = Some(handler);
        self
    }

    /// Hands every input line to `handler` as typed. Blank and `!` lines are
    /// not skipped and declared commands are never consulted.
    pub fn on_line(mut self, handler: Handler<M>) -> Self {
        self.line = Some(handler);
        self
    }

    pub fn line_handler(&self) -> Option<Handler<M>> {
        self.line
    }

    pub fn resolve(&self, verb: &str) -> Resolution<M> {
        if let Some(entry) = self.entries.iter().find(|entry| entry.name.starts_with(verb)) {
            return Resolution::Command {
                name: entry.name,
                handler: entry.handler,
            };
        }
        match self.unknown {
            Some(handler) => Resolution::Unknown(handler),
            None => Resolution::Default,
        }
    }

    #[cfg(test)]
    fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }
}
