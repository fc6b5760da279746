use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use boxen_model::BoxModel;
use boxen_render::{RenderRequest, TemplateError, TemplateRenderer};
use serde_json::Value;

use crate::command_table::{CommandTable, Resolution};
use crate::tokenizer::parse_line;
use crate::{CommandError, CommandResult, Context, ScopePath};

/// Extra template variables supplied by a handler.
pub type Vars = BTreeMap<String, Value>;

/// Control flow requested by a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep cycling at the current menu level.
    Continue,
    /// Leave the current menu level. How far this propagates is decided by
    /// each level's [`LoopOptions::raise_on_exit`].
    Exit,
    /// Unwind to the ancestor menu with the given scope name and resume there.
    ReturnTo(String),
}

/// How a menu loop ended, as seen by the code that started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// End of input, or an exit signal caught at this level.
    Completed,
    /// Exit signal handed on to the caller.
    Exit,
    /// Caller and its ancestors must unwind to the named scope.
    ReturnTo(String),
}

impl From<LoopOutcome> for Flow {
    fn from(outcome: LoopOutcome) -> Self {
        match outcome {
            LoopOutcome::Completed => Flow::Continue,
            LoopOutcome::Exit => Flow::Exit,
            LoopOutcome::ReturnTo(scope) => Flow::ReturnTo(scope),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOptions {
    pub raise_on_exit: bool,
    pub return_to: Option<String>,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            raise_on_exit: true,
            return_to: None,
        }
    }
}

impl LoopOptions {
    /// Exit signals end this level only.
    pub fn catch_exit(mut self) -> Self {
        self.raise_on_exit = false;
        self
    }

    /// After a normal end, resume at the ancestor named `scope` instead of the caller.
    pub fn return_to(mut self, scope: impl Into<String>) -> Self {
        self.return_to = Some(scope.into());
        self
    }

    pub fn top_level() -> Self {
        Self::default().catch_exit()
    }
}

/// One parsed input line handed to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
    /// Input line as typed, minus surrounding whitespace.
    pub raw: String,
}

impl Invocation {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        let mut invocation = Self {
            command: command.into(),
            args,
            raw: String::new(),
        };
        invocation.raw = invocation.line();
        invocation
    }

    /// Input line passed through untouched, for menus reading free text.
    pub fn verbatim(line: &str) -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            raw: line.to_string(),
        }
    }

    pub fn with_raw(mut self, raw: &str) -> Self {
        self.raw = raw.trim().to_string();
        self
    }

    /// Normalized command line, used in error reports.
    pub fn line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Collaborators shared by every menu level of one session.
pub struct Session<'s> {
    model: &'s mut BoxModel,
    renderer: &'s dyn TemplateRenderer,
    input: &'s mut dyn BufRead,
    output: &'s mut dyn Write,
}

impl<'s> Session<'s> {
    pub fn new(
        model: &'s mut BoxModel,
        renderer: &'s dyn TemplateRenderer,
        input: &'s mut dyn BufRead,
        output: &'s mut dyn Write,
    ) -> Self {
        Self {
            model,
            renderer,
            input,
            output,
        }
    }

    pub fn model(&self) -> &BoxModel {
        &*self.model
    }
}

/// A menu level's view of the session: shared streams and model plus its scope path.
pub struct Terminal<'t, 's> {
    session: &'t mut Session<'s>,
    scopes: ScopePath,
}

impl<'t, 's> Terminal<'t, 's> {
    pub fn new(session: &'t mut Session<'s>, scopes: ScopePath) -> Self {
        Self { session, scopes }
    }

    pub fn scopes(&self) -> &ScopePath {
        &self.scopes
    }

    pub fn model(&self) -> &BoxModel {
        &*self.session.model
    }

    pub fn model_mut(&mut self) -> &mut BoxModel {
        &mut *self.session.model
    }

    /// Blocks for one line; `None` at end of input.
    pub fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut buffer = Vec::new();
        if self.session.input.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(None);
        }
        while matches!(buffer.last(), Some(b'\n' | b'\r')) {
            buffer.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
    }

    pub fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.session.output.write_all(text.as_bytes())?;
        self.session.output.flush()
    }

    pub fn render(
        &self,
        template: &str,
        invocation: &Invocation,
        context: &Context,
        vars: &Vars,
    ) -> Result<String, TemplateError> {
        self.session.renderer.render(&RenderRequest {
            template,
            scopes: self.scopes.as_slice(),
            command: &invocation.command,
            args: &invocation.args,
            model: &*self.session.model,
            context: context.as_map(),
            vars,
        })
    }

    /// Renders `template` for a command and writes it out.
    pub fn render_command(
        &mut self,
        template: &str,
        invocation: &Invocation,
        context: &Context,
    ) -> Result<(), CommandError> {
        self.render_command_with(template, invocation, context, &Vars::new())
    }

    pub fn render_command_with(
        &mut self,
        template: &str,
        invocation: &Invocation,
        context: &Context,
        vars: &Vars,
    ) -> Result<(), CommandError> {
        let text = self.render(template, invocation, context, vars)?;
        self.write(&text)?;
        Ok(())
    }

    /// Renders a lifecycle hook template. Template failures are logged and
    /// dropped since most scopes do not define every hook.
    pub fn render_hook(
        &mut self,
        hook: &str,
        invocation: &Invocation,
        context: &Context,
    ) -> Result<(), CommandError> {
        self.render_hook_with(hook, invocation, context, &Vars::new())
    }

    /// Like [`Terminal::render_hook`], with extra template variables.
    pub fn render_hook_with(
        &mut self,
        hook: &str,
        invocation: &Invocation,
        context: &Context,
        vars: &Vars,
    ) -> Result<(), CommandError> {
        match self.render(hook, invocation, context, vars) {
            Ok(text) => {
                self.write(&text)?;
                Ok(())
            }
            Err(error) => {
                tracing::trace!(scope = %self.scopes, hook, %error, "hook template skipped");
                Ok(())
            }
        }
    }

    /// Runs `menu` as a nested level at `scopes` until it ends, returning the
    /// flow this level's handler should report.
    pub fn spawn<N: Menu>(
        &mut self,
        menu: N,
        scopes: ScopePath,
        options: LoopOptions,
        context: &mut Context,
    ) -> CommandResult {
        let terminal = Terminal::new(&mut *self.session, scopes);
        let mut processor = CommandProcessor::new(menu, terminal);
        Ok(processor.run(context, options)?.into())
    }
}

/// A menu level: its command table plus lifecycle hooks.
///
/// Default hooks render the `on_enter`, `on_cycle`, `on_error` and `on_exit`
/// templates of the menu's scope when they exist. `on_error` sees the
/// offending command line as `command`.
pub trait Menu: Sized {
    fn commands() -> CommandTable<Self>;

    fn on_enter(
        &mut self,
        terminal: &mut Terminal<'_, '_>,
        context: &mut Context,
    ) -> Result<(), CommandError> {
        terminal.render_hook("on_enter", &Invocation::new("on_enter", Vec::new()), context)
    }

    fn on_cycle(
        &mut self,
        terminal: &mut Terminal<'_, '_>,
        context: &mut Context,
    ) -> Result<(), CommandError> {
        terminal.render_hook("on_cycle", &Invocation::new("on_cycle", Vec::new()), context)
    }

    fn on_error(
        &mut self,
        terminal: &mut Terminal<'_, '_>,
        context: &mut Context,
        command: &str,
    ) -> Result<(), CommandError> {
        terminal.render_hook("on_error", &Invocation::new(command, Vec::new()), context)
    }

    fn on_exit(
        &mut self,
        terminal: &mut Terminal<'_, '_>,
        context: &mut Context,
    ) -> Result<(), CommandError> {
        terminal.render_hook("on_exit", &Invocation::new("on_exit", Vec::new()), context)
    }
}

/// Runs the read-dispatch-render loop of one menu level.
pub struct CommandProcessor<'t, 's, M: Menu> {
    menu: M,
    commands: CommandTable<M>,
    terminal: Terminal<'t, 's>,
}

impl<'t, 's, M: Menu> CommandProcessor<'t, 's, M> {
    pub fn new(menu: M, terminal: Terminal<'t, 's>) -> Self {
        Self {
            menu,
            commands: M::commands(),
            terminal,
        }
    }

    pub fn menu(&self) -> &M {
        &self.menu
    }

    pub fn run(
        &mut self,
        context: &mut Context,
        options: LoopOptions,
    ) -> Result<LoopOutcome, CommandError> {
        tracing::debug!(
            scope = %self.terminal.scopes,
            raise_on_exit = options.raise_on_exit,
            return_to = ?options.return_to,
            "entering menu"
        );
        self.menu.on_enter(&mut self.terminal, context)?;

        loop {
            self.menu.on_cycle(&mut self.terminal, context)?;

            let Some(line) = self.terminal.read_line()? else {
                tracing::debug!(scope = %self.terminal.scopes, "end of input");
                break;
            };

            match self.dispatch(&line, context) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => {
                    if options.raise_on_exit {
                        self.menu.on_exit(&mut self.terminal, context)?;
                        tracing::debug!(scope = %self.terminal.scopes, "passing exit signal up");
                        return Ok(LoopOutcome::Exit);
                    }
                    break;
                }
                Ok(Flow::ReturnTo(scope)) => {
                    if scope == self.terminal.scopes.name() {
                        tracing::debug!(scope = %self.terminal.scopes, "resuming after return-to");
                        continue;
                    }
                    tracing::debug!(
                        scope = %self.terminal.scopes,
                        target = %scope,
                        "skipping level on return-to"
                    );
                    return Ok(LoopOutcome::ReturnTo(scope));
                }
                Err(CommandError::Syntax { command }) => {
                    tracing::debug!(scope = %self.terminal.scopes, %command, "rejected command");
                    self.menu.on_error(&mut self.terminal, context, &command)?;
                }
                Err(error) => return Err(error),
            }
        }

        self.menu.on_exit(&mut self.terminal, context)?;
        tracing::debug!(scope = %self.terminal.scopes, "leaving menu");
        Ok(match options.return_to {
            Some(scope) => LoopOutcome::ReturnTo(scope),
            None => LoopOutcome::Completed,
        })
    }

    fn dispatch(&mut self, line: &str, context: &mut Context) -> CommandResult {
        if let Some(handler) = self.commands.line_handler() {
            let invocation = Invocation::verbatim(line);
            let result = handler(&mut self.menu, &mut self.terminal, &invocation, context);
            return self.reject_failures(result, &invocation);
        }

        let Some(parsed) = parse_line(line) else {
            return Ok(Flow::Continue);
        };
        let invocation = Invocation::new(parsed.verb, parsed.args).with_raw(line);

        let result = match self.commands.resolve(&invocation.command) {
            Resolution::Command { name, handler } => {
                tracing::debug!(scope = %self.terminal.scopes, handler = name, "dispatching command");
                handler(&mut self.menu, &mut self.terminal, &invocation, context)
            }
            Resolution::Unknown(handler) => {
                handler(&mut self.menu, &mut self.terminal, &invocation, context)
            }
            Resolution::Default => default_command(&mut self.terminal, &invocation, context),
        };
        self.reject_failures(result, &invocation)
    }

    /// Template and model failures inside a handler reject the command line.
    fn reject_failures(&self, result: CommandResult, invocation: &Invocation) -> CommandResult {
        match result {
            Err(CommandError::Template(error)) => {
                tracing::debug!(scope = %self.terminal.scopes, %error, "command template failed");
                Err(CommandError::syntax(invocation.line()))
            }
            Err(CommandError::Model(error)) => {
                tracing::debug!(scope = %self.terminal.scopes, %error, "command rejected by model");
                Err(CommandError::syntax(invocation.line()))
            }
            other => other,
        }
    }
}

/// Renders the template named after the verb; unknown verbs are syntax errors.
fn default_command(
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    context: &mut Context,
) -> CommandResult {
    match terminal.render_command(&invocation.command, invocation, context) {
        Ok(()) => Ok(Flow::Continue),
        Err(CommandError::Template(TemplateError::NotFound { .. })) => {
            Err(CommandError::syntax(invocation.command.clone()))
        }
        Err(error) => Err(error),
    }
}

/// Session entry point: runs `menu` as the top level with exit signals caught.
pub fn run_session<M: Menu>(
    session: &mut Session<'_>,
    menu: M,
    scopes: ScopePath,
    context: &mut Context,
) -> Result<(), CommandError> {
    let terminal = Terminal::new(session, scopes);
    let mut processor = CommandProcessor::new(menu, terminal);
    if let LoopOutcome::ReturnTo(scope) = processor.run(context, LoopOptions::top_level())? {
        tracing::warn!(target_scope = %scope, "return-to target not found, ending session");
    }
    Ok(())
}
