use boxen_engine::{
    CommandResult, CommandTable, Context, Flow, Invocation, LoopOptions, Menu, Terminal,
    PENDING_USERNAME_KEY,
};

use crate::login::{ENABLE_PASSWORD_SCOPE, ENABLE_USER};
use crate::EnablePassword;

/// Unprivileged menu shown after a successful login.
pub struct Mainloop;

impl Menu for Mainloop {
    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .command("enable", do_enable)
            .command("exit", do_exit)
            .command("logout", do_exit)
            .command("show", do_show)
    }
}

fn do_enable(
    _: &mut Mainloop,
    terminal: &mut Terminal<'_, '_>,
    _: &Invocation,
    context: &mut Context,
) -> CommandResult {
    context.insert(PENDING_USERNAME_KEY, ENABLE_USER);
    let scopes = terminal.scopes().child(ENABLE_PASSWORD_SCOPE);
    terminal.spawn(
        EnablePassword,
        scopes,
        LoopOptions::default().catch_exit(),
        context,
    )
}

fn do_exit(
    _: &mut Mainloop,
    _: &mut Terminal<'_, '_>,
    _: &Invocation,
    _: &mut Context,
) -> CommandResult {
    Ok(Flow::Exit)
}

fn do_show(
    _: &mut Mainloop,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    context: &mut Context,
) -> CommandResult {
    terminal.render_command("show", invocation, context)?;
    Ok(Flow::Continue)
}
