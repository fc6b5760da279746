use boxen_engine::{
    dissect, CommandError, CommandResult, CommandTable, Context, Expect, Flow, Invocation,
    LoopOptions, Menu, Terminal, Vars,
};
use serde_json::json;

use crate::configure::CONFIGURE_SCOPE;
use crate::Configure;

/// Privileged menu.
pub struct Enable;

impl Menu for Enable {
    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .command("configure", do_configure)
            .command("disable", do_exit)
            .command("exit", do_exit)
            .command("show", do_show)
            .command("write", do_write)
    }
}

fn do_configure(
    _: &mut Enable,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    context: &mut Context,
) -> CommandResult {
    dissect(
        &invocation.command,
        &invocation.args,
        &[Expect::Keyword("terminal")],
    )?;
    let scopes = terminal.scopes().child(CONFIGURE_SCOPE);
    terminal.spawn(Configure, scopes, LoopOptions::default().catch_exit(), context)
}

fn do_exit(
    _: &mut Enable,
    _: &mut Terminal<'_, '_>,
    _: &Invocation,
    _: &mut Context,
) -> CommandResult {
    Ok(Flow::Exit)
}

fn do_show(
    _: &mut Enable,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    context: &mut Context,
) -> CommandResult {
    let command = invocation.command.as_str();
    let args = invocation.args.as_slice();
    let interface_status = [Expect::Keyword("interface"), Expect::Keyword("status")];
    let interface_status_ethernet = [
        Expect::Keyword("interface"),
        Expect::Keyword("status"),
        Expect::Keyword("ethernet"),
    ];

    if dissect(command, args, &interface_status_ethernet).is_ok() {
        let found = dissect(
            command,
            args,
            &[
                Expect::Keyword("interface"),
                Expect::Keyword("status"),
                Expect::Keyword("ethernet"),
                Expect::Any,
            ],
        )?;
        let port = terminal
            .model()
            .find_port(&found[0])
            .ok_or_else(|| CommandError::syntax(invocation.line()))?;
        let vars = Vars::from([("port".to_string(), json!(port))]);
        terminal.render_command_with("show_interface_status_ethernet", invocation, context, &vars)?;
    } else if dissect(command, args, &interface_status).is_ok() {
        terminal.render_command("show_interface_status", invocation, context)?;
    } else if dissect(command, args, &[Expect::Keyword("vlan")]).is_ok() {
        terminal.render_command("show_vlan", invocation, context)?;
    } else if dissect(command, args, &[Expect::Keyword("ip"), Expect::Keyword("route")]).is_ok() {
        terminal.render_command("show_ip_route", invocation, context)?;
    } else if dissect(command, args, &[Expect::Keyword("running-config")]).is_ok() {
        terminal.render_command("show_running_config", invocation, context)?;
    } else {
        return Err(CommandError::syntax(invocation.line()));
    }
    Ok(Flow::Continue)
}

fn do_write(
    _: &mut Enable,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    context: &mut Context,
) -> CommandResult {
    dissect(
        &invocation.command,
        &invocation.args,
        &[Expect::Keyword("memory")],
    )?;
    tracing::info!(uuid = %terminal.model().uuid, "configuration saved");
    terminal.render_command("write_memory", invocation, context)?;
    Ok(Flow::Continue)
}
