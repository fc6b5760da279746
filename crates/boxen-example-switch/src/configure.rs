use boxen_engine::{
    dissect, CommandError, CommandResult, CommandTable, Context, Expect, Flow, Invocation,
    LoopOptions, Menu, ScopePath, Terminal, Vars,
};
use boxen_model::VlanAttachment;
use serde_json::Value;

use crate::login::ENABLE_SCOPE;
use crate::route::{do_route, RouteCapable};

pub const CONFIGURE_SCOPE: &str = "configure";
pub const INTERFACE_SCOPE: &str = "interface";
pub const ROUTE_SCOPE: &str = "route";

fn parse_number<T: std::str::FromStr>(invocation: &Invocation, value: &str) -> Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::syntax(invocation.line()))
}

/// VLAN ids usable on the switch.
const VLAN_RANGE: std::ops::RangeInclusive<u16> = 1..=4094;

fn parse_vlan(invocation: &Invocation, value: &str) -> Result<u16, CommandError> {
    let vlan = parse_number::<u16>(invocation, value)?;
    if !VLAN_RANGE.contains(&vlan) {
        return Err(CommandError::syntax(invocation.line()));
    }
    Ok(vlan)
}

fn do_end<M>(
    _: &mut M,
    _: &mut Terminal<'_, '_>,
    _: &Invocation,
    _: &mut Context,
) -> CommandResult {
    Ok(Flow::ReturnTo(ENABLE_SCOPE.to_string()))
}

fn do_exit<M>(
    _: &mut M,
    _: &mut Terminal<'_, '_>,
    _: &Invocation,
    _: &mut Context,
) -> CommandResult {
    Ok(Flow::Exit)
}

/// Name of an existing port given as `ethernet <port>`.
fn port_argument(terminal: &Terminal<'_, '_>, invocation: &Invocation) -> Result<String, CommandError> {
    let found = dissect(
        &invocation.command,
        &invocation.args,
        &[Expect::Keyword("ethernet"), Expect::Any],
    )?;
    match terminal.model().find_port(&found[0]) {
        Some(port) => Ok(port.name.clone()),
        None => Err(CommandError::syntax(invocation.line())),
    }
}

/// Global configuration menu.
pub struct Configure;

impl Menu for Configure {
    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .command("end", do_end)
            .command("exit", do_exit)
            .command("hostname", do_hostname)
            .command("interface", do_interface)
            .command("route", do_route)
            .command("vlan", do_vlan)
    }
}

impl RouteCapable for Configure {
    fn route_scopes(scopes: &ScopePath) -> ScopePath {
        scopes.child(ROUTE_SCOPE)
    }
}

fn do_hostname(
    _: &mut Configure,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    _: &mut Context,
) -> CommandResult {
    let found = dissect(&invocation.command, &invocation.args, &[Expect::Any])?;
    terminal.model_mut().set_hostname(&found[0]);
    Ok(Flow::Continue)
}

fn do_interface(
    _: &mut Configure,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    context: &mut Context,
) -> CommandResult {
    let port = port_argument(terminal, invocation)?;
    let scopes = terminal.scopes().child(INTERFACE_SCOPE);
    terminal.spawn(
        Interface { port },
        scopes,
        LoopOptions::default().catch_exit(),
        context,
    )
}

fn do_vlan(
    _: &mut Configure,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    _: &mut Context,
) -> CommandResult {
    let command = invocation.command.as_str();
    let args = invocation.args.as_slice();
    let found = dissect(command, args, &[Expect::Any])?;
    let number = parse_vlan(invocation, &found[0])?;
    let name = if args.len() > 1 {
        let named = dissect(command, args, &[Expect::Any, Expect::Keyword("name"), Expect::Any])?;
        Some(named[1].clone())
    } else {
        None
    };
    terminal.model_mut().ensure_vlan(number, name.as_deref());
    Ok(Flow::Continue)
}

/// Per-port configuration menu.
pub struct Interface {
    pub port: String,
}

impl Menu for Interface {
    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .command("description", do_description)
            .command("end", do_end)
            .command("exit", do_exit)
            .command("interface", do_switch_interface)
            .command("mtu", do_mtu)
            .command("no_description", do_no_description)
            .command("no_shutdown", do_no_shutdown)
            .command("route", do_route)
            .command("shutdown", do_shutdown)
            .command("switchport", do_switchport)
    }

    fn on_cycle(
        &mut self,
        terminal: &mut Terminal<'_, '_>,
        context: &mut Context,
    ) -> Result<(), CommandError> {
        let vars = Vars::from([("port".to_string(), Value::from(self.port.as_str()))]);
        terminal.render_hook_with(
            "on_cycle",
            &Invocation::new("on_cycle", Vec::new()),
            context,
            &vars,
        )
    }
}

impl RouteCapable for Interface {
    fn route_scopes(scopes: &ScopePath) -> ScopePath {
        scopes.sibling(ROUTE_SCOPE)
    }
}

fn do_description(
    interface: &mut Interface,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    _: &mut Context,
) -> CommandResult {
    if invocation.args.is_empty() {
        return Err(CommandError::syntax(invocation.line()));
    }
    let description = invocation.args.join(" ");
    terminal
        .model_mut()
        .set_port_description(&interface.port, Some(&description))?;
    Ok(Flow::Continue)
}

fn do_no_description(
    interface: &mut Interface,
    terminal: &mut Terminal<'_, '_>,
    _: &Invocation,
    _: &mut Context,
) -> CommandResult {
    terminal.model_mut().set_port_description(&interface.port, None)?;
    Ok(Flow::Continue)
}

fn do_mtu(
    interface: &mut Interface,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    _: &mut Context,
) -> CommandResult {
    let found = dissect(&invocation.command, &invocation.args, &[Expect::Any])?;
    let mtu = parse_number::<u32>(invocation, &found[0])?;
    terminal.model_mut().set_port_mtu(&interface.port, mtu)?;
    Ok(Flow::Continue)
}

fn do_shutdown(
    interface: &mut Interface,
    terminal: &mut Terminal<'_, '_>,
    _: &Invocation,
    _: &mut Context,
) -> CommandResult {
    terminal.model_mut().set_port_shutdown(&interface.port, true)?;
    Ok(Flow::Continue)
}

fn do_no_shutdown(
    interface: &mut Interface,
    terminal: &mut Terminal<'_, '_>,
    _: &Invocation,
    _: &mut Context,
) -> CommandResult {
    terminal.model_mut().set_port_shutdown(&interface.port, false)?;
    Ok(Flow::Continue)
}

const SWITCHPORT_ACCESS: &[Expect] = &[Expect::Keyword("access"), Expect::Keyword("vlan"), Expect::Any];
const SWITCHPORT_TRUNK_ALLOWED: &[Expect] = &[
    Expect::Keyword("trunk"),
    Expect::Keyword("allowed"),
    Expect::Keyword("vlan"),
    Expect::Any,
];
const SWITCHPORT_TRUNK_NATIVE: &[Expect] = &[
    Expect::Keyword("trunk"),
    Expect::Keyword("native"),
    Expect::Keyword("vlan"),
    Expect::Any,
];

fn do_switchport(
    interface: &mut Interface,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    _: &mut Context,
) -> CommandResult {
    let command = invocation.command.as_str();
    let args = invocation.args.as_slice();
    let variants = [
        (VlanAttachment::Access, SWITCHPORT_ACCESS),
        (VlanAttachment::Trunk, SWITCHPORT_TRUNK_ALLOWED),
        (VlanAttachment::TrunkNative, SWITCHPORT_TRUNK_NATIVE),
    ];

    for (attachment, expected) in variants {
        if let Ok(found) = dissect(command, args, expected) {
            let vlan = parse_vlan(invocation, &found[0])?;
            terminal
                .model_mut()
                .attach_vlan_to_port(&interface.port, vlan, attachment)?;
            return Ok(Flow::Continue);
        }
    }
    Err(CommandError::syntax(invocation.line()))
}

/// `interface ethernet <port>` from inside a port edits the new port in place.
fn do_switch_interface(
    interface: &mut Interface,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    _: &mut Context,
) -> CommandResult {
    interface.port = port_argument(terminal, invocation)?;
    tracing::debug!(port = %interface.port, "switched interface");
    Ok(Flow::Continue)
}
