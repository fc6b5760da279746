use boxen_engine::{
    dissect, CommandError, CommandResult, CommandTable, Context, Expect, Flow, Invocation,
    LoopOptions, Menu, ScopePath, Terminal,
};
use boxen_model::Route;

use crate::configure::CONFIGURE_SCOPE;
use crate::login::ENABLE_SCOPE;

/// Capability of menus offering the `route` sub-menu.
///
/// Register [`do_route`] in the menu's command table and say where the
/// sub-menu lives relative to the menu's own scope.
pub trait RouteCapable: Menu {
    fn route_scopes(scopes: &ScopePath) -> ScopePath;
}

/// Runs [`RouteMenu`]. When it ends, control resumes at `configure`.
pub fn do_route<M: RouteCapable>(
    _: &mut M,
    terminal: &mut Terminal<'_, '_>,
    _: &Invocation,
    context: &mut Context,
) -> CommandResult {
    let scopes = M::route_scopes(terminal.scopes());
    terminal.spawn(
        RouteMenu,
        scopes,
        LoopOptions::default()
            .catch_exit()
            .return_to(CONFIGURE_SCOPE),
        context,
    )
}

/// Static routing table editor.
pub struct RouteMenu;

impl Menu for RouteMenu {
    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .command("add", do_add)
            .command("delete", do_delete)
            .command("end", do_end)
            .command("exit", do_exit)
            .command("show", do_show)
    }
}

fn parse_metric(invocation: &Invocation, value: &str) -> Result<u32, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::syntax(invocation.line()))
}

fn do_add(
    _: &mut RouteMenu,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    _: &mut Context,
) -> CommandResult {
    let command = invocation.command.as_str();
    let args = invocation.args.as_slice();
    let found = dissect(command, args, &[Expect::Any, Expect::Keyword("via"), Expect::Any])?;
    let metric = if args.len() > 3 {
        let with_metric = dissect(
            command,
            args,
            &[
                Expect::Any,
                Expect::Keyword("via"),
                Expect::Any,
                Expect::Keyword("metric"),
                Expect::Any,
            ],
        )?;
        parse_metric(invocation, &with_metric[2])?
    } else {
        1
    };
    let (dst, gw) = (found[0].clone(), found[1].clone());
    tracing::debug!(%dst, %gw, metric, "adding route");
    terminal.model_mut().add_route(Route { dst, gw, metric });
    Ok(Flow::Continue)
}

fn do_delete(
    _: &mut RouteMenu,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    _: &mut Context,
) -> CommandResult {
    let found = dissect(&invocation.command, &invocation.args, &[Expect::Any])?;
    if !terminal.model_mut().remove_route(&found[0]) {
        return Err(CommandError::syntax(invocation.line()));
    }
    Ok(Flow::Continue)
}

fn do_end(
    _: &mut RouteMenu,
    _: &mut Terminal<'_, '_>,
    _: &Invocation,
    _: &mut Context,
) -> CommandResult {
    Ok(Flow::ReturnTo(ENABLE_SCOPE.to_string()))
}

fn do_exit(
    _: &mut RouteMenu,
    _: &mut Terminal<'_, '_>,
    _: &Invocation,
    _: &mut Context,
) -> CommandResult {
    Ok(Flow::Exit)
}

fn do_show(
    _: &mut RouteMenu,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    context: &mut Context,
) -> CommandResult {
    terminal.render_command("show", invocation, context)?;
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use boxen_model::Route;

    use crate::test_support::{run_lines, sample_box};

    const CONFIGURE: &str = "admin\nsecret\nenable\nenablepass\nconfigure terminal\n";

    #[test]
    fn functional_route_add_and_delete_update_model() {
        let mut model = sample_box();
        run_lines(
            &mut model,
            &format!(
                "{CONFIGURE}route\nadd 10.0.0.0/8 via 192.0.2.1\nadd 0.0.0.0/0 via 192.0.2.254 metric 5\ndelete 10.0.0.0/8\n"
            ),
        );
        assert_eq!(
            model.routes,
            vec![Route {
                dst: "0.0.0.0/0".to_string(),
                gw: "192.0.2.254".to_string(),
                metric: 5,
            }]
        );
    }

    #[test]
    fn regression_bad_metric_and_unknown_route_are_rejected() {
        let mut model = sample_box();
        let (output, _) = run_lines(
            &mut model,
            &format!("{CONFIGURE}route\nadd 10.0.0.0/8 via 192.0.2.1 metric many\ndelete 10.9.9.0/24\nshow\n"),
        );
        assert!(output.contains("% Invalid input: add 10.0.0.0/8 via 192.0.2.1 metric many\n"));
        assert!(output.contains("% Invalid input: delete 10.9.9.0/24\n"));
        assert!(output.contains("No routes configured\n"));
        assert!(model.routes.is_empty());
    }

    #[test]
    fn functional_exit_from_route_resumes_configure() {
        let mut model = sample_box();
        let (output, _) = run_lines(&mut model, &format!("{CONFIGURE}route\nexit\n"));
        assert!(output.contains("sw1(config)# sw1(config-route)# sw1(config)# "));
    }

    #[test]
    fn functional_end_from_route_resumes_enable() {
        let mut model = sample_box();
        let (output, _) = run_lines(&mut model, &format!("{CONFIGURE}route\nend\n"));
        assert!(output.contains("sw1(config-route)# sw1# "));
    }
}
