use std::io::Cursor;

use boxen_engine::{Context, Session, PENDING_USERNAME_KEY};
use boxen_example_switch::login::USER_KEY;
use boxen_example_switch::CLI;
use boxen_model::{BoxModel, Credential, Port};
use boxen_render::TemplateStore;

const PREFIX: &str = "example/switch/1/login";

fn switch_box() -> BoxModel {
    let mut model = BoxModel::new("example", "switch", "1", "sw-0001");
    model.credentials.push(Credential::password("admin", "secret"));
    model.credentials.push(Credential::password("enable", "enablepass"));
    model.ports.push(Port::new("eth0"));
    model.ports.push(Port::new("eth1"));
    model
}

fn templates(sources: &[(&str, &str)]) -> TemplateStore {
    TemplateStore::from_sources(
        sources
            .iter()
            .map(|(name, source)| (format!("{PREFIX}/{name}"), (*source).to_string())),
    )
    .expect("templates")
}

fn prompt_templates() -> TemplateStore {
    templates(&[
        ("on_cycle.j2", "U:"),
        ("password/on_cycle.j2", "P:"),
        ("password/password.j2", "DENIED\n"),
        ("mainloop/on_cycle.j2", "> "),
        ("mainloop/enable_password/on_cycle.j2", "P:"),
        ("mainloop/enable_password/password.j2", "DENIED\n"),
        ("mainloop/enable/on_cycle.j2", "# "),
        (
            "mainloop/enable/show_interface_status_ethernet.j2",
            "{{ port.name }} mtu={{ port.mtu }} speed={{ port.speed }}\n",
        ),
        ("mainloop/enable/on_error.j2", "ERR {{ command }}\n"),
        ("mainloop/enable/configure/on_cycle.j2", "(config)# "),
        ("mainloop/enable/configure/interface/on_cycle.j2", "(if-{{ port }})# "),
        ("mainloop/enable/configure/route/on_cycle.j2", "(route)# "),
    ])
}

struct Outcome {
    output: String,
    context: Context,
    consumed: u64,
}

fn run_session(model: &mut BoxModel, renderer: &TemplateStore, lines: &str) -> Outcome {
    let mut input = Cursor::new(lines.as_bytes().to_vec());
    let mut output = Vec::new();
    let mut context = Context::new();
    {
        let mut session = Session::new(model, renderer, &mut input, &mut output);
        (CLI.run)(&mut session, &mut context).expect("session");
    }
    Outcome {
        output: String::from_utf8(output).expect("utf8"),
        context,
        consumed: input.position(),
    }
}

#[test]
fn integration_successful_privilege_path_renders_port_status() {
    let mut model = switch_box();
    let outcome = run_session(
        &mut model,
        &prompt_templates(),
        "admin\nsecret\nenable\nenablepass\nshow interface status ethernet eth0\n",
    );
    assert_eq!(
        outcome.output,
        "U:P:> P:# eth0 mtu=1500 speed=1G\n# P:> P:U:"
    );
}

#[test]
fn integration_failed_login_renders_password_template_and_ends_session() {
    let mut model = switch_box();
    let renderer = templates(&[("password/password.j2", "DENIED\n")]);
    let lines = "admin\nwrongpass\nshow\n";
    let outcome = run_session(&mut model, &renderer, lines);

    assert_eq!(outcome.output, "DENIED\n");
    assert_eq!(outcome.consumed, "admin\nwrongpass\n".len() as u64);
}

#[test]
fn integration_login_hand_off_key_is_consumed_by_password_prompt() {
    let mut model = switch_box();
    let outcome = run_session(&mut model, &prompt_templates(), "admin\nsecret\n");

    assert!(!outcome.context.contains_key(PENDING_USERNAME_KEY));
    assert_eq!(outcome.context.get_str(USER_KEY), Some("admin"));
}

#[test]
fn integration_exit_from_enable_lands_in_mainloop_and_logout_ends_session() {
    let mut model = switch_box();
    let outcome = run_session(
        &mut model,
        &prompt_templates(),
        "admin\nsecret\nenable\nenablepass\nexit\nlogout\nadmin\n",
    );
    assert_eq!(outcome.output, "U:P:> P:# > ");
    assert_eq!(
        outcome.consumed,
        "admin\nsecret\nenable\nenablepass\nexit\nlogout\n".len() as u64
    );
}

#[test]
fn integration_route_entered_from_interface_returns_to_configure() {
    let mut model = switch_box();
    let outcome = run_session(
        &mut model,
        &prompt_templates(),
        "admin\nsecret\nenable\nenablepass\nconfigure terminal\ninterface ethernet eth1\nroute\nadd 192.0.2.0/24 via 198.51.100.1 metric 20\nexit\nend\nfrobnicate\n",
    );
    assert!(outcome.output.starts_with(
        "U:P:> P:# (config)# (if-eth1)# (route)# (route)# (config)# # ERR frobnicate\n# "
    ));
    assert_eq!(model.routes.len(), 1);
    assert_eq!(model.routes[0].metric, 20);
}

#[test]
fn integration_unknown_command_in_privileged_menu_is_reported() {
    let mut model = switch_box();
    let outcome = run_session(
        &mut model,
        &prompt_templates(),
        "admin\nsecret\nenable\nenablepass\nfrobnicate\nshow interface status ethernet eth1\n",
    );
    assert!(outcome
        .output
        .contains("# ERR frobnicate\n# eth1 mtu=1500 speed=1G\n# "));
}

#[test]
fn integration_username_key_is_gone_in_every_scope_after_login() {
    let mut model = switch_box();
    let renderer = templates(&[
        ("password/on_cycle.j2", "P[{{ context.username is defined }}]:"),
        ("mainloop/on_enter.j2", "M[{{ context.username is defined }}]"),
        (
            "mainloop/enable_password/on_cycle.j2",
            "E[{{ context.username is defined }}]:",
        ),
        ("mainloop/enable/on_enter.j2", "N[{{ context.username is defined }}]"),
    ]);
    let outcome = run_session(&mut model, &renderer, "admin\nsecret\nenable\nenablepass\n");
    assert!(
        outcome.output.starts_with("P[true]:M[false]E[true]:N[false]"),
        "unexpected output: {}",
        outcome.output
    );
}

#[test]
fn regression_interface_menu_runs_without_prompt_template() {
    let mut model = switch_box();
    let renderer = templates(&[("mainloop/enable/configure/on_error.j2", "ERR {{ command }}\n")]);
    let outcome = run_session(
        &mut model,
        &renderer,
        "admin\nsecret\nenable\nenablepass\nconfigure terminal\ninterface ethernet eth0\nshutdown\nexit\n",
    );
    assert_eq!(outcome.output, "");
    assert!(model.find_port("eth0").expect("eth0").shutdown);
}
