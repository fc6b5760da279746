use boxen_engine::{
    verify_pending_login, CommandError, CommandResult, CommandTable, Context, Flow, Invocation,
    LoopOptions, Menu, Terminal, PENDING_USERNAME_KEY,
};

use crate::{Enable, Mainloop};

pub const LOGIN_SCOPE: &str = "login";
pub const PASSWORD_SCOPE: &str = "password";
pub const MAINLOOP_SCOPE: &str = "mainloop";
pub const ENABLE_PASSWORD_SCOPE: &str = "enable_password";
pub const ENABLE_SCOPE: &str = "enable";

/// Context key holding the authenticated user for the rest of the session.
pub const USER_KEY: &str = "user";
/// User name the privileged-mode password is registered under.
pub const ENABLE_USER: &str = "enable";

/// Template rendered when a password is rejected.
const REJECTED_TEMPLATE: &str = "password";

/// Top-level username prompt. Anything typed is taken as a user name.
pub struct Login;

impl Menu for Login {
    fn commands() -> CommandTable<Self> {
        CommandTable::new().on_unknown(do_username)
    }
}

fn do_username(
    _: &mut Login,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    context: &mut Context,
) -> CommandResult {
    context.insert(PENDING_USERNAME_KEY, invocation.raw.clone());
    let scopes = terminal.scopes().child(PASSWORD_SCOPE);
    terminal.spawn(Password, scopes, LoopOptions::default(), context)
}

/// Password prompt following [`Login`]. The whole line, blank or not, is the password.
pub struct Password;

impl Menu for Password {
    fn commands() -> CommandTable<Self> {
        CommandTable::new().on_line(do_password)
    }

    fn on_exit(
        &mut self,
        terminal: &mut Terminal<'_, '_>,
        context: &mut Context,
    ) -> Result<(), CommandError> {
        context.remove(PENDING_USERNAME_KEY);
        terminal.render_hook("on_exit", &Invocation::new("on_exit", Vec::new()), context)
    }
}

fn do_password(
    _: &mut Password,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    context: &mut Context,
) -> CommandResult {
    let Some(user) = verify_pending_login(terminal.model(), context, &invocation.raw) else {
        terminal.render_command(REJECTED_TEMPLATE, invocation, context)?;
        return Ok(Flow::Exit);
    };
    tracing::info!(user = %user, "login accepted");
    context.insert(USER_KEY, user);
    let scopes = terminal.scopes().sibling(MAINLOOP_SCOPE);
    terminal.spawn(Mainloop, scopes, LoopOptions::default(), context)
}

/// Privileged-mode password prompt, entered from [`Mainloop`] by `enable`.
pub struct EnablePassword;

impl Menu for EnablePassword {
    fn commands() -> CommandTable<Self> {
        CommandTable::new().on_line(do_enable_password)
    }
}

fn do_enable_password(
    _: &mut EnablePassword,
    terminal: &mut Terminal<'_, '_>,
    invocation: &Invocation,
    context: &mut Context,
) -> CommandResult {
    if verify_pending_login(terminal.model(), context, &invocation.raw).is_none() {
        terminal.render_command(REJECTED_TEMPLATE, invocation, context)?;
        return Ok(Flow::Exit);
    }
    tracing::info!(user = context.get_str(USER_KEY).unwrap_or_default(), "privileged mode granted");
    let scopes = terminal.scopes().sibling(ENABLE_SCOPE);
    terminal.spawn(Enable, scopes, LoopOptions::default(), context)
}

#[cfg(test)]
mod tests {
    use boxen_engine::PENDING_USERNAME_KEY;

    use super::USER_KEY;
    use crate::test_support::{run_lines, sample_box};

    #[test]
    fn functional_rejected_password_ends_session() {
        let mut model = sample_box();
        let (output, context) = run_lines(&mut model, "admin\nwrongpass\nshow\n");
        assert_eq!(output, "Username: Password: % Authentication failed\n");
        assert!(!context.contains_key(PENDING_USERNAME_KEY));
        assert!(!context.contains_key(USER_KEY));
    }

    #[test]
    fn functional_accepted_password_enters_mainloop() {
        let mut model = sample_box();
        let (output, context) = run_lines(&mut model, "admin\nsecret\n");
        assert!(output.starts_with("Username: Password: \nWelcome to sw1, admin.\n\nsw1> "));
        assert_eq!(context.get_str(USER_KEY), Some("admin"));
        assert!(!context.contains_key(PENDING_USERNAME_KEY));
    }

    #[test]
    fn regression_username_keeps_hyphens_as_typed() {
        let mut model = sample_box();
        model
            .credentials
            .push(boxen_model::Credential::password("net-admin", "pw"));
        let (_, context) = run_lines(&mut model, "net-admin\npw\n");
        assert_eq!(context.get_str(USER_KEY), Some("net-admin"));
    }

    #[test]
    fn regression_pending_username_dropped_when_password_prompt_ends() {
        let mut model = sample_box();
        let (output, context) = run_lines(&mut model, "admin\n");
        assert_eq!(output, "Username: Password: Username: ");
        assert!(context.as_map().is_empty());
    }

    #[test]
    fn regression_blank_and_bang_passwords_are_checked_as_typed() {
        let mut model = sample_box();
        model
            .credentials
            .push(boxen_model::Credential::password("guest", ""));
        model
            .credentials
            .push(boxen_model::Credential::password("ops", "!ops"));

        let (output, context) = run_lines(&mut model, "guest\n\n");
        assert!(output.contains("Welcome to sw1, guest."));
        assert_eq!(context.get_str(USER_KEY), Some("guest"));

        let (_, context) = run_lines(&mut model, "ops\n!ops\n");
        assert_eq!(context.get_str(USER_KEY), Some("ops"));

        let (output, context) = run_lines(&mut model, "admin\n\nsecret\n");
        assert_eq!(output, "Username: Password: % Authentication failed\n");
        assert!(!context.contains_key(USER_KEY));

        let (output, _) = run_lines(&mut model, "admin\nsecret \n");
        assert!(output.ends_with("% Authentication failed\n"));
    }

    #[test]
    fn functional_rejected_enable_password_returns_to_mainloop() {
        let mut model = sample_box();
        let (output, context) = run_lines(&mut model, "admin\nsecret\nenable\nnope\nshow\n");
        assert!(output.contains("sw1> Password: % Access denied\nsw1> "));
        assert!(output.contains("Hostname: sw1\n"));
        assert!(!output.contains("sw1# "));
        assert!(!context.contains_key(PENDING_USERNAME_KEY));
    }
}
