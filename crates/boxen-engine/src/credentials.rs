use boxen_model::{BoxModel, Credential};

use crate::Context;

/// Context key carrying a typed username from a login prompt to the
/// password prompt that consumes it.
pub const PENDING_USERNAME_KEY: &str = "username";

/// First credential of `model`, in model order, whose user and password both
/// match exactly.
pub fn find_credential<'m>(
    model: &'m BoxModel,
    user: Option<&str>,
    password: &str,
) -> Option<&'m Credential> {
    model.credentials().find(|credential| {
        credential.user.as_deref() == user && credential.password.as_deref() == Some(password)
    })
}

/// Checks `password` against the username waiting in `context`.
///
/// The pending username is removed whatever the outcome. Returns the
/// matched user name on success.
pub fn verify_pending_login(
    model: &BoxModel,
    context: &mut Context,
    password: &str,
) -> Option<String> {
    let user = context.take_str(PENDING_USERNAME_KEY);
    let matched = find_credential(model, user.as_deref(), password).is_some();
    tracing::debug!(
        user = user.as_deref().unwrap_or_default(),
        credentials = model.credentials.len(),
        accepted = matched,
        "checked login credentials"
    );
    if matched {
        Some(user.unwrap_or_default())
    } else {
        None
    }
}
