//! CLI of the `example` vendor `switch` model, version `1`.
//!
//! Login and password prompts lead to an unprivileged `mainloop`, then via
//! `enable` to the privileged menu with its `configure`, `interface` and
//! `route` sub-menus. Output comes from templates under [`default_template_root`].

pub mod configure;
pub mod enable;
pub mod login;
pub mod mainloop;
pub mod route;

use std::path::PathBuf;

use boxen_engine::{run_session, CliImplementation, CommandError, Context, ScopePath, Session};

pub use configure::{Configure, Interface};
pub use enable::Enable;
pub use login::{EnablePassword, Login, Password};
pub use mainloop::Mainloop;
pub use route::{do_route, RouteCapable, RouteMenu};

pub const VENDOR: &str = "example";
pub const MODEL: &str = "switch";
pub const VERSION: &str = "1";

pub const CLI: CliImplementation = CliImplementation {
    vendor: VENDOR,
    model: MODEL,
    version: VERSION,
    run,
};

/// Template tree shipped with this crate.
pub fn default_template_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

fn run(session: &mut Session<'_>, context: &mut Context) -> Result<(), CommandError> {
    tracing::debug!(uuid = %session.model().uuid, "starting example switch session");
    run_session(session, Login, ScopePath::new([login::LOGIN_SCOPE]), context)
}
