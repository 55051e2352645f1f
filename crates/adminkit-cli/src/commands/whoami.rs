//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use adminkit_core::Authenticator;
use adminkit_core::guard::require_role;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Fail unless the session has one of these roles
    #[arg(long = "require-role", value_name = "ROLE")]
    pub require_roles: Vec<String>,
}

pub fn run(global: &GlobalArgs, args: WhoamiArgs) -> Result<()> {
    let session = session::open_authenticated(global)?;

    if !args.require_roles.is_empty() {
        let roles: Vec<&str> = args.require_roles.iter().map(String::as_str).collect();
        require_role(&session, &roles).context("Session role not permitted")?;
    }

    let user = session.user().unwrap_or_default();
    if let Some(name) = user.display_name() {
        output::field("Name", &name);
    }
    if let Some(email) = &user.email {
        output::field("Email", email);
    }
    output::field("Role", session.role().as_deref().unwrap_or("-"));
    output::field("API", &global.api_url);

    Ok(())
}
