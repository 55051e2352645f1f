//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use adminkit_core::Authenticator;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(global: &GlobalArgs, _args: LogoutArgs) -> Result<()> {
    let session = session::open(global)?;

    if !session.is_authenticated() {
        output::note("No active session.");
        return Ok(());
    }

    session.logout();
    output::success("Logged out");

    Ok(())
}
