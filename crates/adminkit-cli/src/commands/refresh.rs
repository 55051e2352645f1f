//! Refresh command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(global: &GlobalArgs, _args: RefreshArgs) -> Result<()> {
    let session = session::open_authenticated(global)?;

    session
        .refresh()
        .await
        .context("Failed to refresh session; log in again")?;

    output::success("Session refreshed");

    Ok(())
}
