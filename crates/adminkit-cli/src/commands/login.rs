//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use adminkit_core::{Authenticator, Credentials};

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "ADMINKIT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(global: &GlobalArgs, args: LoginArgs) -> Result<()> {
    let session = session::open(global)?;
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    session.login(credentials).await.context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    if let Some(name) = session.user().and_then(|u| u.display_name()) {
        output::field("Name", &name);
    }
    output::field("Email", &args.email);
    output::field("Role", session.role().as_deref().unwrap_or("-"));

    Ok(())
}
