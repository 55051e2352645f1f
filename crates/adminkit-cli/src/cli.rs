//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use adminkit_core::ApiUrl;

use crate::commands::{crud, login, logout, refresh, whoami};

/// Command-line client for the adminkit API.
#[derive(Parser, Debug)]
#[command(name = "adminkit")]
#[command(author, version = env!("ADMINKIT_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// API base URL
    #[arg(long, global = true, env = "ADMINKIT_API_URL", default_value = ApiUrl::DEFAULT)]
    pub api_url: String,

    /// Directory holding the session file
    #[arg(long, global = true, env = "ADMINKIT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// Clear the stored session
    Logout(logout::LogoutArgs),

    /// Display the active session
    Whoami(whoami::WhoamiArgs),

    /// Renew the access token now
    Refresh(refresh::RefreshArgs),

    /// List a collection page by page
    List(crud::ListArgs),

    /// Fetch a single entity
    Get(crud::GetArgs),

    /// Create an entity from JSON
    Create(crud::CreateArgs),

    /// Replace an entity with JSON
    Update(crud::UpdateArgs),

    /// Delete an entity
    Delete(crud::DeleteArgs),
}
