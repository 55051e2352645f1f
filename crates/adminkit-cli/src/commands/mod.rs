//! Subcommand implementations.

pub mod crud;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod whoami;

use anyhow::Result;

use crate::cli::{Commands, GlobalArgs};

pub async fn handle(global: GlobalArgs, command: Commands) -> Result<()> {
    match command {
        Commands::Login(args) => login::run(&global, args).await,
        Commands::Logout(args) => logout::run(&global, args),
        Commands::Whoami(args) => whoami::run(&global, args),
        Commands::Refresh(args) => refresh::run(&global, args).await,
        Commands::List(args) => crud::list(&global, args).await,
        Commands::Get(args) => crud::get(&global, args).await,
        Commands::Create(args) => crud::create(&global, args).await,
        Commands::Update(args) => crud::update(&global, args).await,
        Commands::Delete(args) => crud::delete(&global, args).await,
    }
}
