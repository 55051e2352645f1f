//! Session wiring for the CLI: where the session file lives and how the
//! HTTP session is opened over it.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use adminkit_core::ApiUrl;
use adminkit_core::guard::require_authenticated;
use adminkit_file::FileStorage;
use adminkit_http::{ClientConfig, HttpSession};

use crate::cli::GlobalArgs;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Resolve and create the data directory.
fn data_dir(global: &GlobalArgs) -> Result<PathBuf> {
    let dir = match &global.data_dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("", "", "adminkit")
            .context("Could not determine data directory")?
            .data_dir()
            .to_path_buf(),
    };

    fs::create_dir_all(&dir).context("Failed to create data directory")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&dir)?.permissions();
        perms.set_mode(0o700);
        fs::set_permissions(&dir, perms)?;
    }

    Ok(dir)
}

/// Open the session stored in the data directory.
pub fn open(global: &GlobalArgs) -> Result<HttpSession> {
    let api_url = ApiUrl::new(&global.api_url).context("Invalid API URL")?;
    let storage = FileStorage::in_dir(data_dir(global)?);
    tracing::debug!(api = %api_url, path = %storage.path().display(), "Using session file");

    let config = ClientConfig::new(api_url)
        .with_user_agent(concat!("adminkit-cli/", env!("ADMINKIT_VERSION")));

    HttpSession::connect(config, Arc::new(storage)).context("Failed to create HTTP client")
}

/// Open the stored session, failing unless someone is logged in.
pub fn open_authenticated(global: &GlobalArgs) -> Result<HttpSession> {
    let session = open(global)?;
    require_authenticated(&session).context("No active session. Run 'adminkit login' first.")?;
    Ok(session)
}
