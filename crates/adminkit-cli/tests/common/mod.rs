use std::path::Path;
use std::process::Output;

use adminkit_core::storage::{Storage, keys};
use adminkit_file::FileStorage;
use tokio::process::Command;
use wiremock::MockServer;

/// API base URL on the mock server.
pub fn api_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}/api/v1", server.address().port())
}

/// Run the CLI binary against `server` with an isolated data directory.
pub async fn run_cli(args: &[&str], data_dir: &Path, server: &MockServer) -> Output {
    Command::new(env!("CARGO_BIN_EXE_adminkit"))
        .args(args)
        .env("ADMINKIT_DATA_DIR", data_dir)
        .env("ADMINKIT_API_URL", api_url(server))
        .env_remove("RUST_LOG")
        .env_remove("ADMINKIT_PASSWORD")
        .output()
        .await
        .expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub async fn run_cli_success(args: &[&str], data_dir: &Path, server: &MockServer) -> String {
    let output = run_cli(args, data_dir, server).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub async fn run_cli_failure(args: &[&str], data_dir: &Path, server: &MockServer) -> String {
    let output = run_cli(args, data_dir, server).await;
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// The session file the CLI uses inside `data_dir`.
pub fn session_file(data_dir: &Path) -> FileStorage {
    FileStorage::in_dir(data_dir)
}

/// Seed `data_dir` with a logged-in session holding an expired access token.
pub fn seed_session(data_dir: &Path) {
    let storage = session_file(data_dir);
    storage.set(keys::ACCESS_TOKEN, "old").unwrap();
    storage.set(keys::REFRESH_TOKEN, "r1").unwrap();
    storage.set(keys::ROLE, "admin").unwrap();
    storage
        .set(
            keys::USER,
            r#"{"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com"}"#,
        )
        .unwrap();
}
