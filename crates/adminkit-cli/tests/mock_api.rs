//! CLI tests against a mock admin API.
//!
//! Each test runs the `adminkit` binary with its own temporary data
//! directory, pointed at a wiremock server.

mod common;

use adminkit_core::storage::{Storage, keys};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{run_cli, run_cli_failure, run_cli_success, seed_session, session_file};

async fn mount_refresh(server: &MockServer, response: ResponseTemplate, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/refresh-token"))
        .and(body_json(json!({"refreshToken": "r1"})))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_then_whoami() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "access_token": "abc",
                "refresh_token": "r1",
                "roleName": "admin",
                "firstName": "Ada",
                "lastName": "Lovelace"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stdout = run_cli_success(
        &[
            "login",
            "--email",
            "ada@example.com",
            "--password",
            "secret123",
        ],
        data_dir.path(),
        &server,
    )
    .await;
    assert!(stdout.contains("Logged in successfully"));
    assert!(stdout.contains("admin"));

    let storage = session_file(data_dir.path());
    assert_eq!(
        storage.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
        Some("abc")
    );

    let stdout = run_cli_success(&["whoami"], data_dir.path(), &server).await;
    assert!(stdout.contains("Ada Lovelace"));
    assert!(stdout.contains("ada@example.com"));
    assert!(stdout.contains("admin"));
}

#[tokio::test]
async fn test_failed_login_leaves_no_session() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let stderr = run_cli_failure(
        &["login", "--email", "ada@example.com", "--password", "nope"],
        data_dir.path(),
        &server,
    )
    .await;
    assert!(stderr.contains("Failed to login"));

    let stderr = run_cli_failure(&["whoami"], data_dir.path(), &server).await;
    assert!(stderr.contains("No active session"));
}

#[tokio::test]
async fn test_whoami_without_session_fails() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();

    let stderr = run_cli_failure(&["whoami"], data_dir.path(), &server).await;
    assert!(stderr.contains("No active session"));
}

#[tokio::test]
async fn test_whoami_require_role() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    seed_session(data_dir.path());

    run_cli_success(
        &["whoami", "--require-role", "admin", "--require-role", "sales"],
        data_dir.path(),
        &server,
    )
    .await;

    let stderr = run_cli_failure(
        &["whoami", "--require-role", "sales"],
        data_dir.path(),
        &server,
    )
    .await;
    assert!(stderr.contains("not permitted"));
}

#[tokio::test]
async fn test_logout_clears_session_file() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    seed_session(data_dir.path());

    let stdout = run_cli_success(&["logout"], data_dir.path(), &server).await;
    assert!(stdout.contains("Logged out"));

    let storage = session_file(data_dir.path());
    for key in keys::ALL {
        assert_eq!(storage.get(key).unwrap(), None);
    }
}

#[tokio::test]
async fn test_list_refreshes_expired_token() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    seed_session(data_dir.path());

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .and(header("authorization", "Bearer xyz"))
        .and(query_param("page", "1"))
        .and(query_param("perPage", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "firstName": "Ada", "lastName": "Lovelace",
                 "email": "ada@example.com", "roles": [{"name": "admin"}]},
                {"id": 2, "firstName": "Alan", "lastName": "Turing",
                 "email": "alan@example.com", "roles": [{"name": "sales"}]}
            ],
            "meta": {
                "from": 1, "to": 2, "total": 12,
                "perPage": 10, "lastPage": 2, "currentPage": 1
            }
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"access_token": "xyz"})),
        1,
    )
    .await;

    let output = run_cli(&["list", "users"], data_dir.path(), &server).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["email"], "alan@example.com");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Page 1 of 2 (12 total)"));
    assert!(stderr.contains("--page 2"));

    let storage = session_file(data_dir.path());
    assert_eq!(
        storage.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
        Some("xyz")
    );
}

#[tokio::test]
async fn test_list_users_by_role() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    seed_session(data_dir.path());

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "firstName": "Ada", "lastName": "Lovelace",
                 "email": "ada@example.com", "roles": [{"name": "admin"}]},
                {"id": 2, "firstName": "Alan", "lastName": "Turing",
                 "email": "alan@example.com", "roles": [{"name": "sales"}]}
            ]
        })))
        .mount(&server)
        .await;

    let stdout = run_cli_success(
        &["list", "users", "--all", "--role", "sales"],
        data_dir.path(),
        &server,
    )
    .await;

    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("alan@example.com"));
}

#[tokio::test]
async fn test_create_and_delete_records() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    seed_session(data_dir.path());

    Mock::given(method("POST"))
        .and(path("/api/v1/customers"))
        .and(body_json(json!({"name": "Acme", "email": "ops@acme.test"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": 5, "name": "Acme", "email": "ops@acme.test"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/customers/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let stdout = run_cli_success(
        &[
            "create",
            "customers",
            "--data",
            r#"{"name":"Acme","email":"ops@acme.test"}"#,
        ],
        data_dir.path(),
        &server,
    )
    .await;
    assert!(stdout.contains("Created customers entry"));
    assert!(stdout.contains("\"id\": 5"));

    let stdout = run_cli_success(&["delete", "customers", "5"], data_dir.path(), &server).await;
    assert!(stdout.contains("Deleted customers/5"));
}

#[tokio::test]
async fn test_unknown_resource_is_rejected() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    seed_session(data_dir.path());

    let stderr = run_cli_failure(&["list", "invoices"], data_dir.path(), &server).await;
    assert!(stderr.contains("unknown resource"));
}

#[tokio::test]
async fn test_failed_refresh_logs_out() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    seed_session(data_dir.path());

    mount_refresh(&server, ResponseTemplate::new(401), 1).await;

    let stderr = run_cli_failure(&["refresh"], data_dir.path(), &server).await;
    assert!(stderr.contains("Failed to refresh session"));

    let storage = session_file(data_dir.path());
    assert_eq!(storage.get(keys::ACCESS_TOKEN).unwrap(), None);
    assert_eq!(storage.get(keys::REFRESH_TOKEN).unwrap(), None);
}
