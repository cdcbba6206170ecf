// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the yogit binary.
//!
//! Each test gets its own configuration directory through `XDG_CONFIG_HOME`
//! and points the GitHub URLs at a local mock server.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SETTINGS: &str = r#"version = 1
token = "github_token"
login = "user1"
emails = ["user1@company1.com"]
"#;

/// Configuration directory holding a complete account.
fn account_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let yogit = dir.path().join("yogit");
    std::fs::create_dir_all(&yogit).expect("create config dir");
    std::fs::write(yogit.join("settings.toml"), SETTINGS).expect("write settings");
    dir
}

fn yogit(config: &TempDir, server: Option<&MockServer>) -> Command {
    let mut cmd = cargo_bin_cmd!("yogit");
    cmd.env("XDG_CONFIG_HOME", config.path())
        .env("HOME", config.path())
        .env("YOGIT_UPDATE__ENABLED", "false")
        .env_remove("RUST_LOG");
    if let Some(server) = server {
        cmd.env("YOGIT_GITHUB__GRAPHQL_URL", format!("{}/graphql", server.uri()))
            .env("YOGIT_GITHUB__API_URL", server.uri());
    }
    cmd
}

async fn graphql(server: &MockServer, marker: &str, response: Value) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

fn organizations(logins: &[&str]) -> Value {
    let edges: Vec<Value> = logins
        .iter()
        .map(|login| {
            let url = format!("https://github.com/{login}");
            json!({"node": {"login": login, "url": url}})
        })
        .collect();
    json!({"data": {"viewer": {"organizations": {"edges": edges}}}})
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    yogit(&dir, None)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub activity reports"))
        .stdout(predicate::str::contains("scrum"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    yogit(&dir, None)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_command_prints_usage() {
    let dir = TempDir::new().unwrap();
    yogit(&dir, None)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_account_required() {
    let dir = TempDir::new().unwrap();
    yogit(&dir, None)
        .args(["pr", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: Account required, please `yogit account setup` first.",
        ));
}

#[test]
fn test_contrib_bad_date() {
    let dir = account_dir();
    yogit(&dir, None)
        .args(["ct", "list", "--from", "2019-13-01"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Bad date format, should be `%Y-%m-%d`"));
}

#[test]
fn test_contrib_reversed_dates() {
    let dir = account_dir();
    yogit(&dir, None)
        .args(["contrib", "list", "--from", "2019-08-15", "--to", "2019-08-01"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("`--from` is not before `--to`"));
}

#[test]
fn test_completion() {
    let dir = TempDir::new().unwrap();
    yogit(&dir, None)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("yogit"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_review_requested() {
    let server = MockServer::start().await;
    graphql(
        &server,
        "review-requested",
        json!({"data": {"search": {
            "pageInfo": {"hasNextPage": false, "endCursor": null},
            "edges": [
                {"node": {"updatedAt": "2019-07-10T10:00:00Z", "url": "https://github.com/orga/repo/pull/2", "title": "Fix the parser"}},
                {"node": {"updatedAt": "2019-07-10T09:00:00Z", "url": "https://github.com/orga/repo/pull/1", "title": "Add a parser"}}
            ]
        }}}),
    )
    .await;
    let dir = account_dir();

    yogit(&dir, Some(&server))
        .args(["rv", "requested"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATED"))
        .stdout(predicate::str::contains("https://github.com/orga/repo/pull/1"))
        .stdout(predicate::str::contains("Count: 2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pr_list_empty() {
    let server = MockServer::start().await;
    graphql(
        &server,
        "pullRequests",
        json!({"data": {"viewer": {"pullRequests": {"edges": []}}}}),
    )
    .await;
    let dir = account_dir();

    yogit(&dir, Some(&server))
        .args(["pr", "list"])
        .assert()
        .success()
        .stdout("All done! 🎉✨\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_orga_list_json() {
    let server = MockServer::start().await;
    graphql(&server, "organizations", organizations(&["orga2", "Orga1"])).await;
    let dir = account_dir();

    let output = yogit(&dir, Some(&server))
        .args(["orga", "list", "-o", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let orgas: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        orgas,
        json!([
            {"login": "Orga1", "url": "https://github.com/Orga1"},
            {"login": "orga2", "url": "https://github.com/orga2"}
        ])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_orga_member_requires_discriminating_orga() {
    let server = MockServer::start().await;
    graphql(&server, "organizations", organizations(&["orga1", "orga2"])).await;
    let dir = account_dir();

    yogit(&dir, Some(&server))
        .args(["orga", "member", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "You belong to more than one organization (see `yogit orga list`), use `--orga` option to discriminate",
        ));

    yogit(&dir, Some(&server))
        .args(["orga", "member", "list", "--orga", "orga3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Unrecognized orga3 organization (see `yogit orga list`)",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_orga_pickone_single_member() {
    let server = MockServer::start().await;
    graphql(&server, "organizations(", organizations(&["orga1"])).await;
    graphql(
        &server,
        "membersWithRole",
        json!({"data": {"viewer": {"organization": {"membersWithRole": {
            "pageInfo": {"hasNextPage": false, "endCursor": null},
            "totalCount": 1,
            "edges": [{"role": "ADMIN", "node": {"login": "user2", "email": null, "location": null}}]
        }}}}}),
    )
    .await;
    let dir = account_dir();

    yogit(&dir, Some(&server))
        .args(["orga", "member", "pickone"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Picking one out of 1 members... (100.00%) 🎲",
        ))
        .stdout(predicate::str::contains("The winner is \"user2\" 🤠"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_has_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&server)
        .await;
    let dir = account_dir();

    yogit(&dir, Some(&server))
        .args(["pr", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Unauthorized"))
        .stderr(predicate::str::contains("yogit account setup"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_account_setup_stores_identity() {
    let server = MockServer::start().await;
    graphql(
        &server,
        "login",
        json!({"data": {"viewer": {"login": "user1"}}}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/user/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"email": "user1@company1.com"}, {"email": "user1@company2.com"}
        ])))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    yogit(&dir, Some(&server))
        .args(["account", "setup"])
        .write_stdin("github_token\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to yogit!"))
        .stdout(predicate::str::contains("Hello user1! 💕✨"));

    let settings =
        std::fs::read_to_string(dir.path().join("yogit").join("settings.toml")).unwrap();
    assert!(settings.contains("login = \"user1\""));
    assert!(settings.contains("user1@company2.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_account_setup_failure_resets_settings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let dir = account_dir();

    yogit(&dir, Some(&server))
        .args(["account", "setup"])
        .write_stdin("revoked_token\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unauthorized"));

    let settings =
        std::fs::read_to_string(dir.path().join("yogit").join("settings.toml")).unwrap();
    assert!(!settings.contains("revoked_token"));
    assert!(!settings.contains("user1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scrum_report_without_github_report() {
    let dir = account_dir();
    std::fs::write(
        dir.path().join("yogit").join("scrum_report.toml"),
        r#"questions = ["What have you done today?"]
template = ["*REPORT ${today}*", "${a0}"]
"#,
    )
    .unwrap();

    yogit(&dir, None)
        .args(["scrum", "report", "--date", "2019-07-10"])
        .write_stdin("thing1\nthing2\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("What have you done today? (empty line to move on)"))
        .stdout(predicate::str::ends_with("*REPORT 2019-07-10*\n- thing1\n- thing2\n"));
}
