use assert_cmd::Command;
use httpmock::{Method::GET, MockServer};
use predicates::prelude::*;

fn cmd(server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("gh-repo-stats").unwrap();
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env("GITHUB_API_URL", server.base_url())
        .env("GITHUB_HTTP_MAX_RETRIES", "0")
        .arg("--log-level")
        .arg("warn");
    cmd
}

fn rate(remaining: i64) -> serde_json::Value {
    serde_json::json!({"resources": {"core": {"limit": 60, "remaining": remaining, "reset": 1700000000}}})
}

fn mock_user_repos(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/users/alice");
        then.status(200)
            .json_body(serde_json::json!({"login": "alice", "type": "User"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/users/alice/repos");
        then.status(200).json_body(serde_json::json!([
            {"name": "pymap3d", "full_name": "alice/pymap3d", "owner": {"login": "alice"},
             "stargazers_count": 120, "forks_count": 30},
            {"name": "dotfiles", "full_name": "alice/dotfiles", "owner": {"login": "alice"},
             "stargazers_count": 0, "forks_count": 0},
            {"name": "numpy", "full_name": "alice/numpy", "owner": {"login": "alice"},
             "fork": true, "stargazers_count": 0, "forks_count": 1, "default_branch": "main"}
        ]));
    });
}

#[test]
fn version_flag() {
    let server = MockServer::start();
    cmd(&server)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("gh-repo-stats "));
}

#[test]
fn forks_stars_only() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rate_limit");
        then.status(200).json_body(rate(59));
    });
    mock_user_repos(&server);
    cmd(&server)
        .args(["forks", "alice", "--stars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice total stars received 120"))
        .stdout(predicate::str::contains("alice total other users forked 31"))
        .stdout(predicate::str::contains("dotfiles").not())
        .stdout(predicate::str::contains("ahead").not());
}

#[test]
fn forks_reports_ahead() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rate_limit");
        then.status(200).json_body(rate(59));
    });
    mock_user_repos(&server);
    server.mock(|when, then| {
        when.method(GET).path("/repos/alice/numpy");
        then.status(200).json_body(serde_json::json!({
            "name": "numpy", "full_name": "alice/numpy", "owner": {"login": "alice"},
            "fork": true, "default_branch": "main",
            "parent": {"name": "numpy", "full_name": "numpy/numpy",
                       "owner": {"login": "numpy"}, "default_branch": "main"}
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/numpy/numpy/compare/main...alice:main");
        then.status(200)
            .json_body(serde_json::json!({"ahead_by": 2, "behind_by": 0}));
    });
    cmd(&server)
        .args(["forks", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "alice/numpy (main) is 2 commits ahead of numpy/numpy",
        ));
}

#[test]
fn exhausted_quota_fails_the_run() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rate_limit");
        then.status(200).json_body(rate(0));
    });
    let users = server.mock(|when, then| {
        when.method(GET).path("/users/alice");
        then.status(200)
            .json_body(serde_json::json!({"login": "alice", "type": "User"}));
    });
    cmd(&server)
        .args(["forks", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GitHub rate limit exceeded: 0 / 60"));
    users.assert_hits(0);
}

#[test]
fn rate_subcommand_prints_quota() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rate_limit");
        then.status(200).json_body(rate(5));
    });
    cmd(&server)
        .arg("rate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "5 / 60 remaining, resets 2023-11-14 22:13:20 UTC",
        ));
}

#[test]
fn token_file_is_sent_as_bearer() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/rate_limit")
            .header("authorization", "Bearer s3cret");
        then.status(200).json_body(rate(4999));
    });
    let path = std::env::temp_dir().join(format!("gh-repo-stats-cli-{}", std::process::id()));
    std::fs::write(&path, "s3cret\n").unwrap();
    cmd(&server)
        .arg("rate")
        .arg(&path)
        .assert()
        .success();
    m.assert();
    std::fs::remove_file(&path).ok();
}
