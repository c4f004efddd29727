//! CLI exit-code tests. The success path talks to a local mock server only.
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("article-html").unwrap()
}

#[test]
fn missing_settings_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    cmd()
        .current_dir(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration unavailable"));
}

#[test]
fn missing_article_exits_non_zero_and_writes_nothing() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("settings.json"), "{}").unwrap();
    std::fs::write(temp.path().join("API_KEY"), "sk-test").unwrap();

    cmd()
        .current_dir(temp.path())
        .args(["--config", "settings.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no article to render"));

    assert!(!temp.path().join("artykul.html").exists());
}

#[test]
fn missing_credential_is_a_generation_failure() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.json"), "{}").unwrap();
    std::fs::write(temp.path().join("story.txt"), "A short story.").unwrap();

    cmd()
        .current_dir(temp.path())
        .args(["--input", "story.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no credential available"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    cmd().arg("--no-such-flag").assert().failure().code(2);
}

#[test]
fn help_lists_config_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"));
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_run_exits_zero_and_keeps_the_key_out_of_logs() {
    let secret = "sk-cli-secret-4242";
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", format!("Bearer {secret}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "```html\n<p>Hi</p>\n```"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = json!({ "api_base_url": server.uri() });
    std::fs::write(temp.path().join("config.json"), config.to_string()).unwrap();
    std::fs::write(temp.path().join("API_KEY"), format!("{secret}\n")).unwrap();
    std::fs::write(temp.path().join("article.txt"), "Hello\nworld.").unwrap();

    let dir = temp.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        cmd()
            .current_dir(&dir)
            .args(["--verbose", "--log-file", "run.log"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        std::fs::read_to_string(temp.path().join("artykul.html")).unwrap(),
        "<p>Hi</p>"
    );

    let log_file = std::fs::read_to_string(temp.path().join("run.log")).unwrap();
    assert!(log_file.contains("artykul.html"), "run was logged: {log_file}");
    assert!(!log_file.contains(secret));
    assert!(!String::from_utf8_lossy(&output.stderr).contains(secret));
    assert!(!String::from_utf8_lossy(&output.stdout).contains(secret));
}
