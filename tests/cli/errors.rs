//! Tests for failure reporting and exit codes.

use serde_json::json;

use crate::support::*;

#[tokio::test]
async fn test_unauthorized_reports_status_and_body() {
    let t = Test::new();
    let server = serve(401, json!({ "error": "unauthorized" })).await;

    let output = t
        .pull_async(server.uri(), &["--token", "tok-rejected"])
        .await;

    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "pull failed: secrets API returned 401");
    assert_stderr_contains(&output, "unauthorized");
    assert_stderr_contains(&output, "→ check SECRETS_ACCESS_TOKEN or pass --token");
    assert_output_excludes(&output, "tok-rejected");
    assert!(!t.path(".env").exists());
}

#[tokio::test]
async fn test_encrypted_without_key_shows_hint() {
    let t = Test::new();
    let server = serve(200, seal(&json!({ "A": "1" }), PASSPHRASE, None)).await;

    let output = t.pull_async(server.uri(), &[]).await;

    assert_failure(&output);
    assert_stderr_contains(&output, "SECRETS_ENCRYPTION_KEY is missing");
    assert_stderr_contains(&output, "→ set SECRETS_ENCRYPTION_KEY or pass --encryption-key");
    assert!(!t.path(".env").exists());
}

#[tokio::test]
async fn test_wrong_key_does_not_leak() {
    let t = Test::new();
    t.write(".env", "PREVIOUS=1\n");
    let server = serve(
        200,
        seal(&json!({ "SECRET": "plaintext-value" }), PASSPHRASE, None),
    )
    .await;

    let output = t
        .pull_async(server.uri(), &["--encryption-key", "not-the-key"])
        .await;

    assert_failure(&output);
    assert_stderr_contains(&output, "pull failed:");
    assert_output_excludes(&output, "not-the-key");
    assert_output_excludes(&output, "plaintext-value");
    assert_eq!(t.read(".env"), "PREVIOUS=1\n");
}

#[tokio::test]
async fn test_missing_template_keys_named() {
    let t = Test::with_template("A=\nB=\nC=\nD=\n");
    let server = serve(200, json!({ "secrets": { "A": "1", "C": "3" } })).await;

    let output = t.pull_async(server.uri(), &[]).await;

    assert_failure(&output);
    assert_stderr_contains(&output, "missing keys from API response: B, D");
    assert!(!t.path(".env").exists());
}

#[tokio::test]
async fn test_unsupported_format_lists_top_level_keys() {
    let t = Test::new();
    let server = serve(200, json!({ "items": [], "count": 0 })).await;

    let output = t.pull_async(server.uri(), &[]).await;

    assert_failure(&output);
    assert_stderr_contains(&output, "unsupported API response format");
    assert_stderr_contains(&output, "items");
}

#[tokio::test]
async fn test_non_json_body_fails() {
    let t = Test::new();
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let output = t.pull_async(server.uri(), &[]).await;

    assert_failure(&output);
    assert_stderr_contains(&output, "pull failed:");
    assert!(!t.path(".env").exists());
}

#[test]
fn test_invalid_url_fails_without_writing() {
    let t = Test::new();

    let output = t.pull("not a url?token=leaked", &[]);

    assert_failure(&output);
    assert_stderr_contains(&output, "pull failed: invalid request url:");
    assert_output_excludes(&output, "token=leaked");
    assert!(t.entries().is_empty());
}

#[test]
fn test_unreachable_api_fails() {
    let t = Test::new();

    let output = t.pull("http://127.0.0.1:9/api/secrets", &[]);

    assert_failure(&output);
    assert_stderr_contains(&output, "pull failed:");
    assert!(t.entries().is_empty());
}
