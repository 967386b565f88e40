//! Tests for successful pulls through the binary.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::*;

#[tokio::test]
async fn test_pull_reports_written_variables() {
    let t = Test::with_template(STANDARD_TEMPLATE);
    let server = serve(200, json!({ "secrets": standard_secrets() })).await;

    let output = t
        .pull_async(format!("{}/api/secrets", server.uri()), &[])
        .await;

    assert_success(&output);
    assert_stdout_contains(&output, "✓ secrets pulled for openweather/dev");
    assert_stdout_contains(&output, "✓ wrote 4 variables to");
    assert!(t.read(".env").starts_with("DATABASE_URL=postgres://localhost/mydb\n"));
    assert_private(&t.path(".env"));
}

#[tokio::test]
async fn test_pull_encrypted_with_flag_key() {
    let t = Test::new();
    let server = serve(200, seal(&json!({ "A": "1", "B": "two words" }), PASSPHRASE, None)).await;

    let output = t
        .pull_async(server.uri(), &["--encryption-key", PASSPHRASE])
        .await;

    assert_success(&output);
    assert_eq!(t.read(".env"), "A=1\nB=\"two words\"\n");
    assert_output_excludes(&output, PASSPHRASE);
}

#[tokio::test]
async fn test_pull_camel_case_aliases() {
    let t = Test::new();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/secrets"))
        .and(query_param("app", "openweather"))
        .and(query_param("env", "dev"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(seal(&json!({ "A": "1" }), PASSPHRASE, None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = t.cmd();
    cmd.args([
        "--baseUrl",
        &server.uri(),
        "--encryptionKey",
        PASSPHRASE,
    ]);
    let output = output_async(cmd).await;

    assert_success(&output);
    assert_eq!(t.read(".env"), "A=1\n");
}

#[tokio::test]
async fn test_pull_reads_settings_from_environment() {
    let t = Test::new();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/env"))
        .and(query_param("app", "billing"))
        .and(query_param("env", "prod"))
        .and(header("authorization", "Bearer env-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "X": "1" } })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = t.cmd();
    cmd.env("SECRETS_BASE_URL", server.uri())
        .env("SECRETS_ENDPOINT", "/v1/env")
        .env("SECRETS_APP", "billing")
        .env("SECRETS_ENV", "prod")
        .env("SECRETS_ACCESS_TOKEN", "env-token")
        .env("SECRETS_OUTPUT_FILE", "out.env");
    let output = output_async(cmd).await;

    assert_success(&output);
    assert_stdout_contains(&output, "secrets pulled for billing/prod");
    assert_eq!(t.read("out.env"), "X=1\n");
    assert!(!t.path(".env").exists());
}

#[tokio::test]
async fn test_flags_override_environment() {
    let t = Test::new();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("app", "from-flag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "secrets": { "A": "1" } })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = t.cmd();
    cmd.env("SECRETS_APP", "from-env")
        .args(["--app", "from-flag", "--base-url", &server.uri()]);
    let output = output_async(cmd).await;

    assert_success(&output);
}

#[tokio::test]
async fn test_verbose_logs_redact_credentials() {
    let t = Test::new();
    let server = serve(200, seal(&json!({ "A": "1" }), PASSPHRASE, None)).await;

    let output = t
        .pull_async(
            server.uri(),
            &[
                "-v",
                "--token",
                "tok-should-not-leak",
                "--encryption-key",
                PASSPHRASE,
            ],
        )
        .await;

    assert_success(&output);
    assert_output_excludes(&output, "tok-should-not-leak");
    assert_output_excludes(&output, PASSPHRASE);
}

#[tokio::test]
async fn test_template_path_flag() {
    let t = Test::new();
    t.write("keys.tmpl", "# required\nB=\nA=\n");
    let server = serve(200, json!({ "secrets": { "A": "1", "B": "2", "C": "3" } })).await;

    let output = t
        .pull_async(server.uri(), &["--template", "keys.tmpl"])
        .await;

    assert_success(&output);
    assert_stdout_contains(&output, "wrote 3 variables");
    assert_eq!(t.read(".env"), "B=2\nA=1\nC=3\n");
}

#[tokio::test]
async fn test_empty_environment_values_fall_back_to_defaults() {
    let t = Test::new();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/secrets"))
        .and(query_param("app", "openweather"))
        .and(query_param("env", "dev"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "secrets": { "A": "1" } })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = t.cmd();
    cmd.env("SECRETS_APP", "")
        .env("SECRETS_ENV", "")
        .env("SECRETS_ENDPOINT", "")
        .env("SECRETS_OUTPUT_FILE", "")
        .env("SECRETS_TEMPLATE_FILE", "")
        .args(["--base-url", &server.uri()]);
    let output = output_async(cmd).await;

    assert_success(&output);
    assert_stdout_contains(&output, "secrets pulled for openweather/dev");
    assert_eq!(t.read(".env"), "A=1\n");
}
