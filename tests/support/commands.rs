//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Environment variables the binary reads; cleared so the host cannot leak in.
const INHERITED_VARS: &[&str] = &[
    "SECRETS_APP",
    "SECRETS_ENV",
    "SECRETS_URL",
    "SECRETS_BASE_URL",
    "SECRETS_ENDPOINT",
    "SECRETS_ACCESS_TOKEN",
    "SECRETS_ENCRYPTION_KEY",
    "SECRETS_OUTPUT_FILE",
    "SECRETS_TEMPLATE_FILE",
    "ENVPULL_LOG",
];

impl Test {
    /// Create an envpull command isolated to the test directory.
    ///
    /// Returns a Command configured with:
    /// - every `SECRETS_*` variable removed
    /// - NO_COLOR set for stable output
    /// - Current directory set to the test project directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envpull").expect("failed to find envpull binary");
        for var in INHERITED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run `envpull --url <url>` plus extra arguments.
    pub fn pull(&self, url: &str, extra: &[&str]) -> Output {
        self.cmd()
            .arg("--url")
            .arg(url)
            .args(extra)
            .output()
            .expect("failed to run envpull")
    }

    /// Same as [`Test::pull`], off the async runtime.
    ///
    /// The mock server keeps serving on the runtime while the child runs.
    pub async fn pull_async(&self, url: String, extra: &[&str]) -> Output {
        let mut cmd = self.cmd();
        cmd.arg("--url").arg(url).args(extra);
        output_async(cmd).await
    }
}

/// Run a prepared command on the blocking pool and collect its output.
pub async fn output_async(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("failed to run envpull"))
        .await
        .expect("envpull task panicked")
}
