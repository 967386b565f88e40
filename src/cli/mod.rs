//! Command-line interface.

pub mod output;
pub mod pull;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::core::config::Settings;

/// envpull - Pull application secrets into a local .env file.
///
/// Every option falls back to its environment variable, then to a default.
/// An empty value counts as unset.
#[derive(Parser)]
#[command(
    name = "envpull",
    about = "Pull application secrets from the secrets API into a local .env file",
    version,
    after_help = "Secrets are written with owner-only permissions (0600)."
)]
pub struct Cli {
    /// App name [default: openweather]
    #[arg(long, value_name = "NAME", env = "SECRETS_APP")]
    pub app: Option<String>,

    /// Environment name [default: dev]
    #[arg(long, value_name = "NAME", env = "SECRETS_ENV")]
    pub env: Option<String>,

    /// Full API URL (overrides --base-url and --endpoint)
    #[arg(long, value_name = "URL", env = "SECRETS_URL")]
    pub url: Option<String>,

    /// Base URL of the secrets API [default: https://mdp.mon-site.ca]
    #[arg(long = "base-url", alias = "baseUrl", value_name = "URL", env = "SECRETS_BASE_URL")]
    pub base_url: Option<String>,

    /// API endpoint path [default: /api/secrets]
    #[arg(long, value_name = "PATH", env = "SECRETS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Bearer token
    #[arg(long, value_name = "TOKEN", env = "SECRETS_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Local decryption key for encrypted payloads
    #[arg(
        long = "encryption-key",
        alias = "encryptionKey",
        value_name = "KEY",
        env = "SECRETS_ENCRYPTION_KEY",
        hide_env_values = true
    )]
    pub encryption_key: Option<String>,

    /// Output .env path [default: .env]
    #[arg(long, value_name = "PATH", env = "SECRETS_OUTPUT_FILE")]
    pub output: Option<OsString>,

    /// Template listing the expected keys [default: .env.example]
    #[arg(long, value_name = "PATH", env = "SECRETS_TEMPLATE_FILE")]
    pub template: Option<OsString>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Collect the pull settings from parsed arguments.
    pub fn settings(&self) -> Settings {
        Settings {
            app: self.app.clone(),
            env: self.env.clone(),
            url: self.url.clone(),
            base_url: self.base_url.clone(),
            endpoint: self.endpoint.clone(),
            token: self.token.clone(),
            encryption_key: self.encryption_key.clone(),
            output: self.output.clone().map(PathBuf::from),
            template: self.template.clone().map(PathBuf::from),
        }
    }
}

/// Execute the parsed command line.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    match cli.completions {
        Some(shell) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "envpull", &mut std::io::stdout());
            Ok(())
        }
        None => pull::execute(cli.settings()),
    }
}
