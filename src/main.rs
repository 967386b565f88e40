//! envpull - Pull application secrets into a local .env file.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envpull::cli::output;
use envpull::cli::{execute, Cli};
use envpull::core::constants::LOG_ENV;
use envpull::error::{DecryptError, Error, ExtractError, TemplateError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envpull=debug")
        } else {
            EnvFilter::new("envpull=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Extract(ExtractError::MissingEncryptionKey) => {
                Some("set SECRETS_ENCRYPTION_KEY or pass --encryption-key")
            }
            Error::Decrypt(DecryptError::AuthenticationFailure) => {
                Some("check that the encryption key matches the one used by the secrets API")
            }
            Error::Fetch(fetch) if matches!(fetch.status(), Some(401 | 403)) => {
                Some("check SECRETS_ACCESS_TOKEN or pass --token")
            }
            Error::Template(TemplateError::MissingSecretKeys(_)) => {
                Some("add the keys upstream or remove them from the template")
            }
            _ => None,
        };

        output::error(&format!("pull failed: {}", e));
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
