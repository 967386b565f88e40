//! The pull pipeline.
//!
//! fetch → extract (decrypt if needed) → reconcile with template → write.
//! Each step runs to completion before the next; the output file is only
//! touched after every check has passed.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::core::config::PullConfig;
use crate::core::domain::Env;
use crate::core::extract;
use crate::core::fetch::SecretsClient;
use crate::core::template::Template;
use crate::error::Result;

/// Summary of a successful pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullReport {
    pub app: String,
    pub env: String,
    /// Number of variables written.
    pub written: usize,
    /// Number of keys the template required.
    pub expected: usize,
    pub output: PathBuf,
}

/// Run one pull with a fresh client.
///
/// # Errors
///
/// The first error from any stage; nothing is written on failure.
pub async fn run(config: &PullConfig) -> Result<PullReport> {
    let client = SecretsClient::new()?;
    run_with(&client, config).await
}

/// Run one pull with the given client.
///
/// # Errors
///
/// The first error from any stage; nothing is written on failure.
pub async fn run_with(client: &SecretsClient, config: &PullConfig) -> Result<PullReport> {
    info!(app = %config.app, env = %config.env, "pulling secrets");

    let response = client.fetch(&config.url, config.token()).await?;
    let secrets = extract::extract(&response, config.encryption_key())?;
    debug!(keys = secrets.len(), "secrets resolved");

    let template = Template::load(&config.template)?;
    let ordered = template.reconcile(&secrets)?;

    let env = Env::from_secrets(&ordered, &secrets, config.output.clone());
    env.save()?;
    info!(count = env.len(), path = %env.path().display(), "env file written");

    Ok(PullReport {
        app: config.app.clone(),
        env: config.env.clone(),
        written: env.len(),
        expected: template.len(),
        output: env.path().to_path_buf(),
    })
}
