//! Pull command - fetch secrets and write the .env file.

use tracing::debug;

use crate::cli::output;
use crate::core::config::{PullConfig, Settings};
use crate::core::pull;
use crate::error::Result;

/// Resolve settings, run the pipeline and report the result.
pub fn execute(settings: Settings) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = PullConfig::resolve(settings, &cwd)?;
    debug!(?config, "resolved configuration");

    // The client is async; a single-threaded runtime is enough for one request
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = rt.block_on(pull::run(&config))?;

    output::success(&format!("secrets pulled for {}/{}", report.app, report.env));
    output::success(&format!(
        "wrote {} variables to {}",
        report.written,
        output::path(&report.output.display().to_string())
    ));

    Ok(())
}
