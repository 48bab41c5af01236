use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `FOLIO_LOG=folio=debug`.
pub(crate) const LOG_ENV: &str = "FOLIO_LOG";

const DEFAULT_FILTER: &str = "info";

/// Send logs to a file. The terminal is busy drawing the page, so without a file nothing is logged.
pub(crate) fn init(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false).with_writer(Mutex::new(file)).init();
    tracing::debug!("logging to {}", path.display());
    Ok(())
}
