//! Binary entry point: read the configuration, start logging and the async
//! runtime, then hand control to the TUI until the user quits.
use anyhow::Context;
use tracing::{error, info};

use moviestar::{logging, run_app, App, BackendClient, Config, Services};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let log_path = logging::init()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let client = BackendClient::new(&config).context("failed to build the HTTP client")?;
    info!(
        backend = %config.backend_url,
        page_size = config.page_size,
        log = %log_path.display(),
        "starting moviestar"
    );

    let mut app = App::new(Services::http(client), config.page_size, runtime.handle().clone());
    let result = run_app(&mut app);
    match &result {
        Ok(()) => info!("moviestar exited"),
        Err(err) => error!(error = %err, "moviestar stopped on error"),
    }
    result
}
