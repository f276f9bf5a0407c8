use crate::config::ResolvedConfig;
use crate::crawlers::driver::PageDriver;
use crate::crawlers::paginate::{StopReason, Traversal, traverse};
use crate::error::RunError;
use crate::output;
use crate::results::{ListingRecord, RunResult};
use std::path::Path;

/// Runs a complete scrape on an already opened page driver
///
/// Stops early on Ctrl-C or SIGTERM; see [`run_until`].
pub async fn run_with<D: PageDriver>(
    driver: D,
    config: &ResolvedConfig,
    output_dir: &Path,
) -> Result<RunResult, RunError> {
    run_until(driver, config, output_dir, shutdown_signal()).await
}

/// Runs a complete scrape, abandoning the page loop once `shutdown` resolves
///
/// The driver is closed before anything is written, whatever the outcome of
/// the page loop. Records gathered before a browser failure or a shutdown
/// are still written; the run is reported as failed anyway.
pub async fn run_until<D, F>(
    mut driver: D,
    config: &ResolvedConfig,
    output_dir: &Path,
    shutdown: F,
) -> Result<RunResult, RunError>
where
    D: PageDriver,
    F: Future<Output = ()>,
{
    let mut records: Vec<ListingRecord> = Vec::new();

    let outcome: Result<Traversal, RunError> = tokio::select! {
        traversal = traverse(&mut driver, config, output_dir, &mut records) => {
            traversal.map_err(RunError::from)
        }
        () = shutdown => {
            ::log::warn!("Interrupted, shutting down the browser");
            Err(RunError::Interrupted)
        }
    };

    close_driver(driver).await;

    match outcome {
        Ok(traversal) => {
            if let StopReason::Exhausted { page } = traversal.stop {
                ::log::info!("Results ended on page {}", page);
            }
            ::log::info!(
                "Scraping finished: {} listings from {} pages",
                records.len(),
                traversal.pages_visited
            );

            let output_path = output::write_records(output_dir, &config.run.output_name, &records)?;
            Ok(RunResult {
                total_records: records.len(),
                pages_visited: traversal.pages_visited,
                output_path,
            })
        }
        Err(e) => {
            ::log::error!("Scraping failed: {}", e);
            if !records.is_empty() {
                ::log::warn!("Saving {} listings gathered before the failure", records.len());
                output::write_records(output_dir, &config.run.output_name, &records)?;
            }
            Err(e)
        }
    }
}

async fn close_driver<D: PageDriver>(driver: D) {
    match driver.close().await {
        Ok(()) => ::log::info!("Browser closed"),
        Err(e) => ::log::warn!("Failed to close the browser session: {}", e),
    }
}


/// Resolves on Ctrl-C or, on Unix, SIGTERM
///
/// A signal that cannot be listened for is logged and never fires.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            ::log::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                ::log::warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {}
        () = terminate => {}
    }
}
