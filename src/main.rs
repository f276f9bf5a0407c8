use clap::Parser;
use listing_harvest::Harvest;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; progress goes to stderr as it happens
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    if let Some(path) = &args.config {
        ::log::info!("Loading configuration from: {}", path.display());
    }

    let mut harvest = match Harvest::from_override_file(args.config.as_deref()) {
        Ok(harvest) => harvest,
        Err(e) => {
            ::log::error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = args.webdriver_url {
        harvest = harvest.with_webdriver_url(url);
    }
    let harvest = harvest.with_output_dir(args.output_dir);

    let config = harvest.config();
    ::log::info!("Search term: {}", config.run.search_term);
    ::log::info!("Locality: {}", config.run.locality);
    ::log::info!("Max pages: {}", config.run.page_limit);
    ::log::info!("Output file: {}", harvest.output_path().display());
    ::log::info!("WebDriver: {}", config.session.webdriver_url);

    let start_time = std::time::Instant::now();
    match harvest.run().await {
        Ok(result) => {
            ::log::info!(
                "Run complete in {:.2} seconds",
                start_time.elapsed().as_secs_f64()
            );
            println!("Listings extracted: {}", result.total_records);
            println!("Pages visited: {}", result.pages_visited);
            println!("Results file: {}", result.output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
