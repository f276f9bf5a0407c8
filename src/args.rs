use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listing-harvest")]
#[command(about = "Collects business listings from paginated directory search results")]
#[command(version)]
pub struct Args {
    /// JSON file whose keys override the default configuration
    pub config: Option<PathBuf>,

    /// WebDriver server URL (takes precedence over WEBDRIVER_URL and the config file)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Directory for the results file and diagnostic dumps
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}
