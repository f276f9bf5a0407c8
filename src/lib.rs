// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod output;
pub mod parsers;
pub mod results;
pub mod runner;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{Locality, ResolvedConfig, RunConfig};
pub use error::{ConfigError, RunError, SessionError, WriteError};
pub use results::{ListingRecord, RunResult};

use crawlers::WebSession;
use std::path::{Path, PathBuf};

/// Main builder for a scraping run
pub struct Harvest {
    config: ResolvedConfig,
    output_dir: PathBuf,
}

impl Harvest {
    /// Create a new Harvest builder from a resolved configuration
    ///
    /// Output goes to the current working directory unless
    /// [`with_output_dir`](Self::with_output_dir) says otherwise.
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            output_dir: PathBuf::from("."),
        }
    }

    /// Resolve the configuration from an optional override file
    ///
    /// The `WEBDRIVER_URL` environment variable, when set and non-empty,
    /// replaces the configured WebDriver URL.
    pub fn from_override_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = ResolvedConfig::from_file(path)?;

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config = config.with_webdriver_url(webdriver_url);
            }
        }

        Ok(Self::new(config))
    }

    /// Set the directory results and diagnostics are written to
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the WebDriver server URL
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.with_webdriver_url(url);
        self
    }

    /// The configuration this run will use
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Path the results will be written to
    pub fn output_path(&self) -> PathBuf {
        output::output_path(&self.output_dir, &self.config.run.output_name)
    }

    /// Open a browser session and run the scrape to completion
    pub async fn run(self) -> Result<RunResult, RunError> {
        let session = WebSession::open(&self.config.session).await?;
        runner::run_with(session, &self.config, &self.output_dir).await
    }
}
