use crate::error::ConfigError;
use crate::parsers::selectors::{SelectorConfig, SelectorTable};
use crate::utils::sanitize_filename;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Wire value of the "all localities" sentinel
pub const ALL_LOCALITIES: &str = "all-ci";

/// Page cap used when the configuration does not set one
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Search path of the directory site
pub const DEFAULT_BASE_URL: &str = "https://www.paginasamarillas.es/search";

/// Desktop Chrome user agent sent by the browser session
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// City filter of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locality {
    /// No filter
    All,
    /// Restrict results to one city (as written in the site's URLs)
    City(String),
}

impl Locality {
    /// Interpret a configured city value; missing, empty and `all-ci` mean no filter
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(ALL_LOCALITIES) => Locality::All,
            Some(city) => Locality::City(city.to_string()),
        }
    }

    /// Segment used in the search URL
    pub fn path_segment(&self) -> &str {
        match self {
            Locality::All => ALL_LOCALITIES,
            Locality::City(city) => city,
        }
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locality::All => f.write_str("all localities"),
            Locality::City(city) => f.write_str(city),
        }
    }
}

/// Effective search parameters of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub search_term: String,
    pub locality: Locality,
    pub page_limit: u32,
    /// Output file name without the `.json` extension
    pub output_name: String,
}

/// How to reach and configure the browser
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
    pub navigation_timeout: Duration,
}

/// Fixed pauses inserted while driving the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Wait after a page load before inspecting it
    pub settle: Duration,
    /// Wait for overlays to render before looking for them
    pub modal_settle: Duration,
    /// Wait after each successful overlay click
    pub click_settle: Duration,
}

impl Timings {
    /// No pauses at all (used against in-memory pages)
    pub fn none() -> Self {
        Self {
            settle: Duration::ZERO,
            modal_settle: Duration::ZERO,
            click_settle: Duration::ZERO,
        }
    }
}

/// Scraping behaviour beyond the search parameters
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub base_url: Url,
    pub timings: Timings,
    pub selectors: SelectorTable,
    pub debug_screenshot: bool,
}

/// Everything a run needs, resolved once and then only borrowed
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub run: RunConfig,
    pub session: SessionConfig,
    pub scrape: ScrapeOptions,
}

/// Shape of the merged configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Search term (required, non-empty)
    #[serde(default)]
    pub search_term: Option<String>,

    /// City, or `all-ci` for every city
    #[serde(default)]
    pub city: Option<String>,

    /// Maximum number of result pages to visit
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// Output file name without extension
    #[serde(default)]
    pub output_file: Option<String>,

    /// Search endpoint the result path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL of the WebDriver server
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default = "default_modal_settle_ms")]
    pub modal_settle_ms: u64,

    #[serde(default = "default_click_settle_ms")]
    pub click_settle_ms: u64,

    /// Save a screenshot of the first result page next to the output
    #[serde(default = "default_debug_screenshot")]
    pub debug_screenshot: bool,

    #[serde(default)]
    pub selectors: SelectorConfig,
}

fn default_debug_screenshot() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_navigation_timeout_secs() -> u64 {
    60
}

fn default_settle_ms() -> u64 {
    3000
}

fn default_modal_settle_ms() -> u64 {
    2000
}

fn default_click_settle_ms() -> u64 {
    1000
}

/// Built-in base configuration that override files are merged onto
pub fn base_config() -> Map<String, Value> {
    match json!({
        "searchTerm": "bares",
        "city": ALL_LOCALITIES,
        "maxPages": DEFAULT_PAGE_LIMIT,
    }) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Shallow merge: every top-level key of `overrides` replaces the base key
pub fn merge(base: &mut Map<String, Value>, overrides: Map<String, Value>) {
    for (key, value) in overrides {
        base.insert(key, value);
    }
}

/// Parse an override document; it must be a JSON object
pub fn parse_override(json: &str, origin: &str) -> Result<Map<String, Value>, ConfigError> {
    let value: Value = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject {
            origin: origin.to_string(),
        }),
    }
}

/// Load an override file from disk
pub fn load_override(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_override(&contents, &path.display().to_string())
}

/// Output name used when none is configured: `results-<term>[-<city>]`
pub fn derive_output_name(search_term: &str, locality: &Locality) -> String {
    let name = match locality {
        Locality::All => format!("results-{}", search_term),
        Locality::City(city) => format!("results-{}-{}", search_term, city),
    };
    sanitize_filename(&name)
}

impl ResolvedConfig {
    /// Resolve the built-in base configuration merged with an optional override
    pub fn resolve(overrides: Option<Map<String, Value>>) -> Result<Self, ConfigError> {
        let mut merged = base_config();
        if let Some(overrides) = overrides {
            merge(&mut merged, overrides);
        }

        let file: ConfigFile =
            serde_json::from_value(Value::Object(merged)).map_err(|source| ConfigError::Parse {
                origin: "merged configuration".to_string(),
                source,
            })?;

        Self::from_config_file(file)
    }

    /// Resolve with the override file at `path`, or the base configuration alone
    pub fn from_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let overrides = path.map(load_override).transpose()?;
        Self::resolve(overrides)
    }

    /// Resolve with an override given as a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides = parse_override(json, "inline configuration")?;
        Self::resolve(Some(overrides))
    }

    fn from_config_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let search_term = file
            .search_term
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if search_term.is_empty() {
            return Err(ConfigError::EmptySearchTerm);
        }

        let locality = Locality::from_setting(file.city.as_deref());

        let page_limit = match file.max_pages {
            None | Some(0) => DEFAULT_PAGE_LIMIT,
            Some(n) => n,
        };

        let output_name = match file.output_file.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => derive_output_name(&search_term, &locality),
        };

        let base_url = Url::parse(&file.base_url).map_err(|e| ConfigError::BaseUrl {
            url: file.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::BaseUrl {
                url: file.base_url.clone(),
                reason: "URL cannot carry path segments".to_string(),
            });
        }

        let selectors = SelectorTable::compile(&file.selectors)?;

        Ok(Self {
            run: RunConfig {
                search_term,
                locality,
                page_limit,
                output_name,
            },
            session: SessionConfig {
                webdriver_url: file.webdriver_url,
                headless: file.headless,
                window_width: file.window_width,
                window_height: file.window_height,
                user_agent: file.user_agent,
                navigation_timeout: Duration::from_secs(file.navigation_timeout_secs),
            },
            scrape: ScrapeOptions {
                base_url,
                timings: Timings {
                    settle: Duration::from_millis(file.settle_ms),
                    modal_settle: Duration::from_millis(file.modal_settle_ms),
                    click_settle: Duration::from_millis(file.click_settle_ms),
                },
                selectors,
                debug_screenshot: file.debug_screenshot,
            },
        })
    }

    /// Replace the WebDriver URL (environment or command line)
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.session.webdriver_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_base_configuration_defaults() {
        let config = ResolvedConfig::resolve(None).unwrap();
        assert_eq!(config.run.search_term, "bares");
        assert_eq!(config.run.locality, Locality::All);
        assert_eq!(config.run.page_limit, 10);
        assert_eq!(config.run.output_name, "results-bares");
        assert_eq!(config.session.webdriver_url, "http://localhost:4444");
        assert_eq!(config.scrape.timings.settle, Duration::from_millis(3000));
        assert!(config.scrape.debug_screenshot);
    }

    #[test]
    fn test_override_wins_and_output_name_follows_effective_values() {
        let config =
            ResolvedConfig::from_json(r#"{"searchTerm": "restaurantes", "city": "madrid"}"#)
                .unwrap();
        assert_eq!(config.run.search_term, "restaurantes");
        assert_eq!(config.run.locality, Locality::City("madrid".to_string()));
        assert_eq!(config.run.page_limit, 10);
        assert_eq!(config.run.output_name, "results-restaurantes-madrid");
    }

    #[test]
    fn test_explicit_output_file_is_kept() {
        let config = ResolvedConfig::from_json(
            r#"{"searchTerm": "restaurantes", "city": "madrid", "maxPages": 2, "outputFile": "restaurantes-madrid"}"#,
        )
        .unwrap();
        assert_eq!(config.run.page_limit, 2);
        assert_eq!(config.run.output_name, "restaurantes-madrid");
    }

    #[test]
    fn test_empty_search_term_fails() {
        let err = ResolvedConfig::from_json(r#"{"searchTerm": "   "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySearchTerm));

        let err = ResolvedConfig::from_json(r#"{"searchTerm": null}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySearchTerm));
    }

    #[test]
    fn test_null_and_zero_fall_back_to_defaults() {
        let config =
            ResolvedConfig::from_json(r#"{"city": null, "maxPages": 0, "outputFile": ""}"#)
                .unwrap();
        assert_eq!(config.run.locality, Locality::All);
        assert_eq!(config.run.page_limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(config.run.output_name, "results-bares");
    }

    #[test]
    fn test_override_must_be_an_object() {
        let err = ResolvedConfig::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { .. }));
    }

    #[test]
    fn test_wrong_type_is_a_parse_error() {
        let err = ResolvedConfig::from_json(r#"{"maxPages": "three"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        let err = ResolvedConfig::from_json(r#"{"baseUrl": "not a url"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::BaseUrl { .. }));

        let err = ResolvedConfig::from_json(r#"{"baseUrl": "mailto:someone"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::BaseUrl { .. }));
    }

    #[test]
    fn test_shallow_merge_replaces_whole_values() {
        let mut base = base_config();
        let overrides = parse_override(r#"{"selectors": {"containers": [".ficha"]}}"#, "test")
            .unwrap();
        merge(&mut base, overrides);
        assert_eq!(base["selectors"], json!({"containers": [".ficha"]}));
        assert_eq!(base["searchTerm"], json!("bares"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"searchTerm": "farmacias", "maxPages": 3}}"#).unwrap();

        let config = ResolvedConfig::from_file(Some(file.path())).unwrap();
        assert_eq!(config.run.search_term, "farmacias");
        assert_eq!(config.run.page_limit, 3);
        assert_eq!(config.run.output_name, "results-farmacias");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = ResolvedConfig::from_file(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn test_locality_segments() {
        assert_eq!(Locality::from_setting(Some("all-ci")), Locality::All);
        assert_eq!(Locality::All.path_segment(), "all-ci");
        assert_eq!(Locality::City("sevilla".into()).path_segment(), "sevilla");
        assert_eq!(Locality::All.to_string(), "all localities");
    }
}
