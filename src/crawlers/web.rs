use crate::config::SessionConfig;
use crate::crawlers::driver::PageDriver;
use crate::error::SessionError;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

/// Local WebDriver endpoints tried when the configured one refuses
const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
    "http://localhost:4444",
];

/// Mirrors what a user would consider "visible": rendered, not transparent,
/// and with a non-zero box.
const VISIBILITY_SCRIPT: &str = r#"
const el = arguments[0];
const style = window.getComputedStyle(el);
return style.display !== 'none'
    && style.visibility !== 'hidden'
    && style.opacity !== '0'
    && el.offsetWidth > 0
    && el.offsetHeight > 0;
"#;

/// A browser session with a single page, driven over WebDriver
pub struct WebSession {
    client: Client,
    navigation_timeout: Duration,
}

impl WebSession {
    /// Starts a browser session
    ///
    /// Connects to the configured WebDriver server (falling back to the usual
    /// local endpoints), launching Chrome with a desktop user agent and a
    /// fixed window size.
    pub async fn open(config: &SessionConfig) -> Result<Self, SessionError> {
        let capabilities = chrome_capabilities(config);
        let client = connect_to_webdriver(&config.webdriver_url, capabilities).await?;

        if let Err(e) = client
            .set_window_size(config.window_width, config.window_height)
            .await
        {
            // The --window-size flag already applies; some drivers refuse resizing
            ::log::warn!("Failed to set window size: {}", e);
        }

        ::log::info!(
            "Browser session ready ({}x{}, headless: {})",
            config.window_width,
            config.window_height,
            config.headless
        );

        Ok(Self {
            client,
            navigation_timeout: config.navigation_timeout,
        })
    }
}

/// Chrome capabilities for the session
pub fn chrome_capabilities(config: &SessionConfig) -> Map<String, Value> {
    let mut args = vec![
        format!("--window-size={},{}", config.window_width, config.window_height),
        format!("--user-agent={}", config.user_agent),
        "--no-sandbox".to_string(),
        "--disable-setuid-sandbox".to_string(),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
    }

    let mut capabilities = Map::new();
    capabilities.insert("browserName".to_string(), json!("chrome"));
    capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    capabilities
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(
    webdriver_url: &str,
    capabilities: Map<String, Value>,
) -> Result<Client, SessionError> {
    let candidates = std::iter::once(webdriver_url).chain(
        FALLBACK_WEBDRIVER_URLS
            .iter()
            .copied()
            .filter(|url| *url != webdriver_url),
    );

    let mut tried = Vec::new();
    let mut last_error = String::new();

    for url in candidates {
        if !tried.is_empty() {
            ::log::info!("Trying fallback WebDriver URL: {}", url);
        }
        tried.push(url);

        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities.clone());
        match builder.connect(url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", url);
                return Ok(client);
            }
            Err(e) => {
                if tried.len() == 1 {
                    ::log::error!("Failed to connect to WebDriver at {}: {}", url, e);
                }
                last_error = e.to_string();
            }
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(SessionError::Launch {
        tried: tried.join(", "),
        reason: last_error,
    })
}

impl PageDriver for WebSession {
    type Element = Element;

    async fn goto(&mut self, url: &Url) -> Result<(), SessionError> {
        match timeout(self.navigation_timeout, self.client.goto(url.as_str())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(SessionError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(SessionError::Timeout {
                url: url.to_string(),
                secs: self.navigation_timeout.as_secs(),
            }),
        }
    }

    async fn source(&mut self) -> Result<String, SessionError> {
        self.client
            .source()
            .await
            .map_err(|e| SessionError::command("source", e))
    }

    async fn find_all(&mut self, css: &str) -> Result<Vec<Element>, SessionError> {
        self.client
            .find_all(Locator::Css(css))
            .await
            .map_err(|e| SessionError::command("find_all", e))
    }

    async fn is_visible(&mut self, element: &Element) -> Result<bool, SessionError> {
        let argument = serde_json::to_value(element)
            .map_err(|e| SessionError::command("serialize element", e))?;
        let visible = self
            .client
            .execute(VISIBILITY_SCRIPT, vec![argument])
            .await
            .map_err(|e| SessionError::command("execute", e))?;
        Ok(visible.as_bool().unwrap_or(false))
    }

    async fn click(&mut self, element: Element) -> Result<(), SessionError> {
        element
            .click()
            .await
            .map(|_| ())
            .map_err(|e| SessionError::command("click", e))
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, SessionError> {
        self.client
            .screenshot()
            .await
            .map_err(|e| SessionError::command("screenshot", e))
    }

    async fn close(self) -> Result<(), SessionError> {
        self.client
            .close()
            .await
            .map_err(|e| SessionError::command("close", e))
    }
}
