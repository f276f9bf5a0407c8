use crate::error::SessionError;
use url::Url;

/// The operations the scraping loop needs from a browser page
///
/// Implemented by the WebDriver-backed [`WebSession`](crate::crawlers::web::WebSession);
/// anything else that can serve pages (an in-memory fixture server, for
/// instance) can drive the same loop.
#[allow(async_fn_in_trait)]
pub trait PageDriver {
    /// Handle to an element found on the current page
    type Element;

    /// Load `url` in the page and wait for the navigation to finish
    async fn goto(&mut self, url: &Url) -> Result<(), SessionError>;

    /// Markup of the current page
    async fn source(&mut self) -> Result<String, SessionError>;

    /// Every element matching a CSS selector, in document order
    async fn find_all(&mut self, css: &str) -> Result<Vec<Self::Element>, SessionError>;

    /// Whether the element is actually rendered and could receive a click
    async fn is_visible(&mut self, element: &Self::Element) -> Result<bool, SessionError>;

    /// Click the element
    async fn click(&mut self, element: Self::Element) -> Result<(), SessionError>;

    /// PNG screenshot of the viewport
    async fn screenshot(&mut self) -> Result<Vec<u8>, SessionError>;

    /// End the session and release the browser
    async fn close(self) -> Result<(), SessionError>
    where
        Self: Sized;
}
