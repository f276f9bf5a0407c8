//! In-memory page driver serving fixture markup

use crate::crawlers::driver::PageDriver;
use crate::crawlers::modal::{CLOSE_CONTROL_SELECTOR, CONSENT_ACCEPT_SELECTOR};
use crate::error::SessionError;
use crate::parsers::tests::fixtures::empty_page;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Consent,
    Close,
}

/// An overlay control present on every page
#[derive(Debug, Clone)]
pub struct Overlay {
    pub kind: OverlayKind,
    pub label: &'static str,
    pub visible: bool,
    pub click_fails: bool,
}

impl Overlay {
    pub fn consent() -> Self {
        Self {
            kind: OverlayKind::Consent,
            label: "consent",
            visible: true,
            click_fails: false,
        }
    }

    pub fn close(label: &'static str, visible: bool) -> Self {
        Self {
            kind: OverlayKind::Close,
            label,
            visible,
            click_fails: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.click_fails = true;
        self
    }
}

/// Everything the driver was asked to do, readable after it is closed
#[derive(Debug, Default)]
pub struct DriverLog {
    pub visits: Vec<Url>,
    pub clicks: Vec<&'static str>,
    pub screenshots: usize,
    pub closed: bool,
}

impl DriverLog {
    /// Page numbers of the visited URLs, in visit order
    pub fn visited_pages(&self) -> Vec<u32> {
        self.visits.iter().filter_map(page_number).collect()
    }
}

/// Serves `pages[n]` for any URL whose last path segment is `n`
///
/// Pages without fixture markup serve a page nothing matches.
#[derive(Debug, Default)]
pub struct FakeDriver {
    pages: HashMap<u32, String>,
    overlays: Vec<Overlay>,
    fail_navigation_on: Option<u32>,
    hang_navigation_on: Option<(u32, Arc<Notify>)>,
    fail_lookups: bool,
    current: Option<u32>,
    log: Arc<Mutex<DriverLog>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32, html: String) -> Self {
        self.pages.insert(page, html);
        self
    }

    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlays.push(overlay);
        self
    }

    pub fn failing_navigation_on(mut self, page: u32) -> Self {
        self.fail_navigation_on = Some(page);
        self
    }

    /// Navigation to `page` never completes; `reached` is notified when it starts
    pub fn hanging_navigation_on(mut self, page: u32, reached: Arc<Notify>) -> Self {
        self.hang_navigation_on = Some((page, reached));
        self
    }

    /// Every element lookup fails
    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Shared handle to the action log
    pub fn log(&self) -> Arc<Mutex<DriverLog>> {
        Arc::clone(&self.log)
    }
}

fn page_number(url: &Url) -> Option<u32> {
    url.path_segments()?.last()?.parse().ok()
}

impl PageDriver for FakeDriver {
    type Element = usize;

    async fn goto(&mut self, url: &Url) -> Result<(), SessionError> {
        let page = page_number(url);
        if page.is_some() && page == self.fail_navigation_on {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }
        if let Some((hang_on, reached)) = &self.hang_navigation_on {
            if page == Some(*hang_on) {
                reached.notify_one();
                std::future::pending::<()>().await;
            }
        }
        self.log.lock().unwrap().visits.push(url.clone());
        self.current = page;
        Ok(())
    }

    async fn source(&mut self) -> Result<String, SessionError> {
        Ok(self
            .current
            .and_then(|page| self.pages.get(&page).cloned())
            .unwrap_or_else(empty_page))
    }

    async fn find_all(&mut self, css: &str) -> Result<Vec<usize>, SessionError> {
        if self.fail_lookups {
            return Err(SessionError::command("find_all", "stale session"));
        }
        let kind = match css {
            CONSENT_ACCEPT_SELECTOR => OverlayKind::Consent,
            CLOSE_CONTROL_SELECTOR => OverlayKind::Close,
            _ => return Ok(Vec::new()),
        };
        Ok(self
            .overlays
            .iter()
            .enumerate()
            .filter(|(_, overlay)| overlay.kind == kind)
            .map(|(i, _)| i)
            .collect())
    }

    async fn is_visible(&mut self, element: &usize) -> Result<bool, SessionError> {
        Ok(self.overlays[*element].visible)
    }

    async fn click(&mut self, element: usize) -> Result<(), SessionError> {
        let overlay = &self.overlays[element];
        if overlay.click_fails {
            return Err(SessionError::command("click", "element click intercepted"));
        }
        self.log.lock().unwrap().clicks.push(overlay.label);
        Ok(())
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, SessionError> {
        self.log.lock().unwrap().screenshots += 1;
        Ok(b"\x89PNG".to_vec())
    }

    async fn close(self) -> Result<(), SessionError> {
        self.log.lock().unwrap().closed = true;
        Ok(())
    }
}
