use crate::config::Timings;
use crate::crawlers::driver::PageDriver;
use crate::error::SessionError;
use tokio::time::sleep;

/// Accept button of the cookie consent banner
pub const CONSENT_ACCEPT_SELECTOR: &str = "#onetrust-accept-btn-handler";

/// Generic close buttons of other overlays
pub const CLOSE_CONTROL_SELECTOR: &str = ".modal-close, .close-modal, .btn-close";

/// What a dismissal pass managed to do
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DismissReport {
    pub consent_accepted: bool,
    pub closed: usize,
}

/// Best-effort removal of cookie banners and other overlays
///
/// Never fails: a page without overlays is the common case, and any error
/// while looking for or clicking a control is logged and ignored.
pub async fn dismiss_modals<D: PageDriver>(driver: &mut D, timings: &Timings) -> DismissReport {
    sleep(timings.modal_settle).await;

    let mut report = DismissReport::default();

    match accept_consent(driver).await {
        Ok(accepted) => {
            if accepted {
                ::log::info!("Cookie consent banner accepted");
                report.consent_accepted = true;
                sleep(timings.click_settle).await;
            }
        }
        Err(e) => ::log::warn!("Could not handle the cookie consent banner: {}", e),
    }

    match close_overlays(driver, timings).await {
        Ok(closed) => report.closed = closed,
        Err(e) => ::log::warn!("Could not look for overlay close buttons: {}", e),
    }

    ::log::debug!("Modal dismissal finished: {:?}", report);
    report
}

/// Clicks the consent accept button if the page has one
async fn accept_consent<D: PageDriver>(driver: &mut D) -> Result<bool, SessionError> {
    let Some(button) = driver.find_all(CONSENT_ACCEPT_SELECTOR).await?.into_iter().next() else {
        return Ok(false);
    };
    driver.click(button).await?;
    Ok(true)
}

/// Clicks every visible close control; returns how many were clicked
async fn close_overlays<D: PageDriver>(
    driver: &mut D,
    timings: &Timings,
) -> Result<usize, SessionError> {
    let buttons = driver.find_all(CLOSE_CONTROL_SELECTOR).await?;
    let mut closed = 0;

    for button in buttons {
        match driver.is_visible(&button).await {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                ::log::debug!("Skipping close button with unknown visibility: {}", e);
                continue;
            }
        }

        match driver.click(button).await {
            Ok(()) => {
                ::log::info!("Overlay closed");
                closed += 1;
                sleep(timings.click_settle).await;
            }
            Err(e) => ::log::warn!("Failed to click overlay close button: {}", e),
        }
    }

    Ok(closed)
}
