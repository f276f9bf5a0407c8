use crate::error::WriteError;
use crate::results::ListingRecord;
use std::path::{Path, PathBuf};

/// File name of the first-page screenshot
pub const SCREENSHOT_FILE: &str = "debug-first-page.png";

/// Path of the results file for an output name
pub fn output_path(dir: &Path, output_name: &str) -> PathBuf {
    dir.join(format!("{}.json", output_name))
}

/// Path of the markup dump for a page where no listings were recognised
pub fn dump_path(dir: &Path, page: u32) -> PathBuf {
    dir.join(format!("page-{}-no-results.html", page))
}

/// Writes all records as a pretty-printed JSON array, replacing any existing file
pub fn write_records(
    dir: &Path,
    output_name: &str,
    records: &[ListingRecord],
) -> Result<PathBuf, WriteError> {
    let path = output_path(dir, output_name);
    let json = serde_json::to_string_pretty(records)?;

    std::fs::write(&path, json).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;

    ::log::info!("Saved {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Saves the markup of an unrecognised page for manual inspection
///
/// Diagnostic only: failures are logged and otherwise ignored.
pub fn dump_page(dir: &Path, page: u32, html: &str) -> Option<PathBuf> {
    let path = dump_path(dir, page);
    match std::fs::write(&path, html) {
        Ok(()) => {
            ::log::info!("Saved page {} for inspection at {}", page, path.display());
            Some(path)
        }
        Err(e) => {
            ::log::warn!("Failed to save page {} markup to {}: {}", page, path.display(), e);
            None
        }
    }
}

/// Saves a screenshot; failures are logged and otherwise ignored
pub fn save_screenshot(dir: &Path, png: &[u8]) -> Option<PathBuf> {
    let path = dir.join(SCREENSHOT_FILE);
    match std::fs::write(&path, png) {
        Ok(()) => {
            ::log::debug!("Saved screenshot to {}", path.display());
            Some(path)
        }
        Err(e) => {
            ::log::warn!("Failed to save screenshot to {}: {}", path.display(), e);
            None
        }
    }
}
