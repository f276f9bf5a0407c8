//! Turning result-page markup into listing records

pub mod listings;
pub mod selectors;
pub mod text;


pub use listings::extract_listings;
pub use selectors::{SelectorConfig, SelectorTable};
