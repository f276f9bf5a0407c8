//! Driving the browser through the result pages

pub mod driver;
pub mod modal;
pub mod paginate;
pub mod web;

#[cfg(test)]
mod tests;

pub use driver::PageDriver;
pub use web::WebSession;
