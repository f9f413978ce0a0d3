//! Heart failure dashboard: loads a patient CSV once, derives filtered
//! views, and renders them as charts behind a sidebar menu, with a CSV
//! export of the loaded table.

pub mod charts;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod menu;
pub mod pages;
pub mod records;
pub mod server;
pub mod views;

#[cfg(test)]
mod fixtures;

pub use error::{DashboardError, Result};
pub use loader::load_patients;
pub use menu::{MenuOption, Selection};
pub use pages::{render, render_selection, Page};
pub use views::ViewSummary;
