//! Score resolution and display projection for the stock ranking dashboard.
//!
//! Pure transformations from per-stock ranking records to the flat, sorted
//! tables the dashboard renders or exports as CSV, plus the persistence seam
//! for watchlists and analysis history.

pub mod dedup;
pub mod display;
pub mod export;
pub mod models;
pub mod scoring;
pub mod store;
