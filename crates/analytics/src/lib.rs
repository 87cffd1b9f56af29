//! # Bhavscope Analytics
//!
//! Per-symbol return and trend calculations over a normalized row-set.
//!
//! ## Architectural Principles
//!
//! - **Pure Calculation:** Every function takes its inputs by reference and
//!   returns fresh values. The master row-set is never touched.
//! - **Trading rows, not calendar days:** Windows and returns step through the
//!   rows that exist. Non-trading days are never interpolated.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: price history extraction, daily and cumulative returns,
//!   moving averages and overlays.
//! - `MaWindow`: named durations (`1 W`, `1 M`, `3 M`, `6 M`, `1 Y`) or a plain row count.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{MovingAverageOverlay, MovingAveragePoint, MovingAverageSeries, PricePoint, ReturnPoint};
pub use window::MaWindow;
