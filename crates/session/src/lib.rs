//! # Bhavscope Session
//!
//! The explicit application state behind every front end. A `Session` holds
//! the uploads, the master row-set and its date bounds, and is driven one
//! `Command` at a time:
//!
//! ```text
//! Upload -> CreateMaster -> NormalizeTimestamps -> { SortRange, ChartSeries,
//!                                                   DailyReturns, MovingAverages, ... }
//! ```
//!
//! `try_execute` returns typed errors; `execute` turns them into
//! `Outcome::Status` notices so a failed command never ends the session.

pub mod command;
pub mod error;
pub mod session;

pub use command::{Command, Outcome, ReturnKind, UploadSummary};
pub use error::SessionError;
pub use session::Session;
