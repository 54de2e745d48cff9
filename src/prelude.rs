//! Prelude module for fiscal_timeline crate.
//!
//! Re-exports the derive macros from derive_more together with the chrono
//! date types every calendar module works with.

pub use chrono::{Datelike, Days, NaiveDate, Weekday};
pub use derive_more::{Display, From};
