//! # Queries Feature
//!
//! On-demand views of the schedule: what happens tomorrow, and the next few
//! events of each schedule file.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod render;
pub mod service;

pub use render::{render_tomorrow, render_upcoming};
pub use service::{tomorrow_by_group, upcoming_by_group, QueryResult, QueryService};
