//! Rendering of plans and execution reports for terminals and logs.
//!
//! Every function takes the [`Theme`] to paint with, so colour output is a
//! per-call decision rather than process-wide state. Record and key
//! formatting is delegated to caller-supplied closures.

mod format;
mod plan;
mod report;
mod theme;

pub use format::{
    format_addition, format_deletion, format_ignore, format_legend, format_no_changes,
    format_update, format_value, update_description,
};
pub use plan::format_plan;
pub use report::format_execution_report;
pub use theme::Theme;
