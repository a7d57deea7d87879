//! Single-line renderers for each kind of plan entry.

use crate::theme::Theme;
use planear_types::{FieldChange, RecordAddition, RecordDeletion, RecordIgnored, RecordUpdate};

pub use planear_types::format_value;

/// `field: old => new` for each change, joined by `, `.
pub fn update_description(key: &str, changes: &[FieldChange]) -> String {
    let changes = changes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{key}, {changes}")
}

pub fn format_legend(theme: &Theme) -> String {
    format!(
        "Actions are indicated with the following symbols:\n\
         \x20   {add}+{reset} add\n\
         \x20   {update}~{reset} update\n\
         \x20   {delete}-{reset} delete\n\
         \x20   {ignore}?{reset} ignore\n\n",
        add = theme.add,
        update = theme.update,
        delete = theme.delete,
        ignore = theme.ignore,
        reset = theme.reset,
    )
}

pub fn format_no_changes(theme: &Theme) -> String {
    format!("{}No changes required{}\n", theme.success, theme.reset)
}

pub fn format_addition<T, F>(addition: &RecordAddition<T>, format_record: F, theme: &Theme) -> String
where
    F: Fn(&T) -> String,
{
    format!(
        "    {}+{} {}\n",
        theme.add,
        theme.reset,
        format_record(&addition.new)
    )
}

/// Updates are rendered from the key and the field changes; the record
/// bodies are not shown.
pub fn format_update<T, K>(update: &RecordUpdate<T>, format_key: K, theme: &Theme) -> String
where
    K: Fn(&str) -> String,
{
    format!(
        "    {}~{} {}\n",
        theme.update,
        theme.reset,
        update_description(&format_key(&update.key), &update.changes)
    )
}

pub fn format_deletion<T, F>(deletion: &RecordDeletion<T>, format_record: F, theme: &Theme) -> String
where
    F: Fn(&T) -> String,
{
    format!(
        "    {}-{} {}\n",
        theme.delete,
        theme.reset,
        format_record(&deletion.old)
    )
}

pub fn format_ignore<T, F>(ignored: &RecordIgnored<T>, format_record: F, theme: &Theme) -> String
where
    F: Fn(&T) -> String,
{
    format!(
        "    {}? {}:{} {}\n",
        theme.ignore,
        ignored.reason,
        theme.reset,
        format_record(&ignored.record)
    )
}
