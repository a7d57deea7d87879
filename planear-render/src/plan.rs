use crate::format::{format_addition, format_deletion, format_ignore, format_legend, format_update};
use crate::theme::Theme;
use planear_types::Plan;

/// Renders a full plan: legend, one section per non-empty bucket, and a
/// summary line.
pub fn format_plan<T, F, K>(plan: &Plan<T>, format_record: F, format_key: K, theme: &Theme) -> String
where
    F: Fn(&T) -> String,
    K: Fn(&str) -> String,
{
    let mut out = format_legend(theme);
    out.push_str("Executing plan will perform the following actions:\n");

    if !plan.additions.is_empty() {
        out.push_str(&section_header(plan.additions.len(), "added"));
        for addition in &plan.additions {
            out.push_str(&format_addition(addition, &format_record, theme));
        }
    }
    if !plan.updates.is_empty() {
        out.push_str(&section_header(plan.updates.len(), "updated"));
        for update in &plan.updates {
            out.push_str(&format_update(update, &format_key, theme));
        }
    }
    if !plan.deletions.is_empty() {
        out.push_str(&section_header(plan.deletions.len(), "deleted"));
        for deletion in &plan.deletions {
            out.push_str(&format_deletion(deletion, &format_record, theme));
        }
    }
    if !plan.ignores.is_empty() {
        out.push_str(&section_header(plan.ignores.len(), "ignored"));
        for ignored in &plan.ignores {
            out.push_str(&format_ignore(ignored, &format_record, theme));
        }
    }

    let summary = plan.summary();
    out.push_str(&format!(
        "\nSummary: {} to add, {} to update, {} to remove, {} to ignore. Total: {} actions.\n",
        summary.additions,
        summary.updates,
        summary.deletions,
        summary.ignores,
        summary.total()
    ));
    out
}

fn section_header(count: usize, verb: &str) -> String {
    format!("\n# {count} row(s) will be {verb}\n")
}
