use crate::format::{format_addition, format_deletion, format_ignore, format_legend, format_update};
use crate::theme::Theme;
use planear_types::{ExecutionReport, Plan};

/// Renders an execution report: succeeded and failed operations, ignored
/// records, the finalization outcome, and a closing count line.
pub fn format_execution_report<T, F, K>(
    report: &ExecutionReport<T>,
    format_record: F,
    format_key: K,
    theme: &Theme,
) -> String
where
    F: Fn(&T) -> String,
    K: Fn(&str) -> String,
{
    let mut out = format_legend(theme);

    let succeeded = report.succeeded_count();
    out.push_str(&format!(
        "{}# {} operation(s) succeeded{}\n",
        theme.success, succeeded, theme.reset
    ));
    out.push_str(&bucket_lines(&report.success, &format_record, &format_key, theme));
    out.push_str(&bucket_summary(&report.success));

    let failed = report.failed_count();
    if failed > 0 {
        out.push_str(&format!(
            "\n{}# {} operation(s) failed{}\n",
            theme.failure, failed, theme.reset
        ));
        out.push_str(&bucket_lines(&report.failure, &format_record, &format_key, theme));
        out.push_str(&bucket_summary(&report.failure));
    }

    if !report.ignores.is_empty() {
        out.push_str(&format!(
            "\n{}# {} record(s) were ignored{}\n",
            theme.ignore,
            report.ignores.len(),
            theme.reset
        ));
        for ignored in &report.ignores {
            out.push_str(&format_ignore(ignored, &format_record, theme));
        }
    }

    out.push_str("\nFinalization:\n");
    if report.finalization_success {
        out.push_str(&format!(
            "  {}✓ Finalization succeeded{}\n",
            theme.success, theme.reset
        ));
    } else {
        let msg = report.finalization_error_msg.as_deref().unwrap_or("unknown error");
        out.push_str(&format!(
            "  {}✗ Finalization failed: {}{}\n",
            theme.failure, msg, theme.reset
        ));
    }

    out.push_str(&format!(
        "\nExecution result: {} succeeded, {} failed, {} ignored\n",
        succeeded,
        failed,
        report.ignores.len()
    ));
    out
}

fn bucket_lines<T, F, K>(bucket: &Plan<T>, format_record: &F, format_key: &K, theme: &Theme) -> String
where
    F: Fn(&T) -> String,
    K: Fn(&str) -> String,
{
    let mut out = String::new();
    for addition in &bucket.additions {
        out.push_str(&format_addition(addition, format_record, theme));
    }
    for update in &bucket.updates {
        out.push_str(&format_update(update, format_key, theme));
    }
    for deletion in &bucket.deletions {
        out.push_str(&format_deletion(deletion, format_record, theme));
    }
    out
}

fn bucket_summary<T>(bucket: &Plan<T>) -> String {
    format!(
        "Summary: {} added, {} updated, {} deleted\n",
        bucket.additions.len(),
        bucket.updates.len(),
        bucket.deletions.len()
    )
}
