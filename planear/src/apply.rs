use crate::error::{PlanearError, PlanearResult};
use crate::store::{load_plan, save_report};
use planear_exec::{ExecuteConfig, Operations, execute_operations};
use planear_render::{Theme, format_execution_report, format_no_changes};
use planear_types::{ExecutionReport, Plan, Record};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Inputs to [`apply`].
pub struct ApplyParams<'a, T> {
    pub plan_path: PathBuf,
    pub operations: Operations<'a, T>,
    pub config: ExecuteConfig,
    pub theme: Theme,
    /// Where to write a JSON copy of the execution report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl<'a, T> ApplyParams<'a, T> {
    pub fn new(plan_path: impl Into<PathBuf>, operations: Operations<'a, T>) -> Self {
        Self {
            plan_path: plan_path.into(),
            operations,
            config: ExecuteConfig::default(),
            theme: Theme::default(),
            report_path: None,
        }
    }

    pub fn config(mut self, config: ExecuteConfig) -> Self {
        self.config = config;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }
}

/// Executes the plan saved at `params.plan_path`.
///
/// The execution report is always rendered to `out` (and saved to
/// `params.report_path`) before any error is returned. A finalization
/// failure takes precedence over record operation failures.
pub fn apply<T: Record>(
    params: &ApplyParams<'_, T>,
    out: &mut dyn Write,
) -> PlanearResult<ExecutionReport<T>> {
    let plan: Plan<T> = load_plan(&params.plan_path)?;
    if plan.is_empty() {
        out.write_all(format_no_changes(&params.theme).as_bytes())?;
        return Ok(ExecutionReport::new(Vec::new()));
    }

    let ops = &params.operations;
    let (report, finalization) = execute_operations(&plan, ops, &params.config)?.into_parts();

    let rendered = format_execution_report(
        &report,
        |record| ops.format_record(record),
        |key| ops.format_key(key),
        &params.theme,
    );
    out.write_all(rendered.as_bytes())?;
    if let Some(path) = &params.report_path {
        save_report(path, &report)?;
        info!(path = %path.display(), "execution report saved");
    }

    finalization?;

    if report.has_failures() {
        return Err(PlanearError::OperationsFailed {
            added: report.failure.additions.len(),
            updated: report.failure.updates.len(),
            deleted: report.failure.deletions.len(),
        });
    }
    Ok(report)
}
