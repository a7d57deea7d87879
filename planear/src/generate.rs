use crate::error::{PlanearError, PlanearResult};
use crate::store::{remove_stale_plan, save_plan};
use planear_diff::compute_plan_diff;
use planear_input::load_csv_directory;
use planear_render::{Theme, format_no_changes, format_plan};
use planear_types::{Key, Plan, Record};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

type ExtractKeyFn<'a, T> = Box<dyn Fn(&T) -> Key + 'a>;
type LoadRemoteFn<'a, T> = Box<dyn Fn() -> anyhow::Result<HashMap<Key, T>> + 'a>;
type ValidateFn<'a, T> = Box<dyn Fn(&T) -> Result<(), String> + 'a>;
type FormatRecordFn<'a, T> = Box<dyn Fn(&T) -> String + 'a>;
type FormatKeyFn<'a> = Box<dyn Fn(&str) -> String + 'a>;

/// Inputs to [`generate`].
///
/// All five callbacks are required; [`generate`] reports the first missing
/// one as [`PlanearError::MissingParameter`] before touching the filesystem.
pub struct GenerateParams<'a, T> {
    /// Directory of CSV files holding the desired records.
    pub csv_dir: PathBuf,
    /// Where the plan is written.
    pub plan_path: PathBuf,
    pub theme: Theme,
    extract_key: Option<ExtractKeyFn<'a, T>>,
    load_remote: Option<LoadRemoteFn<'a, T>>,
    validate: Option<ValidateFn<'a, T>>,
    format_record: Option<FormatRecordFn<'a, T>>,
    format_key: Option<FormatKeyFn<'a>>,
}

impl<'a, T> GenerateParams<'a, T> {
    pub fn new(csv_dir: impl Into<PathBuf>, plan_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_dir: csv_dir.into(),
            plan_path: plan_path.into(),
            theme: Theme::default(),
            extract_key: None,
            load_remote: None,
            validate: None,
            format_record: None,
            format_key: None,
        }
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn extract_key(mut self, f: impl Fn(&T) -> Key + 'a) -> Self {
        self.extract_key = Some(Box::new(f));
        self
    }

    pub fn load_remote(mut self, f: impl Fn() -> anyhow::Result<HashMap<Key, T>> + 'a) -> Self {
        self.load_remote = Some(Box::new(f));
        self
    }

    pub fn validate(mut self, f: impl Fn(&T) -> Result<(), String> + 'a) -> Self {
        self.validate = Some(Box::new(f));
        self
    }

    pub fn format_record(mut self, f: impl Fn(&T) -> String + 'a) -> Self {
        self.format_record = Some(Box::new(f));
        self
    }

    pub fn format_key(mut self, f: impl Fn(&str) -> String + 'a) -> Self {
        self.format_key = Some(Box::new(f));
        self
    }
}

fn required<'p, V: ?Sized>(
    value: &'p Option<Box<V>>,
    name: &'static str,
) -> PlanearResult<&'p V> {
    value
        .as_deref()
        .ok_or(PlanearError::MissingParameter(name))
}

/// Computes the plan that makes the remote records match the local CSV
/// records, renders it to `out`, and saves it to `params.plan_path`.
///
/// When nothing needs to change, `No changes required` is written instead
/// and a plan file left over from an earlier run is removed. A failure to
/// load remote records aborts before any diffing.
pub fn generate<T: Record>(
    params: &GenerateParams<'_, T>,
    out: &mut dyn Write,
) -> PlanearResult<Plan<T>> {
    let extract_key = required(&params.extract_key, "extract_key")?;
    let load_remote = required(&params.load_remote, "load_remote")?;
    let validate = required(&params.validate, "validate")?;
    let format_record = required(&params.format_record, "format_record")?;
    let format_key = required(&params.format_key, "format_key")?;

    let local = load_csv_directory(&params.csv_dir, extract_key)?;
    let remote = load_remote().map_err(PlanearError::RemoteLoad)?;
    info!(local = local.len(), remote = remote.len(), "loaded records");

    let plan = compute_plan_diff(&local, &remote, validate)?;

    if plan.is_empty() {
        out.write_all(format_no_changes(&params.theme).as_bytes())?;
        remove_stale_plan(&params.plan_path)?;
        return Ok(plan);
    }

    let rendered = format_plan(&plan, format_record, format_key, &params.theme);
    out.write_all(rendered.as_bytes())?;
    save_plan(&params.plan_path, &plan)?;
    info!(path = %params.plan_path.display(), actions = plan.summary().total(), "plan saved");

    Ok(plan)
}
