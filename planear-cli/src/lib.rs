//! Commands behind the `planear-demo` binary.
//!
//! The demo reconciles [`UserRecord`]s read from a directory of CSV files
//! against a JSON file that plays the part of the remote system.

pub mod remote;
pub mod user;

use anyhow::Result;
use planear::{ApplyParams, ExecutionReport, GenerateParams, Operations, Plan, ReconcileConfig};
use remote::JsonRemote;
use std::io::Write;
use std::path::PathBuf;
use user::{UserRecord, extract_key, format_key, format_user, validate_user};

pub use planear::Theme;

/// Options shared by both commands.
pub struct RunOptions {
    pub config: ReconcileConfig,
    /// Overrides the plan path from the config.
    pub plan_path: Option<PathBuf>,
    pub theme: Theme,
}

impl RunOptions {
    pub fn new(config: ReconcileConfig) -> Self {
        let theme = config.theme();
        Self {
            config,
            plan_path: None,
            theme,
        }
    }

    fn plan_path(&self) -> PathBuf {
        self.plan_path
            .clone()
            .unwrap_or_else(|| self.config.plan_path.clone())
    }
}

/// `plan`: diff the CSV directory against the remote file and save a plan.
pub fn run_plan(
    csv_dir: PathBuf,
    remote_path: PathBuf,
    options: &RunOptions,
    out: &mut dyn Write,
) -> Result<Plan<UserRecord>> {
    let remote = JsonRemote::open(remote_path)?;
    let params = GenerateParams::new(csv_dir, options.plan_path())
        .theme(options.theme)
        .extract_key(extract_key)
        .load_remote(|| Ok(remote.snapshot()))
        .validate(validate_user)
        .format_record(format_user)
        .format_key(format_key);

    Ok(planear::generate(&params, out)?)
}

/// `apply`: execute the saved plan against the remote file.
///
/// Operations on any of `fail_keys` always fail. The file is rewritten
/// during finalization.
pub fn run_apply(
    remote_path: PathBuf,
    fail_keys: Vec<String>,
    report_path: Option<PathBuf>,
    options: &RunOptions,
    out: &mut dyn Write,
) -> Result<ExecutionReport<UserRecord>> {
    let remote = JsonRemote::open(remote_path)?.fail_on(fail_keys);
    let operations = Operations::builder()
        .format_record(format_user)
        .format_key(format_key)
        .on_add(|a| remote.add(a))
        .on_update(|u| remote.update(u))
        .on_delete(|d| remote.delete(d))
        .on_finalize(|| remote.persist())
        .build()?;

    let mut params = ApplyParams::new(options.plan_path(), operations)
        .config(options.config.execute_config())
        .theme(options.theme);
    if let Some(path) = report_path {
        params = params.report_path(path);
    }

    Ok(planear::apply(&params, out)?)
}
