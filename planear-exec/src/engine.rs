//! Plan execution: one retried task per operation, run on the worker pool,
//! followed by an optional finalize step.

use crate::error::{ExecError, ExecResult, RetryError};
use crate::pool::{Task, execute_tasks, panic_message};
use crate::retry::RetryPolicy;
use planear_types::{
    ExecutionReport, OperationKind, Plan, Record, RecordAddition, RecordDeletion, RecordUpdate,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use tracing::{error, info};

type FormatRecordFn<'a, T> = Box<dyn Fn(&T) -> String + Send + Sync + 'a>;
type FormatKeyFn<'a> = Box<dyn Fn(&str) -> String + Send + Sync + 'a>;
type OperationFn<'a, A> = Box<dyn Fn(&A) -> anyhow::Result<()> + Send + Sync + 'a>;
type FinalizeFn<'a> = Box<dyn Fn() -> anyhow::Result<()> + Send + Sync + 'a>;

/// Execution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteConfig {
    /// Number of concurrent workers. Must be at least 1.
    pub parallelism: usize,
    pub retry: RetryPolicy,
}

impl Default for ExecuteConfig {
    fn default() -> Self {
        Self {
            parallelism: 2,
            retry: RetryPolicy::default(),
        }
    }
}

/// The user-supplied side effects and formatters a plan is executed with.
///
/// Built with [`Operations::builder`]; every callback except `on_finalize`
/// is required.
pub struct Operations<'a, T> {
    format_record: FormatRecordFn<'a, T>,
    format_key: FormatKeyFn<'a>,
    on_add: OperationFn<'a, RecordAddition<T>>,
    on_update: OperationFn<'a, RecordUpdate<T>>,
    on_delete: OperationFn<'a, RecordDeletion<T>>,
    on_finalize: Option<FinalizeFn<'a>>,
}

impl<'a, T> Operations<'a, T> {
    pub fn builder() -> OperationsBuilder<'a, T> {
        OperationsBuilder::default()
    }

    pub fn format_record(&self, record: &T) -> String {
        (self.format_record)(record)
    }

    pub fn format_key(&self, key: &str) -> String {
        (self.format_key)(key)
    }

    /// Human-readable subject of an update: the formatted key followed by
    /// its field changes.
    pub fn describe_update(&self, update: &RecordUpdate<T>) -> String {
        update.describe(&self.format_key(&update.key))
    }
}

pub struct OperationsBuilder<'a, T> {
    format_record: Option<FormatRecordFn<'a, T>>,
    format_key: Option<FormatKeyFn<'a>>,
    on_add: Option<OperationFn<'a, RecordAddition<T>>>,
    on_update: Option<OperationFn<'a, RecordUpdate<T>>>,
    on_delete: Option<OperationFn<'a, RecordDeletion<T>>>,
    on_finalize: Option<FinalizeFn<'a>>,
}

impl<T> Default for OperationsBuilder<'_, T> {
    fn default() -> Self {
        Self {
            format_record: None,
            format_key: None,
            on_add: None,
            on_update: None,
            on_delete: None,
            on_finalize: None,
        }
    }
}

impl<'a, T> OperationsBuilder<'a, T> {
    pub fn format_record(mut self, f: impl Fn(&T) -> String + Send + Sync + 'a) -> Self {
        self.format_record = Some(Box::new(f));
        self
    }

    pub fn format_key(mut self, f: impl Fn(&str) -> String + Send + Sync + 'a) -> Self {
        self.format_key = Some(Box::new(f));
        self
    }

    pub fn on_add(
        mut self,
        f: impl Fn(&RecordAddition<T>) -> anyhow::Result<()> + Send + Sync + 'a,
    ) -> Self {
        self.on_add = Some(Box::new(f));
        self
    }

    pub fn on_update(
        mut self,
        f: impl Fn(&RecordUpdate<T>) -> anyhow::Result<()> + Send + Sync + 'a,
    ) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn on_delete(
        mut self,
        f: impl Fn(&RecordDeletion<T>) -> anyhow::Result<()> + Send + Sync + 'a,
    ) -> Self {
        self.on_delete = Some(Box::new(f));
        self
    }

    pub fn on_finalize(mut self, f: impl Fn() -> anyhow::Result<()> + Send + Sync + 'a) -> Self {
        self.on_finalize = Some(Box::new(f));
        self
    }

    /// Fails with [`ExecError::MissingCallback`] naming the first required
    /// callback that was not set.
    pub fn build(self) -> ExecResult<Operations<'a, T>> {
        Ok(Operations {
            format_record: self
                .format_record
                .ok_or(ExecError::MissingCallback("format_record"))?,
            format_key: self
                .format_key
                .ok_or(ExecError::MissingCallback("format_key"))?,
            on_add: self.on_add.ok_or(ExecError::MissingCallback("on_add"))?,
            on_update: self
                .on_update
                .ok_or(ExecError::MissingCallback("on_update"))?,
            on_delete: self
                .on_delete
                .ok_or(ExecError::MissingCallback("on_delete"))?,
            on_finalize: self.on_finalize,
        })
    }
}

/// The report of an execution and the outcome of its finalize step.
///
/// The report is complete even when finalization failed, so callers can
/// render it before surfacing the error.
#[derive(Debug)]
pub struct ExecutionOutcome<T> {
    pub report: ExecutionReport<T>,
    pub finalization: Result<(), RetryError>,
}

impl<T> ExecutionOutcome<T> {
    /// Splits into the report and the finalization result as an
    /// [`ExecError::Finalization`].
    pub fn into_parts(self) -> (ExecutionReport<T>, ExecResult<()>) {
        (self.report, self.finalization.map_err(ExecError::Finalization))
    }
}

#[derive(Debug, Clone, Copy)]
enum OpRef {
    Add(usize),
    Update(usize),
    Delete(usize),
}

/// A completed task, sent from a worker to the collector.
#[derive(Debug)]
struct Completion {
    op: OpRef,
    succeeded: bool,
}

/// Executes every addition, update and deletion in `plan`.
///
/// Each operation is retried per `config.retry` and a failure never stops
/// the others. A panicking callback counts as a failed attempt. The calling thread blocks until all operations are done, then
/// runs `on_finalize` (if set) with the same retry policy.
///
/// Only configuration and scheduling problems are returned as `Err`; per
/// operation failures land in the report's failure bucket and a finalize
/// failure in [`ExecutionOutcome::finalization`].
pub fn execute_operations<T: Record>(
    plan: &Plan<T>,
    ops: &Operations<'_, T>,
    config: &ExecuteConfig,
) -> ExecResult<ExecutionOutcome<T>> {
    if config.parallelism == 0 {
        return Err(ExecError::InvalidParallelism);
    }

    let retry = config.retry;
    let (tx, rx) = mpsc::channel::<Completion>();
    let mut tasks = Vec::with_capacity(plan.operation_count());

    for (i, addition) in plan.additions.iter().enumerate() {
        let subject = ops.format_record(&addition.new);
        tasks.push(operation_task(
            OpRef::Add(i),
            OperationKind::Add,
            Subject::plain(subject),
            retry,
            move || (ops.on_add)(addition),
            &tx,
        ));
    }
    for (i, update) in plan.updates.iter().enumerate() {
        let subject = Subject {
            record: ops.format_record(&update.new),
            failure: ops.describe_update(update),
        };
        tasks.push(operation_task(
            OpRef::Update(i),
            OperationKind::Update,
            subject,
            retry,
            move || (ops.on_update)(update),
            &tx,
        ));
    }
    for (i, deletion) in plan.deletions.iter().enumerate() {
        let subject = ops.format_record(&deletion.old);
        tasks.push(operation_task(
            OpRef::Delete(i),
            OperationKind::Delete,
            Subject::plain(subject),
            retry,
            move || (ops.on_delete)(deletion),
            &tx,
        ));
    }
    drop(tx);

    execute_tasks(tasks, config.parallelism)?;

    let mut report = ExecutionReport::new(plan.ignores.clone());
    for completion in rx.try_iter() {
        let bucket = if completion.succeeded {
            &mut report.success
        } else {
            &mut report.failure
        };
        match completion.op {
            OpRef::Add(i) => bucket.additions.push(plan.additions[i].clone()),
            OpRef::Update(i) => bucket.updates.push(plan.updates[i].clone()),
            OpRef::Delete(i) => bucket.deletions.push(plan.deletions[i].clone()),
        }
    }

    let finalization = match &ops.on_finalize {
        Some(finalize) => retry.run(OperationKind::Finalize, "", || guarded(|| finalize())),
        None => Ok(()),
    };
    if let Err(err) = &finalization {
        error!(error = %err, "finalization failed");
        report.finalization_success = false;
        report.finalization_error_msg = Some(err.to_string());
    }

    info!(
        succeeded = report.succeeded_count(),
        failed = report.failed_count(),
        ignored = report.ignores.len(),
        "plan executed"
    );

    Ok(ExecutionOutcome {
        report,
        finalization,
    })
}

/// How an operation is named in its log lines.
struct Subject {
    /// Used on every failed attempt.
    record: String,
    /// Used on the final failure line.
    failure: String,
}

impl Subject {
    fn plain(record: String) -> Self {
        Self {
            failure: record.clone(),
            record,
        }
    }
}

fn operation_task<'a, F>(
    op: OpRef,
    kind: OperationKind,
    subject: Subject,
    retry: RetryPolicy,
    action: F,
    tx: &Sender<Completion>,
) -> Task<'a, RetryError>
where
    F: Fn() -> anyhow::Result<()> + Send + 'a,
{
    let success_tx = tx.clone();
    let failure_tx = tx.clone();
    let Subject { record, failure } = subject;

    Task::new(move || retry.run(kind, &record, || guarded(&action)))
        .on_success(move || {
            // The receiver outlives the pool, so sends cannot fail.
            let _ = success_tx.send(Completion {
                op,
                succeeded: true,
            });
        })
        .on_failure(move |err| {
            error!(kind = %kind, record = %failure, error = %err, "operation failed");
            let _ = failure_tx.send(Completion {
                op,
                succeeded: false,
            });
        })
}

/// Runs a user callback, turning a panic into an ordinary failed attempt.
fn guarded<F>(action: F) -> anyhow::Result<()>
where
    F: Fn() -> anyhow::Result<()>,
{
    panic::catch_unwind(AssertUnwindSafe(&action)).unwrap_or_else(|payload| {
        Err(anyhow::anyhow!(
            "callback panicked: {}",
            panic_message(payload.as_ref())
        ))
    })
}
