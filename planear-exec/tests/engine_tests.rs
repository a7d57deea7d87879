mod common;

use common::{Row, capture_logs, fmt_row, make_plan, sorted_keys};
use planear_exec::{
    ExecError, ExecuteConfig, Operations, OperationsBuilder, RetryError, RetryPolicy,
    execute_operations,
};
use planear_types::{OperationKind, Plan};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

fn fast_config(parallelism: usize) -> ExecuteConfig {
    ExecuteConfig {
        parallelism,
        retry: RetryPolicy::immediate(3),
    }
}

fn base_ops<'a>() -> OperationsBuilder<'a, Row> {
    Operations::builder()
        .format_record(fmt_row)
        .format_key(|k| k.to_string())
        .on_add(|_| Ok(()))
        .on_update(|_| Ok(()))
        .on_delete(|_| Ok(()))
}

// ── Buckets ──────────────────────────────────────────────────────

#[test]
fn mixed_plan_all_succeed() {
    let plan = make_plan(&["a1", "a2"], &["u1"], &["d1"], &["i1"]);
    let ops = base_ops().build().unwrap();

    let outcome = execute_operations(&plan, &ops, &fast_config(2)).unwrap();
    let report = outcome.report;

    assert!(outcome.finalization.is_ok());
    assert_eq!(
        sorted_keys(report.success.additions.iter().map(|a| &a.key)),
        vec!["a1", "a2"]
    );
    assert_eq!(report.success.updates, plan.updates);
    assert_eq!(report.success.deletions, plan.deletions);
    assert!(report.success.ignores.is_empty());
    assert_eq!(report.failure, Plan::new());
    assert_eq!(report.ignores, plan.ignores);
    assert!(report.finalization_success);
    assert_eq!(report.finalization_error_msg, None);
}

#[test]
fn failing_operations_land_in_failure_bucket() {
    let plan = make_plan(&["a1", "bad-a"], &["bad-u"], &["d1"], &[]);
    let ops = base_ops()
        .on_add(|a| {
            if a.key.starts_with("bad") {
                anyhow::bail!("insert rejected");
            }
            Ok(())
        })
        .on_update(|_| anyhow::bail!("update rejected"))
        .build()
        .unwrap();

    let (outcome, logs) = capture_logs(|| execute_operations(&plan, &ops, &fast_config(2)));
    let report = outcome.unwrap().report;

    assert_eq!(report.succeeded_count(), 2);
    assert_eq!(report.failed_count(), 2);
    assert_eq!(report.failure.additions[0].key, "bad-a");
    assert_eq!(report.failure.updates[0].key, "bad-u");
    assert!(report.finalization_success);

    // Three attempts each for the two failing operations.
    assert_eq!(logs.lines_containing("operation attempt failed").len(), 6);
    let final_lines = logs.lines_containing("operation failed after 3 retries");
    assert_eq!(final_lines.len(), 2);
    assert!(final_lines.iter().any(|l| l.contains("record=bad-a=1")));
    assert!(final_lines.iter().any(|l| l.contains("record=bad-u, value: 1 => 2")));
}

#[test]
fn update_attempts_name_the_new_record() {
    let plan = make_plan(&[], &["u1"], &[], &[]);
    let ops = base_ops()
        .on_update(|_| anyhow::bail!("update rejected"))
        .build()
        .unwrap();

    let (outcome, logs) = capture_logs(|| execute_operations(&plan, &ops, &fast_config(1)));
    let report = outcome.unwrap().report;

    assert_eq!(report.failure.updates.len(), 1);
    let attempts = logs.lines_containing("operation attempt failed");
    assert_eq!(attempts.len(), 3);
    for line in &attempts {
        assert!(line.contains("kind=update"), "{line}");
        assert!(line.contains("subject=u1=2 "), "{line}");
    }
    let final_lines = logs.lines_containing("operation failed after 3 retries");
    assert_eq!(final_lines.len(), 1);
    assert!(final_lines[0].contains("record=u1, value: 1 => 2"));
}

#[test]
fn panicking_callback_fails_only_its_operation() {
    let plan = make_plan(&["a0", "a1", "a2", "a3"], &[], &[], &[]);
    let ops = base_ops()
        .on_add(|a| {
            if a.key == "a0" {
                panic!("driver crashed");
            }
            Ok(())
        })
        .build()
        .unwrap();

    let (outcome, logs) = capture_logs(|| execute_operations(&plan, &ops, &fast_config(1)));
    let report = outcome.unwrap().report;

    assert_eq!(
        sorted_keys(report.success.additions.iter().map(|a| &a.key)),
        vec!["a1", "a2", "a3"]
    );
    assert_eq!(report.failure.additions.len(), 1);
    assert_eq!(report.failure.additions[0].key, "a0");
    let attempts = logs.lines_containing("callback panicked: driver crashed");
    assert_eq!(attempts.len(), 3);
}

#[test]
fn panicking_finalize_is_a_finalization_failure() {
    let plan = make_plan(&["a1"], &[], &[], &[]);
    let ops = base_ops()
        .on_finalize(|| panic!("flush crashed"))
        .build()
        .unwrap();

    let outcome = execute_operations(&plan, &ops, &fast_config(1)).unwrap();

    assert_eq!(outcome.report.success.additions.len(), 1);
    assert!(!outcome.report.finalization_success);
    assert!(matches!(
        outcome.finalization,
        Err(RetryError::Exhausted {
            kind: OperationKind::Finalize,
            attempts: 3
        })
    ));
}

#[test]
fn retry_then_success_yields_single_success_entry() {
    let plan = make_plan(&["a1"], &[], &[], &[]);
    let calls = AtomicUsize::new(0);
    let ops = base_ops()
        .on_add(|_| {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                anyhow::bail!("flaky");
            }
            Ok(())
        })
        .build()
        .unwrap();

    let (outcome, logs) = capture_logs(|| execute_operations(&plan, &ops, &fast_config(2)));
    let report = outcome.unwrap().report;

    assert_eq!(report.success.additions.len(), 1);
    assert_eq!(report.failed_count(), 0);
    let lines = logs.lines_containing("operation attempt failed");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("attempt=1"));
    assert!(lines[1].contains("attempt=2"));
}

#[test]
fn callbacks_receive_plan_entries() {
    let plan = make_plan(&["a1"], &["u1"], &["d1"], &[]);
    let seen = Mutex::new(HashMap::new());
    let ops = base_ops()
        .on_add(|a| {
            seen.lock().unwrap().insert("add", a.new.clone());
            Ok(())
        })
        .on_update(|u| {
            seen.lock().unwrap().insert("update", u.new.clone());
            Ok(())
        })
        .on_delete(|d| {
            seen.lock().unwrap().insert("delete", d.old.clone());
            Ok(())
        })
        .build()
        .unwrap();

    execute_operations(&plan, &ops, &fast_config(1)).unwrap();
    drop(ops);

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen["add"], plan.additions[0].new);
    assert_eq!(seen["update"], plan.updates[0].new);
    assert_eq!(seen["delete"], plan.deletions[0].old);
}

#[test]
fn empty_plan_still_finalizes() {
    let finalized = AtomicUsize::new(0);
    let ops = base_ops()
        .on_finalize(|| {
            finalized.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .build()
        .unwrap();

    let outcome = execute_operations(&Plan::new(), &ops, &fast_config(2)).unwrap();

    assert_eq!(finalized.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.report.succeeded_count(), 0);
    assert!(outcome.report.finalization_success);
}

// ── Finalization ─────────────────────────────────────────────────

#[test]
fn finalization_failure_keeps_the_report() {
    let plan = make_plan(&["a1"], &[], &[], &[]);
    let attempts = AtomicUsize::new(0);
    let ops = base_ops()
        .on_finalize(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("commit failed")
        })
        .build()
        .unwrap();

    let (outcome, logs) = capture_logs(|| execute_operations(&plan, &ops, &fast_config(2)));
    let outcome = outcome.unwrap();

    assert_eq!(
        outcome.finalization,
        Err(RetryError::Exhausted {
            kind: OperationKind::Finalize,
            attempts: 3
        })
    );
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(logs.lines_containing("kind=finalize").len(), 3);

    let (report, result) = outcome.into_parts();
    assert_eq!(report.success.additions.len(), 1);
    assert!(!report.finalization_success);
    assert_eq!(
        report.finalization_error_msg.as_deref(),
        Some("operation failed after 3 retries")
    );

    let err = result.unwrap_err();
    assert!(matches!(err, ExecError::Finalization(_)));
    assert!(err.to_string().contains("after 3 retries"));
}

#[test]
fn finalize_runs_after_all_operations() {
    let plan = make_plan(&["a1", "a2", "a3", "a4"], &[], &[], &[]);
    let done = AtomicUsize::new(0);
    let seen_at_finalize = AtomicUsize::new(usize::MAX);
    let ops = base_ops()
        .on_add(|_| {
            done.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .on_finalize(|| {
            seen_at_finalize.store(done.load(Ordering::SeqCst), Ordering::SeqCst);
            Ok(())
        })
        .build()
        .unwrap();

    execute_operations(&plan, &ops, &fast_config(3)).unwrap();

    assert_eq!(seen_at_finalize.load(Ordering::SeqCst), 4);
}

// ── Configuration ────────────────────────────────────────────────

#[test]
fn missing_callbacks_are_reported_by_name() {
    let err = Operations::<Row>::builder()
        .format_record(fmt_row)
        .format_key(|k| k.to_string())
        .on_add(|_| Ok(()))
        .on_delete(|_| Ok(()))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ExecError::MissingCallback("on_update")));

    let err = Operations::<Row>::builder().build().err().unwrap();
    assert!(matches!(err, ExecError::MissingCallback("format_record")));
}

#[test]
fn zero_parallelism_is_a_config_error() {
    let plan = make_plan(&["a1"], &[], &[], &[]);
    let calls = AtomicUsize::new(0);
    let ops = base_ops()
        .on_add(|_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .build()
        .unwrap();

    let result = execute_operations(&plan, &ops, &fast_config(0));

    assert!(matches!(result, Err(ExecError::InvalidParallelism)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn default_config() {
    let config = ExecuteConfig::default();
    assert_eq!(config.parallelism, 2);
    assert_eq!(config.retry, RetryPolicy::default());
}

// ── Concurrency ──────────────────────────────────────────────────

#[test]
fn two_hundred_tasks_no_lost_or_duplicated_entries() {
    let keys: Vec<String> = (0..200).map(|i| format!("k{i:03}")).collect();
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let plan = make_plan(&key_refs, &[], &[], &[]);

    let ops = base_ops()
        .on_add(|a| {
            let n: usize = a.key[1..].parse()?;
            if n % 2 == 1 {
                anyhow::bail!("odd key");
            }
            Ok(())
        })
        .build()
        .unwrap();

    for _ in 0..5 {
        let report = execute_operations(&plan, &ops, &fast_config(8))
            .unwrap()
            .report;

        assert_eq!(report.success.additions.len(), 100);
        assert_eq!(report.failure.additions.len(), 100);

        let mut all = sorted_keys(
            report
                .success
                .additions
                .iter()
                .chain(&report.failure.additions)
                .map(|a| &a.key),
        );
        all.dedup();
        assert_eq!(all, keys);
    }
}
