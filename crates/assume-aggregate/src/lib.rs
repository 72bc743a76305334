//! # assume-aggregate — Evaluating Several Assumptions at Once
//!
//! [`assuming`] evaluates its items eagerly and in order, stops at the first
//! `false` or `Err`, broadcasts `assume:pass` / `assume:fail` on the event
//! bus, and returns a [`Verdict`] for the caller to react to:
//!
//! ```
//! use assume_aggregate::{assuming, check, AssumeOptions};
//! use assume_chain::assume;
//!
//! let port = 8080;
//! let verdict = assuming(
//!     [
//!         assume(port).is_number().between(1, 65535).into(),
//!         check(|| Ok(port != 0)),
//!     ],
//!     AssumeOptions::new(),
//! );
//! assert!(verdict.passed());
//! verdict.finish().unwrap();
//! ```
//!
//! [`assuming_all`] is the collect-all variant: every item runs and the
//! [`AggregateReport`] lists every failure.

mod assumption;
mod options;
mod report;
mod verdict;

use std::sync::Arc;

use assume_core::Context;

pub use assumption::{check, Assumption};
pub use options::{AssumeOptions, DEFAULT_REFUTED_MESSAGE};
pub use report::{AggregateReport, ItemFailure};
pub use verdict::{EmitCondition, FailureKind, Verdict};

use assumption::Outcome;
use verdict::Failure;

/// Evaluate `items` against the process-wide context.
pub fn assuming<'a, I>(items: I, options: impl Into<AssumeOptions>) -> Verdict
where
    I: IntoIterator,
    I::Item: Into<Assumption<'a>>,
{
    assuming_in(&Context::global(), items, options)
}

/// Evaluate `items`, broadcasting on `context`'s bus.
pub fn assuming_in<'a, I>(
    context: &Arc<Context>,
    items: I,
    options: impl Into<AssumeOptions>,
) -> Verdict
where
    I: IntoIterator,
    I::Item: Into<Assumption<'a>>,
{
    let options = options.into();
    let mut evaluated = 0;
    let mut failure = None;
    for item in items {
        evaluated += 1;
        match item.into().evaluate() {
            Outcome::Holds => {}
            Outcome::Refuted => {
                failure = Some(Failure::Refuted(None));
                break;
            }
            Outcome::Errored(e) => {
                failure = Some(Failure::Errored(e));
                break;
            }
        }
    }
    Verdict::from_outcome(Arc::clone(context), evaluated, failure, options)
}

/// Evaluate every item, collecting all failures.
pub fn assuming_all<'a, I>(items: I, options: impl Into<AssumeOptions>) -> AggregateReport
where
    I: IntoIterator,
    I::Item: Into<Assumption<'a>>,
{
    assuming_all_in(&Context::global(), items, options)
}

pub fn assuming_all_in<'a, I>(
    context: &Arc<Context>,
    items: I,
    options: impl Into<AssumeOptions>,
) -> AggregateReport
where
    I: IntoIterator,
    I::Item: Into<Assumption<'a>>,
{
    report::evaluate_all(context, items, options.into())
}

/// `assuming!(a, b, c)` or `assuming!(a, b; options)`.
///
/// Each item goes through `Assumption::from`, so bools and chains mix
/// freely with [`check`] closures.
#[macro_export]
macro_rules! assuming {
    ($($item:expr),+ ; $options:expr) => {
        $crate::assuming([$($crate::Assumption::from($item)),+], $options)
    };
    ($($item:expr),+ $(,)?) => {
        $crate::assuming(
            [$($crate::Assumption::from($item)),+],
            $crate::AssumeOptions::default(),
        )
    };
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use assume_chain::ContextExt;
    use assume_core::{
        is_assumption_error, AssumeConfig, AssumptionError, BusEvent, FAIL_EVENT, PASS_EVENT,
    };
    use parking_lot::Mutex;

    use super::*;

    fn ctx() -> Arc<Context> {
        Context::new(AssumeConfig::default())
    }

    fn record(ctx: &Arc<Context>, event: &str) -> Arc<Mutex<Vec<BusEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        ctx.bus().on(event, move |e| sink.lock().push(e.clone()));
        seen
    }

    #[test]
    fn passing_aggregate() {
        let ctx = ctx();
        let verdict = assuming_in(&ctx, [true, true], AssumeOptions::new());
        assert!(verdict.passed());
        assert_eq!(verdict.evaluated(), 2);
        assert_eq!(verdict.value().unwrap(), None);
    }

    #[test]
    fn short_circuits_on_first_failure() {
        let ctx = ctx();
        let ran = Cell::new(false);
        let verdict = assuming_in(
            &ctx,
            [
                Assumption::from(false),
                Assumption::predicate(|| {
                    ran.set(true);
                    true
                }),
            ],
            AssumeOptions::new().quiet(true),
        );
        assert!(verdict.failed());
        assert_eq!(verdict.evaluated(), 1);
        assert!(!ran.get());
    }

    #[test]
    fn unhandled_failure_surfaces_from_terminal_methods() {
        let ctx = ctx();
        let err = assuming_in(&ctx, [false], "config incomplete")
            .finish()
            .unwrap_err();
        assert!(is_assumption_error(&err));
        assert_eq!(err.to_string(), "config incomplete");

        let err = assuming_in(&ctx, [false], AssumeOptions::new())
            .value()
            .unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_REFUTED_MESSAGE);
    }

    #[test]
    fn foreign_errors_are_returned_unchanged() {
        let ctx = ctx();
        let err = assuming_in(&ctx, [check(|| Err(anyhow::anyhow!("boom")))], AssumeOptions::new())
            .finish()
            .unwrap_err();
        assert!(!is_assumption_error(&err));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn chain_refutation_is_the_error() {
        let ctx = ctx();
        let err = assuming_in(&ctx, [ctx.assume("x").is_number()], AssumeOptions::new())
            .finish()
            .unwrap_err();
        let refutation = err.downcast_ref::<AssumptionError>().unwrap();
        assert_eq!(refutation.original_message(), "Expected number, got string");
    }

    #[test]
    fn quiet_suppresses_the_error() {
        let ctx = ctx();
        let verdict = assuming_in(&ctx, [false], AssumeOptions::new().quiet(true));
        assert!(verdict.failed());
        assert!(verdict.finish().is_ok());
        assert!(assuming_in(&ctx, [false], AssumeOptions::new())
            .quiet(true)
            .value()
            .unwrap()
            .is_none());
    }

    #[test]
    fn on_refuted_handles_and_captures() {
        let ctx = ctx();
        let handled = assuming_in(
            &ctx,
            [check(|| Err(anyhow::anyhow!("boom")))],
            AssumeOptions::new().quiet(true),
        )
        .on_refuted(|_| "handled")
        .value()
        .unwrap();
        assert_eq!(handled, Some("handled"));

        let not_quiet = assuming_in(&ctx, [false], AssumeOptions::new())
            .catch(|e| e.to_string())
            .value()
            .unwrap();
        assert_eq!(not_quiet.as_deref(), Some(DEFAULT_REFUTED_MESSAGE));

        let passed = assuming_in(&ctx, [true], AssumeOptions::new())
            .on_refuted(|_| 1)
            .value()
            .unwrap();
        assert_eq!(passed, None);
    }

    #[test]
    fn run_only_on_pass() {
        let ctx = ctx();
        let ran = Cell::new(0);
        assuming_in(&ctx, [true], AssumeOptions::new())
            .run(|| ran.set(ran.get() + 1))
            .finish()
            .unwrap();
        let _ = assuming_in(&ctx, [false], AssumeOptions::new().quiet(true))
            .run(|| ran.set(ran.get() + 1))
            .finish();
        assert_eq!(ran.get(), 1);
    }

    #[test]
    fn result_branches() {
        let ctx = ctx();
        assert_eq!(
            assuming_in(&ctx, [true], AssumeOptions::new()).result(|| 7).unwrap(),
            Some(7)
        );
        assert!(assuming_in(&ctx, [false], AssumeOptions::new())
            .result(|| 7)
            .is_err());
        assert_eq!(
            assuming_in(&ctx, [false], AssumeOptions::new()).result_or(|| 1, |_| 2),
            2
        );
    }

    #[test]
    fn either_or_distinguishes_three_outcomes() {
        let ctx = ctx();
        let pick = |v: Verdict| v.either_or(|| "either", || "or", |_| "neither");
        assert_eq!(pick(assuming_in(&ctx, [true], AssumeOptions::new())), "either");
        assert_eq!(pick(assuming_in(&ctx, [false], AssumeOptions::new())), "or");
        assert_eq!(
            pick(assuming_in(
                &ctx,
                [check(|| anyhow::bail!("io"))],
                AssumeOptions::new()
            )),
            "neither"
        );
    }

    #[test]
    fn message_applies_before_the_error_is_built() {
        let ctx = ctx();
        let err = assuming_in(&ctx, [false], AssumeOptions::new())
            .message("late message")
            .finish()
            .unwrap_err();
        assert_eq!(err.to_string(), "late message");
        assert_eq!(
            assuming_in(&ctx, [true], "m").options().message.as_deref(),
            Some("m")
        );
    }

    #[test]
    fn pass_and_fail_are_always_broadcast() {
        let ctx = ctx();
        let passes = record(&ctx, PASS_EVENT);
        let fails = record(&ctx, FAIL_EVENT);
        let _ = assuming_in(&ctx, [true], AssumeOptions::new());
        let _ = assuming_in(&ctx, [false], AssumeOptions::new().quiet(true));
        assert_eq!(passes.lock().len(), 1);
        let fails = fails.lock();
        assert_eq!(fails.len(), 1);
        assert_eq!(fails[0].payload["kind"], "refuted");
    }

    #[test]
    fn custom_emit_only_on_success() {
        let ctx = ctx();
        let seen = record(&ctx, "config:ready");
        let _ = assuming_in(&ctx, [true], AssumeOptions::new().emit("config:ready"));
        let _ = assuming_in(
            &ctx,
            [false],
            AssumeOptions::new().emit("config:ready").quiet(true),
        );
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn emit_on_is_deferred_until_terminal() {
        let ctx = ctx();
        let seen = record(&ctx, "audit");
        let verdict = assuming_in(&ctx, [false], AssumeOptions::new().quiet(true))
            .emit_on(EmitCondition::on_fail(), "audit", Some(serde_json::json!({"id": 1})))
            .emit_on(EmitCondition::on_pass(), "audit", None);
        assert!(seen.lock().is_empty());
        verdict.finish().unwrap();
        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].payload["id"], 1);
    }

    #[test]
    fn assuming_all_reports_every_failure() {
        let ctx = ctx();
        let report = assuming_all_in(
            &ctx,
            [
                Assumption::from(false),
                Assumption::from(true),
                check(|| anyhow::bail!("disk")),
            ],
            AssumeOptions::new(),
        );
        assert!(!report.passed());
        assert_eq!(report.total(), 3);
        let indices: Vec<usize> = report.failures().iter().map(|f| f.index).collect();
        assert_eq!(indices, [0, 2]);
        assert_eq!(report.failures()[1].kind, FailureKind::Errored);
        let err = report.into_result().unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("2 of 3 assumptions failed"), "{text}");
        assert!(text.contains("#2: disk"));
    }

    #[test]
    fn macro_mixes_item_kinds() {
        let verdict = assuming!(true, check(|| Ok(true)); AssumeOptions::new());
        assert!(verdict.passed());
        let verdict = assuming!(true, false);
        assert!(verdict.quiet(true).failed());
    }
}
