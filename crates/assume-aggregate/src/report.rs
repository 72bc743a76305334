//! Collect-all evaluation: every item runs, every failure is reported.

use std::sync::Arc;

use assume_core::{AssumptionError, Context, FAIL_EVENT, PASS_EVENT};
use serde_json::json;

use crate::assumption::{Assumption, Outcome};
use crate::options::AssumeOptions;
use crate::verdict::FailureKind;

/// One failing item of [`crate::assuming_all`].
#[derive(Debug)]
pub struct ItemFailure {
    /// Position of the item in the input.
    pub index: usize,
    pub kind: FailureKind,
    pub error: anyhow::Error,
}

/// Outcome of [`crate::assuming_all`].
#[derive(Debug)]
pub struct AggregateReport {
    total: usize,
    failures: Vec<ItemFailure>,
    message: Option<String>,
}

impl AggregateReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of items evaluated.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }

    /// `Ok` if every item held, otherwise one [`AssumptionError`] listing
    /// every failing item.
    pub fn into_result(self) -> anyhow::Result<()> {
        if self.passed() {
            return Ok(());
        }
        let mut text = self.message.unwrap_or_else(|| {
            format!(
                "{} of {} assumptions failed",
                self.failures.len(),
                self.total
            )
        });
        for failure in &self.failures {
            text.push_str(&format!("\n  #{}: {}", failure.index, first_line(&failure.error)));
        }
        Err(AssumptionError::new(text).into())
    }
}

fn first_line(err: &anyhow::Error) -> String {
    err.to_string().lines().next().unwrap_or_default().to_string()
}

pub(crate) fn evaluate_all<'a, I>(
    context: &Arc<Context>,
    items: I,
    options: AssumeOptions,
) -> AggregateReport
where
    I: IntoIterator,
    I::Item: Into<Assumption<'a>>,
{
    let mut total = 0;
    let mut failures = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        total += 1;
        let (kind, error) = match item.into().evaluate() {
            Outcome::Holds => continue,
            Outcome::Refuted => (
                FailureKind::Refuted,
                anyhow::Error::new(AssumptionError::new(options.refuted_message())),
            ),
            Outcome::Errored(e) => (FailureKind::Errored, e),
        };
        failures.push(ItemFailure { index, kind, error });
    }

    tracing::debug!(
        items = total,
        failures = failures.len(),
        "assumption report evaluated"
    );
    let bus = context.bus();
    if failures.is_empty() {
        bus.emit(PASS_EVENT, json!({ "evaluated": total }));
        if let Some(event) = &options.emit {
            bus.emit(event, json!({ "evaluated": total }));
        }
    } else {
        let listed: Vec<_> = failures
            .iter()
            .map(|f| {
                json!({
                    "index": f.index,
                    "kind": f.kind.label(),
                    "error": first_line(&f.error),
                })
            })
            .collect();
        bus.emit(
            FAIL_EVENT,
            json!({ "evaluated": total, "failures": listed }),
        );
    }

    AggregateReport {
        total,
        failures,
        message: options.message,
    }
}
