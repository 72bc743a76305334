//! # Verdict — Fluent Aggregate Result
//!
//! The outcome of an aggregate is fixed when [`crate::assuming`] returns:
//! items run eagerly, once. A `Verdict` only decides what the caller does
//! with that outcome.
//!
//! ## Failure Semantics
//!
//! A failed verdict that is neither quiet nor handled by
//! [`Verdict::on_refuted`] makes every terminal method (`value`, `finish`,
//! `result`) return the failure as `Err`. The error is the original one: a
//! chain's [`AssumptionError`] or the foreign error a check returned. An item
//! that returned `false` produces an `AssumptionError` carrying the options'
//! message, built the first time it is needed.
//!
//! Terminal methods consume the verdict. Deferred [`Verdict::emit_on`]
//! broadcasts are delivered when a terminal method runs.

use std::sync::Arc;

use assume_core::{AssumptionError, Context, FAIL_EVENT, PASS_EVENT};
use serde_json::{json, Value as JsonValue};

use crate::options::AssumeOptions;

/// How an aggregate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// An item returned `false`.
    Refuted,
    /// An item returned `Err` (including a refuted chain).
    Errored,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Refuted => "refuted",
            Self::Errored => "errored",
        }
    }
}

pub(crate) enum Failure {
    /// Error built lazily from the options' message.
    Refuted(Option<anyhow::Error>),
    Errored(anyhow::Error),
}

impl Failure {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Refuted(_) => FailureKind::Refuted,
            Self::Errored(_) => FailureKind::Errored,
        }
    }
}

/// When a deferred [`Verdict::emit_on`] broadcast fires.
pub enum EmitCondition {
    /// Decided up front, regardless of the outcome.
    Fixed(bool),
    /// Called with `true` if the aggregate passed.
    Outcome(Box<dyn FnOnce(bool) -> bool + Send>),
}

impl EmitCondition {
    pub fn on_pass() -> Self {
        Self::Outcome(Box::new(|passed| passed))
    }

    pub fn on_fail() -> Self {
        Self::Outcome(Box::new(|passed| !passed))
    }

    pub fn when<F>(f: F) -> Self
    where
        F: FnOnce(bool) -> bool + Send + 'static,
    {
        Self::Outcome(Box::new(f))
    }

    fn holds(self, passed: bool) -> bool {
        match self {
            Self::Fixed(b) => b,
            Self::Outcome(f) => f(passed),
        }
    }
}

impl From<bool> for EmitCondition {
    fn from(b: bool) -> Self {
        Self::Fixed(b)
    }
}

struct PendingEmit {
    condition: EmitCondition,
    event: String,
    data: Option<JsonValue>,
}

/// Fluent result of [`crate::assuming`].
#[must_use = "a failed verdict only surfaces through a terminal method"]
pub struct Verdict<R = ()> {
    context: Arc<Context>,
    evaluated: usize,
    failure: Option<Failure>,
    handled: bool,
    last: Option<R>,
    options: AssumeOptions,
    pending: Vec<PendingEmit>,
}

impl Verdict<()> {
    /// Record the outcome and broadcast the lifecycle events.
    pub(crate) fn from_outcome(
        context: Arc<Context>,
        evaluated: usize,
        failure: Option<Failure>,
        options: AssumeOptions,
    ) -> Self {
        let passed = failure.is_none();
        tracing::debug!(
            items = evaluated,
            failed = !passed,
            kind = failure.as_ref().map(|f| f.kind().label()),
            "assumption aggregate evaluated"
        );

        let bus = context.bus();
        match &failure {
            None => {
                bus.emit(PASS_EVENT, json!({ "evaluated": evaluated }));
                if let Some(event) = &options.emit {
                    bus.emit(event, json!({ "evaluated": evaluated }));
                }
            }
            Some(f) => {
                let error = match f {
                    Failure::Refuted(_) => options.refuted_message().to_string(),
                    Failure::Errored(e) => e.to_string(),
                };
                bus.emit(
                    FAIL_EVENT,
                    json!({
                        "evaluated": evaluated,
                        "kind": f.kind().label(),
                        "error": error,
                    }),
                );
            }
        }

        Self {
            context,
            evaluated,
            failure,
            handled: false,
            last: None,
            options,
            pending: Vec::new(),
        }
    }
}

impl<R> Verdict<R> {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(Failure::kind)
    }

    /// Number of items evaluated before the verdict was reached.
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    pub fn options(&self) -> &AssumeOptions {
        &self.options
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.options.quiet = quiet;
        self
    }

    /// Failure text for items that returned `false`. Applies only if the
    /// error has not been built yet.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.options.message = Some(message.into());
        self
    }

    /// Side effect that runs only if the aggregate passed.
    pub fn run<F>(self, f: F) -> Self
    where
        F: FnOnce(),
    {
        if self.passed() {
            f();
        }
        self
    }

    /// Handle a failure. `f` runs only if the aggregate failed; its result is
    /// kept and the failure counts as handled.
    pub fn on_refuted<T, F>(mut self, f: F) -> Verdict<T>
    where
        F: FnOnce(&anyhow::Error) -> T,
    {
        let last = self.error().map(f);
        if last.is_some() {
            self.handled = true;
        }
        self.with_last(last)
    }

    /// Alias of [`Verdict::on_refuted`].
    pub fn catch<T, F>(self, f: F) -> Verdict<T>
    where
        F: FnOnce(&anyhow::Error) -> T,
    {
        self.on_refuted(f)
    }

    /// Queue a broadcast, delivered when a terminal method runs and
    /// `condition` holds. Without `data` the payload is `{"passed": bool}`.
    pub fn emit_on(
        mut self,
        condition: impl Into<EmitCondition>,
        event: impl Into<String>,
        data: Option<JsonValue>,
    ) -> Self {
        self.pending.push(PendingEmit {
            condition: condition.into(),
            event: event.into(),
            data,
        });
        self
    }

    // ─── Terminal Methods ───────────────────────────────────────────

    /// The last captured result.
    pub fn value(self) -> anyhow::Result<Option<R>> {
        self.settle()
    }

    pub fn finish(self) -> anyhow::Result<()> {
        self.settle().map(|_| ())
    }

    /// `on_pass()` if the aggregate passed; `None` if it failed quietly or
    /// was handled.
    pub fn result<T, P>(self, on_pass: P) -> anyhow::Result<Option<T>>
    where
        P: FnOnce() -> T,
    {
        let passed = self.passed();
        self.settle()?;
        Ok(passed.then(on_pass))
    }

    /// Two-way branch. Never returns the failure.
    pub fn result_or<T, P, F>(mut self, on_pass: P, on_fail: F) -> T
    where
        P: FnOnce() -> T,
        F: FnOnce(&anyhow::Error) -> T,
    {
        self.flush();
        match self.error() {
            None => on_pass(),
            Some(err) => on_fail(err),
        }
    }

    /// Three-way branch: passed, refuted by `false`, or failed with an error.
    /// Implies quiet.
    pub fn either_or<T, E, O, N>(mut self, either: E, or: O, neither: N) -> T
    where
        E: FnOnce() -> T,
        O: FnOnce() -> T,
        N: FnOnce(&anyhow::Error) -> T,
    {
        self.options.quiet = true;
        self.flush();
        match &self.failure {
            None => either(),
            Some(Failure::Refuted(_)) => or(),
            Some(Failure::Errored(err)) => neither(err),
        }
    }

    // ─── Internals ──────────────────────────────────────────────────

    /// The failure as an error, building it for `false` items.
    fn error(&mut self) -> Option<&anyhow::Error> {
        let message = self.options.refuted_message();
        match self.failure.as_mut()? {
            Failure::Errored(err) => Some(err),
            Failure::Refuted(slot) => {
                Some(slot.get_or_insert_with(|| anyhow::Error::new(AssumptionError::new(message))))
            }
        }
    }

    fn flush(&mut self) {
        let passed = self.passed();
        let bus = self.context.bus();
        for pending in self.pending.drain(..) {
            if pending.condition.holds(passed) {
                let payload = pending.data.unwrap_or_else(|| json!({ "passed": passed }));
                bus.emit(&pending.event, payload);
            }
        }
    }

    fn settle(mut self) -> anyhow::Result<Option<R>> {
        self.flush();
        if self.passed() || self.handled || self.options.quiet {
            return Ok(self.last);
        }
        self.error();
        match self.failure {
            Some(Failure::Errored(err)) | Some(Failure::Refuted(Some(err))) => {
                tracing::debug!(error = %err, "unhandled aggregate failure");
                Err(err)
            }
            _ => Ok(self.last),
        }
    }

    fn with_last<T>(self, last: Option<T>) -> Verdict<T> {
        Verdict {
            context: self.context,
            evaluated: self.evaluated,
            failure: self.failure,
            handled: self.handled,
            last,
            options: self.options,
            pending: self.pending,
        }
    }
}

impl<R> std::fmt::Debug for Verdict<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verdict")
            .field("evaluated", &self.evaluated)
            .field("failure", &self.failure_kind())
            .field("handled", &self.handled)
            .field("has_result", &self.last.is_some())
            .field("options", &self.options)
            .field("pending_emits", &self.pending.len())
            .finish()
    }
}
