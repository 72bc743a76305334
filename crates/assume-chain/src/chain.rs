//! # Chain — Deferred Assumption Queue
//!
//! A `Chain<S>` binds one subject value to an ordered queue of checks. Every
//! builder method appends a check and records a `type.method` trace entry;
//! nothing is evaluated until [`Chain::run`], [`Chain::try_run`],
//! [`Chain::value`] or [`Chain::commit`] is called.
//!
//! The state parameter `S` is the chain's type tag (see [`crate::tag`]).
//! Methods shared by every state live in the generic `impl<S: TagState>`
//! block below; guards live in `guards.rs` and the specialized groups
//! under `ops/`.
//!
//! Running never mutates the chain, so a chain may be run any number of
//! times with the same outcome for the same predicates.

use std::marker::PhantomData;
use std::panic::Location;
use std::sync::Arc;

use assume_core::{preview, AssumeEvent, AssumptionError, Context, TypeTag, Value};

use crate::link::{ChainLink, Condition, LinkFailure, Runnable};
use crate::recorder;
use crate::tag::{Class, TagState, Unknown};

/// One `type.method` entry of a chain's trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    pub type_tag: TypeTag,
    pub method: &'static str,
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.type_tag, self.method)
    }
}

/// A subject value plus its queue of deferred checks.
pub struct Chain<S: TagState = Unknown> {
    subject: Value,
    links: Vec<ChainLink>,
    trace: Vec<TraceEntry>,
    created_at: Option<String>,
    context: Arc<Context>,
    _state: PhantomData<S>,
}

// ─── Construction ───────────────────────────────────────────────────

impl Chain<Unknown> {
    /// Bind `subject` using the process-wide context.
    #[track_caller]
    pub fn new(subject: impl Into<Value>) -> Self {
        Self::with_context(Context::global(), subject)
    }

    /// Bind `subject` using an explicit context.
    #[track_caller]
    pub fn with_context(context: Arc<Context>, subject: impl Into<Value>) -> Self {
        let created_at = context.capture_location(Location::caller());
        Self {
            subject: subject.into(),
            links: Vec::new(),
            trace: Vec::new(),
            created_at,
            context,
            _state: PhantomData,
        }
    }
}

// ─── Every State ────────────────────────────────────────────────────

impl<S: TagState> Chain<S> {
    /// Current type tag.
    pub fn tag(&self) -> TypeTag {
        S::TAG
    }

    pub fn subject(&self) -> &Value {
        &self.subject
    }

    /// Rendered trace, e.g. `["string.is_string", "string.min_length"]`.
    pub fn trace(&self) -> Vec<String> {
        self.trace.iter().map(ToString::to_string).collect()
    }

    pub fn trace_entries(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Number of queued checks.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Call site that created the chain, when location capture is enabled.
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Replace the failure description of the most recently queued check.
    ///
    /// Has no effect on an empty chain.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(link) = self.links.last_mut() {
            link.message = Some(Arc::from(message.into()));
        }
        self
    }

    /// Custom predicate over the subject.
    pub fn that<F>(self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.queue("that", move |v| {
            if predicate(v) {
                Ok(())
            } else {
                Err(LinkFailure::refuted("Custom check failed"))
            }
        })
    }

    /// Custom predicate that may itself fail.
    ///
    /// An `Err` fails the chain with the error kept as the refutation's
    /// cause. An `Err` that already is an [`AssumptionError`] propagates
    /// unchanged.
    pub fn try_that<F>(self, predicate: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.queue("try_that", move |v| match predicate(v) {
            Ok(true) => Ok(()),
            Ok(false) => Err(LinkFailure::refuted("Custom check failed")),
            Err(e) => Err(LinkFailure::from_error("Custom check raised an error", e)),
        })
    }

    /// Strict equality with `expected`. `NaN` never equals itself.
    pub fn equals(self, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        let limits = *self.context.preview_limits();
        self.queue("equals", move |v| {
            if *v == expected {
                Ok(())
            } else {
                Err(LinkFailure::refuted(format!(
                    "Expected value to equal {}",
                    preview(&expected, &limits)
                )))
            }
        })
    }

    /// Class membership check.
    ///
    /// On an unknown chain the tag is refined to the class's tag (arrays,
    /// records and elements refine; other classes stay unknown). A chain
    /// that is already narrowed keeps its tag.
    pub fn instance_of<C: Class>(self) -> Chain<S::Refine<C::Tag>> {
        self.queue_as::<S::Refine<C::Tag>, _>("instance_of", |v| {
            if C::is_instance(v) {
                Ok(())
            } else {
                Err(LinkFailure::refuted(format!(
                    "Expected instance of {}, got {}",
                    C::NAME,
                    v.kind()
                )))
            }
        })
    }

    /// Additional condition: a `bool`, a [`Condition::when`] predicate, or
    /// another chain.
    pub fn and(self, condition: impl Into<Condition>) -> Self {
        let condition = condition.into();
        self.queue("and", move |v| condition.evaluate(v))
    }

    /// Alternative: every check queued so far becomes the left group, and
    /// the chain passes this point if the left group passes OR `condition`
    /// holds.
    pub fn or(mut self, condition: impl Into<Condition>) -> Self {
        let left = std::mem::take(&mut self.links);
        let right = condition.into();
        self.queue("or", move |v| {
            if left.iter().all(|link| link.check(v).is_ok()) {
                return Ok(());
            }
            right
                .evaluate(v)
                .map_err(|_| LinkFailure::refuted("Neither side of `or` holds"))
        })
    }

    // ─── Execution ──────────────────────────────────────────────────

    /// Execute every queued check in order.
    ///
    /// The first failure stops execution and is returned as a structured
    /// [`AssumptionError`]. A refutation coming from a nested chain is
    /// returned unchanged.
    pub fn run(&self) -> Result<(), AssumptionError> {
        let history = self.context.history();
        history.push(AssumeEvent::Start);
        tracing::debug!(
            links = self.links.len(),
            tag = %S::TAG,
            subject = %self.subject.kind(),
            "running assumption chain"
        );

        for (index, link) in self.links.iter().enumerate() {
            history.push(AssumeEvent::Check {
                type_tag: link.type_tag,
                op: link.method.to_string(),
            });
            if let Err(failure) = link.check(&self.subject) {
                return Err(recorder::refute(self, index, link, failure));
            }
        }

        history.push(AssumeEvent::Vindicated);
        tracing::debug!(links = self.links.len(), "assumption chain vindicated");
        Ok(())
    }

    /// Boolean form of [`Chain::run`].
    pub fn try_run(&self) -> bool {
        self.run().is_ok()
    }

    /// Run, then hand back the subject.
    pub fn value(self) -> Result<Value, AssumptionError> {
        self.run()?;
        Ok(self.subject)
    }

    /// Run, then hand back the subject as the narrowed Rust type.
    pub fn commit(mut self) -> Result<S::Narrowed, AssumptionError> {
        self.run()?;
        match S::narrow(std::mem::take(&mut self.subject)) {
            Ok(narrowed) => Ok(narrowed),
            Err(subject) => {
                self.subject = subject;
                Err(recorder::narrowing_failure(&self))
            }
        }
    }

    // ─── Internals ──────────────────────────────────────────────────

    /// Queue a check, keeping the current state.
    pub(crate) fn queue<F>(self, method: &'static str, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), LinkFailure> + Send + Sync + 'static,
    {
        self.queue_as::<S, F>(method, check)
    }

    /// Queue a check and move the chain to state `T`.
    ///
    /// The link and its trace entry are recorded under `T`'s tag.
    pub(crate) fn queue_as<T: TagState, F>(mut self, method: &'static str, check: F) -> Chain<T>
    where
        F: Fn(&Value) -> Result<(), LinkFailure> + Send + Sync + 'static,
    {
        let trace_index = self.trace.len();
        self.trace.push(TraceEntry {
            type_tag: T::TAG,
            method,
        });
        self.links.push(ChainLink {
            execute: Arc::new(check),
            type_tag: T::TAG,
            method,
            trace_index,
            message: None,
        });
        Chain {
            subject: self.subject,
            links: self.links,
            trace: self.trace,
            created_at: self.created_at,
            context: self.context,
            _state: PhantomData,
        }
    }
}

impl<S: TagState> Runnable for Chain<S> {
    fn run(&self) -> Result<(), AssumptionError> {
        Chain::run(self)
    }
}

impl<S: TagState> From<Chain<S>> for Condition {
    fn from(chain: Chain<S>) -> Self {
        Condition::Chain(Arc::new(chain))
    }
}

impl<S: TagState> Clone for Chain<S> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
            links: self.links.clone(),
            trace: self.trace.clone(),
            created_at: self.created_at.clone(),
            context: Arc::clone(&self.context),
            _state: PhantomData,
        }
    }
}

impl<S: TagState> std::fmt::Debug for Chain<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("tag", &S::TAG)
            .field("subject", &self.subject)
            .field("links", &self.links.len())
            .field("trace", &self.trace())
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::{Arr, Str};
    use assume_core::{AssumeConfig, Element};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn chain(v: impl Into<Value>) -> Chain<Unknown> {
        Chain::with_context(Context::new(AssumeConfig::default()), v)
    }

    #[test]
    fn empty_chain_passes_and_returns_subject() {
        let c = chain("hello");
        assert!(c.is_empty());
        assert_eq!(c.value().unwrap(), Value::from("hello"));
    }

    #[test]
    fn checks_are_deferred_until_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let c = chain(1).that(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            true
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(c.try_run());
        assert!(c.try_run());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn first_failure_stops_execution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let c = chain(1).that(|_| false).that(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            true
        });
        let err = c.run().unwrap_err();
        assert_eq!(err.original_message(), "Custom check failed");
        assert_eq!(err.link_snapshot().unwrap().index, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn message_overrides_last_link_only() {
        let err = chain(5)
            .that(|_| true)
            .message("first")
            .that(|_| false)
            .message("second check failed")
            .run()
            .unwrap_err();
        assert_eq!(err.original_message(), "second check failed");
    }

    #[test]
    fn equals_is_strict() {
        assert!(chain(3).equals(3).try_run());
        assert!(!chain(3).equals("3").try_run());
        assert!(!chain(f64::NAN).equals(f64::NAN).try_run());
        let err = chain("a").equals("b").run().unwrap_err();
        assert_eq!(err.original_message(), "Expected value to equal \"b\"");
    }

    #[test]
    fn try_that_keeps_the_cause() {
        let err = chain(1)
            .try_that(|_| Err(anyhow::anyhow!("lookup failed")))
            .run()
            .unwrap_err();
        assert_eq!(err.original_message(), "Custom check raised an error");
        assert_eq!(err.cause().unwrap().to_string(), "lookup failed");
    }

    #[test]
    fn instance_of_refines_unknown() {
        let c: Chain<Arr> = chain(vec![1, 2]).instance_of::<Vec<Value>>();
        assert_eq!(c.tag(), TypeTag::Array);
        assert!(c.try_run());

        let c: Chain<Unknown> = chain("x").instance_of::<String>();
        assert_eq!(c.tag(), TypeTag::Unknown);

        let el = Element::new("div");
        assert_eq!(
            chain(el).instance_of::<Element>().tag(),
            TypeTag::Element
        );
        assert_eq!(
            chain(BTreeMap::new())
                .instance_of::<BTreeMap<String, Value>>()
                .tag(),
            TypeTag::Object
        );
    }

    #[test]
    fn instance_of_never_reverts_a_narrowed_chain() {
        let c: Chain<Str> = chain("x").is_string().instance_of::<Vec<Value>>();
        assert_eq!(c.tag(), TypeTag::String);
        let err = c.run().unwrap_err();
        assert_eq!(err.original_message(), "Expected instance of Array, got string");
    }

    #[test]
    fn and_accepts_bools_predicates_and_chains() {
        assert!(chain(1).and(true).try_run());
        assert!(!chain(1).and(false).try_run());
        assert!(chain(1).and(Condition::when(|v| v.as_f64() == Some(1.0))).try_run());
        assert!(chain(1).and(chain("s").is_string()).try_run());
        assert!(!chain(1).and(chain(2).is_string()).try_run());
    }

    #[test]
    fn nested_refutation_propagates_unchanged() {
        let ctx = Context::new(AssumeConfig::default());
        let inner = Chain::with_context(Arc::clone(&ctx), 2).is_string();
        let err = Chain::with_context(Arc::clone(&ctx), 1)
            .and(inner)
            .run()
            .unwrap_err();
        assert_eq!(err.original_message(), "Expected string, got number");
        assert_eq!(err.chain_trace(), ["string.is_string"]);
        // inner refutation, then the outer chain records it again
        assert_eq!(ctx.history().events_by_kind("refuted").len(), 2);
    }

    #[test]
    fn or_passes_if_either_side_holds() {
        assert!(chain(1).that(|_| false).or(true).try_run());
        assert!(chain(1).that(|_| true).or(false).try_run());
        assert!(!chain(1).that(|_| false).or(false).try_run());
        let c = chain(1).that(|_| true).that(|_| true).or(false);
        assert_eq!(c.len(), 1);
        assert_eq!(c.trace().len(), 3);
    }

    #[test]
    fn run_records_history() {
        let ctx = Context::new(AssumeConfig::default());
        Chain::with_context(Arc::clone(&ctx), "x")
            .is_string()
            .not_empty()
            .run()
            .unwrap();
        let labels: Vec<&str> = ctx.history().events().iter().map(|e| e.label()).collect();
        assert_eq!(labels, ["start", "check", "check", "vindicated"]);
    }

    #[test]
    fn commit_returns_narrowed_type() {
        let s: String = chain("abc").is_string().commit().unwrap();
        assert_eq!(s, "abc");
        let n: f64 = chain(4).is_number().commit().unwrap();
        assert_eq!(n, 4.0);
        let v: Value = chain(true).commit().unwrap();
        assert_eq!(v, Value::Bool(true));
    }

    #[test]
    fn created_at_points_at_the_caller() {
        let c = chain(1);
        let at = c.created_at().unwrap();
        assert!(at.contains("chain.rs"), "{at}");
    }

    #[test]
    fn clone_runs_independently() {
        let c = chain("x").is_string();
        let copy = c.clone().min_length(5);
        assert!(c.try_run());
        assert!(!copy.try_run());
    }
}
