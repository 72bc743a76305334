//! Checks available on `Chain<Num>`.

use super::{ensure, number};
use crate::chain::Chain;
use crate::tag::Num;

/// Tolerance for `multiple_of` on fractional steps.
const STEP_EPSILON: f64 = 1e-9;

impl Chain<Num> {
    /// Inclusive range.
    pub fn between(self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        let (min, max) = (min.into(), max.into());
        self.queue("between", move |v| {
            let n = number(v)?;
            ensure(n >= min && n <= max, || {
                format!("Expected number between {min} and {max}, got {n}")
            })
        })
    }

    pub fn greater_than(self, bound: impl Into<f64>) -> Self {
        let bound = bound.into();
        self.queue("greater_than", move |v| {
            let n = number(v)?;
            ensure(n > bound, || format!("Expected number > {bound}, got {n}"))
        })
    }

    pub fn greater_or_equal(self, bound: impl Into<f64>) -> Self {
        let bound = bound.into();
        self.queue("greater_or_equal", move |v| {
            let n = number(v)?;
            ensure(n >= bound, || format!("Expected number >= {bound}, got {n}"))
        })
    }

    pub fn less_than(self, bound: impl Into<f64>) -> Self {
        let bound = bound.into();
        self.queue("less_than", move |v| {
            let n = number(v)?;
            ensure(n < bound, || format!("Expected number < {bound}, got {n}"))
        })
    }

    pub fn less_or_equal(self, bound: impl Into<f64>) -> Self {
        let bound = bound.into();
        self.queue("less_or_equal", move |v| {
            let n = number(v)?;
            ensure(n <= bound, || format!("Expected number <= {bound}, got {n}"))
        })
    }

    pub fn positive(self) -> Self {
        self.queue("positive", |v| {
            let n = number(v)?;
            ensure(n > 0.0, || format!("Expected positive number, got {n}"))
        })
    }

    pub fn negative(self) -> Self {
        self.queue("negative", |v| {
            let n = number(v)?;
            ensure(n < 0.0, || format!("Expected negative number, got {n}"))
        })
    }

    pub fn non_negative(self) -> Self {
        self.queue("non_negative", |v| {
            let n = number(v)?;
            ensure(n >= 0.0, || format!("Expected non-negative number, got {n}"))
        })
    }

    /// Finite with no fractional part.
    pub fn integer(self) -> Self {
        self.queue("integer", |v| {
            let n = number(v)?;
            ensure(n.is_finite() && n.fract() == 0.0, || {
                format!("Expected integer, got {n}")
            })
        })
    }

    pub fn finite(self) -> Self {
        self.queue("finite", |v| {
            let n = number(v)?;
            ensure(n.is_finite(), || format!("Expected finite number, got {n}"))
        })
    }

    /// `n` is an integral multiple of `step`. A zero step never matches.
    pub fn multiple_of(self, step: impl Into<f64>) -> Self {
        let step = step.into();
        self.queue("multiple_of", move |v| {
            let n = number(v)?;
            ensure(is_multiple(n, step), || {
                format!("Expected multiple of {step}, got {n}")
            })
        })
    }
}

fn is_multiple(n: f64, step: f64) -> bool {
    if step == 0.0 || !step.is_finite() || !n.is_finite() {
        return false;
    }
    let rem = (n % step).abs();
    rem < STEP_EPSILON || (step.abs() - rem) < STEP_EPSILON
}
