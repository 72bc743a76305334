//! # Refutation Handlers
//!
//! [`assumed_route`] is the general form of a route adapter: the handler
//! runs, and any error it returns is handed, together with the original
//! arguments, to an `on_refuted` callback whose value becomes the result.
//! [`def_ref_handler`] builds the common `on_refuted` callback that ignores
//! the error and returns a default.

use std::future::Future;

/// An `on_refuted` callback that always returns `default`.
///
/// With `log` set, every handled error is logged at `warn`.
pub fn def_ref_handler<T, A>(default: T, log: bool) -> impl Fn(anyhow::Error, A) -> T + Clone
where
    T: Clone,
{
    move |err: anyhow::Error, _args: A| {
        if log {
            tracing::warn!(error = %err, "assumption refuted; returning default");
        }
        default.clone()
    }
}

/// A handler whose errors are turned into values by `on_refuted`.
#[derive(Debug, Clone)]
pub struct AssumedRoute<R, H> {
    on_refuted: R,
    handler: H,
}

/// Async form of [`AssumedRoute`].
#[derive(Debug, Clone)]
pub struct AssumedAsyncRoute<R, H> {
    on_refuted: R,
    handler: H,
}

pub fn assumed_route<R, H>(on_refuted: R, handler: H) -> AssumedRoute<R, H> {
    AssumedRoute {
        on_refuted,
        handler,
    }
}

pub fn assumed_route_async<R, H>(on_refuted: R, handler: H) -> AssumedAsyncRoute<R, H> {
    AssumedAsyncRoute {
        on_refuted,
        handler,
    }
}

impl<R, H> AssumedRoute<R, H> {
    /// Run the handler; on `Err`, return `on_refuted(err, args)`.
    ///
    /// Every error is handed over, not only refuted assumptions.
    pub fn call<A, T, E>(&self, args: A) -> T
    where
        A: Clone,
        H: Fn(A) -> Result<T, E>,
        E: Into<anyhow::Error>,
        R: Fn(anyhow::Error, A) -> T,
    {
        match (self.handler)(args.clone()) {
            Ok(value) => value,
            Err(e) => {
                let err = e.into();
                tracing::debug!(error = %err, "assumed route handler failed");
                (self.on_refuted)(err, args)
            }
        }
    }
}

impl<R, H> AssumedAsyncRoute<R, H> {
    /// Await the handler; on `Err`, return `on_refuted(err, args)`.
    pub async fn call<A, T, E, Fut>(&self, args: A) -> T
    where
        A: Clone,
        H: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<anyhow::Error>,
        R: Fn(anyhow::Error, A) -> T,
    {
        match (self.handler)(args.clone()).await {
            Ok(value) => value,
            Err(e) => {
                let err = e.into();
                tracing::debug!(error = %err, "assumed async route handler failed");
                (self.on_refuted)(err, args)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assume_chain::assume;
    use assume_core::{is_assumption_error, AssumptionError};

    use super::*;

    fn double_positive(x: i32) -> Result<i32, AssumptionError> {
        let n = assume(x).is_number().non_negative().commit()?;
        Ok(n as i32 * 2)
    }

    #[test]
    fn def_ref_handler_returns_default() {
        let handler = def_ref_handler::<_, i32>("fallback", true);
        assert_eq!(handler(anyhow::anyhow!("x"), 1), "fallback");
        assert_eq!(handler(anyhow::anyhow!("y"), 2), "fallback");
    }

    #[test]
    fn assumed_route_passes_args_to_on_refuted() {
        let route = assumed_route(
            |err: anyhow::Error, x: i32| {
                assert!(is_assumption_error(&err));
                -x
            },
            double_positive,
        );
        assert_eq!(route.call(4), 8);
        assert_eq!(route.call(-3), 3);
    }

    #[test]
    fn assumed_route_with_default_handler() {
        let route = assumed_route(def_ref_handler::<_, i32>(0, false), double_positive);
        assert_eq!(route.call(-1), 0);
        assert_eq!(route.call(21), 42);
    }

    #[test]
    fn foreign_errors_also_reach_on_refuted() {
        let route = assumed_route(
            |err: anyhow::Error, _: ()| err.to_string(),
            |_: ()| -> anyhow::Result<String> { anyhow::bail!("disk full") },
        );
        assert_eq!(route.call(()), "disk full");
    }

    #[tokio::test]
    async fn async_route_resolves_to_on_refuted_value() {
        let route = assumed_route_async(
            |_err: anyhow::Error, x: i32| format!("refuted {x}"),
            |x: i32| async move {
                if x < 0 {
                    Err(AssumptionError::new("negative input"))
                } else {
                    Ok(format!("{}", x * 2))
                }
            },
        );
        assert_eq!(route.call(-1).await, "refuted -1");
        assert_eq!(route.call(5).await, "10");
    }
}
