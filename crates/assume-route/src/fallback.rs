//! # Fallback Routes
//!
//! [`wrap_sync`] and [`wrap_async`] wrap a fallible function so that a
//! refuted assumption inside it yields a fixed fallback value instead of an
//! error. Foreign errors still propagate unless the route is configured with
//! [`SyncRoute::intercept_all`] / [`AsyncRoute::intercept_all`].

use std::future::Future;
use std::sync::Arc;

use crate::policy::Interceptor;

/// A synchronous function plus its fallback.
#[derive(Debug)]
pub struct SyncRoute<T, F> {
    fallback: T,
    f: F,
    interceptor: Interceptor,
}

/// An async function plus its fallback.
#[derive(Debug)]
pub struct AsyncRoute<T, F> {
    fallback: T,
    f: F,
    interceptor: Interceptor,
}

/// Wrap a synchronous function.
pub fn wrap_sync<T, F>(fallback: T, f: F) -> SyncRoute<T, F> {
    SyncRoute {
        fallback,
        f,
        interceptor: Interceptor::default(),
    }
}

/// Wrap a function returning a future.
pub fn wrap_async<T, F>(fallback: T, f: F) -> AsyncRoute<T, F> {
    AsyncRoute {
        fallback,
        f,
        interceptor: Interceptor::default(),
    }
}

macro_rules! route_config {
    ($route:ident) => {
        impl<T, F> $route<T, F> {
            /// Absorb every error, not only refuted assumptions.
            pub fn intercept_all(mut self, all: bool) -> Self {
                self.interceptor.set_intercept_all(all);
                self
            }

            /// Observe every absorbed error.
            pub fn on_error<H>(mut self, hook: H) -> Self
            where
                H: Fn(&anyhow::Error) + Send + Sync + 'static,
            {
                self.interceptor.set_on_error(Arc::new(hook));
                self
            }

            pub fn fallback(&self) -> &T {
                &self.fallback
            }

            pub fn intercepts_all(&self) -> bool {
                self.interceptor.intercepts_all()
            }
        }
    };
}

route_config!(SyncRoute);
route_config!(AsyncRoute);

impl<T: Clone, F> SyncRoute<T, F> {
    /// Call the wrapped function. Returns the fallback on an absorbed error.
    pub fn call<A, E>(&self, args: A) -> anyhow::Result<T>
    where
        F: Fn(A) -> Result<T, E>,
        E: Into<anyhow::Error>,
    {
        match (self.f)(args) {
            Ok(value) => Ok(value),
            Err(e) => {
                self.interceptor.absorb(e.into())?;
                Ok(self.fallback.clone())
            }
        }
    }
}

impl<T: Clone, F> AsyncRoute<T, F> {
    /// Call the wrapped function and await it. Returns the fallback on an
    /// absorbed error.
    pub async fn call<A, Fut, E>(&self, args: A) -> anyhow::Result<T>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<anyhow::Error>,
    {
        match (self.f)(args).await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.interceptor.absorb(e.into())?;
                Ok(self.fallback.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assume_chain::assume;
    use assume_core::AssumptionError;

    use super::*;

    fn parse_port(raw: &str) -> Result<u16, AssumptionError> {
        let n = assume(raw.parse::<f64>().unwrap_or(f64::NAN))
            .is_number()
            .integer()
            .between(1, 65535)
            .commit()?;
        Ok(n as u16)
    }

    #[test]
    fn passes_through_success() {
        let route = wrap_sync(80u16, parse_port);
        assert_eq!(route.call("8080").unwrap(), 8080);
    }

    #[test]
    fn refutation_yields_fallback() {
        let route = wrap_sync(80u16, parse_port);
        assert_eq!(route.call("not a port").unwrap(), 80);
        assert_eq!(route.call("70000").unwrap(), 80);
    }

    #[test]
    fn foreign_errors_propagate_unless_intercept_all() {
        let failing = |_: ()| -> anyhow::Result<i32> { anyhow::bail!("db down") };
        let route = wrap_sync(0, failing);
        assert_eq!(route.call(()).unwrap_err().to_string(), "db down");
        let route = wrap_sync(0, failing).intercept_all(true);
        assert!(route.intercepts_all());
        assert_eq!(route.call(()).unwrap(), 0);
    }

    #[test]
    fn on_error_observes_absorbed_errors() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let route = wrap_sync(0, |x: i32| assume(x).is_number().positive().commit().map(|n| n as i32))
            .on_error(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        assert_eq!(route.call(-5).unwrap(), 0);
        assert_eq!(route.call(5).unwrap(), 5);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn async_route_yields_fallback() {
        let route = wrap_async(String::from("anonymous"), |name: &'static str| async move {
            assume(name).is_string().not_empty().commit()
        });
        assert_eq!(route.call("ada").await.unwrap(), "ada");
        assert_eq!(route.call("").await.unwrap(), "anonymous");
        assert_eq!(route.fallback(), "anonymous");
    }

    #[tokio::test]
    async fn async_route_propagates_foreign_errors() {
        let route = wrap_async(0u8, |_: ()| async { Err::<u8, _>(anyhow::anyhow!("timeout")) });
        assert_eq!(route.call(()).await.unwrap_err().to_string(), "timeout");
    }
}
