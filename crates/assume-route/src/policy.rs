//! Which errors a route adapter absorbs.

use std::sync::Arc;

use assume_core::is_assumption_error;

type Hook = Arc<dyn Fn(&anyhow::Error) + Send + Sync>;

/// Interception policy plus the observer hook, shared by the sync and async
/// adapters.
#[derive(Clone, Default)]
pub(crate) struct Interceptor {
    intercept_all: bool,
    on_error: Option<Hook>,
}

impl Interceptor {
    pub(crate) fn set_intercept_all(&mut self, all: bool) {
        self.intercept_all = all;
    }

    pub(crate) fn set_on_error(&mut self, hook: Hook) {
        self.on_error = Some(hook);
    }

    pub(crate) fn intercepts_all(&self) -> bool {
        self.intercept_all
    }

    /// `Ok(())` if `err` is absorbed, otherwise the error to propagate.
    pub(crate) fn absorb(&self, err: anyhow::Error) -> Result<(), anyhow::Error> {
        let recognized = is_assumption_error(&err);
        if !recognized && !self.intercept_all {
            return Err(err);
        }
        tracing::warn!(error = %err, recognized, "route absorbed failure; returning fallback");
        if let Some(hook) = &self.on_error {
            hook(&err);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("intercept_all", &self.intercept_all)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
