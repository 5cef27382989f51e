//! Timing and span recording for named units of work.
//!
//! Wraps a future in a `tracing` span, measures how long it ran and logs
//! the outcome. Purely observational: the wrapped future's output is
//! returned untouched.

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, Span};

/// Parent span that traced calls attach to.
#[derive(Debug, Clone)]
pub struct TraceContext {
    parent: Span,
}

impl TraceContext {
    /// Attach traced calls under `parent`.
    pub fn new(parent: Span) -> Self {
        Self { parent }
    }

    /// Attach traced calls under whatever span is current.
    pub fn current() -> Self {
        Self::new(Span::current())
    }

    pub fn parent(&self) -> &Span {
        &self.parent
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::current()
    }
}

/// Run `work` inside a span labelled `label`, logging its duration.
///
/// Success is logged at debug, failure at warn with the error's message.
pub async fn log_and_trace<T, E, F>(ctx: &TraceContext, label: &'static str, work: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let span = tracing::debug_span!(parent: ctx.parent(), "traced_call", label);
    let start = Instant::now();

    let result = work.instrument(span.clone()).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let _entered = span.enter();
    match &result {
        Ok(_) => tracing::debug!(elapsed_ms, "{label} completed"),
        Err(e) => tracing::warn!(elapsed_ms, error = %e, "{label} failed"),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_through_ok() {
        let ctx = TraceContext::default();
        let result: Result<u32, String> = log_and_trace(&ctx, "answer", async { Ok(42) }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_passes_through_err() {
        let ctx = TraceContext::new(Span::none());
        let result: Result<(), String> =
            log_and_trace(&ctx, "failing", async { Err("nope".to_string()) }).await;
        assert_eq!(result, Err("nope".to_string()));
    }
}
