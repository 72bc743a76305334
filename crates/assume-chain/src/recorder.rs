//! Diagnostic recorder: turns a failed link into an [`AssumptionError`]
//! and records the refutation in history.

use assume_core::{
    preview, AssumeEvent, AssumptionError, FailureContext, LinkSnapshot,
};

use crate::chain::Chain;
use crate::link::{ChainLink, LinkFailure};
use crate::tag::TagState;

/// Build the error for the link at `index`.
pub(crate) fn refute<S: TagState>(
    chain: &Chain<S>,
    index: usize,
    link: &ChainLink,
    failure: LinkFailure,
) -> AssumptionError {
    let (default_message, cause) = match failure {
        LinkFailure::Propagated(nested) => {
            tracing::warn!(
                method = link.method,
                type_tag = %link.type_tag,
                "nested assumption refuted"
            );
            chain.context().history().push(AssumeEvent::Refuted {
                message: nested.original_message().to_string(),
            });
            return nested;
        }
        LinkFailure::Refuted(message) => (message, None),
        LinkFailure::Errored { message, cause } => (message, Some(cause)),
    };

    let message = link
        .message
        .as_deref()
        .map_or(default_message, str::to_string);
    let chain_trace = chain
        .trace_entries()
        .iter()
        .take(link.trace_index + 1)
        .map(ToString::to_string)
        .collect();

    record(
        chain,
        FailureContext {
            message,
            link: Some(LinkSnapshot {
                index,
                type_tag: link.type_tag,
                method: link.method.to_string(),
            }),
            chain_trace,
            cause,
            ..FailureContext::default()
        },
    )
}

/// Build the error for a subject that passed every check but does not fit
/// the chain's narrowed type.
pub(crate) fn narrowing_failure<S: TagState>(chain: &Chain<S>) -> AssumptionError {
    record(
        chain,
        FailureContext {
            message: format!(
                "Expected {}, got {}",
                S::TAG,
                crate::predicates::describe(chain.subject())
            ),
            chain_trace: chain.trace(),
            ..FailureContext::default()
        },
    )
}

fn record<S: TagState>(chain: &Chain<S>, mut ctx: FailureContext) -> AssumptionError {
    let value_preview = preview(chain.subject(), chain.context().preview_limits());
    tracing::warn!(
        method = ctx.link.as_ref().map(|l| l.method.as_str()),
        type_tag = %S::TAG,
        preview = %value_preview,
        "assumption refuted: {}",
        ctx.message
    );
    chain.context().history().push(AssumeEvent::Refuted {
        message: ctx.message.clone(),
    });
    ctx.value_preview = Some(value_preview);
    ctx.capture_location = chain.created_at().map(str::to_string);
    AssumptionError::from_context(ctx)
}
