//! Substitute-call-restore interception of host entry points.
//!
//! All host callbacks run on one event loop, so two overrides of the same fields are
//! never active in parallel. They can nest: a wrapped entry point whose original calls
//! another wrapped entry point gets a second override on top of the first, and each
//! guard restores exactly what it saw. Truly concurrent callers are not supported.

mod harness;
mod interceptor;
mod wrap_registry;
#[cfg(test)]
mod tests;

pub use harness::{InterceptionHarness, OVERRIDDEN_FIELDS, PreCallHook, WrapOutcome};
pub use interceptor::{Interceptor, OverrideGuard};
pub use wrap_registry::{WrapKey, WrapRegistry};
