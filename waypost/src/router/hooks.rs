//! Defines the `HookChain`, run before every dispatch attempt.
//!
//! Hooks see the routing state, the target controller and method (`None` for closures) and the
//! arguments about to be passed. The first hook to return `Continue` or `Stop` decides the
//! attempt; a hook which fails or panics stops it. When no hook decides, dispatch continues.

use std::fmt;

use log::{debug, trace, warn};

use crate::extractor::Arg;
use crate::handler::trap::trap;
use crate::signal::Signal;
use crate::state::{request_id, RouteState};

/// What a hook is told about the dispatch attempt it guards.
#[derive(Debug)]
pub struct HookContext<'a> {
    /// The routing state of the current request.
    pub state: &'a RouteState,
    /// The controller about to be invoked, `None` for closure targets.
    pub controller: Option<&'a str>,
    /// The controller method about to be invoked, `None` for closure targets.
    pub method: Option<&'a str>,
    /// The arguments about to be passed.
    pub args: &'a [Arg],
}

/// The result of a hook: `Some(Continue)` or `Some(Stop)` decide the chain, anything else
/// defers to the next hook. An `Err` stops the attempt.
pub type HookResult = anyhow::Result<Option<Signal>>;

/// Type alias for hook functions.
pub type HookFn = Box<dyn Fn(&HookContext<'_>) -> HookResult + Send + Sync + 'static>;

/// Ordered pre-dispatch hooks.
#[derive(Default)]
pub struct HookChain {
    hooks: Vec<HookFn>,
}

impl HookChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        HookChain::default()
    }

    /// Appends a hook to the chain.
    pub fn push<F>(&mut self, hook: F)
    where
        F: Fn(&HookContext<'_>) -> HookResult + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Runs the chain from its first hook and returns either `Continue` or `Stop`.
    pub fn evaluate(&self, ctx: &HookContext<'_>) -> Signal {
        let id = request_id(ctx.state);

        for (index, hook) in self.hooks.iter().enumerate() {
            match trap(|| hook(ctx)) {
                Ok(Ok(Some(signal))) if signal.is_hook_signal() => {
                    debug!("[{}] hook #{} returned {}", id, index, signal);
                    return signal;
                }
                Ok(Ok(Some(signal))) => {
                    trace!(
                        "[{}] hook #{} returned {}, which does not steer hooks",
                        id,
                        index,
                        signal
                    );
                }
                Ok(Ok(None)) => trace!("[{}] hook #{} deferred", id, index),
                Ok(Err(e)) => {
                    warn!("[{}] hook #{} failed, stopping: {:#}", id, index, e);
                    return Signal::Stop;
                }
                Err(panic) => {
                    warn!("[{}] hook #{} panicked, stopping: {}", id, index, panic);
                    return Signal::Stop;
                }
            }
        }

        Signal::Continue
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use hyper::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn evaluate(chain: &HookChain) -> Signal {
        let state = RouteState::new(&Request::new(Method::GET, "/"), None);
        let ctx = HookContext {
            state: &state,
            controller: Some("Users"),
            method: Some("show"),
            args: &[Arg::Int(1)],
        };
        chain.evaluate(&ctx)
    }

    fn counting(
        counter: &Arc<AtomicUsize>,
        result: Option<Signal>,
    ) -> impl Fn(&HookContext<'_>) -> HookResult + Send + Sync + 'static {
        let counter = counter.clone();
        move |_ctx: &HookContext<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(result)
        }
    }

    #[test]
    fn empty_chain_continues() {
        assert_eq!(evaluate(&HookChain::new()), Signal::Continue);
    }

    #[test]
    fn first_recognised_signal_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut chain = HookChain::new();
        chain.push(counting(&calls, None));
        chain.push(counting(&calls, Some(Signal::Stop)));
        chain.push(counting(&calls, Some(Signal::Continue)));

        assert_eq!(evaluate(&chain), Signal::Stop);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unrecognised_signals_defer() {
        let mut chain = HookChain::new();
        chain.push(|_ctx: &HookContext<'_>| Ok(Some(Signal::Completed)));
        chain.push(|_ctx: &HookContext<'_>| Ok(Some(Signal::IgnoreProcess)));
        assert_eq!(evaluate(&chain), Signal::Continue);
    }

    #[test]
    fn failures_stop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut chain = HookChain::new();
        chain.push(|_ctx: &HookContext<'_>| Err(anyhow::anyhow!("not authorised")));
        chain.push(counting(&calls, Some(Signal::Continue)));

        assert_eq!(evaluate(&chain), Signal::Stop);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panics_stop() {
        let mut chain = HookChain::new();
        chain.push(|_ctx: &HookContext<'_>| -> HookResult { panic!("hook exploded") });
        assert_eq!(evaluate(&chain), Signal::Stop);
    }

    #[test]
    fn hooks_see_the_attempt() {
        let mut chain = HookChain::new();
        chain.push(|ctx: &HookContext<'_>| {
            assert_eq!(ctx.controller, Some("Users"));
            assert_eq!(ctx.method, Some("show"));
            assert_eq!(ctx.args, &[Arg::Int(1)]);
            Ok(None)
        });
        assert_eq!(evaluate(&chain), Signal::Continue);
    }
}
