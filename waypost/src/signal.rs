//! Defines the `Signal` values used to steer dispatch continuation.

use std::fmt;

/// Control values returned by hooks and handlers.
///
/// Hooks may only steer the chain with `Continue` or `Stop`; any other value returned by a hook is
/// not recognised and evaluation moves on to the next hook. Handlers return a `Signal` on success,
/// where `IgnoreProcess` asks the `Router` to treat the route as a soft miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Proceed with dispatch.
    Continue,

    /// The handler completed its work.
    Completed,

    /// Halt the current dispatch attempt. No further hooks run and the handler is not invoked.
    Stop,

    /// The handler declined the request. The request stays unhandled and later route declarations
    /// may still attempt a match.
    IgnoreProcess,
}

impl Signal {
    /// True for the values a hook may use to decide the outcome of the hook chain.
    pub fn is_hook_signal(self) -> bool {
        matches!(self, Signal::Continue | Signal::Stop)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Continue => "continue",
            Signal::Completed => "completed",
            Signal::Stop => "stop",
            Signal::IgnoreProcess => "ignore-process",
        };
        f.write_str(s)
    }
}
