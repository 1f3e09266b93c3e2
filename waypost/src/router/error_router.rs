//! Defines the `ErrorRouter`, which hands status-coded handler failures to the registered error
//! handler.

use std::fmt;

use hyper::StatusCode;
use log::{debug, error, trace};

use crate::handler::trap::trap;
use crate::handler::{ControllerSet, HandlerResult};
use crate::signal::Signal;
use crate::state::{request_id, RouteState};

/// Type alias for error handling closures.
pub type ErrorFn = Box<dyn Fn(StatusCode) -> HandlerResult + Send + Sync + 'static>;

/// The registered HTTP error handler.
pub enum ErrorHandler {
    /// A closure, invoked with the status code.
    Callback(ErrorFn),

    /// A registered controller. For a 404 its `Error404` method is invoked when declared,
    /// otherwise its `Error` method, in both cases with no arguments.
    Controller(String),
}

impl ErrorHandler {
    /// Wraps a closure as an `ErrorHandler`.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(StatusCode) -> HandlerResult + Send + Sync + 'static,
    {
        ErrorHandler::Callback(Box::new(f))
    }
}

impl From<&str> for ErrorHandler {
    fn from(name: &str) -> Self {
        ErrorHandler::Controller(name.to_owned())
    }
}

impl From<String> for ErrorHandler {
    fn from(name: String) -> Self {
        ErrorHandler::Controller(name)
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorHandler::Callback(_) => f.write_str("Callback"),
            ErrorHandler::Controller(name) => f.debug_tuple("Controller").field(name).finish(),
        }
    }
}

/// Holds at most one `ErrorHandler`.
///
/// Failures of the error handler itself are logged and never propagate.
#[derive(Debug, Default)]
pub struct ErrorRouter {
    handler: Option<ErrorHandler>,
}

impl ErrorRouter {
    /// Creates an `ErrorRouter` with no handler.
    pub fn new() -> Self {
        ErrorRouter::default()
    }

    /// Replaces the registered handler.
    pub fn set(&mut self, handler: ErrorHandler) {
        self.handler = Some(handler);
    }

    /// Invokes the registered handler for `status`.
    pub fn route(&self, state: &RouteState, status: StatusCode, controllers: &ControllerSet) {
        let handler = match self.handler {
            Some(ref handler) => handler,
            None => {
                debug!(
                    "[{}] no error handler registered for {}",
                    request_id(state),
                    status
                );
                return;
            }
        };

        trace!("[{}] routing {} to {:?}", request_id(state), status, handler);

        let outcome = match handler {
            ErrorHandler::Callback(f) => trap(|| f(status)),
            ErrorHandler::Controller(name) => {
                let factory = match controllers.get(name) {
                    Some(factory) => factory,
                    None => {
                        error!(
                            "[{}] error handler controller `{}` is not registered",
                            request_id(state),
                            name
                        );
                        return;
                    }
                };

                trap(|| -> HandlerResult {
                    let mut controller = factory()?;
                    let coded = format!("Error{}", status.as_u16());
                    let method = if controller.responds_to(&coded) {
                        coded
                    } else if controller.responds_to("Error") {
                        "Error".to_owned()
                    } else {
                        debug!(
                            "[{}] `{}` has no error method for {}",
                            request_id(state),
                            name,
                            status
                        );
                        return Ok(Signal::Completed);
                    };
                    trace!("[{}] invoking {}@{}", request_id(state), name, method);
                    controller.call(&method, vec![])
                })
            }
        };

        match outcome {
            Ok(Ok(_)) => (),
            Ok(Err(e)) => error!(
                "[{}] error handler for {} failed: {:#}",
                request_id(state),
                status,
                e.cause()
            ),
            Err(panic) => error!(
                "[{}] error handler for {} panicked: {}",
                request_id(state),
                status,
                panic
            ),
        }
    }
}
