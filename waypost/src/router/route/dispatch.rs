//! Defines the `Dispatcher`, which resolves the handler of a matched route and invokes it.

use log::{debug, error, trace};

use crate::error::DispatchError;
use crate::extractor::Arg;
use crate::handler::trap::trap;
use crate::handler::{Callback, Controller, ControllerSet, HandlerError};
use crate::helpers::num::is_numeric;
use crate::router::error_router::ErrorRouter;
use crate::router::hooks::{HookChain, HookContext};
use crate::router::route::{Action, DispatchTarget, RouteOptions};
use crate::signal::Signal;
use crate::state::{request_id, RouteState};

/// An action inferred from the unconsumed trailing request path segments.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedAction {
    /// The conventional action.
    pub action: Action,
    /// Trailing segments the action accounts for.
    pub consumes: usize,
    /// The key preceding a keyed action token, appended to the handler arguments.
    pub key: Option<Arg>,
}

/// Infers the conventional action named by `trailing`, the unconsumed request path segments.
///
/// ```rust
/// # use waypost::router::route::dispatch::detect;
/// # use waypost::router::route::Action;
/// # use waypost::Arg;
/// assert_eq!(detect(&[]).unwrap().action, Action::Index);
/// assert_eq!(detect(&["create"]).unwrap().action, Action::Create);
///
/// let edit = detect(&["7", "edit"]).unwrap();
/// assert_eq!(edit.action, Action::Edit);
/// assert_eq!(edit.consumes, 2);
/// assert_eq!(edit.key, Some(Arg::Int(7)));
///
/// assert!(detect(&["drafts", "edit"]).is_none());
/// ```
pub fn detect(trailing: &[&str]) -> Option<DetectedAction> {
    let last = match trailing.last() {
        Some(last) => *last,
        None => {
            return Some(DetectedAction {
                action: Action::Index,
                consumes: 0,
                key: None,
            })
        }
    };

    let action = Action::from_token(last)?;
    if !action.is_keyed() {
        return Some(DetectedAction {
            action,
            consumes: 1,
            key: None,
        });
    }

    let key = trailing
        .len()
        .checked_sub(2)
        .map(|i| trailing[i])
        .filter(|k| is_numeric(k))?;

    Some(DetectedAction {
        action,
        consumes: 2,
        key: Some(match key.parse::<i64>() {
            Ok(k) => Arg::Int(k),
            Err(_) => Arg::from(key),
        }),
    })
}

/// Invokes the target of a matched route against the per-request `RouteState`.
pub(crate) struct Dispatcher<'r> {
    hooks: &'r HookChain,
    errors: &'r ErrorRouter,
    controllers: &'r ControllerSet,
}

impl<'r> Dispatcher<'r> {
    pub(crate) fn new(
        hooks: &'r HookChain,
        errors: &'r ErrorRouter,
        controllers: &'r ControllerSet,
    ) -> Self {
        Dispatcher {
            hooks,
            errors,
            controllers,
        }
    }

    /// Dispatches `target` with the extracted `args`.
    ///
    /// On return the state is `Matched` when the route handled the request, and still `Pending`
    /// when it did not (a hook stopped it, no action was resolved, or the handler asked to be
    /// ignored). A controller action outside the declared method set leaves the state `Matched`
    /// and is returned as `DispatchError::ActionNotImplemented`.
    pub(crate) fn dispatch(
        &self,
        state: &mut RouteState,
        target: DispatchTarget<'_>,
        options: &RouteOptions,
        args: Vec<Arg>,
    ) -> Result<(), DispatchError> {
        match target {
            DispatchTarget::Callback(callback) => self.dispatch_callback(state, callback, args),
            DispatchTarget::Controller { name, method } => {
                self.dispatch_controller(state, &name, method, options, args)
            }
        }
    }

    fn dispatch_callback(
        &self,
        state: &mut RouteState,
        callback: Callback<'_>,
        args: Vec<Arg>,
    ) -> Result<(), DispatchError> {
        let ctx = HookContext {
            state: &*state,
            controller: None,
            method: None,
            args: &args,
        };
        if self.hooks.evaluate(&ctx) == Signal::Stop {
            debug!("[{}] dispatch of callback stopped by hook", request_id(state));
            return Ok(());
        }

        match trap(|| callback.call(args)) {
            Ok(Ok(signal)) => {
                self.settle(state, signal);
                Ok(())
            }
            Ok(Err(e)) => match e.status() {
                Some(status) => {
                    error!(
                        "[{}] callback failed with status {}: {:#}",
                        request_id(state),
                        status,
                        e.cause()
                    );
                    state.mark_matched();
                    self.errors.route(state, status, self.controllers);
                    Ok(())
                }
                None => {
                    error!("[{}] callback failed: {:#}", request_id(state), e.cause());
                    Err(DispatchError::Handler(e.into_cause()))
                }
            },
            Err(panic) => {
                error!("[{}] callback panicked: {}", request_id(state), panic);
                Err(DispatchError::Panic(panic))
            }
        }
    }

    fn dispatch_controller(
        &self,
        state: &mut RouteState,
        name: &str,
        explicit: Option<String>,
        options: &RouteOptions,
        mut args: Vec<Arg>,
    ) -> Result<(), DispatchError> {
        let factory = self
            .controllers
            .get(name)
            .ok_or_else(|| DispatchError::UnknownController(name.to_owned()))?;

        let mut controller = match trap(|| factory()) {
            Ok(Ok(controller)) => controller,
            Ok(Err(cause)) => {
                return Err(DispatchError::ControllerInit {
                    name: name.to_owned(),
                    cause,
                })
            }
            Err(panic) => {
                return Err(DispatchError::ControllerInit {
                    name: name.to_owned(),
                    cause: anyhow::anyhow!("factory panicked: {}", panic),
                })
            }
        };

        let (method, detected) = resolve(state, &*controller, explicit, options);

        let method = match method {
            Some(method) => method,
            None => {
                debug!(
                    "[{}] no action resolved for controller `{}`",
                    request_id(state),
                    name
                );
                return Ok(());
            }
        };

        let consumes = match detected {
            Some(detected) => {
                trace!(
                    "[{}] inferred action `{}` from {} trailing segment(s)",
                    request_id(state),
                    detected.action,
                    detected.consumes
                );
                args.extend(detected.key);
                detected.consumes
            }
            None => 0,
        };

        let ctx = HookContext {
            state: &*state,
            controller: Some(name),
            method: Some(method.as_str()),
            args: &args,
        };
        if self.hooks.evaluate(&ctx) == Signal::Stop {
            debug!(
                "[{}] dispatch of {}@{} stopped by hook",
                request_id(state),
                name,
                method
            );
            return Ok(());
        }

        state.consume_trailing(consumes);
        state.set_resolved_method(&method);

        if !controller.responds_to(&method) {
            let e = DispatchError::ActionNotImplemented {
                controller: name.to_owned(),
                action: method,
            };
            error!("[{}] {}", request_id(state), e);
            state.mark_matched();
            return Err(e);
        }

        trace!("[{}] invoking {}@{}", request_id(state), name, method);
        match trap(|| controller.call(&method, args)) {
            Ok(Ok(signal)) => self.settle(state, signal),
            Ok(Err(e)) => self.fail(state, name, &method, e),
            Err(panic) => {
                error!(
                    "[{}] {}@{} panicked: {}",
                    request_id(state),
                    name,
                    method,
                    panic
                );
                state.mark_matched();
            }
        }

        Ok(())
    }

    fn settle(&self, state: &mut RouteState, signal: Signal) {
        if signal == Signal::IgnoreProcess {
            debug!(
                "[{}] handler ignored the request, routing continues",
                request_id(state)
            );
        } else {
            state.mark_matched();
        }
    }

    fn fail(&self, state: &mut RouteState, name: &str, method: &str, e: HandlerError) {
        error!(
            "[{}] {}@{} failed: {:#}",
            request_id(state),
            name,
            method,
            e.cause()
        );
        state.mark_matched();

        if let Some(status) = e.status() {
            self.errors.route(state, status, self.controllers);
        }
    }
}

/// Resolves the controller method to invoke, and the detected action to commit if any.
fn resolve(
    state: &RouteState,
    controller: &dyn Controller,
    explicit: Option<String>,
    options: &RouteOptions,
) -> (Option<String>, Option<DetectedAction>) {
    let default = || {
        state
            .resolved_method()
            .filter(|m| controller.responds_to(m))
            .map(str::to_owned)
    };

    let (method, detected) = match explicit {
        Some(method) => (Some(method), None),
        None => match detect(&state.remaining_segments()) {
            Some(d) if d.action == Action::Index || controller.responds_to(d.action.as_str()) => {
                (Some(d.action.as_str().to_owned()), Some(d))
            }
            _ => (default(), None),
        },
    };

    match method {
        Some(m) if !options.permits(&m) => {
            trace!(
                "[{}] `{}` filtered out, reverting to default method",
                request_id(state),
                m
            );
            (state.resolved_method().map(str::to_owned), None)
        }
        method => (method, detected),
    }
}
