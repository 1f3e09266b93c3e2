//! Defines types for Waypost handlers.
//!
//! A route dispatches to either a closure (a `Callback`) or a method of a named `Controller`.
//! Both produce a `HandlerResult`: a `Signal` on success, or a `HandlerError` which may carry a
//! HTTP status code for the `ErrorRouter`.

mod error;
pub(crate) mod trap;

use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::extractor::Arg;
use crate::signal::Signal;

pub use self::error::{HandlerError, MapHandlerError};

/// The result of invoking a handler.
pub type HandlerResult = Result<Signal, HandlerError>;

/// A closure dispatch target. It is invoked at most once, with the extracted arguments.
pub struct Callback<'a> {
    f: Box<dyn FnOnce(Vec<Arg>) -> HandlerResult + 'a>,
}

impl<'a> Callback<'a> {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Vec<Arg>) -> HandlerResult + 'a,
    {
        Callback { f: Box::new(f) }
    }

    pub(crate) fn call(self, args: Vec<Arg>) -> HandlerResult {
        (self.f)(args)
    }
}

impl<'a> fmt::Debug for Callback<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// A named group of handler methods, dispatched to by method name.
///
/// The set of methods a controller implements is declared up front through `methods`, which is
/// what conventional action detection and error-handler lookup consult.
///
/// ```rust
/// # use waypost::handler::{Controller, HandlerError, HandlerResult};
/// # use waypost::{Arg, Signal};
/// #[derive(Default)]
/// struct UserController {
///     shown: Vec<i64>,
/// }
///
/// impl Controller for UserController {
///     fn methods(&self) -> &[&'static str] {
///         &["index", "show"]
///     }
///
///     fn call(&mut self, method: &str, args: Vec<Arg>) -> HandlerResult {
///         match method {
///             "index" => Ok(Signal::Completed),
///             "show" => {
///                 self.shown.extend(args.iter().filter_map(Arg::as_int));
///                 Ok(Signal::Completed)
///             }
///             _ => Err(HandlerError::not_found()),
///         }
///     }
/// }
///
/// assert!(UserController::default().responds_to("show"));
/// assert!(!UserController::default().responds_to("destroy"));
/// ```
pub trait Controller {
    /// The names of the methods this controller implements.
    fn methods(&self) -> &[&'static str];

    /// Invokes `method` with `args`. Only called with names listed by `methods`.
    fn call(&mut self, method: &str, args: Vec<Arg>) -> HandlerResult;

    /// True when `method` is listed by `methods`.
    fn responds_to(&self, method: &str) -> bool {
        self.methods().iter().any(|m| *m == method)
    }
}

/// Creates a fresh controller instance for each dispatch.
pub type ControllerFactory =
    Box<dyn Fn() -> anyhow::Result<Box<dyn Controller>> + Send + Sync + 'static>;

/// The controllers known to a `Router`, by name.
#[derive(Default)]
pub struct ControllerSet {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        ControllerSet::default()
    }

    /// Registers `factory` under `name`, replacing any earlier registration.
    pub fn register<N, F, C>(&mut self, name: N, factory: F)
    where
        N: Into<String>,
        F: Fn() -> anyhow::Result<C> + Send + Sync + 'static,
        C: Controller + 'static,
    {
        let name = name.into();
        trace!(" registering controller `{}`", name);
        self.factories.insert(
            name,
            Box::new(move || factory().map(|c| Box::new(c) as Box<dyn Controller>)),
        );
    }

    /// Looks up the factory registered under `name`.
    pub fn get(&self, name: &str) -> Option<&ControllerFactory> {
        self.factories.get(name)
    }
}

impl fmt::Debug for ControllerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ControllerSet")
            .field("controllers", &names)
            .finish()
    }
}
