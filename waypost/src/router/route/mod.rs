//! Defines the dispatch targets of route declarations, and their options.

pub mod dispatch;
pub mod matcher;

use std::fmt;

use crate::extractor::Arg;
use crate::handler::{Callback, HandlerResult};

/// What a route invokes once it matches.
pub enum DispatchTarget<'a> {
    /// A closure, invoked with the extracted arguments.
    Callback(Callback<'a>),

    /// A method of a controller registered with the `Router`. When `method` is `None` the action
    /// is inferred from the unconsumed trailing request path segments.
    Controller {
        /// Registered controller name.
        name: String,
        /// Explicit method name.
        method: Option<String>,
    },
}

impl<'a> DispatchTarget<'a> {
    /// Targets a controller, leaving the action to be inferred per request.
    pub fn controller<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        DispatchTarget::Controller {
            name: name.into(),
            method: None,
        }
    }

    /// Targets an explicit controller method.
    pub fn method<N, M>(name: N, method: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        DispatchTarget::Controller {
            name: name.into(),
            method: Some(method.into()),
        }
    }
}

/// Wraps a closure as a `DispatchTarget`.
///
/// ```rust
/// # use waypost::router::route::callback;
/// # use waypost::Signal;
/// let target = callback(|args| {
///     assert!(args.is_empty());
///     Ok(Signal::Completed)
/// });
/// # drop(target);
/// ```
pub fn callback<'a, F>(f: F) -> DispatchTarget<'a>
where
    F: FnOnce(Vec<Arg>) -> HandlerResult + 'a,
{
    DispatchTarget::Callback(Callback::new(f))
}

/// Parses `"Name@method"`. A missing or blank method leaves the action to be inferred.
impl<'a> From<&str> for DispatchTarget<'a> {
    fn from(target: &str) -> Self {
        let mut parts = target.splitn(2, '@');
        let name = parts.next().unwrap_or("").trim();
        let method = parts
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned);

        DispatchTarget::Controller {
            name: name.to_owned(),
            method,
        }
    }
}

impl<'a> From<String> for DispatchTarget<'a> {
    fn from(target: String) -> Self {
        DispatchTarget::from(target.as_str())
    }
}

impl<'a> From<Callback<'a>> for DispatchTarget<'a> {
    fn from(callback: Callback<'a>) -> Self {
        DispatchTarget::Callback(callback)
    }
}

impl<'a> fmt::Debug for DispatchTarget<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchTarget::Callback(_) => f.write_str("Callback"),
            DispatchTarget::Controller { name, method } => match method {
                Some(method) => write!(f, "{}@{}", name, method),
                None => f.write_str(name),
            },
        }
    }
}

/// Per-declaration filters applied to the resolved controller action.
///
/// A method listed in `except`, or missing from a present `only` list, is replaced by the
/// configured default method.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteOptions {
    except: Option<Vec<String>>,
    only: Option<Vec<String>>,
}

impl RouteOptions {
    /// Options with no filters.
    pub fn new() -> Self {
        RouteOptions::default()
    }

    /// Excludes the given methods.
    pub fn except<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts dispatch to the given methods.
    pub fn only<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    /// True when the filters allow `method`.
    pub fn permits(&self, method: &str) -> bool {
        let excluded = self
            .except
            .as_ref()
            .map_or(false, |e| e.iter().any(|m| m == method));
        let included = self
            .only
            .as_ref()
            .map_or(true, |o| o.iter().any(|m| m == method));
        !excluded && included
    }
}

/// The conventional controller actions inferred from trailing request path segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// No trailing segments: `/users`.
    Index,
    /// `/users/create`.
    Create,
    /// `/users/store`.
    Store,
    /// `/users/{id}/show`.
    Show,
    /// `/users/{id}/edit`.
    Edit,
    /// `/users/{id}/update`.
    Update,
    /// `/users/{id}/destroy`.
    Destroy,
}

impl Action {
    /// Maps the final trailing segment to the action it names, excluding `Index`.
    pub fn from_token(token: &str) -> Option<Action> {
        match token {
            "create" => Some(Action::Create),
            "store" => Some(Action::Store),
            "show" => Some(Action::Show),
            "edit" => Some(Action::Edit),
            "update" => Some(Action::Update),
            "destroy" => Some(Action::Destroy),
            _ => None,
        }
    }

    /// The controller method name for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::Create => "create",
            Action::Store => "store",
            Action::Show => "show",
            Action::Edit => "edit",
            Action::Update => "update",
            Action::Destroy => "destroy",
        }
    }

    /// True for the actions keyed by a numeric segment preceding the action token.
    pub fn is_keyed(self) -> bool {
        matches!(
            self,
            Action::Show | Action::Edit | Action::Update | Action::Destroy
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
