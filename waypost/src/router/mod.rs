//! Defines the Waypost `Router` and supporting types.
//!
//! A `Router` holds everything that outlives a single request: configuration, registered
//! controllers, hooks and the error handler. Each request is routed through a `Routing`, created by
//! `Router::start`, which owns the per-request `RouteState`. Route declarations are evaluated
//! immediately, in the order they are made, and the first route to handle the request wins.

pub mod error_router;
pub mod hooks;
pub mod route;
pub mod template;

use hyper::{Method, StatusCode};
use log::{debug, trace};

use crate::config::RouterConfig;
use crate::error::DispatchError;
use crate::handler::{Controller, ControllerSet};
use crate::request::RequestContext;
use crate::router::error_router::{ErrorHandler, ErrorRouter};
use crate::router::hooks::{HookChain, HookContext, HookResult};
use crate::router::route::dispatch::Dispatcher;
use crate::router::route::matcher::{
    match_path, AnyRouteMatcher, MethodOnlyRouteMatcher, RouteMatcher,
};
use crate::router::route::{DispatchTarget, RouteOptions};
use crate::router::template::PathTemplate;
use crate::state::{request_id, RouteResult, RouteState};

/// Long-lived routing configuration, shared by every request.
///
/// A `Router` is never mutated while requests are routed through it, so one instance may be shared
/// between threads, each request getting its own `Routing`.
///
/// # Examples
///
/// ```rust
/// # use waypost::handler::{Controller, HandlerResult};
/// # use waypost::request::Request;
/// # use waypost::router::route::RouteOptions;
/// # use waypost::router::Router;
/// # use waypost::{Arg, Method, RouterConfig, Signal};
/// struct UserController;
///
/// impl Controller for UserController {
///     fn methods(&self) -> &[&'static str] {
///         &["index", "edit"]
///     }
///
///     fn call(&mut self, method: &str, args: Vec<Arg>) -> HandlerResult {
///         assert_eq!(method, "edit");
///         assert_eq!(args, vec![Arg::Int(7)]);
///         Ok(Signal::Completed)
///     }
/// }
///
/// let mut router = Router::with_config(RouterConfig::default().with_default_method("index"));
/// router.controller("UserController", || Ok(UserController));
///
/// let request = Request::new(Method::GET, "/users/7/edit");
/// let mut routing = router.start(&request);
/// routing
///     .get("/users", "UserController", RouteOptions::new())
///     .unwrap();
///
/// assert!(routing.get_result());
/// assert_eq!(routing.method_name(), Some("edit"));
/// ```
#[derive(Debug, Default)]
pub struct Router {
    config: RouterConfig,
    hooks: HookChain,
    errors: ErrorRouter,
    controllers: ControllerSet,
}

impl Router {
    /// Creates a `Router` with the default configuration.
    pub fn new() -> Self {
        Router::default()
    }

    /// Creates a `Router` with the given configuration.
    pub fn with_config(config: RouterConfig) -> Self {
        Router {
            config,
            ..Router::default()
        }
    }

    /// The configuration of this `Router`.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Registers a controller under `name`. A fresh instance is created by `factory` for each
    /// dispatch to it.
    pub fn controller<N, F, C>(&mut self, name: N, factory: F) -> &mut Self
    where
        N: Into<String>,
        F: Fn() -> anyhow::Result<C> + Send + Sync + 'static,
        C: Controller + 'static,
    {
        self.controllers.register(name, factory);
        self
    }

    /// Appends a hook, run before every dispatch attempt.
    pub fn add_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&HookContext<'_>) -> HookResult + Send + Sync + 'static,
    {
        self.hooks.push(hook);
        self
    }

    /// Sets the handler invoked for status-coded handler failures: either a closure, through
    /// `ErrorHandler::callback`, or the name of a registered controller.
    pub fn http_error_handler<H>(&mut self, handler: H) -> &mut Self
    where
        H: Into<ErrorHandler>,
    {
        let handler = handler.into();
        trace!(" registering error handler {:?}", handler);
        self.errors.set(handler);
        self
    }

    /// Begins routing `request`, with a fresh `RouteState`.
    ///
    /// A final request path segment equal to the configured directory index is dropped.
    pub fn start<'r, R>(&'r self, request: &R) -> Routing<'r>
    where
        R: RequestContext + ?Sized,
    {
        Routing {
            router: self,
            state: RouteState::with_directory_index(
                request,
                self.config.default_method.as_deref(),
                self.config.directory_index(),
            ),
            prefixes: Vec::new(),
        }
    }
}

/// Attributes of a group of route declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupAttributes {
    prefix: Option<String>,
}

impl GroupAttributes {
    /// Prefixes every URI template declared inside the group with `prefix`.
    pub fn prefix<S>(prefix: S) -> Self
    where
        S: Into<String>,
    {
        GroupAttributes {
            prefix: Some(prefix.into()),
        }
    }
}

/// The route declaration surface for a single request.
///
/// Every declaration is evaluated as it is made. Once a route has handled the request, later
/// declarations are skipped without being matched.
pub struct Routing<'r> {
    router: &'r Router,
    state: RouteState,
    prefixes: Vec<String>,
}

impl<'r> Routing<'r> {
    /// Declares a route matching any request method.
    pub fn any<'a, T>(
        &mut self,
        uri: &str,
        target: T,
        options: RouteOptions,
    ) -> Result<(), DispatchError>
    where
        T: Into<DispatchTarget<'a>>,
    {
        self.declare(&AnyRouteMatcher::new(), uri, target.into(), options)
    }

    /// Declares a route matching `GET` requests.
    pub fn get<'a, T>(
        &mut self,
        uri: &str,
        target: T,
        options: RouteOptions,
    ) -> Result<(), DispatchError>
    where
        T: Into<DispatchTarget<'a>>,
    {
        self.matching(vec![Method::GET], uri, target, options)
    }

    /// Declares a route matching `POST` requests.
    pub fn post<'a, T>(
        &mut self,
        uri: &str,
        target: T,
        options: RouteOptions,
    ) -> Result<(), DispatchError>
    where
        T: Into<DispatchTarget<'a>>,
    {
        self.matching(vec![Method::POST], uri, target, options)
    }

    /// Declares a route matching `PUT` requests, including POST requests tunneling `PUT` through
    /// the `_method` form field.
    pub fn put<'a, T>(
        &mut self,
        uri: &str,
        target: T,
        options: RouteOptions,
    ) -> Result<(), DispatchError>
    where
        T: Into<DispatchTarget<'a>>,
    {
        self.matching(vec![Method::PUT], uri, target, options)
    }

    /// Declares a route matching `PATCH` requests.
    pub fn patch<'a, T>(
        &mut self,
        uri: &str,
        target: T,
        options: RouteOptions,
    ) -> Result<(), DispatchError>
    where
        T: Into<DispatchTarget<'a>>,
    {
        self.matching(vec![Method::PATCH], uri, target, options)
    }

    /// Declares a route matching `DELETE` requests.
    pub fn delete<'a, T>(
        &mut self,
        uri: &str,
        target: T,
        options: RouteOptions,
    ) -> Result<(), DispatchError>
    where
        T: Into<DispatchTarget<'a>>,
    {
        self.matching(vec![Method::DELETE], uri, target, options)
    }

    /// Declares a route matching `GET` and `POST` requests.
    pub fn get_post<'a, T>(
        &mut self,
        uri: &str,
        target: T,
        options: RouteOptions,
    ) -> Result<(), DispatchError>
    where
        T: Into<DispatchTarget<'a>>,
    {
        self.matching(vec![Method::GET, Method::POST], uri, target, options)
    }

    /// Declares a route matching any of `methods`.
    pub fn matching<'a, T>(
        &mut self,
        methods: Vec<Method>,
        uri: &str,
        target: T,
        options: RouteOptions,
    ) -> Result<(), DispatchError>
    where
        T: Into<DispatchTarget<'a>>,
    {
        let matcher = MethodOnlyRouteMatcher::new(methods);
        self.declare(&matcher, uri, target.into(), options)
    }

    /// Dispatches `target` without matching a URI template. Controller actions are inferred from
    /// the whole unconsumed request path.
    pub fn run<'a, T>(&mut self, target: T, options: RouteOptions) -> Result<(), DispatchError>
    where
        T: Into<DispatchTarget<'a>>,
    {
        if !self.state.is_pending() {
            trace!("[{}] request already routed, skipping run", request_id(&self.state));
            return Ok(());
        }

        self.dispatcher()
            .dispatch(&mut self.state, target.into(), &options, vec![])
    }

    /// Evaluates the declarations made by `f` beneath the prefix in `attributes`.
    ///
    /// The prefix is removed again when `f` returns, whether or not it succeeded.
    pub fn group<F>(&mut self, attributes: GroupAttributes, f: F) -> Result<(), DispatchError>
    where
        F: FnOnce(&mut Self) -> Result<(), DispatchError>,
    {
        let pushed = match attributes.prefix {
            Some(prefix) => {
                trace!("[{}] entering group `{}`", request_id(&self.state), prefix);
                self.prefixes.push(prefix);
                true
            }
            None => false,
        };

        let result = f(self);

        if pushed {
            self.prefixes.pop();
        }

        result
    }

    /// True once a route has handled the request.
    pub fn get_result(&self) -> bool {
        self.state.get_result()
    }

    /// The routing result, `Pending` until a route handles the request or `not_found` runs.
    pub fn result(&self) -> RouteResult {
        self.state.result()
    }

    /// The controller method resolved for this request, if any.
    pub fn method_name(&self) -> Option<&str> {
        self.state.resolved_method()
    }

    /// The per-request routing state.
    pub fn state(&self) -> &RouteState {
        &self.state
    }

    /// Runs `f` only when no route has handled the request.
    pub fn not_executed<F, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        if self.get_result() {
            None
        } else {
            Some(f())
        }
    }

    /// Runs `f` only when a route has handled the request.
    pub fn is_executed<F, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        if self.get_result() {
            Some(f())
        } else {
            None
        }
    }

    /// Ends routing when no route has handled the request: a `404 Not Found` is passed to the
    /// registered error handler and the request is marked `Unmatched`.
    pub fn not_found(&mut self) {
        if !self.state.is_pending() {
            return;
        }

        debug!("[{}] no route handled the request", request_id(&self.state));
        self.router
            .errors
            .route(&self.state, StatusCode::NOT_FOUND, &self.router.controllers);
        self.state.mark_unmatched();
    }

    /// Ends routing, returning the final result. A request no route handled is `Unmatched`.
    pub fn finish(mut self) -> RouteResult {
        self.state.mark_unmatched();
        self.state.result()
    }

    fn dispatcher(&self) -> Dispatcher<'r> {
        Dispatcher::new(
            &self.router.hooks,
            &self.router.errors,
            &self.router.controllers,
        )
    }

    fn declare<M>(
        &mut self,
        matcher: &M,
        uri: &str,
        target: DispatchTarget<'_>,
        options: RouteOptions,
    ) -> Result<(), DispatchError>
    where
        M: RouteMatcher,
    {
        if !self.state.is_pending() {
            trace!(
                "[{}] request already routed, skipping `{}`",
                request_id(&self.state),
                uri
            );
            return Ok(());
        }

        if !matcher.is_match(&self.state) {
            return Ok(());
        }

        let template = PathTemplate::compile(
            self.prefixes.as_slice(),
            uri,
            self.router.config.directory_index(),
        )?;

        let m = match match_path(&template, &self.state) {
            Some(m) => m,
            None => return Ok(()),
        };

        self.state.consume(&m.consumed);
        self.dispatcher()
            .dispatch(&mut self.state, target, &options, m.args)
    }
}
