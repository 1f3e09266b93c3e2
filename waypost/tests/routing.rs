//! End to end routing of requests through a `Router`.

use std::sync::{Arc, Mutex};

use waypost::error::DispatchError;
use waypost::handler::{Controller, HandlerError, HandlerResult};
use waypost::request::Request;
use waypost::router::hooks::HookContext;
use waypost::router::route::{callback, DispatchTarget, RouteOptions};
use waypost::router::{GroupAttributes, Router};
use waypost::state::RouteResult;
use waypost::{Arg, Method, RouterConfig, Signal, StatusCode};

type Log = Arc<Mutex<Vec<String>>>;

struct UserController {
    log: Log,
}

impl Controller for UserController {
    fn methods(&self) -> &[&'static str] {
        &[
            "index", "create", "store", "show", "edit", "update", "destroy", "missing",
        ]
    }

    fn call(&mut self, method: &str, args: Vec<Arg>) -> HandlerResult {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        self.log
            .lock()
            .unwrap()
            .push(format!("UserController@{}({})", method, args.join(",")));

        match method {
            "missing" => Err(HandlerError::not_found()),
            _ => Ok(Signal::Completed),
        }
    }
}

struct ErrorController {
    log: Log,
}

impl Controller for ErrorController {
    fn methods(&self) -> &[&'static str] {
        &["Error", "Error404"]
    }

    fn call(&mut self, method: &str, _args: Vec<Arg>) -> HandlerResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("ErrorController@{}", method));
        Ok(Signal::Completed)
    }
}

fn router(log: &Log) -> Router {
    let mut router = Router::with_config(RouterConfig::default().with_default_method("index"));

    let users = log.clone();
    router.controller("UserController", move || {
        Ok(UserController { log: users.clone() })
    });

    let errors = log.clone();
    router.controller("ErrorController", move || {
        Ok(ErrorController {
            log: errors.clone(),
        })
    });
    router.http_error_handler("ErrorController");

    router
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn capture<'a>(into: &'a mut Option<Vec<Arg>>) -> DispatchTarget<'a> {
    callback(move |args| {
        *into = Some(args);
        Ok(Signal::Completed)
    })
}

#[test]
fn root_template_matches_root_request() {
    let router = Router::new();
    let request = Request::new(Method::GET, "/");
    let mut routing = router.start(&request);

    let mut args = None;
    routing
        .get("/", capture(&mut args), RouteOptions::new())
        .unwrap();

    assert_eq!(args, Some(vec![]));
    assert!(routing.get_result());
}

#[test]
fn typed_variables_are_coerced_permissively() {
    let router = Router::new();

    for (path, expected) in &[("/users/42", 42), ("/users/abc", 0)] {
        let request = Request::new(Method::GET, path);
        let mut routing = router.start(&request);

        let mut args = None;
        routing
            .get("/users/{id:int}", capture(&mut args), RouteOptions::new())
            .unwrap();

        assert_eq!(args, Some(vec![Arg::Int(*expected)]));
        assert!(routing.get_result());
    }
}

#[test]
fn missing_optional_variable_is_null() {
    let router = Router::new();
    let request = Request::new(Method::GET, "/posts");
    let mut routing = router.start(&request);

    let mut args = None;
    routing
        .get("/posts/{slug?}", capture(&mut args), RouteOptions::new())
        .unwrap();

    assert_eq!(args, Some(vec![Arg::Null]));
}

#[test]
fn matched_request_skips_later_declarations() {
    let log = Log::default();
    let router = router(&log);
    let request = Request::new(Method::GET, "/users/create");
    let mut routing = router.start(&request);

    let mut first = None;
    routing
        .any("/users/{action}", capture(&mut first), RouteOptions::new())
        .unwrap();
    assert!(routing.get_result());

    let mut later = None;
    routing
        .get("/users/{action}", capture(&mut later), RouteOptions::new())
        .unwrap();
    routing
        .post("/users/{action}", capture(&mut later), RouteOptions::new())
        .unwrap();
    routing
        .any("/users", "UserController", RouteOptions::new())
        .unwrap();

    assert_eq!(first, Some(vec![Arg::from("create")]));
    assert_eq!(later, None);
    assert!(entries(&log).is_empty());
}

#[test]
fn ignore_process_lets_a_later_route_match() {
    let router = Router::new();
    let request = Request::new(Method::GET, "/blog/2021/archive");
    let mut routing = router.start(&request);

    routing
        .get(
            "/blog/{year:int}",
            callback(|_| Ok(Signal::IgnoreProcess)),
            RouteOptions::new(),
        )
        .unwrap();
    assert!(!routing.get_result());
    assert_eq!(routing.result(), RouteResult::Pending);
    assert_eq!(routing.state().remaining_segments(), vec!["archive"]);

    // positions 0 and 1 were consumed by the soft miss
    let mut args = None;
    routing
        .get("/blog/{year}/archive", capture(&mut args), RouteOptions::new())
        .unwrap();
    assert_eq!(args, None);

    routing
        .get("/{a?}/{b?}/archive", capture(&mut args), RouteOptions::new())
        .unwrap();
    assert_eq!(args, Some(vec![Arg::Null, Arg::Null]));
    assert!(routing.get_result());
}

#[test]
fn controller_infers_create() {
    let log = Log::default();
    let router = router(&log);
    let request = Request::new(Method::GET, "/users/create");
    let mut routing = router.start(&request);

    routing
        .get("/users", "UserController", RouteOptions::new())
        .unwrap();

    assert_eq!(entries(&log), vec!["UserController@create()"]);
    assert_eq!(routing.method_name(), Some("create"));
    assert_eq!(routing.state().remaining_len(), 0);
    assert!(routing.get_result());
}

#[test]
fn controller_infers_keyed_edit() {
    let log = Log::default();
    let router = router(&log);
    let request = Request::new(Method::GET, "/users/7/edit");
    let mut routing = router.start(&request);

    routing
        .get("/users", "UserController", RouteOptions::new())
        .unwrap();

    assert_eq!(entries(&log), vec!["UserController@edit(7)"]);
    assert_eq!(routing.method_name(), Some("edit"));
}

#[test]
fn controller_index_and_filters() {
    let log = Log::default();
    let router = router(&log);

    let request = Request::new(Method::GET, "/users");
    let mut routing = router.start(&request);
    routing
        .get("/users", "UserController", RouteOptions::new())
        .unwrap();

    let request = Request::new(Method::POST, "/users/3/destroy");
    let mut routing = router.start(&request);
    routing
        .post(
            "/users",
            "UserController",
            RouteOptions::new().only(vec!["index", "show"]),
        )
        .unwrap();

    assert_eq!(
        entries(&log),
        vec!["UserController@index()", "UserController@index()"]
    );
    assert!(routing.get_result());
}

#[test]
fn hook_stop_prevents_invocation() {
    let log = Log::default();
    let mut router = router(&log);
    router.add_hook(|ctx: &HookContext<'_>| {
        if ctx.method == Some("destroy") {
            Ok(Some(Signal::Stop))
        } else {
            Ok(None)
        }
    });

    let request = Request::new(Method::POST, "/users/9/destroy").with_form_method("delete");
    let mut routing = router.start(&request);
    routing
        .delete("/users", "UserController", RouteOptions::new())
        .unwrap();

    assert!(entries(&log).is_empty());
    assert!(!routing.get_result());
    assert_eq!(routing.state().remaining_segments(), vec!["9", "destroy"]);

    // only `/users` was consumed, the inferred `9/destroy` is still routable
    let mut args = None;
    routing
        .any("/{x?}/{id}/destroy", capture(&mut args), RouteOptions::new())
        .unwrap();
    assert_eq!(args, Some(vec![Arg::Null, Arg::from("9")]));
    assert!(routing.get_result());
}

#[test]
fn hooks_run_once_per_dispatch_attempt() {
    let attempts = Arc::new(Mutex::new(0));
    let counter = attempts.clone();
    let mut router = Router::new();
    router.add_hook(move |_ctx: &HookContext<'_>| {
        *counter.lock().unwrap() += 1;
        Ok(Some(Signal::Continue))
    });

    let request = Request::new(Method::GET, "/a/b");
    let mut routing = router.start(&request);
    routing
        .get("/a", callback(|_| Ok(Signal::IgnoreProcess)), RouteOptions::new())
        .unwrap();
    routing
        .get("/x", callback(|_| Ok(Signal::Completed)), RouteOptions::new())
        .unwrap();
    routing
        .run(callback(|_| Ok(Signal::Completed)), RouteOptions::new())
        .unwrap();

    assert_eq!(*attempts.lock().unwrap(), 2);
    assert!(routing.get_result());
}

#[test]
fn not_found_status_reaches_error_controller() {
    let log = Log::default();
    let router = router(&log);
    let request = Request::new(Method::GET, "/users/missing");
    let mut routing = router.start(&request);

    routing
        .get("/users", "UserController@missing", RouteOptions::new())
        .unwrap();

    assert_eq!(
        entries(&log),
        vec!["UserController@missing()", "ErrorController@Error404"]
    );
    assert!(routing.get_result());
}

#[test]
fn unrouted_request_falls_through_to_not_found() {
    let log = Log::default();
    let router = router(&log);
    let request = Request::new(Method::GET, "/nowhere/index.php?x=1");
    let mut routing = router.start(&request);

    routing
        .get("/somewhere", "UserController", RouteOptions::new())
        .unwrap();
    assert_eq!(routing.not_executed(|| "fallback"), Some("fallback"));

    routing.not_found();
    assert_eq!(entries(&log), vec!["ErrorController@Error404"]);
    assert_eq!(routing.finish(), RouteResult::Unmatched);
}

#[test]
fn groups_scope_their_prefix() {
    let router = Router::new();
    let request = Request::new(Method::GET, "/api/v1/users/5");
    let mut routing = router.start(&request);

    let mut args = None;
    routing
        .group(GroupAttributes::prefix("/api"), |r| {
            r.group(GroupAttributes::prefix("/v1"), |r| {
                r.get("/users/{id:int}", capture(&mut args), RouteOptions::new())
            })
        })
        .unwrap();

    assert_eq!(args, Some(vec![Arg::Int(5)]));
}

#[test]
fn host_visible_failures() {
    let router = Router::new();
    let request = Request::new(Method::GET, "/users");

    let mut routing = router.start(&request);
    match routing.get("/users", "NoSuchController", RouteOptions::new()) {
        Err(DispatchError::UnknownController(name)) => assert_eq!(name, "NoSuchController"),
        other => panic!("unexpected result: {:?}", other),
    }

    let mut routing = router.start(&request);
    let failing = callback(|_| Err(HandlerError::from(anyhow::anyhow!("database offline"))));
    match routing.get("/users", failing, RouteOptions::new()) {
        Err(DispatchError::Handler(cause)) => assert_eq!(cause.to_string(), "database offline"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!routing.get_result());

    let mut routing = router.start(&request);
    let coded = callback(|_| Err(HandlerError::with_message(StatusCode::GONE, "gone")));
    routing.get("/users", coded, RouteOptions::new()).unwrap();
    assert!(routing.get_result());
}

#[test]
fn unimplemented_action_is_reported_to_the_host() {
    let log = Log::default();
    let router = router(&log);
    let request = Request::new(Method::GET, "/users");
    let mut routing = router.start(&request);

    match routing.get("/users", "UserController@publish", RouteOptions::new()) {
        Err(DispatchError::ActionNotImplemented { controller, action }) => {
            assert_eq!(controller, "UserController");
            assert_eq!(action, "publish");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(entries(&log).is_empty());
    assert!(routing.get_result());
    assert_eq!(routing.method_name(), Some("publish"));
}

#[test]
fn configured_directory_index_is_stripped() {
    let router =
        Router::with_config(RouterConfig::default().with_directory_index(Some("index.html")));
    let request = Request::with_directory_index(Method::GET, "/blog/index.html", None);
    let mut routing = router.start(&request);

    let mut args = None;
    routing
        .get("/blog/{page?}", capture(&mut args), RouteOptions::new())
        .unwrap();

    assert_eq!(args, Some(vec![Arg::Null]));
}
