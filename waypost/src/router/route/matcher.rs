//! Defines the `RouteMatcher` trait, its method-based implementations, and path matching of a
//! compiled `PathTemplate` against the unconsumed request path.

use hyper::Method;
use log::trace;

use crate::extractor::Arg;
use crate::helpers::num::{int_value, num_value};
use crate::router::template::segment::{Constraint, Segment, Variable};
use crate::router::template::PathTemplate;
use crate::state::{request_id, RouteState};

/// Determines if pre-defined conditions required for a route declaration to be evaluated have
/// been met.
pub trait RouteMatcher {
    /// Determines if the request meets pre-defined conditions.
    fn is_match(&self, state: &RouteState) -> bool;
}

/// A `RouteMatcher` that succeeds when the request has been made with one or more acceptable
/// HTTP request methods.
///
/// ```rust
/// # use waypost::request::Request;
/// # use waypost::router::route::matcher::{MethodOnlyRouteMatcher, RouteMatcher};
/// # use waypost::state::RouteState;
/// # use waypost::Method;
/// let matcher = MethodOnlyRouteMatcher::new(vec![Method::GET, Method::POST]);
///
/// let state = RouteState::new(&Request::new(Method::GET, "/"), None);
/// assert!(matcher.is_match(&state));
///
/// let state = RouteState::new(&Request::new(Method::DELETE, "/"), None);
/// assert!(!matcher.is_match(&state));
/// ```
#[derive(Clone, Debug)]
pub struct MethodOnlyRouteMatcher {
    methods: Vec<Method>,
}

impl MethodOnlyRouteMatcher {
    /// Creates a new `MethodOnlyRouteMatcher`.
    pub fn new(methods: Vec<Method>) -> Self {
        MethodOnlyRouteMatcher { methods }
    }
}

impl RouteMatcher for MethodOnlyRouteMatcher {
    /// Determines if the request was made using a `Method` the instance contains.
    fn is_match(&self, state: &RouteState) -> bool {
        let method = state.method();
        if self.methods.iter().any(|m| m == method) {
            trace!(
                "[{}] matched request method {} to permitted method",
                request_id(state),
                method
            );
            true
        } else {
            trace!(
                "[{}] did not match request method {}",
                request_id(state),
                method
            );
            false
        }
    }
}

/// A `RouteMatcher` that matches any request method.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyRouteMatcher;

impl AnyRouteMatcher {
    /// Creates a new `AnyRouteMatcher`.
    pub fn new() -> Self {
        AnyRouteMatcher
    }
}

impl RouteMatcher for AnyRouteMatcher {
    fn is_match(&self, _state: &RouteState) -> bool {
        true
    }
}

/// The outcome of a successful path match.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteMatch {
    /// Handler arguments, one per variable segment in template order.
    pub args: Vec<Arg>,
    /// Request path positions matched by the template, to be consumed on commit.
    pub consumed: Vec<usize>,
}

/// Matches `template` against the unconsumed request path in `state`.
///
/// Template segment `i` is compared to request path position `i`, left to right in a single
/// pass. A literal must match its segment case-insensitively; a required variable needs a
/// segment at its position; an optional variable may find none. Typed variables coerce their
/// value and never reject it. The first failure abandons the whole template.
///
/// `state` is only read. Committing `RouteMatch::consumed` is up to the caller.
///
/// The root template `/` matches only a request for `/`. A request whose segments have all been
/// consumed matches nothing further.
pub fn match_path(template: &PathTemplate, state: &RouteState) -> Option<RouteMatch> {
    if template.is_root() {
        return if state.is_root() {
            Some(RouteMatch {
                args: vec![],
                consumed: vec![],
            })
        } else {
            None
        };
    }

    if !state.is_root() && state.remaining_len() == 0 {
        trace!(
            "[{}] request path fully consumed, `{}` cannot match",
            request_id(state),
            template
        );
        return None;
    }

    let mut args = Vec::new();
    let mut consumed = Vec::new();

    for (position, segment) in template.segments().iter().enumerate() {
        let value = state.segment_at(position);

        match segment {
            Segment::Literal { regex, .. } => match value {
                Some(v) if regex.is_match(v) => consumed.push(position),
                _ => {
                    trace!(
                        "[{}] `{}` failed at literal `{}`",
                        request_id(state),
                        template,
                        segment
                    );
                    return None;
                }
            },
            Segment::Variable(variable) => match value {
                Some(v) => {
                    args.push(coerce(variable, v));
                    consumed.push(position);
                }
                None if variable.is_optional() => args.push(absent(variable)),
                None => {
                    trace!(
                        "[{}] `{}` failed at required variable `{}`",
                        request_id(state),
                        template,
                        variable.name()
                    );
                    return None;
                }
            },
        }
    }

    trace!("[{}] `{}` matched", request_id(state), template);
    Some(RouteMatch { args, consumed })
}

fn coerce(variable: &Variable, value: &str) -> Arg {
    match variable.constraint() {
        None => Arg::Str(value.to_owned()),
        Some(Constraint::Int) => Arg::Int(int_value(value)),
        Some(Constraint::Num) => Arg::Int(num_value(value, 0)),
    }
}

fn absent(variable: &Variable) -> Arg {
    match variable.constraint() {
        None => Arg::Null,
        Some(_) => Arg::Int(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    fn state(path: &str) -> RouteState {
        RouteState::new(&Request::new(Method::GET, path), None)
    }

    fn try_match(template: &str, path: &str) -> Option<RouteMatch> {
        match_path(&PathTemplate::parse(template).unwrap(), &state(path))
    }

    fn args(template: &str, path: &str) -> Vec<Arg> {
        try_match(template, path).expect("template should match").args
    }

    #[test]
    fn root_matches_only_root() {
        assert_eq!(args("/", "/"), Vec::<Arg>::new());
        assert!(try_match("/", "/users").is_none());
    }

    #[test]
    fn typed_int_variables() {
        assert_eq!(args("/users/{id:int}", "/users/42"), vec![Arg::Int(42)]);
        assert_eq!(args("/users/{id:int}", "/users/abc"), vec![Arg::Int(0)]);
        assert!(try_match("/users/{id:int}", "/users").is_none());
    }

    #[test]
    fn typed_num_variables() {
        assert_eq!(args("/flag/{on:num}", "/flag/yes"), vec![Arg::Int(1)]);
        assert_eq!(args("/flag/{on:num}", "/flag/Off"), vec![Arg::Int(0)]);
        assert_eq!(args("/flag/{on:num}", "/flag/-5"), vec![Arg::Int(0)]);
        assert_eq!(args("/flag/{on:num}", "/flag/12"), vec![Arg::Int(12)]);
    }

    #[test]
    fn optional_variables() {
        assert_eq!(args("/posts/{slug?}", "/posts"), vec![Arg::Null]);
        assert_eq!(
            args("/posts/{slug?}", "/posts/hello"),
            vec![Arg::from("hello")]
        );
        assert_eq!(args("/posts/{page:int?}", "/posts"), vec![Arg::Int(0)]);
        assert_eq!(args("/posts/{page:num?}", "/posts/on"), vec![Arg::Int(1)]);
        assert_eq!(args("/{page?}", "/"), vec![Arg::Null]);
    }

    #[test]
    fn literals_are_case_insensitive_and_short_circuit() {
        assert_eq!(args("/Users/{id}", "/USERS/x"), vec![Arg::from("x")]);
        assert!(try_match("/users/{id}/edit", "/accounts/1/edit").is_none());
        assert!(try_match("/users/edit", "/users").is_none());
    }

    #[test]
    fn templates_may_match_a_prefix_of_the_path() {
        let m = try_match("/users", "/users/7/edit").unwrap();
        assert_eq!(m.args, Vec::<Arg>::new());
        assert_eq!(m.consumed, vec![0]);
    }

    #[test]
    fn consumed_positions_are_reported_and_respected() {
        let m = try_match("/a/{b}/{c?}", "/a/x").unwrap();
        assert_eq!(m.consumed, vec![0, 1]);
        assert_eq!(m.args, vec![Arg::from("x"), Arg::Null]);

        let mut state = state("/a/x");
        state.consume(&m.consumed);
        assert!(match_path(&PathTemplate::parse("/a").unwrap(), &state).is_none());
        assert!(match_path(&PathTemplate::parse("/{opt?}").unwrap(), &state).is_none());
    }

    #[test]
    fn gaps_left_by_earlier_matches_fail_later_templates() {
        let mut state = state("/shop/cart");
        state.consume(&[0]);
        assert!(match_path(&PathTemplate::parse("/shop/cart").unwrap(), &state).is_none());
        assert!(match_path(&PathTemplate::parse("/{any?}/cart").unwrap(), &state).is_some());
    }

    #[test]
    fn method_matchers() {
        let get = state("/");
        assert!(AnyRouteMatcher::new().is_match(&get));
        assert!(MethodOnlyRouteMatcher::new(vec![Method::GET]).is_match(&get));
        assert!(!MethodOnlyRouteMatcher::new(vec![Method::POST]).is_match(&get));
    }
}
