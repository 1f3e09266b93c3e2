//! Defines `RouteState`, the mutable context of a single request as route declarations run.
//!
//! A `RouteState` is created when a request enters the `Router` (see `Router::start`) and is
//! discarded with the `Routing` that owns it. Nothing in it is shared between requests, so a
//! `Router` can serve concurrent requests as long as each gets its own `Routing`.

mod request_id;

use std::collections::BTreeMap;

use hyper::Method;
use log::trace;

use crate::request::RequestContext;

pub(crate) use self::request_id::new_request_id;

/// The sticky outcome of routing a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteResult {
    /// No route has handled the request yet. Route declarations are still evaluated.
    Pending,

    /// A route handled the request. No further route declaration is evaluated.
    Matched,

    /// Routing finished without any route handling the request.
    Unmatched,
}

/// Per-request routing context: the request path segments not yet consumed by a matching route,
/// the sticky result, and the resolved controller method.
///
/// Segments are addressed by their position in the original request path. Consumed positions
/// are removed and never come back, so a later template sees gaps where an earlier, softly
/// missed route matched.
#[derive(Clone, Debug)]
pub struct RouteState {
    request_id: String,
    method: Method,
    segment_count: usize,
    remaining: BTreeMap<usize, String>,
    result: RouteResult,
    resolved_method: Option<String>,
}

impl RouteState {
    /// Creates the state for a request, with `default_method` as the initial resolved method.
    pub fn new<R>(request: &R, default_method: Option<&str>) -> Self
    where
        R: RequestContext + ?Sized,
    {
        RouteState::with_directory_index(request, default_method, None)
    }

    /// Creates the state for a request, as `new` does, and additionally drops a final path
    /// segment equal to `directory_index`.
    pub fn with_directory_index<R>(
        request: &R,
        default_method: Option<&str>,
        directory_index: Option<&str>,
    ) -> Self
    where
        R: RequestContext + ?Sized,
    {
        let request_id = new_request_id(request.request_id());
        let method = request.method();
        let mut segments = request.path_segments();

        if let (Some(index), Some(last)) = (directory_index, segments.last()) {
            if last.as_str() == index {
                trace!("[{}] dropping directory index `{}`", request_id, index);
                segments.pop();
            }
        }

        trace!(
            "[{}] starting routing for {} with {} path segment(s)",
            request_id,
            method,
            segments.len()
        );

        RouteState {
            request_id,
            method,
            segment_count: segments.len(),
            remaining: segments.into_iter().enumerate().collect(),
            result: RouteResult::Pending,
            resolved_method: default_method.map(str::to_owned),
        }
    }

    /// The unique id of this request, used to correlate log output.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The (possibly overridden) request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The number of segments in the original request path.
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// True when the request path is `/`.
    pub fn is_root(&self) -> bool {
        self.segment_count == 0
    }

    /// The unconsumed segment at `position` of the original request path.
    pub fn segment_at(&self, position: usize) -> Option<&str> {
        self.remaining.get(&position).map(String::as_str)
    }

    /// The unconsumed segments, in request order.
    pub fn remaining_segments(&self) -> Vec<&str> {
        self.remaining.values().map(String::as_str).collect()
    }

    /// The number of unconsumed segments.
    pub fn remaining_len(&self) -> usize {
        self.remaining.len()
    }

    /// The sticky routing result.
    pub fn result(&self) -> RouteResult {
        self.result
    }

    /// True while no route has handled the request and routing has not finished.
    pub fn is_pending(&self) -> bool {
        self.result == RouteResult::Pending
    }

    /// True once a route has handled the request.
    pub fn get_result(&self) -> bool {
        self.result == RouteResult::Matched
    }

    /// The controller method resolved by the most recent dispatch, or the configured default.
    pub fn resolved_method(&self) -> Option<&str> {
        self.resolved_method.as_deref()
    }

    pub(crate) fn consume(&mut self, positions: &[usize]) {
        for position in positions {
            self.remaining.remove(position);
        }
    }

    pub(crate) fn consume_trailing(&mut self, count: usize) {
        for _ in 0..count {
            let last = self.remaining.keys().next_back().copied();
            if let Some(position) = last {
                self.remaining.remove(&position);
            }
        }
    }

    pub(crate) fn set_resolved_method(&mut self, method: &str) {
        self.resolved_method = Some(method.to_owned());
    }

    pub(crate) fn mark_matched(&mut self) {
        trace!("[{}] request marked as handled", self.request_id);
        self.result = RouteResult::Matched;
    }

    pub(crate) fn mark_unmatched(&mut self) {
        if self.result == RouteResult::Pending {
            trace!("[{}] request marked as unhandled", self.request_id);
            self.result = RouteResult::Unmatched;
        }
    }
}

/// Returns the unique id associated with the current request.
///
/// This is very useful for logging/correlating events across distributed systems.
pub fn request_id(state: &RouteState) -> &str {
    state.request_id()
}
