//! Defines the `RequestContext` contract and the `Request` type implementing it.

use hyper::{Method, Uri};
use log::trace;

use crate::config::DEFAULT_DIRECTORY_INDEX;
use crate::helpers::http::request::path::RequestPathSegments;

/// The view of an inbound request that routing needs.
pub trait RequestContext {
    /// The request method, after any `_method` override has been applied.
    fn method(&self) -> Method;

    /// The ordered, non-empty, percent-decoded path segments, without the query string and
    /// without a trailing directory-index filename.
    fn path_segments(&self) -> Vec<String>;

    /// An id supplied by the host for log correlation, e.g. from an `X-Request-ID` header.
    fn request_id(&self) -> Option<&str> {
        None
    }
}

/// Verbs a POST request may tunnel through the `_method` form field.
const TUNNELED_METHODS: [Method; 3] = [Method::PUT, Method::PATCH, Method::DELETE];

/// A request as seen by the router: its method and its path segments.
///
/// ```rust
/// # use waypost::request::{Request, RequestContext};
/// # use waypost::Method;
/// let request = Request::new(Method::POST, "https://example.com/users/7/index.php?tab=2")
///     .with_form_method("delete");
///
/// assert_eq!(request.method(), Method::DELETE);
/// assert_eq!(request.path_segments(), vec!["users", "7"]);
/// ```
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    segments: RequestPathSegments,
    request_id: Option<String>,
}

impl Request {
    /// Creates a request for `uri`, stripping the default directory index (`index.php`).
    ///
    /// `uri` may be a path (`/users?page=2`) or an absolute URI.
    pub fn new(method: Method, uri: &str) -> Self {
        Request::with_directory_index(method, uri, Some(DEFAULT_DIRECTORY_INDEX))
    }

    /// Creates a request for `uri`, stripping `directory_index` from the end of the path.
    pub fn with_directory_index(method: Method, uri: &str, directory_index: Option<&str>) -> Self {
        let path = match uri.trim().parse::<Uri>() {
            Ok(parsed) => parsed.path().to_owned(),
            Err(_) => {
                trace!(" unparseable uri `{}`, splitting raw path", uri);
                uri.trim().to_owned()
            }
        };

        Request {
            method,
            segments: RequestPathSegments::new(&path, directory_index),
            request_id: None,
        }
    }

    /// Applies the value of a `_method` form field.
    ///
    /// The override only takes effect for POST requests, and only for `put`, `patch` and `delete`
    /// (compared case-insensitively). Anything else leaves the method untouched.
    pub fn with_form_method(mut self, value: &str) -> Self {
        if self.method != Method::POST {
            return self;
        }

        let wanted = value.trim().to_ascii_uppercase();
        if let Some(m) = TUNNELED_METHODS.iter().find(|m| m.as_str() == wanted) {
            trace!(" overriding POST with {} from _method field", m);
            self.method = m.clone();
        }
        self
    }

    /// Attaches a host supplied request id.
    pub fn with_request_id<S>(mut self, id: S) -> Self
    where
        S: Into<String>,
    {
        self.request_id = Some(id.into());
        self
    }
}

impl RequestContext for Request {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn path_segments(&self) -> Vec<String> {
        self.segments.clone().into_strings()
    }

    fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}
