//! Defines helper functions for processing the request path

use crate::helpers::http::PercentDecoded;

const EXCLUDED_SEGMENTS: [&str; 1] = [""];

/// Holder for `Request` URI path segments that have been split into individual segments.
///
/// Used by `Request` to supply the ordered path segments a `RouteState` is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestPathSegments {
    segments: Vec<PercentDecoded>,
}

impl RequestPathSegments {
    /// Creates a new RequestPathSegments instance by splitting a `Request` URI path.
    ///
    /// Any query string or fragment is discarded, empty segments are skipped, segments which are
    /// not valid UTF-8 once percent decoded are dropped, and a trailing segment equal to
    /// `directory_index` is removed. So, a request path of `/some/path/to//my/index.php?x=1` will
    /// be split into segments:
    ///
    /// ```plain
    /// ["some", "path", "to", "my"]
    /// ```
    pub fn new(path: &str, directory_index: Option<&str>) -> Self {
        let path = path.split(|c| c == '?' || c == '#').next().unwrap_or("");

        let mut segments: Vec<PercentDecoded> = path
            .split('/')
            .filter(|s| !EXCLUDED_SEGMENTS.contains(s))
            .filter_map(PercentDecoded::new)
            .collect();

        if let (Some(index), Some(last)) = (directory_index, segments.last()) {
            if last.as_ref() == index {
                segments.pop();
            }
        }

        RequestPathSegments { segments }
    }

    /// Provide the decoded segments, in request order.
    pub fn segments(&self) -> &[PercentDecoded] {
        &self.segments
    }

    /// Consumes the value, returning the decoded segments as strings.
    pub fn into_strings(self) -> Vec<String> {
        self.segments
            .into_iter()
            .map(PercentDecoded::into_string)
            .collect()
    }
}
