//! Defines a unique id per request that should be output with all logging

use log::trace;
use uuid::Uuid;

/// Chooses the identifier for a request.
///
/// 1. If the host supplied an id (e.g. from an X-Request-ID header) this value is used as is;
/// 2. Alternatively creates a UUID v4 value.
pub(crate) fn new_request_id(external: Option<&str>) -> String {
    match external {
        Some(id) => {
            trace!("[{}] RequestId set from external source", id);
            id.to_owned()
        }
        None => {
            let val = Uuid::new_v4().hyphenated().to_string();
            trace!("[{}] RequestId generated internally", val);
            val
        }
    }
}
