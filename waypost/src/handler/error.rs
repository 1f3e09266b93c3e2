use std::fmt::{self, Debug, Display};

use hyper::StatusCode;
use log::trace;

/// Describes an error which occurred during handler execution, and allows the creation of a HTTP
/// error response through the `ErrorRouter`.
///
/// Errors without a status code are treated as generic dispatch failures.
pub struct HandlerError {
    status_code: Option<StatusCode>,
    cause: anyhow::Error,
}

/// Convert a generic `anyhow::Error` into a `HandlerError`, similar as you would a concrete error
/// type with `into_handler_error()`.
impl<E> From<E> for HandlerError
where
    E: Into<anyhow::Error> + Display,
{
    fn from(error: E) -> HandlerError {
        trace!(" converting Error to HandlerError: {}", error);

        HandlerError {
            status_code: None,
            cause: error.into(),
        }
    }
}

impl HandlerError {
    /// Creates a `HandlerError` carrying `status`, with `message` as its cause.
    ///
    /// ```rust
    /// # use waypost::handler::HandlerError;
    /// # use waypost::StatusCode;
    /// let e = HandlerError::with_message(StatusCode::NOT_FOUND, "no such user");
    /// assert_eq!(e.status(), Some(StatusCode::NOT_FOUND));
    /// ```
    pub fn with_message<M>(status: StatusCode, message: M) -> HandlerError
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        HandlerError {
            status_code: Some(status),
            cause: anyhow::Error::msg(message),
        }
    }

    /// Shorthand for a `404 Not Found` error.
    pub fn not_found() -> HandlerError {
        HandlerError::with_message(StatusCode::NOT_FOUND, "not found")
    }

    /// Returns the HTTP status code associated with this `HandlerError`, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status_code
    }

    /// Sets the HTTP status code of the error, routing it through the `ErrorRouter`.
    pub fn with_status(self, status_code: StatusCode) -> HandlerError {
        HandlerError {
            status_code: Some(status_code),
            ..self
        }
    }

    /// Returns the underlying cause of this `HandlerError`.
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    /// Attempt to downcast the cause of this `HandlerError` to a concrete type.
    pub fn downcast_cause_ref<E>(&self) -> Option<&E>
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.cause.downcast_ref()
    }

    pub(crate) fn into_cause(self) -> anyhow::Error {
        self.cause
    }
}

impl Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerError")
            .field("status_code", &self.status_code)
            .field("cause", &format_args!("{:#}", self.cause))
            .finish()
    }
}

/// This trait allows you to convert a `Result`'s `Err` case into a handler error with the given
/// status code.
///
/// ```rust
/// # use waypost::handler::{HandlerError, MapHandlerError};
/// # use waypost::StatusCode;
/// fn find_user(id: i64) -> Result<String, HandlerError> {
///     let users = vec!["ada".to_owned()];
///     let name = users
///         .get(id as usize)
///         .cloned()
///         .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "unknown user"))
///         .map_err_with_status(StatusCode::NOT_FOUND)?;
///     Ok(name)
/// }
///
/// assert_eq!(find_user(3).unwrap_err().status(), Some(StatusCode::NOT_FOUND));
/// ```
pub trait MapHandlerError<T> {
    /// Equivalent of `map_err(|err| HandlerError::from(err).with_status(status_code))`.
    fn map_err_with_status(self, status_code: StatusCode) -> Result<T, HandlerError>;
}

impl<T, E> MapHandlerError<T> for Result<T, E>
where
    E: Into<anyhow::Error> + Display,
{
    fn map_err_with_status(self, status_code: StatusCode) -> Result<T, HandlerError> {
        self.map_err(|err| {
            trace!(" converting Error to HandlerError: {}", err);
            HandlerError {
                status_code: Some(status_code),
                cause: err.into(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn errors_convert_without_status() {
        let e: HandlerError = io::Error::new(io::ErrorKind::Other, "disk full").into();
        assert_eq!(e.status(), None);
        assert_eq!(e.cause().to_string(), "disk full");
        assert!(e.downcast_cause_ref::<io::Error>().is_some());
    }

    #[test]
    fn status_can_be_attached() {
        let e = HandlerError::from(anyhow::anyhow!("gone")).with_status(StatusCode::GONE);
        assert_eq!(e.status(), Some(StatusCode::GONE));
        assert_eq!(HandlerError::not_found().status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn map_err_with_status() {
        let r: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::Other, "nope"));
        let e = r.map_err_with_status(StatusCode::FORBIDDEN).unwrap_err();
        assert_eq!(e.status(), Some(StatusCode::FORBIDDEN));
        assert!(format!("{:?}", e).contains("nope"));
    }
}
