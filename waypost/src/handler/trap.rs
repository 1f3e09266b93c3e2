//! Defines functionality for invoking application code and trapping panics.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Invokes `f`, converting a panic into an `Err` carrying the panic message.
///
/// Application code runs while the routing state is borrowed, so a panic must not unwind through
/// the dispatch boundary.
pub(crate) fn trap<F, T>(f: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(s) => (*s).to_owned(),
            Err(_) => "unknown panic payload".to_owned(),
        },
    }
}
