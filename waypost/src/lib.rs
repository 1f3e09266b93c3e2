//! Waypost &ndash; a request-dispatch engine.
//!
//! Given the HTTP verb and path of an inbound request, Waypost evaluates route declarations in
//! source order, extracts and coerces path variables, resolves a handler (a closure, or a named
//! controller method which may be inferred from RESTful path conventions) and invokes it. At most
//! one route handles any request.
//!
//! ```rust
//! use waypost::handler::HandlerResult;
//! use waypost::request::Request;
//! use waypost::router::route::{callback, RouteOptions};
//! use waypost::router::Router;
//! use waypost::{Arg, Method, Signal};
//!
//! let router = Router::new();
//! let request = Request::new(Method::GET, "/users/42");
//!
//! let mut seen = Vec::new();
//! let mut routing = router.start(&request);
//! routing
//!     .get(
//!         "/users/{id:int}",
//!         callback(|args: Vec<Arg>| -> HandlerResult {
//!             seen.extend(args);
//!             Ok(Signal::Completed)
//!         }),
//!         RouteOptions::default(),
//!     )
//!     .unwrap();
//!
//! assert!(routing.get_result());
//! drop(routing);
//! assert_eq!(seen, vec![Arg::Int(42)]);
//! ```
#![doc(html_root_url = "https://docs.rs/waypost/0.1.0")] // Update when changed in Cargo.toml
#![warn(missing_docs, deprecated)]
// Stricter requirements once we get to pull request stage, all warnings must be resolved.
#![cfg_attr(feature = "ci", deny(warnings))]

pub mod config;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod helpers;
pub mod request;
pub mod router;
pub mod signal;
pub mod state;

pub use hyper::{Method, StatusCode};

pub use crate::config::RouterConfig;
pub use crate::error::DispatchError;
pub use crate::extractor::Arg;
pub use crate::signal::Signal;
