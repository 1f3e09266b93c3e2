//! Error types surfaced by Waypost.
//!
//! Failures raised by handlers travel as `handler::HandlerError` and are dealt with at the dispatch
//! boundary. The types here describe what is reported back to the host application.

use std::io;

use thiserror::Error;

/// Raised while compiling a URI template into segments.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A `{...}` segment did not name its variable.
    #[error("template segment `{0}` does not name a variable")]
    EmptyVariable(String),

    /// A literal segment could not be compiled into a case-insensitive matcher.
    #[error("template segment `{segment}` is not a valid pattern")]
    InvalidLiteral {
        /// The offending literal segment.
        segment: String,
        /// The regex compilation failure.
        #[source]
        source: regex::Error,
    },
}

/// Failures that escape a route declaration and are returned to the host.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The URI template of the declaration could not be compiled.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The dispatch target names a controller which was never registered with the `Router`.
    #[error("no controller registered as `{0}`")]
    UnknownController(String),

    /// The factory registered for a controller failed.
    #[error("controller `{name}` could not be created: {cause:#}")]
    ControllerInit {
        /// Registered controller name.
        name: String,
        /// Failure reported by the factory.
        cause: anyhow::Error,
    },

    /// The resolved action is not part of the controller's declared method set.
    #[error("controller `{controller}` does not implement `{action}`")]
    ActionNotImplemented {
        /// Registered controller name.
        controller: String,
        /// The action which was resolved for the request.
        action: String,
    },

    /// A handler failed without a status code before any controller method was resolved.
    #[error("handler failed: {0:#}")]
    Handler(anyhow::Error),

    /// A handler panicked before any controller method was resolved.
    #[error("handler panicked: {0}")]
    Panic(String),
}

/// Raised while loading a `RouterConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("unable to read router configuration: {0}")]
    Io(#[from] io::Error),

    /// The configuration text is not valid TOML for a `RouterConfig`.
    #[error("invalid router configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
