// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Errors reported by the command-line program.

use crate::conf::ConfigError;
use crate::exitcode;
use crate::http::HTTPError;
use log::warn;
use reqwest::StatusCode;
use std::io;
use thiserror::Error;

/// Standard result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Anything that can go wrong while running a command.
#[derive(Debug, Error)]
pub enum Error {
    /// The credentials file is missing or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Reddit did not accept the credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The authenticated user may not perform the action.
    #[error("permission denied: {0}")]
    Forbidden(String),

    /// Reddit is throttling requests.
    #[error("rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimited {
        /// Seconds to wait before trying again, if Reddit said.
        retry_after: Option<u64>,
    },

    /// The post, comment, user, or subreddit does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A command argument is invalid.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Reddit rejected a request and explained why.
    #[error("Reddit refused the request ({code}): {message}")]
    Reddit {
        /// Reddit's error code, such as `NO_TEXT`.
        code: String,
        /// Human-readable explanation.
        message: String,
    },

    /// An error from the underlying HTTP service.
    #[error("{0}")]
    Service(HTTPError),

    /// An error parsing data returned by Reddit.
    #[error("unreadable response from Reddit: {0}")]
    Parse(#[from] serde_json::Error),

    /// Output could not be written.
    #[error("could not write output: {0}")]
    Io(#[from] io::Error),
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!("; try again in {secs} seconds"),
        None => String::new(),
    }
}

impl From<HTTPError> for Error {
    fn from(error: HTTPError) -> Self {
        match error {
            HTTPError::RateLimited(retry_after) => Error::RateLimited { retry_after },
            HTTPError::Rejected {
                status,
                reason,
                explanation,
            } => match Error::from_reddit(reason, explanation) {
                Error::Reddit { .. }
                    if matches!(
                        status,
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
                    ) =>
                {
                    Error::from(HTTPError::Http(status))
                }
                err => err,
            },
            HTTPError::Http(StatusCode::UNAUTHORIZED) => {
                Error::Authentication(String::from("Reddit rejected the access token"))
            }
            HTTPError::Http(StatusCode::FORBIDDEN) => {
                Error::Forbidden(String::from("Reddit refused the request"))
            }
            HTTPError::Http(StatusCode::TOO_MANY_REQUESTS) => {
                Error::RateLimited { retry_after: None }
            }
            HTTPError::Http(status)
                if status == StatusCode::NOT_FOUND || status.is_redirection() =>
            {
                Error::NotFound(String::from("Reddit has no such resource"))
            }
            err => Error::Service(err),
        }
    }
}

impl Error {
    /// Maps an error code Reddit reported onto an [`enum@Error`].
    ///
    /// Reddit reports some failures in the body of a successful write and
    /// others in the body of a 4xx response; both carry the same codes.
    pub fn from_reddit(code: String, message: String) -> Self {
        match code.as_str() {
            "RATELIMIT" => {
                warn!("Reddit is rate limiting requests: {message}");
                Error::RateLimited { retry_after: None }
            }
            "SUBREDDIT_NOEXIST" | "USER_DOESNT_EXIST" | "NO_USER" | "DELETED_LINK"
            | "DELETED_COMMENT" | "NOT_FOUND" => Error::NotFound(message),
            "NOT_AUTHOR" | "SUBREDDIT_NOTALLOWED" | "USER_BLOCKED" | "THREAD_LOCKED" => {
                Error::Forbidden(message)
            }
            _ => Error::Reddit { code, message },
        }
    }

    /// The process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => exitcode::CONFIG,
            Error::Authentication(_) | Error::Forbidden(_) => exitcode::NOPERM,
            Error::RateLimited { .. } => exitcode::TEMPFAIL,
            Error::NotFound(_) => exitcode::NOINPUT,
            Error::Validation(_) => exitcode::USAGE,
            Error::Reddit { .. } | Error::Service(_) => exitcode::UNAVAILABLE,
            Error::Parse(_) => exitcode::DATAERR,
            Error::Io(_) => exitcode::IOERR,
        }
    }

    /// A suggestion for fixing the error, if there is an obvious one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Config(ConfigError::TemplateCreated { .. }) => {
                Some("Fill in your Reddit API credentials and run again.")
            }
            Error::Config(_) | Error::Authentication(_) => {
                Some("Check the credentials in your configuration file.")
            }
            Error::RateLimited { .. } => Some("Wait a while before trying again."),
            _ => None,
        }
    }
}
