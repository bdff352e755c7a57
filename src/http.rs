// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.

use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, StatusCode, header};
use std::time::Duration;
use std::{error, fmt};

/// How long a request may take, from connecting to reading the whole body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A general service for making HTTP calls.
///
/// It might be a bit odd to refer to this trait as a "service", since
/// it appears to be more of a _client_ implementation, but think of
/// this as a proxy for a remote _service_ (even though a _client_ is used
/// to communicate with that remote service). A service might not always
/// be remote, such as when the implementation is a deterministic service
/// used for testing.
pub trait HTTPService {
    /// HTTP client that can be used to make HTTP requests.
    ///
    /// Redirects are never followed: Reddit answers requests for
    /// nonexistent subreddits with a redirect to its search page, which
    /// is better reported as a missing resource. Requests give up after
    /// [`REQUEST_TIMEOUT`].
    fn client(user_agent: &str) -> HTTPResult<Client> {
        let client = ClientBuilder::new()
            .user_agent(user_agent)
            .redirect(Policy::none())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(client)
    }
}

/// The user agent sent when the configuration does not name one.
///
/// # Examples
///
/// ```
/// use reddit_cli::http::default_user_agent;
/// assert!(default_user_agent().starts_with("reddit-cli v"));
/// ```
pub fn default_user_agent() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug)]
pub enum HTTPError {
    /// An error retrieving the body of a response.
    Body(reqwest::Error),

    /// An error that occurred while making an HTTP request.
    Request(reqwest::Error),

    /// An unsuccessful HTTP status code in an HTTP response.
    Http(StatusCode),

    /// A client error whose body said why the request was refused.
    Rejected {
        /// Status of the response.
        status: StatusCode,
        /// Machine-readable error code, such as `USER_DOESNT_EXIST`.
        reason: String,
        /// Human-readable explanation.
        explanation: String,
    },

    /// The server refused the request because too many were made.
    ///
    /// Holds the number of seconds the server asked us to wait, if it
    /// said so.
    RateLimited(Option<u64>),

    /// A missing Content-Type header in a response.
    MissingContentType,

    /// An invalid Content-Type header.
    InvalidContentType(header::ToStrError),

    /// A Content-Type that is not understood by the service.
    UnexpectedContentType(String),
}

impl From<reqwest::Error> for HTTPError {
    fn from(error: reqwest::Error) -> Self {
        HTTPError::Request(error)
    }
}

impl From<header::ToStrError> for HTTPError {
    fn from(error: header::ToStrError) -> Self {
        HTTPError::InvalidContentType(error)
    }
}

impl fmt::Display for HTTPError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HTTPError::Body(err) => write!(f, "Error retrieving body of HTTP response: {err}"),
            HTTPError::Request(err) => write!(f, "Error while making HTTP request: {err}"),
            HTTPError::Http(status) => write!(f, "Request returned HTTP {status}"),
            HTTPError::Rejected {
                status,
                reason,
                explanation,
            } => write!(f, "Request returned HTTP {status}: {explanation} ({reason})"),
            HTTPError::RateLimited(Some(secs)) => {
                write!(f, "Too many requests; retry after {secs} seconds")
            }
            HTTPError::RateLimited(None) => write!(f, "Too many requests"),
            HTTPError::MissingContentType => write!(f, "Missing Content-Type header"),
            HTTPError::InvalidContentType(err) => {
                write!(f, "Invalid Content-Type header value: {err}")
            }
            HTTPError::UnexpectedContentType(content_type) => {
                write!(f, "Unexpected content type: {content_type}")
            }
        }
    }
}

impl error::Error for HTTPError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            HTTPError::Body(err) => Some(err),
            HTTPError::Request(err) => Some(err),
            HTTPError::Http(_) | HTTPError::Rejected { .. } => None,
            HTTPError::RateLimited(_) => None,
            HTTPError::MissingContentType => None,
            HTTPError::InvalidContentType(err) => Some(err),
            HTTPError::UnexpectedContentType(_) => None,
        }
    }
}
