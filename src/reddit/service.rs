// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Reddit API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Reddit API over HTTPS, essentially a specialized HTTPS client
//! specifically for Reddit. They deal in paths and raw response bodies;
//! making sense of those bodies is left to [`crate::reddit::client`].

use crate::conf::Credentials;
use crate::error::{Error, Result};
use crate::http::{HTTPError, HTTPResult, HTTPService};
use crate::reddit::auth::{ACCESS_TOKEN_URL, Token, password_grant};
use log::{debug, info, trace};
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::Deserialize;
use serde_json::Value;

/// Base URL for authenticated API requests.
pub const OAUTH_URL: &str = "https://oauth.reddit.com";

/// Query parameters or form fields for a request.
pub type Params<'a> = [(&'a str, String)];

/// A service for exchanging data with the Reddit API.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Reddit API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
///
/// Every method takes a path relative to the API root, such as
/// `/r/rust/hot`, and returns the raw body of a successful response.
pub trait Service: Send + Sync {
    /// Performs a GET request with the given query parameters.
    fn get(&self, path: &str, query: &Params) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Performs a POST request with a form-encoded body.
    fn post(&self, path: &str, form: &Params) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Performs a PUT request with a JSON body.
    fn put(&self, path: &str, body: &Value) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Performs a DELETE request.
    fn delete(&self, path: &str) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that contacts the Reddit API directly on behalf of a logged-in
/// user.
#[derive(Debug)]
pub struct RedditService {
    client: Client,
    token: Token,
}

impl HTTPService for RedditService {}

impl RedditService {
    /// Exchanges the user's credentials for an access token and returns a
    /// service that uses it.
    ///
    /// Returns [`Error::Authentication`] if Reddit rejects the credentials.
    pub async fn login(credentials: &Credentials) -> Result<Self> {
        let client = Self::client(credentials.user_agent())?;

        info!("Logging in to Reddit as {}", credentials.username());
        let resp = client
            .post(ACCESS_TOKEN_URL)
            .basic_auth(credentials.client_id(), Some(credentials.client_secret()))
            .form(&password_grant(credentials))
            .send()
            .await
            .map_err(HTTPError::from)?;

        let status = resp.status();
        debug!("Access token request returned {status}");
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication(String::from(
                "Reddit rejected the client ID or secret",
            )));
        }

        let body = Self::read_body(resp).await?;
        let token = Token::parse(&body)?;
        match token.expires_in() {
            Some(secs) => debug!(
                "Obtained access token with scope {}, valid for {secs} seconds",
                token.scope()
            ),
            None => debug!("Obtained access token with scope {}", token.scope()),
        }
        Ok(Self { client, token })
    }

    fn url(path: &str) -> String {
        if path.starts_with('/') {
            format!("{OAUTH_URL}{path}")
        } else {
            format!("{OAUTH_URL}/{path}")
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(self.token.access_token())
            .query(&[("raw_json", "1")])
    }

    async fn send(&self, builder: RequestBuilder) -> HTTPResult<String> {
        let resp = self.authorized(builder).send().await?;
        Self::read_body(resp).await
    }

    async fn read_body(resp: Response) -> HTTPResult<String> {
        let status = resp.status();
        trace!("{} returned {status}", resp.url().path());

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<f64>().ok())
                .map(|secs| secs.ceil() as u64);
            Err(HTTPError::RateLimited(retry_after))
        } else if status.is_client_error() {
            let body = resp.text().await.map_err(HTTPError::Body)?;
            Err(rejection(status, &body))
        } else if !status.is_success() {
            Err(HTTPError::Http(status))
        } else if status == StatusCode::NO_CONTENT {
            Ok(String::new())
        } else {
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .ok_or(HTTPError::MissingContentType)?
                .to_str()?;
            if !content_type.starts_with("application/json") {
                Err(HTTPError::UnexpectedContentType(content_type.to_string()))
            } else {
                resp.text().await.map_err(HTTPError::Body)
            }
        }
    }
}

/// Interprets the body of a 4xx response.
///
/// Reddit explains most refusals with a JSON body holding an error code in
/// `reason` and a description in `explanation`. Without a `reason` only the
/// status is left to go on.
pub(crate) fn rejection(status: StatusCode, body: &str) -> HTTPError {
    #[derive(Deserialize)]
    struct Refusal {
        reason: Option<String>,
        explanation: Option<String>,
        message: Option<String>,
    }

    match serde_json::from_str::<Refusal>(body) {
        Ok(Refusal {
            reason: Some(reason),
            explanation,
            message,
        }) => {
            let explanation = explanation.or(message).unwrap_or_else(|| reason.clone());
            HTTPError::Rejected {
                status,
                reason,
                explanation,
            }
        }
        _ => HTTPError::Http(status),
    }
}

impl Service for RedditService {
    async fn get(&self, path: &str, query: &Params<'_>) -> HTTPResult<String> {
        debug!("GET {path} {query:?}");
        self.send(self.client.get(Self::url(path)).query(query)).await
    }

    async fn post(&self, path: &str, form: &Params<'_>) -> HTTPResult<String> {
        debug!("POST {path}");
        trace!("Form: {form:?}");
        self.send(self.client.post(Self::url(path)).form(form)).await
    }

    async fn put(&self, path: &str, body: &Value) -> HTTPResult<String> {
        debug!("PUT {path}");
        self.send(self.client.put(Self::url(path)).json(body)).await
    }

    async fn delete(&self, path: &str) -> HTTPResult<String> {
        debug!("DELETE {path}");
        self.send(self.client.delete(Self::url(path))).await
    }
}
