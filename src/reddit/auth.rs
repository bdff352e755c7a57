// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Authentication with the Reddit API.
//!
//! Reddit's "script" applications authenticate with the password grant:
//! the application's client ID and secret are sent as HTTP basic auth, and
//! the user's username and password as form fields. The response carries a
//! bearer token used for every subsequent request.

use crate::conf::Credentials;
use crate::error::{Error, Result};
use serde::Deserialize;

/// Endpoint that issues access tokens.
pub const ACCESS_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// A bearer token used to authorize API requests.
#[derive(Deserialize)]
pub struct Token {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    scope: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Granted(Token),
    Denied {
        error: String,
        #[serde(default)]
        error_description: Option<String>,
    },
}

impl Token {
    /// Parses the response of the access token endpoint.
    ///
    /// Reddit reports bad credentials with a successful status and an
    /// `error` field in the body, so a well-formed response can still be an
    /// authentication failure.
    pub fn parse(data: &str) -> Result<Self> {
        match serde_json::from_str(data)? {
            TokenResponse::Granted(token) => Ok(token),
            TokenResponse::Denied {
                error,
                error_description,
            } => {
                let reason = error_description.unwrap_or(error);
                Err(Error::Authentication(reason))
            }
        }
    }

    /// The raw access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Seconds until the token expires, if Reddit said.
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    /// Scopes granted to the token.
    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or("*")
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Form fields for a password grant with the given credentials.
pub fn password_grant(credentials: &Credentials) -> [(&'static str, &str); 3] {
    [
        ("grant_type", "password"),
        ("username", credentials.username()),
        ("password", credentials.password()),
    ]
}
