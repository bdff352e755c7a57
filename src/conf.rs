// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Credential configuration.
//!
//! Credentials live in a flat JSON file, by default `reddit_config.json` in
//! the current directory:
//!
//! ```json
//! {
//!   "client_id": "your_client_id_here",
//!   "client_secret": "your_client_secret_here",
//!   "username": "your_reddit_username",
//!   "password": "your_reddit_password",
//!   "user_agent": "reddit-cli/1.0 by your_username"
//! }
//! ```
//!
//! The client ID and secret belong to a "script" application, which can be
//! registered on Reddit's [app preferences] page. `user_agent` may be
//! omitted.
//!
//! [app preferences]: https://www.reddit.com/prefs/apps

use crate::http::default_user_agent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where credentials are read from unless the user says otherwise.
pub const DEFAULT_CONFIG_PATH: &str = "reddit_config.json";

/// Credentials for a Reddit "script" application.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
    #[serde(default = "default_user_agent")]
    user_agent: String,
}

impl Credentials {
    /// Loads credentials from the JSON file at `path`.
    ///
    /// If the file does not exist, a template is written in its place so
    /// the user has something to fill in, and an error is returned anyway.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let path = path.to_path_buf();
                return match Self::write_template(&path) {
                    Ok(()) => Err(ConfigError::TemplateCreated { path }),
                    Err(source) => Err(ConfigError::Missing { path, source }),
                };
            }
            Err(source) => {
                let path = path.to_path_buf();
                return Err(ConfigError::Read { path, source });
            }
        };
        Self::parse(&data).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses credentials from a JSON string.
    pub fn parse(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    /// A credentials file with placeholder values.
    pub fn template() -> Self {
        Self {
            client_id: String::from("your_client_id_here"),
            client_secret: String::from("your_client_secret_here"),
            username: String::from("your_reddit_username"),
            password: String::from("your_reddit_password"),
            user_agent: format!("{} by your_username", default_user_agent()),
        }
    }

    fn write_template(path: &Path) -> io::Result<()> {
        let template = serde_json::to_string_pretty(&Self::template())?;
        fs::write(path, template + "\n")
    }

    /// OAuth client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// OAuth client secret.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Reddit username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Reddit password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

// Secrets stay out of debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// A problem with the credentials file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file did not exist, so a template was written.
    #[error("{} did not exist; a template was created there", .path.display())]
    TemplateCreated {
        /// Location of the new template.
        path: PathBuf,
    },

    /// The file did not exist and a template could not be written.
    #[error("{} does not exist and a template could not be created: {source}", .path.display())]
    Missing {
        /// Location of the missing file.
        path: PathBuf,
        /// Why the template could not be written.
        source: io::Error,
    },

    /// The file exists but could not be read.
    #[error("could not read {}: {source}", .path.display())]
    Read {
        /// Location of the file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The file is not valid JSON or lacks a required field.
    #[error("invalid configuration in {}: {source}", .path.display())]
    Malformed {
        /// Location of the file.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::load_config;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_loads_credentials() {
        let creds = Credentials::load(load_config("valid")).unwrap();
        assert_eq!(creds.client_id(), "abcdefghijklmn");
        assert_eq!(creds.client_secret(), "s3cr3t-v4lu3");
        assert_eq!(creds.username(), "testuser");
        assert_eq!(creds.password(), "hunter2");
        assert_eq!(creds.user_agent(), "reddit-cli-tests/1.0 by testuser");
    }

    #[test]
    fn it_defaults_the_user_agent() {
        let creds = Credentials::load(load_config("no_user_agent")).unwrap();
        assert_eq!(creds.user_agent(), default_user_agent());
    }

    #[test]
    fn it_rejects_missing_fields() {
        let err = Credentials::load(load_config("missing_password")).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }), "{err:?}");
        assert!(err.to_string().contains("password"), "{err}");
    }

    #[test]
    fn it_rejects_malformed_json() {
        let err = Credentials::load(load_config("malformed")).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }), "{err:?}");
    }

    #[test]
    fn it_writes_a_template_when_the_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reddit_config.json");

        let err = Credentials::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TemplateCreated { .. }), "{err:?}");

        let written = Credentials::load(&path).unwrap();
        assert_eq!(written, Credentials::template());
    }

    #[test]
    fn it_reports_a_missing_file_it_cannot_replace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.json");
        let err = Credentials::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }), "{err:?}");
    }

    #[test]
    fn it_redacts_secrets_in_debug_output() {
        let creds = Credentials::load(load_config("valid")).unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("s3cr3t-v4lu3"));
        assert!(debug.contains("testuser"));
    }
}
