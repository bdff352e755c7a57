// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

use crate::clock::{Clock, DateTime, Utc};
use crate::http::{HTTPError, HTTPResult};
use crate::reddit::Reddit;
use crate::reddit::service::{Params, Service, rejection};
use reqwest::StatusCode;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

pub fn load_config(name: &str) -> PathBuf {
    PathBuf::from(format!("tests/data/config/{name}.json"))
}

pub fn load_output(filename: &str) -> String {
    let filename = format!("tests/output/{filename}.out");
    String::from(
        fs::read_to_string(&filename)
            .unwrap_or_else(|_| panic!("could not load test data from {filename}"))
            .trim_end(),
    )
}

/// A request received by a [`TestService`].
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: &'static str,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Request {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Serves canned responses from `tests/data/<scenario>/`.
///
/// A GET for `/r/rust/hot` is answered with `r_rust_hot.json`; `id` and
/// `after` parameters are appended to the name, so the second page of that
/// listing is `r_rust_hot_t3_p3.json`. Other methods are answered by path
/// alone. A missing file is a 404.
pub struct TestService {
    scenario: String,
    status: Option<StatusCode>,
    rejection: Option<StatusCode>,
    requests: Mutex<Vec<Request>>,
}

impl TestService {
    pub fn new(scenario: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
            status: None,
            rejection: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A service that answers every request with `status`.
    pub fn failing(status: StatusCode) -> Self {
        Self {
            status: Some(status),
            ..Self::new("failing")
        }
    }

    /// A service that answers with `status` and the scenario's fixture as
    /// the body of the error response.
    pub fn rejecting(scenario: &str, status: StatusCode) -> Self {
        Self {
            rejection: Some(status),
            ..Self::new(scenario)
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("poisoned lock").clone()
    }

    fn fixture_name(method: &str, path: &str, params: &[(String, String)]) -> String {
        let mut name = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        if method == "GET" {
            for key in ["id", "after"] {
                if let Some((_, value)) = params.iter().find(|(k, _)| k == key) {
                    name = format!("{name}_{value}");
                }
            }
        }
        name
    }

    fn respond(&self, method: &'static str, path: &str, params: &Params) -> HTTPResult<String> {
        let params: Vec<(String, String)> = params
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        let name = Self::fixture_name(method, path, &params);
        self.requests.lock().expect("poisoned lock").push(Request {
            method,
            path: path.to_string(),
            params,
        });

        if let Some(status) = self.status {
            return Err(HTTPError::Http(status));
        }
        let filename = format!("tests/data/{}/{name}.json", self.scenario);
        let body =
            fs::read_to_string(&filename).map_err(|_| HTTPError::Http(StatusCode::NOT_FOUND))?;
        match self.rejection {
            Some(status) => Err(rejection(status, &body)),
            None => Ok(body),
        }
    }
}

impl Service for TestService {
    async fn get(&self, path: &str, query: &Params<'_>) -> HTTPResult<String> {
        self.respond("GET", path, query)
    }

    async fn post(&self, path: &str, form: &Params<'_>) -> HTTPResult<String> {
        self.respond("POST", path, form)
    }

    async fn put(&self, path: &str, body: &Value) -> HTTPResult<String> {
        let params = match body.get("name").and_then(Value::as_str) {
            Some(name) => vec![("name", name.to_string())],
            None => Vec::new(),
        };
        self.respond("PUT", path, &params)
    }

    async fn delete(&self, path: &str) -> HTTPResult<String> {
        self.respond("DELETE", path, &[])
    }
}

pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl FrozenClock {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        FrozenClock { datetime }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2025-05-23T10:13:00-07:00")
            .expect("invalid date supplied")
            .with_timezone(&Utc);
        Self::new(datetime)
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}

impl Reddit<TestService> {
    /// Returns a client logged in as `testuser` that answers requests from
    /// the default set of test data.
    pub fn test() -> Reddit<TestService> {
        Reddit::new(TestService::new("default"))
    }
}
