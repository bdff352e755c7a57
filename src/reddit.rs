// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Reddit API clients and services for communicating with Reddit over HTTP.

pub mod api;
pub mod auth;
pub mod client;
pub mod link;
pub mod service;
pub mod thing;

pub use api::{Api, Feed, NewPost, PostBody, Scope, Vote};
pub use client::Reddit;
pub use link::Link;
