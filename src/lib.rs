// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! reddit-cli is a command-line tool for using Reddit as yourself: posting,
//! commenting, voting, searching, following users, reading your inbox, and
//! watching a post for new comments, all from the terminal.
//!
//! # Examples
//!
//! Check that your credentials work:
//!
//! ```bash
//! reddit-cli whoami
//! ```
//!
//! Show the five hottest posts in r/rust:
//!
//! ```bash
//! reddit-cli hot rust --limit 5
//! ```
//!
//! Submit a text post, then read the responses to it:
//!
//! ```bash
//! reddit-cli post rust "Favorite crate?" --content "Mine is serde."
//! reddit-cli responses https://redd.it/abc123
//! ```
//!
//! Watch a post for new comments once a minute, five times:
//!
//! ```bash
//! reddit-cli monitor https://redd.it/abc123 --interval 60 --max-checks 5
//! ```
//!
//! Search recent comments in a subreddit:
//!
//! ```bash
//! reddit-cli search-comments "borrow checker" --subreddit rust
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! reddit-cli --help
//! ```
//!
//! # Reddit API Setup
//!
//! reddit-cli acts on behalf of your own account, so it needs a Reddit
//! "script" application. To set one up:
//!
//! 1. Visit your [app preferences] and create an app of type "script".
//! 2. Note the client ID shown under the app name and the client secret.
//! 3. Store them, along with your username and password, in
//!    `reddit_config.json`:
//!
//!    ```json
//!    {
//!        "client_id": "your client ID",
//!        "client_secret": "your client secret",
//!        "username": "your username",
//!        "password": "your password",
//!        "user_agent": "reddit-cli/1.0 by your username"
//!    }
//!    ```
//!
//! If the file does not exist, reddit-cli writes a template for you to fill
//! in. Use `--config` or `$REDDIT_CLI_CONFIG` to keep it somewhere else.
//! Logging is controlled by `-v`/`-q` or `$RUST_LOG`.
//!
//! # License
//!
//! reddit-cli is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [app preferences]: https://www.reddit.com/prefs/apps

pub mod cli;
pub mod clock;
pub mod conf;
pub mod error;
pub mod exitcode;
pub mod http;
pub mod monitor;
pub mod reddit;
pub mod text;
pub mod view;

#[cfg(test)]
mod test_utils;
