// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

use clap::Parser;
use reddit_cli::cli::Config;
use std::io::{self, IsTerminal};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::parse();
    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    process::exit(reddit_cli::cli::run(config).await);
}
