// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Watches a post for new top-level comments.

use crate::error::Result;
use crate::reddit::Api;
use crate::text::truncate;
use log::debug;
use std::collections::HashSet;
use std::io::Write;
use std::pin::pin;
use std::time::Duration;

/// Length at which comment bodies are cut off in monitor output.
pub const PREVIEW_LENGTH: usize = 100;

/// Polls a post at a fixed interval for a fixed number of checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    interval: Duration,
    max_checks: u32,
}

impl Monitor {
    /// Creates a monitor that checks `max_checks` times, waiting
    /// `interval` between checks.
    pub fn new(interval: Duration, max_checks: u32) -> Self {
        Self {
            interval,
            max_checks,
        }
    }

    /// Watches the post with the given ID, printing new comments to `out`
    /// as they appear.
    ///
    /// Returns the number of comments seen. The post is fetched exactly
    /// `max_checks` times unless `interrupt` completes first. An interrupt
    /// ends both the wait between checks and a fetch still in flight.
    pub async fn watch<A, W, F>(
        &self,
        api: &A,
        post_id: &str,
        out: &mut W,
        interrupt: F,
    ) -> Result<usize>
    where
        A: Api,
        W: Write,
        F: Future<Output = ()>,
    {
        let mut interrupt = pin!(interrupt);
        let mut seen: HashSet<String> = HashSet::new();

        for check in 1..=self.max_checks {
            let next = async {
                if check > 1 {
                    tokio::time::sleep(self.interval).await;
                }
                api.thread(post_id, None).await
            };
            let (post, comments) = tokio::select! {
                biased;
                result = next => result?,
                _ = &mut interrupt => {
                    writeln!(out, "\nInterrupted after {} checks", check - 1)?;
                    break;
                }
            };
            if check == 1 {
                writeln!(out, "Monitoring post: {}", post.title())?;
                writeln!(
                    out,
                    "Checking every {:?}, {} times",
                    self.interval, self.max_checks
                )?;
            }

            writeln!(out, "\nCheck {check}/{}", self.max_checks)?;
            let fresh: Vec<_> = comments
                .into_iter()
                .filter(|comment| seen.insert(comment.id().to_string()))
                .collect();
            debug!("Check {check}: {} new of {} seen", fresh.len(), seen.len());

            if fresh.is_empty() {
                writeln!(out, "No new responses")?;
            } else {
                writeln!(out, "Found {} new responses:", fresh.len())?;
                for comment in &fresh {
                    let preview = comment.body().replace('\n', " ");
                    writeln!(
                        out,
                        "  {}: {}",
                        comment.author(),
                        truncate(&preview, PREVIEW_LENGTH)
                    )?;
                }
            }
        }

        writeln!(out, "\nTotal responses collected: {}", seen.len())?;
        Ok(seen.len())
    }
}
