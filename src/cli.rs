// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::clock::{Clock, SystemClock};
use crate::conf::{Credentials, DEFAULT_CONFIG_PATH};
use crate::error::{Error, Result};
use crate::exitcode;
use crate::monitor::Monitor;
use crate::reddit::link::{
    parse_comment_link, parse_link, parse_post_link, parse_subreddit, parse_thread_link,
    parse_username,
};
use crate::reddit::{Api, Feed, Link, NewPost, PostBody, Reddit, Scope, Vote};
use crate::text::truncate;
use crate::view::{SUMMARY_LENGTH, SubredditDetails, ViewOptions, Viewable, numbered};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colored::Colorize;
use log::{debug, info};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Length at which echoed comment text is cut off in confirmations.
const ECHO_LENGTH: usize = 100;

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Post, comment, vote, search, and message on Reddit", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    /// Path to the JSON file holding your Reddit API credentials
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "REDDIT_CLI_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    /// Print timestamps in UTC instead of local time
    #[arg(long, global = true, default_value_t = false)]
    utc: bool,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity<WarnLevel> {
        self.verbosity
    }

    pub fn config_path(&self) -> &Path {
        &self.config
    }

    pub fn utc(&self) -> bool {
        self.utc
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a text or link post to a subreddit
    Post {
        /// Subreddit name (with or without r/)
        #[arg(value_parser = parse_subreddit)]
        subreddit: String,

        /// Post title
        title: String,

        /// Body of a text post
        #[arg(long, conflicts_with = "url")]
        content: Option<String>,

        /// Target of a link post
        #[arg(long)]
        url: Option<String>,

        /// Link flair template ID (see the `flairs` command)
        #[arg(long, value_name = "FLAIR_ID")]
        flair: Option<String>,
    },

    /// Comment on a post
    Comment {
        /// Link to the post
        #[arg(value_parser = parse_thread_link)]
        post: Link,

        /// Comment text
        text: String,
    },

    /// Reply to a comment
    Reply {
        /// Link to the comment
        #[arg(value_parser = parse_comment_link)]
        comment: Link,

        /// Reply text
        text: String,
    },

    /// Edit one of your own text posts
    EditPost {
        /// Link to the post
        #[arg(value_parser = parse_post_link)]
        post: Link,

        /// New post body
        content: String,
    },

    /// Edit one of your own comments
    EditComment {
        /// Link to the comment
        #[arg(value_parser = parse_comment_link)]
        comment: Link,

        /// New comment text
        content: String,
    },

    /// Delete one of your own posts
    Delete {
        /// Link to the post
        #[arg(value_parser = parse_post_link)]
        post: Link,
    },

    /// Upvote a post or comment
    Upvote {
        /// Link to the post or comment
        #[arg(value_parser = parse_link)]
        target: Link,
    },

    /// Downvote a post or comment
    Downvote {
        /// Link to the post or comment
        #[arg(value_parser = parse_link)]
        target: Link,
    },

    /// Search for subreddits
    SearchSubreddits {
        /// Search terms
        query: String,

        /// Maximum number of subreddits to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Search for posts
    SearchPosts {
        /// Search terms
        query: String,

        /// Only search this subreddit
        #[arg(long, value_parser = parse_subreddit)]
        subreddit: Option<String>,

        /// Maximum number of posts to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Search the newest comments for some text
    SearchComments {
        /// Text to look for (case-insensitive)
        query: String,

        /// Only search this subreddit
        #[arg(long, value_parser = parse_subreddit)]
        subreddit: Option<String>,

        /// Maximum number of comments to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show the hot posts in a subreddit
    Hot {
        /// Subreddit name (with or without r/)
        #[arg(value_parser = parse_subreddit)]
        subreddit: String,

        /// Maximum number of posts to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show popular subreddits
    Trending {
        /// Maximum number of subreddits to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show a user's profile
    UserProfile {
        /// Reddit username (with or without u/)
        #[arg(value_parser = parse_username)]
        username: String,
    },

    /// Show a user's newest posts
    UserPosts {
        /// Reddit username (with or without u/)
        #[arg(value_parser = parse_username)]
        username: String,

        /// Maximum number of posts to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show a user's newest comments
    UserComments {
        /// Reddit username (with or without u/)
        #[arg(value_parser = parse_username)]
        username: String,

        /// Maximum number of comments to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Add a user to your friends
    Follow {
        /// Reddit username (with or without u/)
        #[arg(value_parser = parse_username)]
        username: String,
    },

    /// Remove a user from your friends
    Unfollow {
        /// Reddit username (with or without u/)
        #[arg(value_parser = parse_username)]
        username: String,
    },

    /// List your friends
    Friends,

    /// Show details about a subreddit
    SubredditInfo {
        /// Subreddit name (with or without r/)
        #[arg(value_parser = parse_subreddit)]
        subreddit: String,
    },

    /// Subscribe to a subreddit
    Subscribe {
        /// Subreddit name (with or without r/)
        #[arg(value_parser = parse_subreddit)]
        subreddit: String,
    },

    /// Unsubscribe from a subreddit
    Unsubscribe {
        /// Subreddit name (with or without r/)
        #[arg(value_parser = parse_subreddit)]
        subreddit: String,
    },

    /// List a subreddit's moderators
    Moderators {
        /// Subreddit name (with or without r/)
        #[arg(value_parser = parse_subreddit)]
        subreddit: String,
    },

    /// List the link flairs available in a subreddit
    Flairs {
        /// Subreddit name (with or without r/)
        #[arg(value_parser = parse_subreddit)]
        subreddit: String,
    },

    /// Save a post or comment
    Save {
        /// Link to the post or comment
        #[arg(value_parser = parse_link)]
        target: Link,
    },

    /// Unsave a post or comment
    Unsave {
        /// Link to the post or comment
        #[arg(value_parser = parse_link)]
        target: Link,
    },

    /// List your saved posts
    SavedPosts {
        /// Maximum number of posts to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Send a private message
    Message {
        /// Recipient (with or without u/)
        #[arg(value_parser = parse_username)]
        username: String,

        /// Message subject
        subject: String,

        /// Message text
        body: String,
    },

    /// Show unread messages in your inbox
    Inbox {
        /// Maximum number of messages to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Watch a post for new comments
    Monitor {
        /// Link to the post
        #[arg(value_parser = parse_thread_link)]
        post: Link,

        /// Seconds to wait between checks
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        /// Number of times to check
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        max_checks: u32,
    },

    /// Show the comments on a post
    Responses {
        /// Link to the post
        #[arg(value_parser = parse_thread_link)]
        post: Link,

        /// Maximum number of comments to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Check your credentials by showing who you are logged in as
    Whoami,
}

/// Runs commands against the Reddit API.
#[derive(Debug)]
pub struct Runner<A: Api, C: Clock = SystemClock> {
    api: A,
    opts: ViewOptions,
    clock: C,
}

impl<A: Api> Runner<A> {
    /// Creates a new program runner that renders output with `opts`.
    pub fn new(api: A, opts: ViewOptions) -> Self {
        Self {
            api,
            opts,
            clock: SystemClock,
        }
    }
}

impl<A: Api, C: Clock> Runner<A, C> {
    /// Uses `clock` instead of the system clock to tell how old things are.
    pub fn with_clock<D: Clock>(self, clock: D) -> Runner<A, D> {
        Runner {
            api: self.api,
            opts: self.opts,
            clock,
        }
    }

    /// The API the runner talks to.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Runs `command`, writing its output to `out`.
    pub async fn run<W: Write>(&self, command: &Command, out: &mut W) -> Result<()> {
        debug!("Running {command:?}");
        match command {
            Command::Post {
                subreddit,
                title,
                content,
                url,
                flair,
            } => {
                let body = match url {
                    Some(url) => PostBody::Link(url.clone()),
                    None => PostBody::Text(content.clone().unwrap_or_default()),
                };
                let new_post = NewPost {
                    subreddit: subreddit.clone(),
                    title: title.clone(),
                    body,
                    flair_id: flair.clone(),
                };
                self.run_post(&new_post, out).await
            }
            Command::Comment { post, text } => self.run_comment(post, text, out).await,
            Command::Reply { comment, text } => self.run_reply(comment, text, out).await,
            Command::EditPost { post, content } => self.run_edit_post(post, content, out).await,
            Command::EditComment { comment, content } => {
                self.run_edit_comment(comment, content, out).await
            }
            Command::Delete { post } => self.run_delete(post, out).await,
            Command::Upvote { target } => self.run_vote(target, Vote::Up, out).await,
            Command::Downvote { target } => self.run_vote(target, Vote::Down, out).await,
            Command::SearchSubreddits { query, limit } => {
                let subreddits = self
                    .api
                    .listing(&Feed::search_subreddits(query), *limit)
                    .await?;
                self.print_list(
                    out,
                    &format!("Subreddits matching '{query}':"),
                    &format!("No subreddits found matching '{query}'"),
                    &subreddits,
                    &self.opts.truncated(SUMMARY_LENGTH),
                )
            }
            Command::SearchPosts {
                query,
                subreddit,
                limit,
            } => {
                let scope = Scope::from_subreddit(subreddit.as_deref());
                let posts = self
                    .api
                    .listing(&Feed::search(query, &scope), *limit)
                    .await?;
                self.print_list(
                    out,
                    &format!("Posts matching '{query}' in {scope}:"),
                    &format!("No posts found matching '{query}' in {scope}"),
                    &posts,
                    &self.opts,
                )
            }
            Command::SearchComments {
                query,
                subreddit,
                limit,
            } => {
                let scope = Scope::from_subreddit(subreddit.as_deref());
                self.run_search_comments(query, &scope, *limit, out).await
            }
            Command::Hot { subreddit, limit } => {
                let posts = self.api.listing(&Feed::hot(subreddit), *limit).await?;
                self.print_list(
                    out,
                    &format!("Hot posts in r/{subreddit}:"),
                    &format!("No hot posts found in r/{subreddit}"),
                    &posts,
                    &self.opts,
                )
            }
            Command::Trending { limit } => {
                let subreddits = self
                    .api
                    .listing(&Feed::popular_subreddits(), *limit)
                    .await?;
                self.print_list(
                    out,
                    "Trending subreddits:",
                    "No trending subreddits found",
                    &subreddits,
                    &self.opts.truncated(SUMMARY_LENGTH),
                )
            }
            Command::UserProfile { username } => {
                let account = self.api.redditor(username).await?;
                writeln!(out, "{}", account.view(&self.opts, &self.clock))?;
                Ok(())
            }
            Command::UserPosts { username, limit } => {
                let posts = self
                    .api
                    .listing(&Feed::submitted_by(username), *limit)
                    .await?;
                self.print_list(
                    out,
                    &format!("Posts by u/{username}:"),
                    &format!("No posts found for u/{username}"),
                    &posts,
                    &self.opts,
                )
            }
            Command::UserComments { username, limit } => {
                let comments = self
                    .api
                    .listing(&Feed::comments_by(username), *limit)
                    .await?;
                self.print_list(
                    out,
                    &format!("Comments by u/{username}:"),
                    &format!("No comments found for u/{username}"),
                    &comments,
                    &self.opts.truncated(SUMMARY_LENGTH),
                )
            }
            Command::Follow { username } => {
                self.api.befriend(username, true).await?;
                self.confirm(out, format!("Followed u/{username}"))
            }
            Command::Unfollow { username } => {
                self.api.befriend(username, false).await?;
                self.confirm(out, format!("Unfollowed u/{username}"))
            }
            Command::Friends => {
                let friends = self.api.friends().await?;
                self.print_list(
                    out,
                    "Your friends:",
                    "No friends found",
                    &friends,
                    &self.opts,
                )
            }
            Command::SubredditInfo { subreddit } => {
                let subreddit = self.api.subreddit(subreddit).await?;
                let details = SubredditDetails(&subreddit);
                writeln!(out, "{}", details.view(&self.opts, &self.clock))?;
                Ok(())
            }
            Command::Subscribe { subreddit } => {
                self.api.subscribe(subreddit, true).await?;
                self.confirm(out, format!("Subscribed to r/{subreddit}"))
            }
            Command::Unsubscribe { subreddit } => {
                self.api.subscribe(subreddit, false).await?;
                self.confirm(out, format!("Unsubscribed from r/{subreddit}"))
            }
            Command::Moderators { subreddit } => {
                let moderators = self.api.moderators(subreddit).await?;
                self.print_list(
                    out,
                    &format!("Moderators of r/{subreddit}:"),
                    &format!("No moderators found for r/{subreddit}"),
                    &moderators,
                    &self.opts,
                )
            }
            Command::Flairs { subreddit } => self.run_flairs(subreddit, out).await,
            Command::Save { target } => {
                self.api.save(&target.fullname(), true).await?;
                self.confirm(out, format!("Saved {}", describe(target)))
            }
            Command::Unsave { target } => {
                self.api.save(&target.fullname(), false).await?;
                self.confirm(out, format!("Unsaved {}", describe(target)))
            }
            Command::SavedPosts { limit } => {
                let me = self.api.me().await?;
                let posts = self
                    .api
                    .listing(&Feed::saved_by(me.name()), *limit)
                    .await?;
                self.print_list(
                    out,
                    "Your saved posts:",
                    "No saved posts found",
                    &posts,
                    &self.opts,
                )
            }
            Command::Message {
                username,
                subject,
                body,
            } => {
                self.api.message(username, subject, body).await?;
                self.confirm(out, format!("Sent message to u/{username}"))
            }
            Command::Inbox { limit } => {
                let messages = self.api.listing(&Feed::unread(), *limit).await?;
                self.print_list(
                    out,
                    "Your inbox:",
                    "No unread messages",
                    &messages,
                    &self.opts.truncated(SUMMARY_LENGTH),
                )
            }
            Command::Monitor {
                post,
                interval,
                max_checks,
            } => {
                let monitor = Monitor::new(Duration::from_secs(*interval), *max_checks);
                let interrupt = async {
                    // If the handler cannot be installed, only the check
                    // budget ends the loop.
                    if tokio::signal::ctrl_c().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                };
                monitor
                    .watch(&self.api, post_id(post)?, out, interrupt)
                    .await?;
                Ok(())
            }
            Command::Responses { post, limit } => self.run_responses(post, *limit, out).await,
            Command::Whoami => {
                let me = self.api.me().await?;
                writeln!(out, "Logged in as u/{}", me.name())?;
                Ok(())
            }
        }
    }

    fn confirm<W: Write>(&self, out: &mut W, message: String) -> Result<()> {
        writeln!(out, "{}", message.green())?;
        Ok(())
    }

    fn print_list<V: Viewable, W: Write>(
        &self,
        out: &mut W,
        header: &str,
        empty: &str,
        items: &[V],
        opts: &ViewOptions,
    ) -> Result<()> {
        if items.is_empty() {
            writeln!(out, "{empty}")?;
        } else {
            writeln!(out, "{}\n", header.bold())?;
            writeln!(out, "{}", numbered(items, opts, &self.clock))?;
        }
        Ok(())
    }

    async fn ensure_author(&self, author: &str, action: &str) -> Result<()> {
        let me = self.api.me().await?;
        if author.eq_ignore_ascii_case(me.name()) {
            Ok(())
        } else {
            info!("{author} is not {}", me.name());
            Err(Error::Forbidden(format!("you can only {action}")))
        }
    }

    async fn run_post<W: Write>(&self, new_post: &NewPost, out: &mut W) -> Result<()> {
        let submitted = self.api.submit(new_post).await?;
        let post = self.api.post(submitted.id()).await?;
        self.confirm(
            out,
            format!("Posted to r/{}: {}", new_post.subreddit, post.title()),
        )?;
        writeln!(out, "\nPost stats:")?;
        writeln!(out, "  URL: {}", post.permalink())?;
        writeln!(out, "  Score: {}", post.score())?;
        writeln!(out, "  Comments: {}", post.num_comments())?;
        Ok(())
    }

    async fn run_comment<W: Write>(&self, link: &Link, text: &str, out: &mut W) -> Result<()> {
        let post = self.api.post(post_id(link)?).await?;
        let comment = self.api.reply(post.fullname(), text).await?;
        self.confirm(out, format!("Commented on: {}", post.title()))?;
        writeln!(out, "Comment: {}", truncate(text, ECHO_LENGTH))?;
        writeln!(out, "URL: {}", comment.permalink())?;
        Ok(())
    }

    async fn run_reply<W: Write>(&self, link: &Link, text: &str, out: &mut W) -> Result<()> {
        let parent = self.api.comment(comment_id(link)?).await?;
        let reply = self.api.reply(parent.fullname(), text).await?;
        self.confirm(out, format!("Replied to u/{}", parent.author()))?;
        writeln!(out, "Reply: {}", truncate(text, ECHO_LENGTH))?;
        writeln!(out, "URL: {}", reply.permalink())?;
        Ok(())
    }

    async fn run_edit_post<W: Write>(&self, link: &Link, content: &str, out: &mut W) -> Result<()> {
        let post = self.api.post(post_id(link)?).await?;
        self.ensure_author(post.author(), "edit your own posts")
            .await?;
        self.api.edit(post.fullname(), content).await?;
        self.confirm(out, format!("Edited post: {}", post.title()))
    }

    async fn run_edit_comment<W: Write>(
        &self,
        link: &Link,
        content: &str,
        out: &mut W,
    ) -> Result<()> {
        let comment = self.api.comment(comment_id(link)?).await?;
        self.ensure_author(comment.author(), "edit your own comments")
            .await?;
        self.api.edit(comment.fullname(), content).await?;
        self.confirm(out, format!("Edited comment: {}", comment.permalink()))
    }

    async fn run_delete<W: Write>(&self, link: &Link, out: &mut W) -> Result<()> {
        let post = self.api.post(post_id(link)?).await?;
        self.ensure_author(post.author(), "delete your own posts")
            .await?;
        self.api.delete(post.fullname()).await?;
        self.confirm(out, format!("Deleted post: {}", post.title()))
    }

    async fn run_vote<W: Write>(&self, target: &Link, vote: Vote, out: &mut W) -> Result<()> {
        self.api.vote(&target.fullname(), vote).await?;
        let verb = match vote {
            Vote::Up => "Upvoted",
            Vote::Down => "Downvoted",
        };
        self.confirm(out, format!("{verb} {}", describe(target)))
    }

    async fn run_search_comments<W: Write>(
        &self,
        query: &str,
        scope: &Scope,
        limit: usize,
        out: &mut W,
    ) -> Result<()> {
        // Reddit has no comment search, so scan a window of the newest
        // comments in the scope.
        let window = if limit == 0 { 0 } else { limit.max(100) };
        let needle = query.to_lowercase();
        let comments: Vec<_> = self
            .api
            .listing(&Feed::latest_comments(scope), window)
            .await?
            .into_iter()
            .filter(|comment| comment.body().to_lowercase().contains(&needle))
            .take(limit)
            .collect();
        self.print_list(
            out,
            &format!("Comments matching '{query}' in {scope}:"),
            &format!("No comments found matching '{query}' in {scope}"),
            &comments,
            &self.opts.truncated(SUMMARY_LENGTH),
        )
    }

    async fn run_flairs<W: Write>(&self, subreddit: &str, out: &mut W) -> Result<()> {
        let flairs = self.api.flairs(subreddit).await?;
        if flairs.is_empty() {
            writeln!(out, "No flairs available for r/{subreddit}")?;
        } else {
            writeln!(
                out,
                "{}\n",
                format!("Available flairs for r/{subreddit}:").bold()
            )?;
            for flair in &flairs {
                writeln!(out, "  {}", flair.view(&self.opts, &self.clock))?;
            }
        }
        Ok(())
    }

    async fn run_responses<W: Write>(&self, link: &Link, limit: usize, out: &mut W) -> Result<()> {
        let (post, comments) = self.api.thread(post_id(link)?, Some(limit)).await?;
        writeln!(out, "{}", format!("Responses to: {}", post.title()).bold())?;
        if comments.is_empty() {
            writeln!(out, "No responses found")?;
        } else {
            writeln!(out, "Found {} responses:\n", comments.len())?;
            writeln!(out, "{}", numbered(&comments, &self.opts, &self.clock))?;
        }
        Ok(())
    }
}

fn post_id(link: &Link) -> Result<&str> {
    link.post_id()
        .ok_or_else(|| Error::Validation(format!("{link} does not name a post")))
}

fn comment_id(link: &Link) -> Result<&str> {
    match link {
        Link::Comment { id, .. } => Ok(id.as_str()),
        Link::Post(_) => Err(Error::Validation(format!("{link} does not name a comment"))),
    }
}

fn describe(link: &Link) -> String {
    match link {
        Link::Post(_) => format!("post {}", link.fullname()),
        Link::Comment { .. } => format!("comment {}", link.fullname()),
    }
}

/// Runs the command-line program and returns the process exit code.
///
/// Errors are reported on standard error.
pub async fn run(config: Config) -> i32 {
    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .parse_default_env()
        .init();

    match execute(&config).await {
        Ok(()) => exitcode::OK,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            if let Some(hint) = err.hint() {
                eprintln!("{hint}");
            }
            err.exit_code()
        }
    }
}

async fn execute(config: &Config) -> Result<()> {
    // Credentials are checked before anything touches the network.
    let credentials = Credentials::load(config.config_path())?;
    let api = Reddit::login(&credentials).await?;

    let opts = ViewOptions::build()
        .utc(config.utc())
        .textwidth(textwrap::termwidth())
        .build();
    let runner = Runner::new(api, opts);
    let mut stdout = io::stdout().lock();
    runner.run(config.command(), &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}
