// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! The operations the command-line program needs from Reddit.
//!
//! [`Api`] is the seam between the commands and the network. The commands
//! only ever talk to an `Api`; [`crate::reddit::Reddit`] implements it on
//! top of a [`crate::reddit::service::Service`].

use crate::error::Result;
use crate::reddit::thing::{
    Account, Comment, Flair, Message, Post, Submitted, Subreddit, Thing, UserRef,
};
use std::fmt;
use std::marker::PhantomData;

/// Largest page Reddit will return from a listing endpoint.
pub const MAX_PAGE_SIZE: usize = 100;

/// The body of a new post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostBody {
    /// A self post with Markdown text, possibly empty.
    Text(String),
    /// A link post.
    Link(String),
}

/// A post to be submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPost {
    /// Subreddit to post in, without the `r/` prefix.
    pub subreddit: String,
    /// Post title.
    pub title: String,
    /// Text or link.
    pub body: PostBody,
    /// Link flair template to apply, if any.
    pub flair_id: Option<String>,
}

/// Direction of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vote {
    /// An upvote.
    Up,
    /// A downvote.
    Down,
}

impl Vote {
    /// The value Reddit expects in the `dir` field.
    pub fn dir(&self) -> &'static str {
        match self {
            Vote::Up => "1",
            Vote::Down => "-1",
        }
    }
}

/// Where to search for posts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Every subreddit.
    All,
    /// A single subreddit.
    Subreddit(String),
}

impl Scope {
    /// Creates a scope from an optional subreddit name.
    pub fn from_subreddit(subreddit: Option<&str>) -> Self {
        match subreddit {
            Some(name) => Scope::Subreddit(name.to_string()),
            None => Scope::All,
        }
    }

    fn path_segment(&self) -> &str {
        match self {
            Scope::All => "all",
            Scope::Subreddit(name) => name,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("all subreddits"),
            Scope::Subreddit(name) => write!(f, "r/{name}"),
        }
    }
}

/// A listing endpoint that yields things of type `T`.
///
/// Feeds are paginated by [`Api::listing`], which follows Reddit's `after`
/// cursor until it has collected as many things as the caller asked for.
#[derive(Clone, Debug)]
pub struct Feed<T> {
    path: String,
    params: Vec<(&'static str, String)>,
    thing: PhantomData<fn() -> T>,
}

impl<T: Thing> Feed<T> {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
            thing: PhantomData,
        }
    }

    fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    /// Path of the endpoint, relative to the API root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fixed query parameters. Paging parameters are added per request.
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }
}

impl Feed<Post> {
    /// Hot posts in a subreddit.
    pub fn hot(subreddit: &str) -> Self {
        Self::new(format!("/r/{subreddit}/hot"))
    }

    /// Posts matching `query`.
    pub fn search(query: &str, scope: &Scope) -> Self {
        let restrict = matches!(scope, Scope::Subreddit(_));
        Self::new(format!("/r/{}/search", scope.path_segment()))
            .with("q", query)
            .with("restrict_sr", if restrict { "1" } else { "0" })
            .with("sort", "relevance")
            .with("type", "link")
    }

    /// Posts submitted by a user, newest first.
    pub fn submitted_by(username: &str) -> Self {
        Self::new(format!("/user/{username}/submitted")).with("sort", "new")
    }

    /// Posts the user has saved.
    pub fn saved_by(username: &str) -> Self {
        Self::new(format!("/user/{username}/saved")).with("type", "links")
    }
}

impl Feed<Comment> {
    /// The newest comments in a subreddit, or across Reddit.
    pub fn latest_comments(scope: &Scope) -> Self {
        Self::new(format!("/r/{}/comments", scope.path_segment()))
    }

    /// Comments written by a user, newest first.
    pub fn comments_by(username: &str) -> Self {
        Self::new(format!("/user/{username}/comments")).with("sort", "new")
    }
}

impl Feed<Subreddit> {
    /// Subreddits matching `query`.
    pub fn search_subreddits(query: &str) -> Self {
        Self::new("/subreddits/search").with("q", query)
    }

    /// The most popular subreddits.
    pub fn popular_subreddits() -> Self {
        Self::new("/subreddits/popular")
    }
}

impl Feed<Message> {
    /// Unread messages in the authenticated user's inbox.
    pub fn unread() -> Self {
        Self::new("/message/unread")
    }
}

/// Operations on Reddit on behalf of the authenticated user.
///
/// Write operations are idempotent from the caller's point of view: saving
/// a saved post or subscribing to a subreddit the user already follows
/// succeeds quietly.
pub trait Api: Send + Sync {
    /// The authenticated user's account.
    fn me(&self) -> impl Future<Output = Result<Account>> + Send;

    /// Up to `limit` things from a listing, following pagination.
    ///
    /// A `limit` of zero returns nothing without contacting Reddit.
    fn listing<T: Thing>(
        &self,
        feed: &Feed<T>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<T>>> + Send;

    /// A single post.
    fn post(&self, id: &str) -> impl Future<Output = Result<Post>> + Send;

    /// A single comment.
    fn comment(&self, id: &str) -> impl Future<Output = Result<Comment>> + Send;

    /// A post and up to `limit` of its top-level comments, in Reddit's
    /// default order. No limit fetches whatever Reddit returns by default.
    fn thread(
        &self,
        post_id: &str,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<(Post, Vec<Comment>)>> + Send;

    /// Submits a new post.
    fn submit(&self, post: &NewPost) -> impl Future<Output = Result<Submitted>> + Send;

    /// Replies to the post or comment with the given fullname.
    fn reply(&self, parent: &str, text: &str) -> impl Future<Output = Result<Comment>> + Send;

    /// Replaces the text of a self post or comment.
    fn edit(&self, fullname: &str, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// Deletes a post or comment.
    fn delete(&self, fullname: &str) -> impl Future<Output = Result<()>> + Send;

    /// Votes on a post or comment.
    fn vote(&self, fullname: &str, vote: Vote) -> impl Future<Output = Result<()>> + Send;

    /// Saves or unsaves a post or comment.
    fn save(&self, fullname: &str, saved: bool) -> impl Future<Output = Result<()>> + Send;

    /// Subscribes to or unsubscribes from a subreddit.
    fn subscribe(
        &self,
        subreddit: &str,
        subscribed: bool,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Information about a subreddit.
    fn subreddit(&self, name: &str) -> impl Future<Output = Result<Subreddit>> + Send;

    /// Link flair templates available in a subreddit.
    fn flairs(&self, subreddit: &str) -> impl Future<Output = Result<Vec<Flair>>> + Send;

    /// Moderators of a subreddit.
    fn moderators(&self, subreddit: &str) -> impl Future<Output = Result<Vec<UserRef>>> + Send;

    /// A user's public profile.
    fn redditor(&self, username: &str) -> impl Future<Output = Result<Account>> + Send;

    /// The authenticated user's friends.
    fn friends(&self) -> impl Future<Output = Result<Vec<UserRef>>> + Send;

    /// Adds or removes a friend.
    fn befriend(&self, username: &str, friend: bool) -> impl Future<Output = Result<()>> + Send;

    /// Sends a private message.
    fn message(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}
