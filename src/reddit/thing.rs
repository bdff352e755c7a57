// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! A "thing" in the Reddit sense.
//!
//! Historically in the Reddit API and its old source code, a "Thing" was
//! any element of the Reddit system: users, posts, comments, etc. Every
//! thing has a _kind_ (`t1` for comments, `t3` for posts, and so on) and
//! arrives wrapped in a `{"kind": ..., "data": {...}}` envelope. This module
//! encapsulates that idea and provides an easy way to more or less work with
//! JSON data from the Reddit API.

use crate::clock::{DateTime, HasAge, Utc, from_reddit_timestamp};
use crate::text::convert_html_entities;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Base URL for links printed for the user.
pub const REDDIT_URL: &str = "https://reddit.com";

fn deleted() -> String {
    String::from("[deleted]")
}

fn deleted_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(deleted))
}

/// A type of Reddit data that arrives wrapped in a kind/data envelope.
pub trait Thing: DeserializeOwned + Send {
    /// The kind tag Reddit uses for this type, such as `t3`.
    const KIND: &'static str;

    /// True if a listing entry of the given `kind` can be read as this type.
    fn accepts(kind: &str) -> bool {
        kind == Self::KIND
    }
}

/// A page of things returned by a listing endpoint.
#[derive(Debug, Deserialize)]
pub struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Envelope>,
    #[serde(default)]
    after: Option<String>,
}

/// A single thing wrapped in its kind/data envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    kind: String,
    data: Value,
}

impl Envelope {
    /// Unwraps the thing, if it is of the requested type.
    pub fn into_thing<T: Thing>(self) -> Option<serde_json::Result<T>> {
        if T::accepts(&self.kind) {
            Some(serde_json::from_value(self.data))
        } else {
            None
        }
    }
}

impl Listing {
    /// Parses a listing from a raw API response.
    pub fn parse(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    /// Cursor for the next page, if there is one.
    pub fn after(&self) -> Option<&str> {
        self.data.after.as_deref()
    }

    /// True if the page has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.data.children.is_empty()
    }

    /// Consumes the listing and returns the things of type `T` in it.
    ///
    /// Entries of other kinds, such as the "load more comments" stubs found
    /// in comment trees, are skipped.
    pub fn things<T: Thing>(self) -> serde_json::Result<Vec<T>> {
        self.data
            .children
            .into_iter()
            .filter_map(|child| child.into_thing::<T>())
            .collect()
    }
}

/// A Reddit post (an article or self post).
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Post {
    id: String,
    name: String,
    title: String,
    #[serde(default = "deleted", deserialize_with = "deleted_if_null")]
    author: String,
    subreddit: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u64,
    permalink: String,
    created_utc: f64,
}

impl Thing for Post {
    const KIND: &'static str = "t3";
}

impl Post {
    /// Base-36 identifier of the post.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The post's fullname, such as `t3_abc123`.
    pub fn fullname(&self) -> &str {
        &self.name
    }

    /// Post title, with HTML entities decoded.
    pub fn title(&self) -> String {
        convert_html_entities(&self.title)
    }

    /// Username of the author, or `[deleted]`.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Name of the subreddit the post appears in, without the `r/` prefix.
    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    /// Current score.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Number of comments on the post.
    pub fn num_comments(&self) -> u64 {
        self.num_comments
    }

    /// Full URL of the post's comment page.
    pub fn permalink(&self) -> String {
        format!("{REDDIT_URL}{}", self.permalink)
    }
}

impl HasAge for Post {
    fn created_utc(&self) -> DateTime<Utc> {
        from_reddit_timestamp(self.created_utc)
    }
}

/// A Reddit comment.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Comment {
    id: String,
    name: String,
    #[serde(default = "deleted", deserialize_with = "deleted_if_null")]
    author: String,
    body: String,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    permalink: String,
    created_utc: f64,
}

impl Thing for Comment {
    const KIND: &'static str = "t1";
}

impl Comment {
    /// Base-36 identifier of the comment.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The comment's fullname, such as `t1_abc123`.
    pub fn fullname(&self) -> &str {
        &self.name
    }

    /// Username of the author, or `[deleted]`.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Comment text, with HTML entities decoded.
    pub fn body(&self) -> String {
        convert_html_entities(&self.body)
    }

    /// Name of the subreddit the comment appears in.
    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    /// Current score.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Full URL of the comment.
    pub fn permalink(&self) -> String {
        format!("{REDDIT_URL}{}", self.permalink)
    }
}

impl HasAge for Comment {
    fn created_utc(&self) -> DateTime<Utc> {
        from_reddit_timestamp(self.created_utc)
    }
}

/// A subreddit.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Subreddit {
    display_name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    public_description: Option<String>,
    #[serde(default)]
    subscribers: Option<i64>,
    #[serde(default)]
    active_user_count: Option<i64>,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    over18: Option<bool>,
    #[serde(default)]
    quarantine: Option<bool>,
    #[serde(default)]
    submission_type: Option<String>,
    #[serde(default)]
    lang: Option<String>,
}

impl Thing for Subreddit {
    const KIND: &'static str = "t5";
}

impl Subreddit {
    /// Name of the subreddit, without the `r/` prefix.
    pub fn name(&self) -> &str {
        &self.display_name
    }

    /// Subreddit title, with HTML entities decoded.
    pub fn title(&self) -> String {
        convert_html_entities(&self.title)
    }

    /// The sidebar description, in Markdown.
    pub fn description(&self) -> String {
        convert_html_entities(self.description.as_deref().unwrap_or_default())
    }

    /// The short description shown to non-subscribers.
    pub fn public_description(&self) -> String {
        convert_html_entities(self.public_description.as_deref().unwrap_or_default())
    }

    /// Number of subscribers, if Reddit disclosed it.
    pub fn subscribers(&self) -> Option<i64> {
        self.subscribers
    }

    /// Number of users currently active, if Reddit disclosed it.
    pub fn active_users(&self) -> Option<i64> {
        self.active_user_count
    }

    /// Full URL of the subreddit.
    pub fn url(&self) -> String {
        format!("{REDDIT_URL}/r/{}", self.display_name)
    }

    /// True if the subreddit is marked NSFW.
    pub fn is_nsfw(&self) -> bool {
        self.over18.unwrap_or(false)
    }

    /// True if the subreddit is quarantined.
    pub fn is_quarantined(&self) -> bool {
        self.quarantine.unwrap_or(false)
    }

    /// Kinds of posts allowed: "any", "link", or "self".
    pub fn submission_type(&self) -> &str {
        self.submission_type.as_deref().unwrap_or("any")
    }

    /// Primary language of the subreddit.
    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or_default()
    }
}

impl HasAge for Subreddit {
    fn created_utc(&self) -> DateTime<Utc> {
        from_reddit_timestamp(self.created_utc)
    }
}

/// Reddit user account data.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Account {
    name: String,
    created_utc: f64,
    #[serde(default)]
    comment_karma: i64,
    #[serde(default)]
    link_karma: i64,
    #[serde(default)]
    is_employee: bool,
    #[serde(default)]
    is_mod: bool,
    #[serde(default)]
    is_gold: bool,
    #[serde(default)]
    has_verified_email: Option<bool>,
}

impl Thing for Account {
    const KIND: &'static str = "t2";
}

impl Account {
    /// Parses the response of `/user/<name>/about` or `/api/v1/me`.
    ///
    /// The former wraps the account in a kind/data envelope; the latter
    /// does not.
    pub fn parse(data: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(data)?;
        match value.get("data") {
            Some(data) if value.get("kind").is_some() => serde_json::from_value(data.clone()),
            _ => serde_json::from_value(value),
        }
    }

    /// The username.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// User's current karma for comments.
    pub fn comment_karma(&self) -> i64 {
        self.comment_karma
    }

    /// User's current karma for submissions.
    pub fn link_karma(&self) -> i64 {
        self.link_karma
    }

    /// Sum of comment and link karma.
    pub fn total_karma(&self) -> i64 {
        self.comment_karma.saturating_add(self.link_karma)
    }

    /// True if the user works for Reddit.
    pub fn is_employee(&self) -> bool {
        self.is_employee
    }

    /// True if the user moderates at least one subreddit.
    pub fn is_mod(&self) -> bool {
        self.is_mod
    }

    /// True if the user has Reddit Premium.
    pub fn is_gold(&self) -> bool {
        self.is_gold
    }

    /// True if the user has verified their e-mail address.
    pub fn has_verified_email(&self) -> bool {
        self.has_verified_email.unwrap_or(false)
    }

    /// Full URL of the user's profile.
    pub fn url(&self) -> String {
        format!("{REDDIT_URL}/u/{}", self.name)
    }
}

impl HasAge for Account {
    fn created_utc(&self) -> DateTime<Utc> {
        from_reddit_timestamp(self.created_utc)
    }
}

/// A private message, or a comment reply delivered to the inbox.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Message {
    id: String,
    #[serde(default = "deleted", deserialize_with = "deleted_if_null")]
    author: String,
    #[serde(default)]
    subject: String,
    body: String,
    created_utc: f64,
}

impl Thing for Message {
    const KIND: &'static str = "t4";

    fn accepts(kind: &str) -> bool {
        kind == Self::KIND || kind == Comment::KIND
    }
}

impl Message {
    /// Base-36 identifier of the message.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Username of the sender, or `[deleted]`.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Message subject.
    pub fn subject(&self) -> String {
        convert_html_entities(&self.subject)
    }

    /// Message text, with HTML entities decoded.
    pub fn body(&self) -> String {
        convert_html_entities(&self.body)
    }

    /// Full URL of the message.
    pub fn url(&self) -> String {
        format!("{REDDIT_URL}/message/messages/{}", self.id)
    }
}

impl HasAge for Message {
    fn created_utc(&self) -> DateTime<Utc> {
        from_reddit_timestamp(self.created_utc)
    }
}

/// A link flair template.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Flair {
    id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    css_class: Option<String>,
}

impl Flair {
    /// Parses the response of `/r/<subreddit>/api/link_flair_v2`.
    pub fn parse_all(data: &str) -> serde_json::Result<Vec<Self>> {
        serde_json::from_str(data)
    }

    /// Template ID, used when submitting a post.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Flair text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// CSS class, or an empty string.
    pub fn css_class(&self) -> &str {
        self.css_class.as_deref().unwrap_or_default()
    }
}

/// A user appearing in a user list, such as a subreddit's moderators or
/// the authenticated user's friends.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UserRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserList {
    data: UserListData,
}

#[derive(Debug, Deserialize)]
struct UserListData {
    children: Vec<UserRef>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserListResponse {
    Single(UserList),
    Many(Vec<UserList>),
}

impl UserRef {
    /// Parses a `UserList` response.
    ///
    /// Some endpoints return the list directly and others wrap it in an
    /// array; both forms are accepted.
    pub fn parse_list(data: &str) -> serde_json::Result<Vec<Self>> {
        let users = match serde_json::from_str(data)? {
            UserListResponse::Single(list) => list.data.children,
            UserListResponse::Many(lists) => lists
                .into_iter()
                .flat_map(|list| list.data.children)
                .collect(),
        };
        Ok(users)
    }

    /// The username.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full URL of the user's profile.
    pub fn url(&self) -> String {
        format!("{REDDIT_URL}/u/{}", self.name)
    }
}

/// The body of a write endpoint's response when called with
/// `api_type=json`.
#[derive(Debug, Default, Deserialize)]
pub struct WriteResponse {
    #[serde(default)]
    json: WriteResponseBody,
}

#[derive(Debug, Default, Deserialize)]
struct WriteResponseBody {
    #[serde(default)]
    errors: Vec<Vec<Value>>,
    #[serde(default)]
    data: Option<Value>,
}

/// An error reported inside a successful HTTP response.
#[derive(Debug, PartialEq)]
pub struct ApiError {
    /// Error code, such as `RATELIMIT`.
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
}

impl WriteResponse {
    /// Parses a write response. An empty body is a successful response.
    pub fn parse(data: &str) -> serde_json::Result<Self> {
        if data.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_json::from_str(data)
        }
    }

    /// The first error Reddit reported, if any.
    pub fn error(&self) -> Option<ApiError> {
        let error = self.json.errors.first()?;
        let field = |i: usize| {
            error
                .get(i)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(ApiError {
            code: field(0),
            message: field(1),
        })
    }

    /// The payload of a successful response.
    pub fn data(&self) -> Option<&Value> {
        self.json.data.as_ref()
    }
}

/// Identifiers of a newly submitted post.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Submitted {
    id: String,
}

impl Submitted {
    /// Base-36 identifier of the new post.
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::load_data;

    mod listing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_parses_posts() {
            let listing = Listing::parse(&load_data("default/r_rust_hot")).unwrap();
            assert_eq!(listing.after(), Some("t3_p3"));
            let posts: Vec<Post> = listing.things().unwrap();
            assert_eq!(posts.len(), 3);
            assert_eq!(posts[0].id(), "p1");
            assert_eq!(posts[0].fullname(), "t3_p1");
            assert_eq!(posts[0].title(), "Announcing Rust 1.88 & friends");
            assert_eq!(posts[0].subreddit(), "rust");
            assert_eq!(posts[0].score(), 1523);
            assert_eq!(posts[0].num_comments(), 204);
            assert_eq!(
                posts[0].permalink(),
                "https://reddit.com/r/rust/comments/p1/announcing_rust_188/"
            );
        }

        #[test]
        fn it_skips_things_of_other_kinds() {
            let listing = Listing::parse(&load_data("default/user_testuser_saved")).unwrap();
            let posts: Vec<Post> = listing.things().unwrap();
            assert_eq!(posts.len(), 2);
        }

        #[test]
        fn it_parses_an_empty_listing() {
            let data = r#"{"kind": "Listing", "data": {"children": []}}"#;
            let listing = Listing::parse(data).unwrap();
            assert!(listing.is_empty());
            assert_eq!(listing.after(), None);
            let posts: Vec<Post> = listing.things().unwrap();
            assert!(posts.is_empty());
        }
    }

    mod post {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_renders_deleted_authors() {
            let listing = Listing::parse(&load_data("default/r_rust_hot_t3_p3")).unwrap();
            let posts: Vec<Post> = listing.things().unwrap();
            assert_eq!(posts[1].author(), "[deleted]");
        }
    }

    mod comment {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_decodes_html_entities_in_the_body() {
            let listing = Listing::parse(&load_data("default/r_all_comments")).unwrap();
            let comments: Vec<Comment> = listing.things().unwrap();
            assert_eq!(comments[0].body(), "The borrow checker & I are friends now.");
        }
    }

    mod account {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_parses_wrapped_accounts() {
            let account = Account::parse(&load_data("default/user_spez_about")).unwrap();
            assert_eq!(account.name(), "spez");
            assert_eq!(account.total_karma(), 1_012_345);
            assert!(account.is_employee());
        }

        #[test]
        fn it_parses_bare_accounts() {
            let account = Account::parse(&load_data("default/api_v1_me")).unwrap();
            assert_eq!(account.name(), "testuser");
        }
    }

    mod message {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_accepts_private_messages_and_comment_replies() {
            let listing = Listing::parse(&load_data("default/message_unread")).unwrap();
            let messages: Vec<Message> = listing.things().unwrap();
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[1].subject(), "comment reply");
        }
    }

    mod user_ref {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_parses_a_bare_user_list() {
            let users = UserRef::parse_list(&load_data("default/r_rust_about_moderators")).unwrap();
            let names: Vec<_> = users.iter().map(UserRef::name).collect();
            assert_eq!(names, vec!["modone", "modtwo"]);
        }

        #[test]
        fn it_parses_a_wrapped_user_list() {
            let data = r#"[{"kind": "UserList", "data": {"children": [{"name": "alice"}]}}]"#;
            let users = UserRef::parse_list(data).unwrap();
            assert_eq!(users[0].name(), "alice");
            assert_eq!(users[0].url(), "https://reddit.com/u/alice");
        }
    }

    mod write_response {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_treats_an_empty_body_as_success() {
            let resp = WriteResponse::parse("").unwrap();
            assert!(resp.error().is_none());
        }

        #[test]
        fn it_treats_an_empty_object_as_success() {
            let resp = WriteResponse::parse("{}").unwrap();
            assert!(resp.error().is_none());
            assert!(resp.data().is_none());
        }

        #[test]
        fn it_returns_the_first_error() {
            let resp = WriteResponse::parse(&load_data("ratelimited/api_submit")).unwrap();
            let error = resp.error().unwrap();
            assert_eq!(error.code, "RATELIMIT");
            assert!(error.message.starts_with("Looks like you've been doing that a lot."));
            assert!(error.message.ends_with("Take a break for 9 minutes before trying again."));
        }
    }
}
