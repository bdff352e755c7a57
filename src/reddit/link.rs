// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Parsing of the references users type on the command line: links to
//! posts and comments, subreddit names, and usernames.
//!
//! These parsers are used as clap value parsers, so a malformed argument is
//! rejected before credentials are read or anything is sent to Reddit.

use regex::Regex;
use reqwest::Url;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9]{1,13}$").unwrap());

static SUBREDDIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{2,21}$").unwrap());

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,20}$").unwrap());

/// A reference to a post or to a comment on a post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Link {
    /// A post, identified by its base-36 ID.
    Post(String),

    /// A comment. The post it belongs to is not always known, such as when
    /// the user passed a bare `t1_` fullname.
    Comment {
        /// ID of the post the comment was made on, if known.
        post: Option<String>,
        /// ID of the comment.
        id: String,
    },
}

impl Link {
    /// The Reddit fullname of the thing, such as `t3_abc123`.
    pub fn fullname(&self) -> String {
        match self {
            Link::Post(id) => format!("t3_{id}"),
            Link::Comment { id, .. } => format!("t1_{id}"),
        }
    }

    /// ID of the post the link points at, or of the post a comment belongs
    /// to.
    pub fn post_id(&self) -> Option<&str> {
        match self {
            Link::Post(id) => Some(id),
            Link::Comment { post, .. } => post.as_deref(),
        }
    }

    /// True if the link names a comment.
    pub fn is_comment(&self) -> bool {
        matches!(self, Link::Comment { .. })
    }

    fn from_fullname(s: &str) -> Option<Self> {
        let (kind, id) = s.split_once('_')?;
        if !ID_RE.is_match(id) {
            return None;
        }
        match kind {
            "t3" => Some(Link::Post(id.to_string())),
            "t1" => Some(Link::Comment {
                post: None,
                id: id.to_string(),
            }),
            _ => None,
        }
    }

    fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?.to_ascii_lowercase();
        let segments: Vec<&str> = url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .collect();

        if host == "redd.it" {
            return match segments.as_slice() {
                [id] if ID_RE.is_match(id) => Some(Link::Post(id.to_string())),
                _ => None,
            };
        }

        if host != "reddit.com" && !host.ends_with(".reddit.com") {
            return None;
        }

        let start = segments.iter().position(|segment| *segment == "comments")?;
        let post = *segments.get(start + 1)?;
        if !ID_RE.is_match(post) {
            return None;
        }

        // After the post ID comes either nothing, a slug, a slug and a
        // comment ID, or the literal "comment" and a comment ID.
        match &segments[start + 2..] {
            [] | [_] => Some(Link::Post(post.to_string())),
            [_, id] | [_, id, ..] if ID_RE.is_match(id) => Some(Link::Comment {
                post: Some(post.to_string()),
                id: id.to_string(),
            }),
            _ => None,
        }
    }
}

impl FromStr for Link {
    type Err = String;

    /// Parses a permalink, a share link, a `redd.it` short link, or a bare
    /// `t3_`/`t1_` fullname.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(link) = Self::from_fullname(s) {
            return Ok(link);
        }

        let with_scheme = if s.contains("://") {
            s.to_string()
        } else {
            format!("https://{}", s.trim_start_matches('/'))
        };
        Url::parse(&with_scheme)
            .ok()
            .and_then(|url| Self::from_url(&url))
            .ok_or_else(|| format!("'{s}' is not a link to a Reddit post or comment"))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fullname())
    }
}

/// Parses a link that must name a post.
pub fn parse_post_link(s: &str) -> Result<Link, String> {
    let link = Link::from_str(s)?;
    if link.is_comment() {
        Err(format!("'{s}' is a link to a comment, not a post"))
    } else {
        Ok(link)
    }
}

/// Parses a link to a post, or to a comment on a post.
///
/// Comment links resolve to the post they were made on.
pub fn parse_thread_link(s: &str) -> Result<Link, String> {
    let link = Link::from_str(s)?;
    match link.post_id() {
        Some(id) => Ok(Link::Post(id.to_string())),
        None => Err(format!("'{s}' does not name a post")),
    }
}

/// Parses a link to a post or a comment.
pub fn parse_link(s: &str) -> Result<Link, String> {
    Link::from_str(s)
}

/// Parses a link that must name a comment.
pub fn parse_comment_link(s: &str) -> Result<Link, String> {
    let link = Link::from_str(s)?;
    if link.is_comment() {
        Ok(link)
    } else {
        Err(format!("'{s}' is a link to a post, not a comment"))
    }
}

/// Parses a subreddit name, with or without a leading `r/`.
pub fn parse_subreddit(s: &str) -> Result<String, String> {
    let name = s.trim().trim_start_matches('/');
    let name = name
        .strip_prefix("r/")
        .or_else(|| name.strip_prefix("R/"))
        .unwrap_or(name);
    let name = name.trim_end_matches('/');
    if SUBREDDIT_RE.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(format!("'{s}' is not a valid subreddit name"))
    }
}

/// Parses a username, with or without a leading `u/`.
pub fn parse_username(s: &str) -> Result<String, String> {
    let name = s.trim().trim_start_matches('/');
    let name = name
        .strip_prefix("u/")
        .or_else(|| name.strip_prefix("user/"))
        .unwrap_or(name);
    let name = name.trim_end_matches('/');
    if USERNAME_RE.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(format!("'{s}' is not a valid username"))
    }
}

#[cfg(test)]
mod tests {
    mod link {
        use super::super::*;

        fn post(id: &str) -> Link {
            Link::Post(id.to_string())
        }

        fn comment(post: &str, id: &str) -> Link {
            Link::Comment {
                post: Some(post.to_string()),
                id: id.to_string(),
            }
        }

        #[test]
        fn it_parses_post_permalinks() {
            let test_cases = vec![
                "https://www.reddit.com/r/rust/comments/abc123/a_post_title/",
                "https://reddit.com/r/rust/comments/abc123/a_post_title",
                "https://old.reddit.com/r/rust/comments/abc123/",
                "http://np.reddit.com/r/rust/comments/abc123/a_post_title/?utm_source=share",
                "www.reddit.com/r/rust/comments/abc123/a_post_title/",
                "https://www.reddit.com/comments/abc123",
                "https://redd.it/abc123",
            ];
            for link in test_cases {
                assert_eq!(link.parse::<Link>(), Ok(post("abc123")), "{link}");
            }
        }

        #[test]
        fn it_parses_comment_permalinks() {
            let test_cases = vec![
                "https://www.reddit.com/r/rust/comments/abc123/a_post_title/def456/",
                "https://www.reddit.com/r/rust/comments/abc123/a_post_title/def456/?context=3",
                "https://www.reddit.com/r/rust/comments/abc123/comment/def456/",
            ];
            for link in test_cases {
                assert_eq!(link.parse::<Link>(), Ok(comment("abc123", "def456")), "{link}");
            }
        }

        #[test]
        fn it_parses_fullnames() {
            assert_eq!("t3_abc123".parse::<Link>(), Ok(post("abc123")));
            assert_eq!(
                "t1_def456".parse::<Link>(),
                Ok(Link::Comment {
                    post: None,
                    id: String::from("def456")
                })
            );
        }

        #[test]
        fn it_rejects_non_reddit_links() {
            let test_cases = vec![
                "",
                "hello",
                "https://example.com/r/rust/comments/abc123/",
                "https://notreddit.com/r/rust/comments/abc123/",
                "https://www.reddit.com/r/rust/",
                "https://www.reddit.com/r/rust/comments/",
                "https://www.reddit.com/r/rust/comments/NOT-AN-ID/",
                "t5_2qh1i",
            ];
            for link in test_cases {
                assert!(link.parse::<Link>().is_err(), "{link}");
            }
        }

        #[test]
        fn it_returns_fullnames() {
            assert_eq!(post("abc123").fullname(), "t3_abc123");
            assert_eq!(comment("abc123", "def456").fullname(), "t1_def456");
            assert_eq!(comment("abc123", "def456").to_string(), "t1_def456");
        }

        #[test]
        fn it_resolves_comment_links_to_their_post() {
            let link = "https://www.reddit.com/r/rust/comments/abc123/title/def456/";
            assert_eq!(parse_thread_link(link), Ok(post("abc123")));
            assert!(parse_thread_link("t1_def456").is_err());
        }

        #[test]
        fn it_requires_post_links_for_posts() {
            assert_eq!(parse_post_link("https://redd.it/abc123"), Ok(post("abc123")));
            let link = "https://www.reddit.com/r/rust/comments/abc123/title/def456/";
            let err = parse_post_link(link).unwrap_err();
            assert!(err.contains("not a post"), "{err}");
        }

        #[test]
        fn it_requires_comment_links_for_comments() {
            let link = "https://www.reddit.com/r/rust/comments/abc123/title/def456/";
            assert_eq!(parse_comment_link(link), Ok(comment("abc123", "def456")));
            let err = parse_comment_link("https://redd.it/abc123").unwrap_err();
            assert!(err.contains("not a comment"), "{err}");
        }
    }

    mod names {
        use super::super::*;

        #[test]
        fn it_accepts_subreddit_names_with_or_without_prefixes() {
            for name in ["rust", "r/rust", "/r/rust/", "R/rust"] {
                assert_eq!(parse_subreddit(name), Ok(String::from("rust")), "{name}");
            }
        }

        #[test]
        fn it_rejects_invalid_subreddit_names() {
            for name in ["", "r", "has space", "way_too_long_for_a_subreddit_name", "r/"] {
                assert!(parse_subreddit(name).is_err(), "{name}");
            }
        }

        #[test]
        fn it_accepts_usernames_with_or_without_prefixes() {
            for name in ["spez", "u/spez", "/u/spez", "/user/spez/"] {
                assert_eq!(parse_username(name), Ok(String::from("spez")), "{name}");
            }
            assert_eq!(parse_username("some-user_1"), Ok(String::from("some-user_1")));
        }

        #[test]
        fn it_rejects_invalid_usernames() {
            for name in ["", "ab", "no spaces", "a_username_that_is_far_too_long"] {
                assert!(parse_username(name).is_err(), "{name}");
            }
        }
    }
}
