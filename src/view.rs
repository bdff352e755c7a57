// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Draws viewable objects into a terminal window.

use crate::clock::{Clock, HasAge};
use crate::reddit::thing::{Account, Comment, Flair, Message, Post, Subreddit, UserRef};
use crate::text::{truncate, with_separators, wrap};
use colored::Colorize;
use indoc::formatdoc;
use itertools::Itertools;

/// Length at which bodies are cut off in overview listings.
pub const SUMMARY_LENGTH: usize = 200;

/// View renderer options.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    utc: bool,
    textwidth: usize,
    truncate: Option<usize>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            utc: false,
            textwidth: 80,
            truncate: None,
        }
    }
}

impl ViewOptions {
    /// Incrementally builds a new set of view options.
    ///
    /// # Examples
    ///
    /// ```
    /// use reddit_cli::view::ViewOptions;
    /// let opts = ViewOptions::build().utc(true).textwidth(100).build();
    /// ```
    pub fn build() -> ViewOptionsBuilder {
        ViewOptionsBuilder::default()
    }

    /// The same options, but with bodies cut off after `max` characters.
    pub fn truncated(&self, max: usize) -> Self {
        Self {
            truncate: Some(max),
            ..self.clone()
        }
    }

    fn body(&self, text: &str) -> String {
        match self.truncate {
            Some(max) => truncate(text, max),
            None => wrap(text, self.textwidth),
        }
    }
}

/// A builder for view options.
///
/// You probably don't want to use this directly; call [`ViewOptions::build()`]
/// and construct it incrementally instead.
#[derive(Debug, Default)]
#[must_use]
pub struct ViewOptionsBuilder {
    utc: bool,
    textwidth: Option<usize>,
}

impl ViewOptionsBuilder {
    /// Prints timestamps in UTC instead of local time.
    pub fn utc(mut self, utc: bool) -> Self {
        self.utc = utc;
        self
    }

    /// Wraps full bodies to this many columns.
    pub fn textwidth(mut self, textwidth: usize) -> Self {
        self.textwidth = Some(textwidth);
        self
    }

    /// Finalizes the [`ViewOptions`].
    pub fn build(self) -> ViewOptions {
        ViewOptions {
            utc: self.utc,
            textwidth: self.textwidth.unwrap_or(80),
            truncate: None,
        }
    }
}

/// Marks an item that can be converted into a string for display on a terminal.
pub trait Viewable {
    /// Converts the item into a string for display on a terminal.
    fn view<C: Clock>(&self, opts: &ViewOptions, clock: &C) -> String;
}

/// Renders items as a numbered list, one blank line between entries.
///
/// Continuation lines are indented to line up under the first line.
pub fn numbered<V: Viewable, C: Clock>(items: &[V], opts: &ViewOptions, clock: &C) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let view = item.view(opts, clock);
            let mut lines = view.lines();
            let first = lines.next().unwrap_or_default();
            let rest = lines.map(|line| format!("   {line}")).join("\n");
            if rest.is_empty() {
                format!("{}. {first}", i + 1)
            } else {
                format!("{}. {first}\n{rest}", i + 1)
            }
        })
        .join("\n\n")
}

impl Viewable for Post {
    fn view<C: Clock>(&self, opts: &ViewOptions, _: &C) -> String {
        formatdoc! {"
            {}
            r/{} | u/{} | {} points | {} comments
            {}
            {}",
            self.title().bold(),
            self.subreddit(),
            self.author(),
            self.score(),
            self.num_comments(),
            self.created_at(opts.utc),
            self.permalink(),
        }
    }
}

impl Viewable for Comment {
    fn view<C: Clock>(&self, opts: &ViewOptions, _: &C) -> String {
        let byline = if self.subreddit().is_empty() {
            format!("u/{} | {} points", self.author(), self.score())
        } else {
            format!(
                "u/{} in r/{} | {} points",
                self.author(),
                self.subreddit(),
                self.score()
            )
        };
        formatdoc! {"
            {}
            {}
            {}
            {}",
            byline.bold(),
            self.created_at(opts.utc),
            opts.body(&self.body()),
            self.permalink(),
        }
    }
}

fn count(n: Option<i64>) -> String {
    n.map(with_separators).unwrap_or_else(|| String::from("N/A"))
}

impl Viewable for Subreddit {
    fn view<C: Clock>(&self, opts: &ViewOptions, _: &C) -> String {
        let description = if self.public_description().is_empty() {
            self.description()
        } else {
            self.public_description()
        };
        let mut s = formatdoc! {"
            {}
            {}
            {}
            {} subscribers | {} active
            {}",
            format!("r/{}", self.name()).bold(),
            self.title(),
            opts.body(&description),
            count(self.subscribers()),
            count(self.active_users()),
            self.url(),
        };
        if self.is_nsfw() {
            s += &format!("\n{}", "NSFW".red());
        }
        s
    }
}

/// The full description of a subreddit, as opposed to the summary shown
/// in search results.
#[derive(Debug)]
pub struct SubredditDetails<'a>(pub &'a Subreddit);

impl Viewable for SubredditDetails<'_> {
    fn view<C: Clock>(&self, opts: &ViewOptions, _: &C) -> String {
        let sub = self.0;
        let mut s = formatdoc! {"
            {}
            Title: {}
            Description: {}
            Public Description: {}
            Subscribers: {}
            Active Users: {}
            Created: {}
            URL: {}
            Submission Type: {}
            Language: {}",
            format!("Information about r/{}:", sub.name()).bold(),
            sub.title(),
            sub.description(),
            sub.public_description(),
            count(sub.subscribers()),
            count(sub.active_users()),
            sub.created_at(opts.utc),
            sub.url(),
            sub.submission_type(),
            sub.lang(),
        };
        if sub.is_nsfw() {
            s += "\nNSFW: Yes";
        }
        if sub.is_quarantined() {
            s += "\nQuarantined: Yes";
        }
        s
    }
}

impl Viewable for Account {
    fn view<C: Clock>(&self, opts: &ViewOptions, clock: &C) -> String {
        let mut s = formatdoc! {"
            {}
            Created: {} ({} days ago)
            Comment Karma: {}
            Link Karma: {}
            Total Karma: {}
            URL: {}",
            format!("Profile of u/{}:", self.name()).bold(),
            self.created_at(opts.utc),
            self.age(clock).num_days(),
            with_separators(self.comment_karma()),
            with_separators(self.link_karma()),
            with_separators(self.total_karma()),
            self.url(),
        };
        for (flag, label) in [
            (self.is_employee(), "Reddit Employee"),
            (self.is_mod(), "Moderator"),
            (self.is_gold(), "Reddit Premium"),
            (self.has_verified_email(), "Verified Email"),
        ] {
            if flag {
                s += &format!("\n{label}: Yes");
            }
        }
        s
    }
}

impl Viewable for Message {
    fn view<C: Clock>(&self, opts: &ViewOptions, _: &C) -> String {
        formatdoc! {"
            {}
            From: u/{}
            {}
            {}
            {}",
            self.subject().bold(),
            self.author(),
            opts.body(&self.body()),
            self.created_at(opts.utc),
            self.url(),
        }
    }
}

impl Viewable for Flair {
    fn view<C: Clock>(&self, _: &ViewOptions, _: &C) -> String {
        format!(
            "ID: {} | Text: {} | CSS: {}",
            self.id(),
            self.text(),
            self.css_class()
        )
    }
}

impl Viewable for UserRef {
    fn view<C: Clock>(&self, _: &ViewOptions, _: &C) -> String {
        format!("u/{}\n{}", self.name().bold(), self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reddit::thing::Listing;
    use crate::test_utils::{FrozenClock, load_data, load_output};
    use pretty_assertions::assert_eq;

    fn opts() -> ViewOptions {
        colored::control::set_override(false);
        ViewOptions::build().utc(true).build()
    }

    fn listing<T: crate::reddit::thing::Thing>(name: &str) -> Vec<T> {
        Listing::parse(&load_data(name)).unwrap().things().unwrap()
    }

    mod view_options {
        use super::super::*;

        #[test]
        fn it_returns_default_options() {
            let opts = ViewOptions::default();
            assert!(!opts.utc);
            assert_eq!(opts.textwidth, 80);
            assert_eq!(opts.truncate, None);
        }

        #[test]
        fn it_returns_custom_options() {
            let opts = ViewOptions::build().utc(true).textwidth(40).build();
            assert!(opts.utc);
            assert_eq!(opts.textwidth, 40);
            assert_eq!(opts.truncate, None);
        }

        #[test]
        fn it_truncates_an_existing_set_of_options() {
            let opts = ViewOptions::build().utc(true).build().truncated(200);
            assert!(opts.utc);
            assert_eq!(opts.truncate, Some(200));
        }
    }

    #[test]
    fn it_formats_a_post() {
        let posts: Vec<Post> = listing("default/r_rust_hot");
        let actual = posts[0].view(&opts(), &FrozenClock::default());
        assert_eq!(actual, load_output("post_p1"));
    }

    #[test]
    fn it_formats_a_truncated_comment() {
        let comments: Vec<Comment> = listing("default/user_spez_comments");
        let actual = comments[1].view(&opts().truncated(SUMMARY_LENGTH), &FrozenClock::default());
        let body = actual.lines().nth(2).unwrap();
        assert_eq!(body.chars().count(), SUMMARY_LENGTH + 3);
        assert!(body.ends_with("..."));
    }

    #[test]
    fn it_wraps_full_comments() {
        let comments: Vec<Comment> = listing("default/user_spez_comments");
        let opts = ViewOptions::build().utc(true).textwidth(40).build();
        let actual = comments[1].view(&opts, &FrozenClock::default());
        let body: Vec<_> = actual.lines().skip(2).collect();
        let body = &body[..body.len() - 1];
        assert!(body.len() > 1, "{actual}");
        assert!(body.iter().all(|line| line.chars().count() <= 40), "{actual}");
        assert!(!actual.contains("..."));
    }

    #[test]
    fn it_formats_a_profile() {
        let account = Account::parse(&load_data("default/user_spez_about")).unwrap();
        let actual = account.view(&opts(), &FrozenClock::default());
        assert_eq!(actual, load_output("profile_spez"));
    }

    #[test]
    fn it_formats_subreddit_details() {
        let data = load_data("default/r_rust_about");
        let envelope: crate::reddit::thing::Envelope = serde_json::from_str(&data).unwrap();
        let subreddit: Subreddit = envelope.into_thing().unwrap().unwrap();
        let actual = SubredditDetails(&subreddit).view(&opts(), &FrozenClock::default());
        assert_eq!(actual, load_output("subreddit_rust"));
    }

    #[test]
    fn it_formats_flairs() {
        let flairs = Flair::parse_all(&load_data("default/r_rust_api_link_flair_v2")).unwrap();
        let actual = flairs[1].view(&opts(), &FrozenClock::default());
        assert_eq!(actual, "ID: flair-2 | Text: discussion | CSS: ");
    }

    #[test]
    fn it_numbers_lists() {
        let users = UserRef::parse_list(&load_data("default/r_rust_about_moderators")).unwrap();
        let actual = numbered(&users, &opts(), &FrozenClock::default());
        let expected = indoc::indoc! {"
            1. u/modone
               https://reddit.com/u/modone

            2. u/modtwo
               https://reddit.com/u/modtwo"};
        assert_eq!(actual, expected);
    }

    #[test]
    fn it_numbers_an_empty_list() {
        let users: Vec<UserRef> = Vec::new();
        assert_eq!(numbered(&users, &opts(), &FrozenClock::default()), "");
    }
}
