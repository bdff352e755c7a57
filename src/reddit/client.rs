// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading and writing data through the Reddit API.

use crate::conf::Credentials;
use crate::error::{Error, Result};
use crate::reddit::api::{Api, Feed, MAX_PAGE_SIZE, NewPost, PostBody, Vote};
use crate::reddit::service::{RedditService, Service};
use crate::reddit::thing::{
    Account, Comment, Envelope, Flair, Listing, Post, Submitted, Subreddit, Thing, UserRef,
    WriteResponse,
};
use log::debug;
use serde_json::json;

/// The Reddit API, as seen by an authenticated user.
///
/// All network access goes through the [`Service`] `S`, so the client
/// can be exercised against canned responses in tests.
#[derive(Debug)]
pub struct Reddit<S: Service> {
    service: S,
}

impl Reddit<RedditService> {
    /// Logs in to Reddit with the given credentials.
    ///
    /// Returns an [`enum@Error`] if Reddit rejects the credentials or
    /// cannot be reached.
    pub async fn login(credentials: &Credentials) -> Result<Self> {
        let service = RedditService::login(credentials).await?;
        Ok(Self::new(service))
    }
}

impl<S: Service> Reddit<S> {
    /// Creates a new client that talks to Reddit through `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// The underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Sends a form to a write endpoint and checks the response for errors
    /// Reddit reports in the body of a successful response.
    async fn write(&self, path: &str, form: &[(&str, String)]) -> Result<WriteResponse> {
        let body = self.service.post(path, form).await?;
        let resp = WriteResponse::parse(&body)?;
        match resp.error() {
            Some(error) => Err(Error::from_reddit(error.code, error.message)),
            None => Ok(resp),
        }
    }

    async fn info<T: Thing>(&self, fullname: &str) -> Result<Option<T>> {
        let query = [("id", fullname.to_string())];
        let body = self.service.get("/api/info", &query).await?;
        let things = Listing::parse(&body)?.things::<T>()?;
        Ok(things.into_iter().next())
    }
}

impl<S: Service> Api for Reddit<S> {
    async fn me(&self) -> Result<Account> {
        let body = self.service.get("/api/v1/me", &[]).await?;
        Ok(Account::parse(&body)?)
    }

    async fn listing<T: Thing>(&self, feed: &Feed<T>, limit: usize) -> Result<Vec<T>> {
        let mut things: Vec<T> = Vec::with_capacity(limit.min(MAX_PAGE_SIZE));
        let mut after: Option<String> = None;

        while things.len() < limit {
            let page_size = (limit - things.len()).min(MAX_PAGE_SIZE);
            let mut query: Vec<(&str, String)> = feed.params().to_vec();
            query.push(("limit", page_size.to_string()));
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
            }

            let body = self.service.get(feed.path(), &query).await?;
            let page = Listing::parse(&body)?;
            if page.is_empty() {
                break;
            }
            after = page.after().map(String::from);
            things.extend(page.things::<T>()?);
            debug!("Fetched {} of {limit} from {}", things.len(), feed.path());

            if after.is_none() {
                break;
            }
        }

        things.truncate(limit);
        Ok(things)
    }

    async fn post(&self, id: &str) -> Result<Post> {
        self.info(&format!("t3_{id}"))
            .await?
            .ok_or_else(|| Error::NotFound(format!("no post with ID {id}")))
    }

    async fn comment(&self, id: &str) -> Result<Comment> {
        self.info(&format!("t1_{id}"))
            .await?
            .ok_or_else(|| Error::NotFound(format!("no comment with ID {id}")))
    }

    async fn thread(&self, post_id: &str, limit: Option<usize>) -> Result<(Post, Vec<Comment>)> {
        let query: Vec<(&str, String)> = match limit {
            Some(limit) => vec![("limit", limit.to_string()), ("depth", String::from("1"))],
            None => vec![("depth", String::from("1"))],
        };
        let body = self.service.get(&format!("/comments/{post_id}"), &query).await?;

        // The response is a pair of listings: the post, then its comments.
        let mut listings: Vec<Listing> = serde_json::from_str(&body)?;
        if listings.len() < 2 {
            return Err(Error::NotFound(format!("no post with ID {post_id}")));
        }
        let comments = listings.remove(1).things::<Comment>()?;
        let post = listings
            .remove(0)
            .things::<Post>()?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("no post with ID {post_id}")))?;

        let comments = match limit {
            Some(limit) => comments.into_iter().take(limit).collect(),
            None => comments,
        };
        Ok((post, comments))
    }

    async fn submit(&self, post: &NewPost) -> Result<Submitted> {
        let mut form = vec![
            ("api_type", String::from("json")),
            ("sr", post.subreddit.clone()),
            ("title", post.title.clone()),
            ("resubmit", String::from("true")),
        ];
        match &post.body {
            PostBody::Text(text) => {
                form.push(("kind", String::from("self")));
                form.push(("text", text.clone()));
            }
            PostBody::Link(url) => {
                form.push(("kind", String::from("link")));
                form.push(("url", url.clone()));
            }
        }
        if let Some(flair_id) = &post.flair_id {
            form.push(("flair_id", flair_id.clone()));
        }

        let resp = self.write("/api/submit", &form).await?;
        let data = resp
            .data()
            .cloned()
            .ok_or_else(|| Error::Reddit {
                code: String::from("NO_DATA"),
                message: String::from("Reddit did not say where the post was created"),
            })?;
        Ok(serde_json::from_value(data)?)
    }

    async fn reply(&self, parent: &str, text: &str) -> Result<Comment> {
        let form = [
            ("api_type", String::from("json")),
            ("thing_id", parent.to_string()),
            ("text", text.to_string()),
        ];
        let resp = self.write("/api/comment", &form).await?;

        // The new comment arrives as {"things": [{"kind": "t1", "data": ...}]}.
        let things = resp
            .data()
            .and_then(|data| data.get("things"))
            .cloned()
            .unwrap_or_default();
        let envelopes: Vec<Envelope> = serde_json::from_value(things)?;
        envelopes
            .into_iter()
            .find_map(|envelope| envelope.into_thing::<Comment>())
            .transpose()?
            .ok_or_else(|| Error::Reddit {
                code: String::from("NO_DATA"),
                message: String::from("Reddit did not return the new comment"),
            })
    }

    async fn edit(&self, fullname: &str, text: &str) -> Result<()> {
        let form = [
            ("api_type", String::from("json")),
            ("thing_id", fullname.to_string()),
            ("text", text.to_string()),
        ];
        self.write("/api/editusertext", &form).await?;
        Ok(())
    }

    async fn delete(&self, fullname: &str) -> Result<()> {
        self.write("/api/del", &[("id", fullname.to_string())]).await?;
        Ok(())
    }

    async fn vote(&self, fullname: &str, vote: Vote) -> Result<()> {
        let form = [
            ("id", fullname.to_string()),
            ("dir", vote.dir().to_string()),
        ];
        self.write("/api/vote", &form).await?;
        Ok(())
    }

    async fn save(&self, fullname: &str, saved: bool) -> Result<()> {
        let path = if saved { "/api/save" } else { "/api/unsave" };
        self.write(path, &[("id", fullname.to_string())]).await?;
        Ok(())
    }

    async fn subscribe(&self, subreddit: &str, subscribed: bool) -> Result<()> {
        let action = if subscribed { "sub" } else { "unsub" };
        let form = [
            ("action", action.to_string()),
            ("sr_name", subreddit.to_string()),
        ];
        self.write("/api/subscribe", &form).await?;
        Ok(())
    }

    async fn subreddit(&self, name: &str) -> Result<Subreddit> {
        let body = self.service.get(&format!("/r/{name}/about"), &[]).await?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        envelope
            .into_thing::<Subreddit>()
            .transpose()?
            .ok_or_else(|| Error::NotFound(format!("no subreddit named r/{name}")))
    }

    async fn flairs(&self, subreddit: &str) -> Result<Vec<Flair>> {
        let path = format!("/r/{subreddit}/api/link_flair_v2");
        let body = self.service.get(&path, &[]).await?;
        Ok(Flair::parse_all(&body)?)
    }

    async fn moderators(&self, subreddit: &str) -> Result<Vec<UserRef>> {
        let path = format!("/r/{subreddit}/about/moderators");
        let body = self.service.get(&path, &[]).await?;
        Ok(UserRef::parse_list(&body)?)
    }

    async fn redditor(&self, username: &str) -> Result<Account> {
        let body = self.service.get(&format!("/user/{username}/about"), &[]).await?;
        Ok(Account::parse(&body)?)
    }

    async fn friends(&self) -> Result<Vec<UserRef>> {
        let body = self.service.get("/api/v1/me/friends", &[]).await?;
        Ok(UserRef::parse_list(&body)?)
    }

    async fn befriend(&self, username: &str, friend: bool) -> Result<()> {
        let path = format!("/api/v1/me/friends/{username}");
        if friend {
            self.service.put(&path, &json!({ "name": username })).await?;
        } else {
            self.service.delete(&path).await?;
        }
        Ok(())
    }

    async fn message(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let form = [
            ("api_type", String::from("json")),
            ("to", to.to_string()),
            ("subject", subject.to_string()),
            ("text", body.to_string()),
        ];
        self.write("/api/compose", &form).await?;
        Ok(())
    }
}
