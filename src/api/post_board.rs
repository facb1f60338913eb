use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, error, info};

use crate::state::events::BackgroundEvent;

/// One post on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    /// ISO-8601 timestamp as stored by the board
    pub when: String,
}

/// Payload for a new post; the timestamp is added on submit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

impl NewPost {
    /// Trims both fields and rejects a post missing either one
    pub fn new(title: &str, body: &str) -> Result<Self> {
        let title = title.trim();
        let body = body.trim();
        if title.is_empty() || body.is_empty() {
            bail!("Enter both the title and the body text");
        }
        Ok(Self {
            title: title.to_string(),
            body: body.to_string(),
        })
    }
}

#[derive(Serialize)]
struct PostPayload<'a> {
    title: &'a str,
    body: &'a str,
    when: String,
}

#[derive(Deserialize)]
struct CreateResponse {
    name: String,
}

/// Normalize the board's `{id: {title, body, when}}` map into a list,
/// newest first. Malformed records and records without text are dropped.
pub fn posts_from_records(records: &Value) -> Vec<Post> {
    let Some(map) = records.as_object() else {
        return Vec::new();
    };

    let field = |record: &serde_json::Map<String, Value>, key: &str| {
        record
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let mut posts: Vec<Post> = map
        .iter()
        .filter_map(|(id, record)| {
            let record = record.as_object()?;
            let post = Post {
                id: id.clone(),
                title: field(record, "title"),
                body: field(record, "body"),
                when: field(record, "when"),
            };
            if post.title.is_empty() && post.body.is_empty() {
                None
            } else {
                Some(post)
            }
        })
        .collect();

    posts.sort_by(|a, b| b.when.cmp(&a.when));
    posts
}

/// Local `YYYY-MM-DD HH:MM` for a stored timestamp, or empty when it can't be read
pub fn format_when(iso: &str) -> String {
    if iso.is_empty() {
        return String::new();
    }
    match DateTime::parse_from_rfc3339(iso) {
        Ok(when) => when.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => String::new(),
    }
}

/// Current UTC time, e.g. `2024-05-01T12:30:00.123Z`
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Clone)]
pub struct PostBoardClient {
    url: String,
    client: reqwest::blocking::Client,
}

impl PostBoardClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn fetch_posts(&self) -> Result<Vec<Post>> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send()?;

        if !response.status().is_success() {
            return Err(anyhow!("Fetching posts failed with status {}", response.status()));
        }

        let records: Value = response.json()?;
        let posts = posts_from_records(&records);
        info!("Fetched {} posts", posts.len());
        Ok(posts)
    }

    /// Submit a post, returning the id the board assigned
    pub fn create_post(&self, post: &NewPost) -> Result<String> {
        let payload = PostPayload {
            title: &post.title,
            body: &post.body,
            when: now_iso(),
        };

        debug!("POST {}", self.url);
        let response = self.client.post(&self.url).json(&payload).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(anyhow!("Post failed with status {}: {}", status, error_text));
        }

        let created: CreateResponse = response.json()?;
        info!("Created post {}", created.name);
        Ok(created.name)
    }

    pub fn spawn_fetch(&self, tx: Sender<BackgroundEvent>) {
        let client = self.clone();
        thread::spawn(move || {
            let result = client.fetch_posts().map_err(|e| {
                error!("Fetching posts failed: {:#}", e);
                format!("{:#}", e)
            });
            let _ = tx.send(BackgroundEvent::PostsFetched(result));
        });
    }

    pub fn spawn_create(&self, post: NewPost, tx: Sender<BackgroundEvent>) {
        let client = self.clone();
        thread::spawn(move || {
            let result = client.create_post(&post).map_err(|e| {
                error!("Post error: {:#}", e);
                format!("{:#}", e)
            });
            let _ = tx.send(BackgroundEvent::PostCreated(result));
        });
    }
}
