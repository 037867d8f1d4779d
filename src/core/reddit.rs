//! Reddit engagement source
//!
//! Uses application-only OAuth and the `/comments/{id}` listing, which returns
//! the submission and its comment forest in a single request.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::EngagementSource;
use crate::types::{Comment, Credentials, SeenComments, MonitorError, MonitorResult};

/// Token endpoint host
pub const REDDIT_AUTH_BASE: &str = "https://www.reddit.com";

/// OAuth API host
pub const REDDIT_API_BASE: &str = "https://oauth.reddit.com";

/// Comments requested per fetch
pub const COMMENT_LIMIT: u32 = 500;

/// Tokens are refreshed this long before they expire
const TOKEN_SLACK: Duration = Duration::from_secs(60);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct SubmissionData {
    #[serde(default)]
    title: String,
    #[serde(default)]
    score: i64,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    id: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    body: String,
    /// Empty string when there are no replies, a listing otherwise
    #[serde(default)]
    replies: Value,
}

/// Submission plus its flattened comments
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadSnapshot {
    pub title: String,
    pub score: i64,
    pub comments: Vec<Comment>,
}

/// Parse the two-listing response of `/comments/{id}`
///
/// Comments are flattened breadth-first; `more` stubs are skipped.
pub fn parse_thread(response: Value) -> MonitorResult<ThreadSnapshot> {
    let mut listings: Vec<Listing> = serde_json::from_value(response)
        .map_err(|e| MonitorError::SourceFetch(format!("unexpected thread payload: {}", e)))?;

    if listings.len() < 2 {
        return Err(MonitorError::SourceFetch(format!(
            "expected submission and comment listings, got {}",
            listings.len()
        )));
    }
    let comment_listing = listings.remove(1);
    let submission_listing = listings.remove(0);

    let submission = submission_listing
        .data
        .children
        .into_iter()
        .find(|t| t.kind == "t3")
        .ok_or_else(|| MonitorError::SourceFetch("thread not found".to_string()))?;
    let submission: SubmissionData = serde_json::from_value(submission.data)
        .map_err(|e| MonitorError::SourceFetch(format!("unexpected submission payload: {}", e)))?;

    let mut comments = Vec::new();
    let mut queue: VecDeque<Thing> = comment_listing.data.children.into();

    while let Some(thing) = queue.pop_front() {
        if thing.kind != "t1" {
            continue;
        }
        let data: CommentData = match serde_json::from_value(thing.data) {
            Ok(data) => data,
            Err(e) => {
                debug!("Skipping unparseable comment: {}", e);
                continue;
            }
        };
        if data.replies.is_object() {
            if let Ok(replies) = serde_json::from_value::<Listing>(data.replies) {
                queue.extend(replies.data.children);
            }
        }
        comments.push(Comment {
            id: data.id,
            author: data.author,
            body: data.body,
        });
    }

    Ok(ThreadSnapshot {
        title: submission.title,
        score: submission.score,
        comments,
    })
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_SLACK < self.expires_at
    }
}

/// Reddit-backed `EngagementSource`
pub struct RedditSource {
    http: Client,
    credentials: Credentials,
    auth_base: String,
    api_base: String,
    token: Mutex<Option<AccessToken>>,
    /// Score and title from the most recent thread fetch
    latest: Mutex<Option<(i64, String)>>,
}

impl RedditSource {
    /// Client for the public Reddit endpoints
    pub fn new(credentials: Credentials) -> MonitorResult<Self> {
        Self::with_endpoints(credentials, REDDIT_AUTH_BASE, REDDIT_API_BASE)
    }

    /// Client for custom endpoints
    pub fn with_endpoints(credentials: Credentials, auth_base: &str, api_base: &str) -> MonitorResult<Self> {
        let http = Client::builder()
            .user_agent(credentials.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            credentials,
            auth_base: auth_base.trim_end_matches('/').to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
            latest: Mutex::new(None),
        })
    }

    /// Bearer token, requesting a new one when missing or about to expire
    async fn access_token(&self) -> MonitorResult<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let response = self
            .http
            .post(format!("{}/api/v1/access_token", self.auth_base))
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::SourceFetch(format!("token request rejected: HTTP {}", status)));
        }

        let token: TokenResponse = response.json().await?;
        debug!("Obtained access token valid for {}s", token.expires_in);
        let fresh = AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        };
        *guard = Some(fresh.clone());
        Ok(fresh.value)
    }

    /// Fetch the submission and all loaded comments
    pub async fn fetch_thread(&self, thread_id: &str) -> MonitorResult<ThreadSnapshot> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/comments/{}?limit={}&raw_json=1",
            self.api_base, thread_id, COMMENT_LIMIT
        );

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            *self.token.lock().await = None;
            return Err(MonitorError::SourceFetch("access token rejected".to_string()));
        }
        if !status.is_success() {
            return Err(MonitorError::SourceFetch(format!("GET {} returned HTTP {}", url, status)));
        }

        let snapshot = parse_thread(response.json().await?)?;
        *self.latest.lock().await = Some((snapshot.score, snapshot.title.clone()));
        Ok(snapshot)
    }
}

#[async_trait]
impl EngagementSource for RedditSource {
    async fn fetch_score(&self, thread_id: &str) -> MonitorResult<i64> {
        let cached = self.latest.lock().await.as_ref().map(|(score, _)| *score);
        match cached {
            Some(score) => Ok(score),
            None => Ok(self.fetch_thread(thread_id).await?.score),
        }
    }

    async fn fetch_new_comments(&self, thread_id: &str, seen: &SeenComments) -> MonitorResult<Vec<Comment>> {
        let snapshot = self.fetch_thread(thread_id).await?;
        Ok(snapshot
            .comments
            .into_iter()
            .filter(|c| !seen.contains(&c.id))
            .collect())
    }

    async fn thread_title(&self, thread_id: &str) -> MonitorResult<String> {
        Ok(self.fetch_thread(thread_id).await?.title)
    }
}

// =============================================================================
// TESTS
// =============================================================================
