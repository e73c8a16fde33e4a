//! Reddit tools — search posts and comments in a subreddit, discover subreddits.
//!
//! Uses the application-only OAuth flow (client credentials).

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use trendscribe_core::config::schema::{RedditConfig, SearchLimits};
use trendscribe_core::config::Credentials;
use trendscribe_core::utils::truncate_chars;

use super::base::{optional_i64, optional_string, require_string, Tool, ToolOutput};

/// Results returned when the model gives no limit.
const DEFAULT_LIMIT: usize = 5;

/// Max characters kept from a post body or comment.
const SNIPPET_CHARS: usize = 200;

const SORT_MODES: [&str; 3] = ["relevance", "new", "top"];

// ─────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    data: T,
}

/// A submission as returned by the search listing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RedditPost {
    pub title: String,
    pub author: String,
    pub score: i64,
    pub url: String,
    pub selftext: String,
}

/// A comment from a subreddit's recent-comments listing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RedditComment {
    pub author: String,
    pub score: i64,
    pub body: String,
    pub permalink: String,
}

/// A subreddit from the subreddit search listing.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct SubredditInfo {
    pub name: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSubreddit {
    display_name: String,
    title: String,
    public_description: String,
}

impl From<RawSubreddit> for SubredditInfo {
    fn from(raw: RawSubreddit) -> Self {
        Self {
            name: raw.display_name,
            title: raw.title,
            description: raw.public_description,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Thin Reddit API client.
pub struct RedditClient {
    http: Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
    auth_base: String,
    api_base: String,
}

impl RedditClient {
    pub fn new(config: &RedditConfig, credentials: &Credentials) -> Self {
        Self {
            http: Client::builder()
                .user_agent(config.user_agent.clone())
                .build()
                .unwrap_or_default(),
            client_id: credentials.reddit_client_id.clone(),
            client_secret: credentials.reddit_client_secret.clone(),
            user_agent: config.user_agent.clone(),
            auth_base: config.auth_base.trim_end_matches('/').to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch an application-only access token.
    ///
    /// Tools fetch one per call and pass it to every request they make.
    pub async fn access_token(&self) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(format!("{}/api/v1/access_token", self.auth_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("Reddit token request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Reddit auth returned {status}: {body}");
        }

        let token: TokenResponse = resp.json().await.context("Failed to parse Reddit token")?;
        Ok(token.access_token)
    }

    async fn listing<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> anyhow::Result<Vec<T>> {
        debug!(path, "Reddit request");

        let resp = self
            .http
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(query)
            .query(&[("raw_json", "1")])
            .send()
            .await
            .context("Reddit request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Reddit API returned {status}: {body}");
        }

        let listing: Listing<T> = resp.json().await.context("Failed to parse Reddit listing")?;
        Ok(listing.data.children.into_iter().map(|c| c.data).collect())
    }

    /// Search submissions in one subreddit.
    pub async fn search_posts(
        &self,
        token: &str,
        subreddit: &str,
        query: &str,
        sort: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<RedditPost>> {
        self.listing(
            token,
            &format!("/r/{subreddit}/search"),
            &[
                ("q", query.to_string()),
                ("sort", sort.to_string()),
                ("limit", limit.to_string()),
                ("restrict_sr", "1".to_string()),
            ],
        )
        .await
    }

    /// Most recent comments in a subreddit.
    pub async fn recent_comments(
        &self,
        token: &str,
        subreddit: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<RedditComment>> {
        self.listing(token, &format!("/r/{subreddit}/comments"), &[("limit", limit.to_string())])
            .await
    }

    /// Find subreddits matching a query.
    pub async fn search_subreddits(
        &self,
        token: &str,
        query: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<SubredditInfo>> {
        let found: Vec<RawSubreddit> = self
            .listing(
                token,
                "/subreddits/search",
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(found.into_iter().take(limit).map(SubredditInfo::from).collect())
    }
}

// ─────────────────────────────────────────────
// Result shaping
// ─────────────────────────────────────────────

/// One discussion-search result.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiscussionRecord {
    Post {
        title: String,
        author: String,
        score: i64,
        url: String,
        snippet: String,
    },
    Comment {
        author: String,
        score: i64,
        snippet: String,
        link: String,
    },
}

/// Posts in listing order, then comments that mention `query`
/// (case-insensitive), highest score first.
pub fn merge_discussion(
    posts: Vec<RedditPost>,
    comments: Vec<RedditComment>,
    query: &str,
) -> Vec<DiscussionRecord> {
    let needle = query.to_lowercase();

    let mut matched: Vec<RedditComment> = comments
        .into_iter()
        .filter(|c| c.body.to_lowercase().contains(&needle))
        .collect();
    matched.sort_by(|a, b| b.score.cmp(&a.score));

    posts
        .into_iter()
        .map(|p| DiscussionRecord::Post {
            title: p.title,
            author: p.author,
            score: p.score,
            url: p.url,
            snippet: truncate_chars(&p.selftext, SNIPPET_CHARS),
        })
        .chain(matched.into_iter().map(|c| DiscussionRecord::Comment {
            author: c.author,
            score: c.score,
            snippet: truncate_chars(&c.body, SNIPPET_CHARS),
            link: format!("https://reddit.com{}", c.permalink),
        }))
        .collect()
}

/// Bare subreddit name from `rust`, `r/rust` or `/r/rust`.
///
/// Only ASCII letters, digits and `_` are accepted; the name becomes a URL
/// path segment.
pub fn subreddit_name(raw: &str) -> anyhow::Result<&str> {
    let name = raw.trim().trim_start_matches('/');
    let name = name.strip_prefix("r/").unwrap_or(name);
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        anyhow::bail!("Invalid subreddit name '{raw}': use letters, digits and underscores only");
    }
    Ok(name)
}

fn resolve_limit(params: &HashMap<String, Value>, max: usize) -> usize {
    let requested = optional_i64(params, "limit").unwrap_or(DEFAULT_LIMIT as i64);
    (requested.max(1) as usize).min(max.max(1))
}

fn to_records<T: Serialize>(items: &[T]) -> anyhow::Result<ToolOutput> {
    let records = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ToolOutput::Records(records))
}

// ─────────────────────────────────────────────
// SearchSubredditContentTool
// ─────────────────────────────────────────────

/// Searches posts and recent comments inside one subreddit.
pub struct SearchSubredditContentTool {
    client: Arc<RedditClient>,
    max_limit: usize,
}

impl SearchSubredditContentTool {
    pub fn new(client: Arc<RedditClient>, limits: &SearchLimits) -> Self {
        Self {
            client,
            max_limit: limits.content_search_limit,
        }
    }
}

#[async_trait]
impl Tool for SearchSubredditContentTool {
    fn name(&self) -> &str {
        "search_subreddit_content"
    }

    fn description(&self) -> &str {
        "Search for relevant posts and comments in a subreddit. Returns posts (title, author, score, url, snippet) followed by comments mentioning the query (author, score, snippet, link), comments sorted by score."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "subreddit": {
                    "type": "string",
                    "description": "Subreddit name without the r/ prefix"
                },
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum posts and comments to scan (default 5)",
                    "minimum": 1
                },
                "sort": {
                    "type": "string",
                    "enum": SORT_MODES,
                    "description": "Post ordering: relevance, new or top (default relevance)"
                }
            },
            "required": ["subreddit", "query"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let raw_subreddit = require_string(&params, "subreddit")?;
        let subreddit = subreddit_name(&raw_subreddit)?;
        let query = require_string(&params, "query")?;
        let sort = optional_string(&params, "sort").unwrap_or_else(|| "relevance".to_string());
        if !SORT_MODES.contains(&sort.as_str()) {
            anyhow::bail!("Invalid sort '{sort}': expected one of relevance, new, top");
        }
        let limit = resolve_limit(&params, self.max_limit);

        debug!(subreddit, query = %query, sort = %sort, limit, "searching subreddit");

        let token = self.client.access_token().await?;
        let posts = self
            .client
            .search_posts(&token, subreddit, &query, &sort, limit)
            .await?;
        let comments = self.client.recent_comments(&token, subreddit, limit).await?;

        to_records(&merge_discussion(posts, comments, &query))
    }
}

// ─────────────────────────────────────────────
// SearchSubredditsTool
// ─────────────────────────────────────────────

/// Discovers subreddits relevant to a query.
pub struct SearchSubredditsTool {
    client: Arc<RedditClient>,
    max_limit: usize,
}

impl SearchSubredditsTool {
    pub fn new(client: Arc<RedditClient>, limits: &SearchLimits) -> Self {
        Self {
            client,
            max_limit: limits.subreddit_search_limit,
        }
    }
}

#[async_trait]
impl Tool for SearchSubredditsTool {
    fn name(&self) -> &str {
        "search_subreddits"
    }

    fn description(&self) -> &str {
        "Search for subreddits relevant to a query. Returns name, title and description for each."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Topic to find communities for"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum subreddits to return (default 5)",
                    "minimum": 1
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let query = require_string(&params, "query")?;
        let limit = resolve_limit(&params, self.max_limit);

        debug!(query = %query, limit, "searching subreddits");
        let token = self.client.access_token().await?;
        let found = self.client.search_subreddits(&token, &query, limit).await?;
        to_records(&found)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn comment(body: &str, score: i64) -> RedditComment {
        RedditComment {
            author: "u".into(),
            score,
            body: body.into(),
            permalink: "/r/rust/comments/x".into(),
        }
    }

    fn post(title: &str, score: i64) -> RedditPost {
        RedditPost {
            title: title.into(),
            score,
            ..Default::default()
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            gemini_api_key: "g".into(),
            reddit_client_id: "id".into(),
            reddit_client_secret: "secret".into(),
        }
    }

    async fn mock_reddit() -> (MockServer, Arc<RedditClient>) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/access_token"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok", "token_type": "bearer", "expires_in": 86400
            })))
            .mount(&server)
            .await;

        let config = RedditConfig {
            auth_base: server.uri(),
            api_base: server.uri(),
            ..Default::default()
        };
        let client = Arc::new(RedditClient::new(&config, &credentials()));
        (server, client)
    }

    fn listing(children: Vec<Value>) -> Value {
        json!({
            "kind": "Listing",
            "data": { "children": children.into_iter().map(|d| json!({"kind": "t", "data": d})).collect::<Vec<_>>() }
        })
    }

    #[test]
    fn test_merge_posts_first_comments_by_score() {
        let records = merge_discussion(
            vec![post("low", 1), post("high", 100)],
            vec![
                comment("Rust is great", 3),
                comment("unrelated", 50),
                comment("I love RUST", 10),
            ],
            "rust",
        );

        assert_eq!(records.len(), 4);
        assert!(matches!(&records[0], DiscussionRecord::Post { title, .. } if title == "low"));
        assert!(matches!(&records[1], DiscussionRecord::Post { title, .. } if title == "high"));
        assert!(matches!(records[2], DiscussionRecord::Comment { score: 10, .. }));
        assert!(matches!(records[3], DiscussionRecord::Comment { score: 3, .. }));
    }

    #[test]
    fn test_snippets_truncated() {
        let long = "rust ".repeat(100);
        let mut p = post("p", 0);
        p.selftext = long.clone();
        let records = merge_discussion(vec![p], vec![comment(&long, 1)], "rust");
        for record in records {
            let snippet = match record {
                DiscussionRecord::Post { snippet, .. } | DiscussionRecord::Comment { snippet, .. } => snippet,
            };
            assert_eq!(snippet.chars().count(), SNIPPET_CHARS);
        }
    }

    #[test]
    fn test_record_serialization_tagged() {
        let records = merge_discussion(vec![post("t", 1)], vec![comment("q", 2)], "q");
        let json = serde_json::to_value(&records).unwrap();
        assert_eq!(json[0]["type"], "post");
        assert_eq!(json[1]["type"], "comment");
        assert_eq!(json[1]["link"], "https://reddit.com/r/rust/comments/x");
    }

    #[test]
    fn test_resolve_limit() {
        let mut params = HashMap::new();
        assert_eq!(resolve_limit(&params, 8), 5);
        params.insert("limit".into(), json!(50));
        assert_eq!(resolve_limit(&params, 8), 8);
        params.insert("limit".into(), json!(0));
        assert_eq!(resolve_limit(&params, 8), 1);
    }

    #[tokio::test]
    async fn test_search_subreddits_respects_limit() {
        let (server, client) = mock_reddit().await;
        Mock::given(method("GET"))
            .and(path("/subreddits/search"))
            .and(query_param("q", "machine learning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![
                json!({"display_name": "MachineLearning", "title": "ML", "public_description": "papers"}),
                json!({"display_name": "learnmachinelearning", "title": "Learn ML", "public_description": ""}),
                json!({"display_name": "datascience", "title": "DS", "public_description": ""}),
            ])))
            .mount(&server)
            .await;

        let tool = SearchSubredditsTool::new(client, &SearchLimits::default());
        let mut params = HashMap::new();
        params.insert("query".into(), json!("machine learning"));
        params.insert("limit".into(), json!(2));

        let ToolOutput::Records(records) = tool.execute(params).await.unwrap() else {
            panic!("expected records");
        };
        assert!(records.len() <= 2);
        assert!(records.iter().all(|r| !r["name"].as_str().unwrap().is_empty()));
        assert_eq!(records[0]["description"], "papers");
    }

    #[tokio::test]
    async fn test_search_subreddit_content() {
        let (server, client) = mock_reddit().await;
        Mock::given(method("GET"))
            .and(path("/r/rust/search"))
            .and(query_param("sort", "top"))
            .and(query_param("restrict_sr", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![json!({
                "title": "Async in 2025", "author": "a", "score": 42,
                "url": "https://reddit.com/p", "selftext": "body"
            })])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/r/rust/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![
                json!({"author": "b", "score": 1, "body": "async is hard", "permalink": "/c1"}),
                json!({"author": "c", "score": 9, "body": "ASYNC rocks", "permalink": "/c2"}),
                json!({"author": "d", "score": 99, "body": "off topic", "permalink": "/c3"}),
            ])))
            .mount(&server)
            .await;

        let tool = SearchSubredditContentTool::new(client, &SearchLimits::default());
        let mut params = HashMap::new();
        params.insert("subreddit".into(), json!("r/rust"));
        params.insert("query".into(), json!("async"));
        params.insert("sort".into(), json!("top"));

        let ToolOutput::Records(records) = tool.execute(params).await.unwrap() else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["type"], "post");
        assert_eq!(records[1]["author"], "c");
        assert_eq!(records[2]["author"], "b");

        let token_requests = server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path() == "/api/v1/access_token")
            .count();
        assert_eq!(token_requests, 1);
    }

    #[test]
    fn test_subreddit_name() {
        assert_eq!(subreddit_name("rust").unwrap(), "rust");
        assert_eq!(subreddit_name(" r/learn_rust ").unwrap(), "learn_rust");
        assert_eq!(subreddit_name("/r/Rust2025").unwrap(), "Rust2025");
        for bad in ["", "r/", "rust/../../api/v1/me", "rust?q=1", "rust lang", "r/rust/comments"] {
            assert!(subreddit_name(bad).is_err(), "{bad:?} accepted");
        }
    }

    #[tokio::test]
    async fn test_invalid_subreddit_makes_no_requests() {
        let (server, client) = mock_reddit().await;
        let tool = SearchSubredditContentTool::new(client, &SearchLimits::default());
        let mut params = HashMap::new();
        params.insert("subreddit".into(), json!("rust/../../api/v1/me"));
        params.insert("query".into(), json!("x"));

        let err = tool.execute(params).await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid subreddit name"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_sort_rejected() {
        let (_server, client) = mock_reddit().await;
        let tool = SearchSubredditContentTool::new(client, &SearchLimits::default());
        let mut params = HashMap::new();
        params.insert("subreddit".into(), json!("rust"));
        params.insert("query".into(), json!("x"));
        params.insert("sort".into(), json!("hot"));

        let err = tool.execute(params).await.unwrap_err();
        assert!(err.to_string().contains("Invalid sort 'hot'"));
    }

    #[tokio::test]
    async fn test_auth_failure_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/access_token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad creds"))
            .mount(&server)
            .await;
        let config = RedditConfig {
            auth_base: server.uri(),
            api_base: server.uri(),
            ..Default::default()
        };
        let client = RedditClient::new(&config, &credentials());

        let err = client.access_token().await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }
}
