//! Tavily 检索客户端
//!
//! 每条查询一次 POST https://api.tavily.com/search（并发发出），结果按查询顺序合并、按 URL 去重。
//! raw_content 若为 HTML 则提取可读文本。

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::search::{clean_raw_content, SearchError, SearchParams, Source, SourceMap, WebSearch};

pub const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    topic: &'a str,
    max_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    raw_content: Option<String>,
}

impl From<TavilyResult> for Source {
    fn from(r: TavilyResult) -> Self {
        Source {
            title: r.title,
            url: r.url,
            content: r.content,
            raw_content: r.raw_content.map(|raw| clean_raw_content(&raw)),
        }
    }
}

/// Tavily 客户端：持有 HTTP Client 与 API Key
pub struct TavilyClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
        }
    }

    /// 配置 Key > 环境变量 TAVILY_API_KEY
    pub fn from_env_or(api_key: Option<&str>, timeout_secs: u64) -> Result<Self, SearchError> {
        let key = api_key
            .map(String::from)
            .or_else(|| std::env::var("TAVILY_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or(SearchError::MissingApiKey)?;
        Ok(Self::new(key, timeout_secs))
    }

    /// 覆盖端点（自建代理或测试）
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn search_one(&self, query: &str, params: SearchParams) -> Result<Vec<Source>, SearchError> {
        let body = TavilyRequest {
            query,
            topic: params.category.as_str(),
            max_results: params.max_results,
            days: params.days_back,
            include_raw_content: params.include_raw_content,
        };

        tracing::debug!(query = %query, "tavily search");
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TavilyResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;
        Ok(parsed.results.into_iter().map(Source::from).collect())
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    async fn search(&self, queries: &[String], params: SearchParams) -> Result<SourceMap, SearchError> {
        let per_query = try_join_all(queries.iter().map(|q| self.search_one(q, params))).await?;

        let map: SourceMap = per_query.into_iter().flatten().collect();
        tracing::info!(queries = queries.len(), sources = map.len(), "web search completed");
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = TavilyRequest {
            query: "rust",
            topic: "news",
            max_results: 3,
            days: None,
            include_raw_content: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["topic"], "news");
        assert!(json.get("days").is_none());
    }

    #[test]
    fn test_response_to_sources() {
        let raw = r#"{"results": [
            {"title": "A", "url": "https://a", "content": "snippet", "raw_content": "<html><body><p>Body</p></body></html>", "score": 0.9},
            {"url": "https://b"}
        ]}"#;
        let parsed: TavilyResponse = serde_json::from_str(raw).unwrap();
        let sources: Vec<Source> = parsed.results.into_iter().map(Source::from).collect();
        assert_eq!(sources.len(), 2);
        assert!(sources[0].raw_content.as_deref().unwrap().contains("Body"));
        assert_eq!(sources[1].title, "");
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(
            TavilyClient::from_env_or(Some("  "), 10),
            Err(SearchError::MissingApiKey)
        ));
        assert!(TavilyClient::from_env_or(Some("tvly-key"), 10).is_ok());
    }
}
