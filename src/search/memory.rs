//! 内存检索（用于测试与离线运行）
//!
//! 预置 查询 -> 来源列表 的映射；未命中的查询按 fallback 生成一个合成来源，
//! 便于不联网时跑通整个报告流程。

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::search::{SearchError, SearchParams, Source, SourceMap, WebSearch};

#[derive(Debug, Default)]
pub struct InMemorySearch {
    results: HashMap<String, Vec<Source>>,
    fail_on: Option<String>,
    /// 记录收到的全部查询（按调用顺序）
    calls: Mutex<Vec<String>>,
}

impl InMemorySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: impl Into<String>, sources: Vec<Source>) -> Self {
        self.results.insert(query.into(), sources);
        self
    }

    /// 任一查询包含该片段时返回错误
    pub fn fail_when_contains(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn synthetic(query: &str) -> Source {
        let slug: String = query
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        Source::new(
            format!("Notes on {}", query),
            format!("https://example.org/{}", slug),
            format!("Offline notes about {}.", query),
        )
    }
}

#[async_trait]
impl WebSearch for InMemorySearch {
    async fn search(&self, queries: &[String], params: SearchParams) -> Result<SourceMap, SearchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.extend(queries.iter().cloned());
        }

        let mut map = SourceMap::new();
        for query in queries {
            if let Some(needle) = &self.fail_on {
                if query.contains(needle.as_str()) {
                    return Err(SearchError::Request(format!("simulated failure for '{}'", query)));
                }
            }
            match self.results.get(query) {
                Some(sources) => sources
                    .iter()
                    .take(params.max_results.max(1))
                    .for_each(|s| map.insert(s.clone())),
                None => map.insert(Self::synthetic(query)),
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dedup_across_queries() {
        let shared = Source::new("Shared", "https://shared", "x");
        let search = InMemorySearch::new()
            .with_results("q1", vec![shared.clone()])
            .with_results("q2", vec![shared, Source::new("Other", "https://other", "y")]);

        let params = SearchParams { max_results: 5, ..SearchParams::default() };
        let map = search
            .search(&["q1".to_string(), "q2".to_string()], params)
            .await
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(search.calls(), vec!["q1", "q2"]);
    }

    #[tokio::test]
    async fn test_fail_when_contains() {
        let search = InMemorySearch::new().fail_when_contains("bad");
        let err = search
            .search(&["a bad query".to_string()], SearchParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Request(_)));
    }
}
