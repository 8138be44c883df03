//! Web 检索抽象
//!
//! WebSearch：一组查询 -> 跨查询按 URL 去重后的 SourceMap。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::SourceMap;

/// 检索类别（对应 Tavily 的 topic 参数）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    #[default]
    General,
    News,
    Finance,
}

impl SearchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchCategory::General => "general",
            SearchCategory::News => "news",
            SearchCategory::Finance => "finance",
        }
    }
}

/// 单次检索参数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub category: SearchCategory,
    /// 每条查询的最大结果数
    pub max_results: usize,
    /// 只检索最近 N 天（None 表示不限）
    pub days_back: Option<u32>,
    pub include_raw_content: bool,
}

/// 检索错误
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Missing search API key")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Web 检索客户端 trait
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// 执行全部查询并按 URL 去重（先出现的位置优先，内容取最后一次）
    async fn search(&self, queries: &[String], params: SearchParams) -> Result<SourceMap, SearchError>;
}
