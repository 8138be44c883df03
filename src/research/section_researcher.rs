//! 分节调研子流程：查询 -> 检索 -> 逐条摘要 -> 合成正文
//!
//! 每个需调研的分节运行一个独立实例，结果以 SectionDraft 返回，不直接修改 ReportState。

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SectionsConfig;
use crate::core::Result;
use crate::llm::{strip_thinking_tokens, CompletionOptions, LlmClient, TokenUsage};
use crate::research::prompts;
use crate::research::{QueryWriter, WebSearcher};
use crate::search::{format_sources, SourceMap};

/// 子流程的输入：总主题 + 分节标题与描述
#[derive(Debug, Clone)]
pub struct SectionRequest {
    pub topic: String,
    pub name: String,
    pub description: String,
}

/// 子流程的输出（与共享状态隔离）
#[derive(Debug, Clone, Default)]
pub struct SectionDraft {
    pub content: String,
    pub unique_sources: SourceMap,
    pub token_usage: TokenUsage,
}

/// 分节调研 trait：SectionsWriter 通过它并发分发
#[async_trait]
pub trait SectionResearch: Send + Sync {
    async fn research(&self, request: &SectionRequest, config: &SectionsConfig) -> Result<SectionDraft>;
}

pub struct SectionResearcher {
    query_writer: QueryWriter,
    web_searcher: WebSearcher,
    writer: Arc<dyn LlmClient>,
}

impl SectionResearcher {
    pub fn new(query_writer: QueryWriter, web_searcher: WebSearcher, writer: Arc<dyn LlmClient>) -> Self {
        Self {
            query_writer,
            web_searcher,
            writer,
        }
    }
}

#[async_trait]
impl SectionResearch for SectionResearcher {
    async fn research(&self, request: &SectionRequest, config: &SectionsConfig) -> Result<SectionDraft> {
        let topic = prompts::section_topic(&request.topic, &request.name, &request.description);
        let mut usage = TokenUsage::new();

        let (queries, count) = self
            .query_writer
            .generate(&topic, config.number_of_queries, config.strip_thinking_tokens)
            .await?;
        usage.add(self.query_writer.model_name(), count);

        let mut sources = self.web_searcher.search(&queries, config.search_params()).await?;
        if config.summarize_sources && !sources.is_empty() {
            let count = self
                .web_searcher
                .summarize(&topic, &mut sources, config.max_tokens_per_source, config.strip_thinking_tokens)
                .await?;
            usage.add(self.web_searcher.model_name(), count);
        }

        // 摘要后的 content 已足够，原文只在未摘要时作为上下文
        let context = format_sources(&sources, config.max_tokens_per_source, !config.summarize_sources);
        let completion = self
            .writer
            .prompt(&prompts::section_writer(&topic, &context), CompletionOptions::default())
            .await?;
        usage.add(self.writer.model_name(), completion.usage);

        let content = if config.strip_thinking_tokens {
            strip_thinking_tokens(&completion.text)
        } else {
            completion.text.trim().to_string()
        };

        tracing::info!(section = %request.name, sources = sources.len(), "section researched");
        Ok(SectionDraft {
            content,
            unique_sources: sources,
            token_usage: usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::search::{InMemorySearch, Source};

    #[tokio::test]
    async fn test_research_collects_sources_and_usage() {
        let lang: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new("lang"));
        let search = InMemorySearch::new();
        let researcher = SectionResearcher::new(
            QueryWriter::new(lang.clone()),
            WebSearcher::new(Arc::new(search), lang.clone()),
            lang,
        );
        let request = SectionRequest {
            topic: "Stoicism".to_string(),
            name: "Meditations".to_string(),
            description: "The book".to_string(),
        };

        let draft = researcher.research(&request, &SectionsConfig::default()).await.unwrap();
        assert!(!draft.content.is_empty());
        // 默认 Mock 返回 5 条查询，截断为 4 条，每条一个合成来源
        assert_eq!(draft.unique_sources.len(), 4);
        assert!(draft.token_usage.get("lang").output_tokens > 0);
    }

    #[tokio::test]
    async fn test_research_without_summaries_keeps_snippets() {
        let lang: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new("lang"));
        let search = InMemorySearch::new().with_results(
            "overview",
            vec![Source::new("Doc", "https://doc", "original snippet")],
        );
        let researcher = SectionResearcher::new(
            QueryWriter::new(lang.clone()),
            WebSearcher::new(Arc::new(search), lang.clone()),
            lang,
        );
        let config = SectionsConfig {
            number_of_queries: 1,
            summarize_sources: false,
            ..SectionsConfig::default()
        };
        let request = SectionRequest {
            topic: "t".to_string(),
            name: "n".to_string(),
            description: "d".to_string(),
        };

        let draft = researcher.research(&request, &config).await.unwrap();
        assert_eq!(draft.unique_sources.get("https://doc").unwrap().content, "original snippet");
    }
}
