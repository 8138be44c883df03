//! WebSearcher：查询 -> 去重来源表，可选按主题逐条摘要
//!
//! 摘要是一次并发分发：每条来源一次语言模型调用，结果按来源表顺序写回。

use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::core::{ReportError, ReportState, Result};
use crate::llm::{strip_thinking_tokens, CompletionOptions, LlmClient, TokenCount};
use crate::research::prompts;
use crate::search::{format_sources, truncate_to_tokens, SearchParams, SourceMap, WebSearch};
use crate::workflow::Stage;

pub struct WebSearcher {
    search: Arc<dyn WebSearch>,
    llm: Arc<dyn LlmClient>,
}

impl WebSearcher {
    pub fn new(search: Arc<dyn WebSearch>, llm: Arc<dyn LlmClient>) -> Self {
        Self { search, llm }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    pub async fn search(&self, queries: &[String], params: SearchParams) -> Result<SourceMap> {
        if queries.is_empty() {
            return Err(ReportError::ContractViolation(
                "at least one search query is required".to_string(),
            ));
        }
        Ok(self.search.search(queries, params).await?)
    }

    /// 按主题摘要每条来源，替换其 content；返回所有摘要调用的 token 合计
    pub async fn summarize(
        &self,
        topic: &str,
        sources: &mut SourceMap,
        max_tokens_per_source: usize,
        strip_thinking: bool,
    ) -> Result<TokenCount> {
        let tasks = sources.iter().map(|source| {
            let body = source
                .raw_content
                .as_deref()
                .filter(|raw| !raw.trim().is_empty())
                .unwrap_or(&source.content);
            let prompt = prompts::source_summary(
                topic,
                &source.title,
                &truncate_to_tokens(body, max_tokens_per_source),
            );
            async move { self.llm.prompt(&prompt, CompletionOptions::default()).await }
        });
        let summaries = try_join_all(tasks).await?;

        let mut total = TokenCount::default();
        for (source, completion) in sources.iter_mut().zip(summaries) {
            total.add(completion.usage);
            source.content = if strip_thinking {
                strip_thinking_tokens(&completion.text)
            } else {
                completion.text
            };
        }
        Ok(total)
    }

    /// 规划阶段用：检索 state.search_queries，写入 source_str
    pub async fn run(&self, state: &mut ReportState, params: SearchParams, max_tokens_per_source: usize) -> Result<()> {
        let sources = self.search(&state.search_queries, params).await?;
        tracing::info!(sources = sources.len(), "planner context collected");
        state.source_str = format_sources(&sources, max_tokens_per_source, params.include_raw_content);
        state.steps.push(Stage::WebSearch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::search::{InMemorySearch, Source};

    #[tokio::test]
    async fn test_empty_queries_is_contract_violation() {
        let searcher = WebSearcher::new(
            Arc::new(InMemorySearch::new()),
            Arc::new(MockLlmClient::new("lang")),
        );
        let err = searcher.search(&[], SearchParams::default()).await.unwrap_err();
        assert!(matches!(err, ReportError::ContractViolation(_)));
    }

    #[tokio::test]
    async fn test_summarize_keeps_order() {
        let llm = MockLlmClient::new("lang").with_responder(|prompt| {
            let title = prompt
                .lines()
                .skip_while(|l| *l != "<source title>")
                .nth(1)
                .unwrap_or("?")
                .to_string();
            Ok(format!("summary of {}", title))
        });
        let searcher = WebSearcher::new(Arc::new(InMemorySearch::new()), Arc::new(llm));
        let mut sources: SourceMap = vec![
            Source::new("First", "https://1", "one"),
            Source::new("Second", "https://2", "two"),
        ]
        .into();

        let usage = searcher.summarize("topic", &mut sources, 100, true).await.unwrap();
        let contents: Vec<_> = sources.iter().map(|s| s.content.clone()).collect();
        assert_eq!(contents, vec!["summary of First", "summary of Second"]);
        assert_eq!(usage.output_tokens, 6);
    }

    #[tokio::test]
    async fn test_run_formats_sources() {
        let searcher = WebSearcher::new(
            Arc::new(InMemorySearch::new()),
            Arc::new(MockLlmClient::new("lang")),
        );
        let mut state = ReportState::new("t", ["lang"]);
        state.search_queries = vec!["alpha".to_string()];
        let params = SearchParams { max_results: 3, include_raw_content: true, ..SearchParams::default() };

        searcher.run(&mut state, params, 100).await.unwrap();
        assert!(state.source_str.contains("Notes on alpha"));
        assert_eq!(state.steps, vec![Stage::WebSearch]);
    }
}
