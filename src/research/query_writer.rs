//! QueryWriter：主题 -> N 条检索查询
//!
//! 以 JSON 模式调用语言模型，解析为 QueryList；多于 N 条时截断，一条都没有视为输出错误。

use std::sync::Arc;

use crate::core::{ReportError, ReportState, Result};
use crate::llm::{extract_json, strip_thinking_tokens, CompletionOptions, LlmClient, TokenCount};
use crate::research::prompts;
use crate::research::schema::{query_list_schema_json, QueryList};
use crate::workflow::Stage;

pub struct QueryWriter {
    llm: Arc<dyn LlmClient>,
}

impl QueryWriter {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// 生成查询，返回查询列表与本次调用的 token 计数（不触碰共享状态）
    pub async fn generate(
        &self,
        topic: &str,
        number_of_queries: usize,
        strip_thinking: bool,
    ) -> Result<(Vec<String>, TokenCount)> {
        if topic.trim().is_empty() {
            return Err(ReportError::ContractViolation("topic is empty".to_string()));
        }
        if number_of_queries == 0 {
            return Err(ReportError::ContractViolation(
                "number_of_queries must be at least 1".to_string(),
            ));
        }

        let today = chrono::Local::now().date_naive().to_string();
        let prompt = prompts::query_writer(topic, &today, number_of_queries, &query_list_schema_json());
        let completion = self.llm.prompt(&prompt, CompletionOptions::json()).await?;

        let queries = parse_queries(&completion.text, number_of_queries, strip_thinking)?;
        tracing::debug!(queries = ?queries, "queries generated");
        Ok((queries, completion.usage))
    }

    /// 规划阶段用：写入 state.search_queries 并累加 token
    pub async fn run(&self, state: &mut ReportState, number_of_queries: usize, strip_thinking: bool) -> Result<()> {
        let (queries, usage) = self.generate(&state.topic, number_of_queries, strip_thinking).await?;
        state.token_usage.add(self.model_name(), usage);
        state.search_queries = queries;
        state.steps.push(Stage::QueryWriter);
        Ok(())
    }
}

fn parse_queries(output: &str, number_of_queries: usize, strip_thinking: bool) -> Result<Vec<String>> {
    let text = if strip_thinking {
        strip_thinking_tokens(output)
    } else {
        output.to_string()
    };
    let json = extract_json(&text)
        .ok_or_else(|| ReportError::MalformedModelOutput(format!("no JSON in query list: {}", text)))?;
    let parsed: QueryList = serde_json::from_str(json)
        .map_err(|e| ReportError::MalformedModelOutput(format!("{}: {}", e, json)))?;

    let queries: Vec<String> = parsed
        .queries
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .take(number_of_queries)
        .collect();

    if queries.is_empty() {
        return Err(ReportError::MalformedModelOutput("query list is empty".to_string()));
    }
    if queries.len() < number_of_queries {
        tracing::warn!(expected = number_of_queries, got = queries.len(), "model returned fewer queries");
    }
    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;

    #[test]
    fn test_parse_queries_truncates() {
        let out = r#"{"queries": ["a", " b ", "", "c", "d"]}"#;
        assert_eq!(parse_queries(out, 3, true).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_queries_with_thinking() {
        let out = "<think>{\"queries\": [\"wrong\"]}</think>```json\n{\"queries\": [\"right\"]}\n```";
        assert_eq!(parse_queries(out, 2, true).unwrap(), vec!["right"]);
    }

    #[test]
    fn test_parse_queries_empty_is_error() {
        assert!(matches!(
            parse_queries(r#"{"queries": []}"#, 2, true),
            Err(ReportError::MalformedModelOutput(_))
        ));
        assert!(matches!(
            parse_queries("just text", 2, true),
            Err(ReportError::MalformedModelOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_run_updates_state() {
        let writer = QueryWriter::new(Arc::new(MockLlmClient::new("lang")));
        let mut state = ReportState::new("Rust async", ["lang"]);
        writer.run(&mut state, 3, true).await.unwrap();

        assert_eq!(state.search_queries.len(), 3);
        assert_eq!(state.steps, vec![Stage::QueryWriter]);
        assert!(state.token_usage.get("lang").input_tokens > 0);
    }

    #[tokio::test]
    async fn test_empty_topic_is_contract_violation() {
        let writer = QueryWriter::new(Arc::new(MockLlmClient::new("lang")));
        let err = writer.generate("  ", 3, true).await.unwrap_err();
        assert!(matches!(err, ReportError::ContractViolation(_)));
    }
}
