//! Planner：查询 -> 检索 -> 推理模型拆分大纲
//!
//! 大纲解析失败（非 JSON、缺字段、空列表）即 MalformedPlan，对本次运行致命，不在内部重试。

use std::sync::Arc;

use crate::config::ResearchConfig;
use crate::core::{ReportError, ReportState, Result, Section};
use crate::llm::{extract_json, strip_thinking_tokens, CompletionOptions, LlmClient};
use crate::research::prompts;
use crate::research::schema::{plan_schema_json, PlanOutput};
use crate::research::{QueryWriter, WebSearcher};
use crate::workflow::Stage;

pub struct Planner {
    query_writer: QueryWriter,
    web_searcher: WebSearcher,
    reasoning: Arc<dyn LlmClient>,
}

impl Planner {
    pub fn new(query_writer: QueryWriter, web_searcher: WebSearcher, reasoning: Arc<dyn LlmClient>) -> Self {
        Self {
            query_writer,
            web_searcher,
            reasoning,
        }
    }

    pub async fn run(&self, state: &mut ReportState, config: &ResearchConfig) -> Result<()> {
        if state.topic.trim().is_empty() {
            return Err(ReportError::ContractViolation("topic is empty".to_string()));
        }

        self.query_writer
            .run(state, config.number_of_queries, config.strip_thinking_tokens)
            .await?;
        self.web_searcher
            .run(state, config.search_params(), config.max_tokens_per_source)
            .await?;

        let prompt = prompts::planner(
            &state.topic,
            &config.report_structure,
            &state.source_str,
            &plan_schema_json(),
        );
        let completion = self.reasoning.prompt(&prompt, CompletionOptions::json()).await?;
        state.token_usage.add(self.reasoning.model_name(), completion.usage);

        state.sections = parse_plan(&completion.text, config.strip_thinking_tokens)?;
        state.steps.push(Stage::Planner);

        tracing::info!(
            sections = state.sections.len(),
            research = state.section_indices(true).len(),
            "report planned"
        );
        Ok(())
    }
}

/// 将推理模型输出解析为分节列表（保持返回顺序，content 置空）
pub fn parse_plan(output: &str, strip_thinking: bool) -> Result<Vec<Section>> {
    let text = if strip_thinking {
        strip_thinking_tokens(output)
    } else {
        output.to_string()
    };
    let json = extract_json(&text)
        .ok_or_else(|| ReportError::MalformedPlan(format!("no JSON object in plan: {}", text)))?;
    let plan: PlanOutput = serde_json::from_str(json)
        .map_err(|e| ReportError::MalformedPlan(format!("{}: {}", e, json)))?;

    if plan.sections.is_empty() {
        return Err(ReportError::MalformedPlan("plan contains no sections".to_string()));
    }

    Ok(plan
        .sections
        .into_iter()
        .map(|s| Section::new(s.name, s.description, s.research))
        .collect())
}
