//! 流水线驱动：Planner -> SectionsWriter -> FinalWriter -> Finalizer
//!
//! 阶段顺序固定、无分支无循环；驱动器只负责按序调用各阶段并返回最终状态。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::Instrument;

use crate::config::{AppConfig, ResearchConfig};
use crate::core::{ReportError, ReportState, Result};
use crate::llm::{create_llm_client, LlmClient, TokenUsage};
use crate::research::{
    FinalWriter, Finalizer, Planner, QueryWriter, SectionResearch, SectionResearcher, SectionsWriter,
    WebSearcher,
};
use crate::search::{InMemorySearch, SourceMap, TavilyClient, WebSearch};
use crate::workflow::{Checkpointer, JsonCheckpointer, Stage};

/// 对外暴露的运行结果
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub run_id: String,
    pub title: String,
    pub content: String,
    pub unique_sources: SourceMap,
    pub token_usage: TokenUsage,
    pub steps: Vec<Stage>,
}

/// 报告流水线
pub struct ReportPipeline {
    planner: Planner,
    sections_writer: SectionsWriter,
    final_writer: FinalWriter,
    finalizer: Finalizer,
    config: ResearchConfig,
    models: Vec<String>,
    checkpointer: Option<Arc<dyn Checkpointer>>,
    checkpoint_root: Option<PathBuf>,
}

impl ReportPipeline {
    /// language 负责查询、摘要与写作，reasoning 负责规划大纲
    pub fn new(
        language: Arc<dyn LlmClient>,
        reasoning: Arc<dyn LlmClient>,
        search: Arc<dyn WebSearch>,
        config: ResearchConfig,
    ) -> Self {
        let planner = Planner::new(
            QueryWriter::new(language.clone()),
            WebSearcher::new(search.clone(), language.clone()),
            reasoning.clone(),
        );
        let researcher = SectionResearcher::new(
            QueryWriter::new(language.clone()),
            WebSearcher::new(search, language.clone()),
            language.clone(),
        );

        let mut models = vec![language.model_name().to_string()];
        if reasoning.model_name() != language.model_name() {
            models.push(reasoning.model_name().to_string());
        }

        Self {
            planner,
            sections_writer: SectionsWriter::new(Arc::new(researcher)),
            final_writer: FinalWriter::new(language),
            finalizer: Finalizer::new(),
            config,
            models,
            checkpointer: None,
            checkpoint_root: None,
        }
    }

    /// 按配置创建 LLM 与检索客户端
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let language = create_llm_client(&cfg.llm.language_model);
        let reasoning = create_llm_client(&cfg.llm.reasoning_model);
        let search = create_search_client(cfg)?;
        Ok(Self::new(language, reasoning, search, cfg.report.clone()))
    }

    /// 替换分节调研子流程
    pub fn with_section_researcher(mut self, researcher: Arc<dyn SectionResearch>) -> Self {
        self.sections_writer = SectionsWriter::new(researcher);
        self
    }

    pub fn with_checkpointer(mut self, checkpointer: Arc<dyn Checkpointer>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// 每次 run 在 `<root>/<run_id>/` 下写检查点
    pub fn with_checkpoint_dir(mut self, root: impl Into<PathBuf>) -> Self {
        self.checkpoint_root = Some(root.into());
        self
    }

    /// 运行入口：主题 -> 报告
    pub async fn run(&self, topic: &str) -> Result<ReportOutput> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut state = ReportState::new(topic, self.models.iter().cloned());

        let span = tracing::info_span!("report", run_id = %run_id);
        tracing::info!(parent: &span, topic = %topic, "report generation started");

        let per_run = self
            .checkpoint_root
            .as_ref()
            .map(|root| JsonCheckpointer::new(root, &run_id));
        let checkpointer = match &per_run {
            Some(cp) => Some(cp as &dyn Checkpointer),
            None => self.checkpointer.as_deref(),
        };

        self.drive(&mut state, checkpointer).instrument(span).await?;

        Ok(ReportOutput {
            run_id,
            title: state.report_title,
            content: state.content,
            unique_sources: state.unique_sources,
            token_usage: state.token_usage,
            steps: state.steps,
        })
    }

    /// 依次执行全部阶段；任一阶段失败立即返回，不产生文档
    pub async fn run_state(&self, state: &mut ReportState) -> Result<()> {
        self.drive(state, self.checkpointer.as_deref()).await
    }

    async fn drive(&self, state: &mut ReportState, checkpointer: Option<&dyn Checkpointer>) -> Result<()> {
        for (seq, stage) in Stage::PIPELINE.into_iter().enumerate() {
            let started = Instant::now();
            self.run_stage(stage, state).await.map_err(|e| {
                tracing::error!(stage = %stage, error = %e, "stage failed");
                e
            })?;
            tracing::info!(stage = %stage, elapsed_ms = started.elapsed().as_millis() as u64, "stage completed");

            if let Some(cp) = checkpointer {
                if let Err(e) = cp.save(stage, seq + 1, state) {
                    tracing::warn!(stage = %stage, error = %e, "checkpoint save failed");
                }
            }
        }
        Ok(())
    }

    async fn run_stage(&self, stage: Stage, state: &mut ReportState) -> Result<()> {
        match stage {
            Stage::Planner => self.planner.run(state, &self.config).await,
            Stage::SectionsWriter => self.sections_writer.run(state, &self.config.sections).await,
            Stage::FinalWriter => {
                self.final_writer
                    .run(state, self.config.strip_thinking_tokens)
                    .await
            }
            Stage::Finalizer => {
                self.finalizer.run(state);
                Ok(())
            }
            Stage::QueryWriter | Stage::WebSearch => Err(ReportError::ContractViolation(format!(
                "{} only runs inside the planner",
                stage
            ))),
        }
    }
}

/// 检索后端：tavily（需 API Key）/ memory（离线合成来源）
fn create_search_client(cfg: &AppConfig) -> Result<Arc<dyn WebSearch>> {
    match cfg.search.provider.to_lowercase().as_str() {
        "memory" => {
            tracing::warn!("Using in-memory search, sources are synthetic");
            Ok(Arc::new(InMemorySearch::new()))
        }
        "tavily" => Ok(Arc::new(TavilyClient::from_env_or(
            cfg.search.api_key.as_deref(),
            cfg.search.timeout_secs,
        )?)),
        other => Err(ReportError::Config(config::ConfigError::Message(format!(
            "unknown search provider: {}",
            other
        )))),
    }
}

/// 按应用配置运行一次完整流水线（checkpoint_dir 设置时启用检查点）
pub async fn run(topic: &str, cfg: &AppConfig) -> Result<ReportOutput> {
    let mut pipeline = ReportPipeline::from_config(cfg)?;
    if let Some(dir) = &cfg.app.checkpoint_dir {
        pipeline = pipeline.with_checkpoint_dir(dir);
    }
    pipeline.run(topic).await
}
