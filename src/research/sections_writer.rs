//! SectionsWriter：对 research=true 的分节并发运行调研子流程
//!
//! 下标列表只构建一次：按它分发、按它写回。任务之间互不共享可变状态，
//! 只有 join 之后的顺序写回修改 ReportState，因此结果与任务完成顺序无关。
//! 任一子流程失败则整个分发失败，已完成的兄弟结果一并丢弃。

use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::config::SectionsConfig;
use crate::core::{ReportState, Result};
use crate::research::{SectionRequest, SectionResearch};
use crate::workflow::Stage;

pub struct SectionsWriter {
    researcher: Arc<dyn SectionResearch>,
}

impl SectionsWriter {
    pub fn new(researcher: Arc<dyn SectionResearch>) -> Self {
        Self { researcher }
    }

    pub async fn run(&self, state: &mut ReportState, config: &SectionsConfig) -> Result<()> {
        let research_idx = state.section_indices(true);
        let requests: Vec<SectionRequest> = research_idx
            .iter()
            .map(|&idx| SectionRequest {
                topic: state.topic.clone(),
                name: state.sections[idx].name.clone(),
                description: state.sections[idx].description.clone(),
            })
            .collect();

        tracing::info!(sections = requests.len(), "researching sections");
        let drafts = try_join_all(
            requests
                .iter()
                .map(|request| self.researcher.research(request, config)),
        )
        .await?;

        for (&idx, draft) in research_idx.iter().zip(drafts) {
            let section = &mut state.sections[idx];
            section.content = draft.content;
            section.unique_sources = draft.unique_sources;
            state.token_usage.merge(&draft.token_usage);
        }

        state.steps.push(Stage::SectionsWriter);
        Ok(())
    }
}
