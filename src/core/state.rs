//! 报告状态：贯穿所有阶段的唯一可变记录
//!
//! 各字段的写入方：
//! - `sections`：Planner 创建；`content` / `unique_sources` 由 SectionsWriter（research=true）
//!   或 FinalWriter（research=false）按原始下标写回，二者互斥
//! - `search_queries` / `source_str`：Planner 的中间数据，下游不使用
//! - `token_usage`：所有调用模型的阶段累加，只增不减
//! - `report_title`：FinalWriter；`unique_sources` / `content`：Finalizer
//! - `steps`：阶段轨迹，仅用于观测

use serde::{Deserialize, Serialize};

use crate::llm::TokenUsage;
use crate::search::SourceMap;
use crate::workflow::Stage;

/// 报告中的一节
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub description: String,
    /// 是否需要独立 Web 调研
    pub research: bool,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub unique_sources: SourceMap,
}

impl Section {
    pub fn new(name: impl Into<String>, description: impl Into<String>, research: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            research,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportState {
    pub topic: String,
    pub sections: Vec<Section>,
    pub search_queries: Vec<String>,
    pub source_str: String,
    pub token_usage: TokenUsage,
    pub unique_sources: SourceMap,
    pub report_title: String,
    pub content: String,
    pub steps: Vec<Stage>,
}

impl ReportState {
    /// 新建状态，token 统计为每个模型预置零值
    pub fn new<I, S>(topic: impl Into<String>, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topic: topic.into(),
            token_usage: TokenUsage::with_models(models),
            ..Self::default()
        }
    }

    /// 满足条件的分节下标（保持原始顺序）；并发分发与写回共用同一份列表
    pub fn section_indices(&self, research: bool) -> Vec<usize> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.research == research)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// 将分节拼成 `## name\n\ncontent\n\n` 上下文；filter 为 None 时包含全部分节
    pub fn sections_context(&self, research: Option<bool>) -> String {
        self.sections
            .iter()
            .filter(|s| research.map_or(true, |r| s.research == r))
            .map(|s| format!("## {}\n\n{}\n\n", s.name, s.content))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReportState {
        let mut state = ReportState::new("X", ["lang"]);
        state.sections = vec![
            Section::new("Intro", "i", false),
            Section::new("Body", "b", true),
            Section::new("More", "m", true),
            Section::new("Conclusion", "c", false),
        ];
        state
    }

    #[test]
    fn test_section_indices_keep_order() {
        let state = sample();
        assert_eq!(state.section_indices(true), vec![1, 2]);
        assert_eq!(state.section_indices(false), vec![0, 3]);
    }

    #[test]
    fn test_sections_context() {
        let mut state = sample();
        state.sections[1].content = "body text".to_string();
        let ctx = state.sections_context(Some(true));
        assert!(ctx.starts_with("## Body\n\nbody text\n\n## More"));
        assert!(!ctx.contains("Intro"));
        assert!(state.sections_context(None).starts_with("## Intro"));
    }
}
