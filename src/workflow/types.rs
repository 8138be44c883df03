//! 流水线类型定义
//!
//! Stage：封闭的阶段集合，steps 轨迹与阶段调度表都基于它，匹配穷尽由编译器检查。

use serde::{Deserialize, Serialize};

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// 规划大纲（内部依次执行 QueryWriter、WebSearch）
    Planner,
    /// 生成检索查询
    QueryWriter,
    /// Web 检索
    WebSearch,
    /// 并发撰写需调研的分节
    SectionsWriter,
    /// 并发撰写综述类分节并生成标题
    FinalWriter,
    /// 合并引用、拼装全文
    Finalizer,
}

impl Stage {
    /// 驱动器按此顺序执行的顶层阶段
    pub const PIPELINE: [Stage; 4] = [
        Stage::Planner,
        Stage::SectionsWriter,
        Stage::FinalWriter,
        Stage::Finalizer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Planner => "planner",
            Stage::QueryWriter => "query_writer",
            Stage::WebSearch => "web_search",
            Stage::SectionsWriter => "sections_writer",
            Stage::FinalWriter => "final_writer",
            Stage::Finalizer => "finalizer",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_match_serde() {
        for stage in [
            Stage::Planner,
            Stage::QueryWriter,
            Stage::WebSearch,
            Stage::SectionsWriter,
            Stage::FinalWriter,
            Stage::Finalizer,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.as_str()));
        }
    }
}
