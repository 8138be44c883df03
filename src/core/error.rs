//! 报告生成错误类型
//!
//! 三类错误均对本次运行致命，编排层不做重试：
//! - 契约违反（缺少主题、没有检索查询）
//! - 模型输出无法解析（大纲、查询列表、标题）
//! - 协作方失败（LLM / 检索客户端报错），会中止整个并发分发

use thiserror::Error;

use crate::llm::LlmError;
use crate::search::SearchError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Malformed plan: {0}")]
    MalformedPlan(String),

    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ReportError {
    /// 是否由外部协作方（模型 / 检索）引起
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, ReportError::Llm(_) | ReportError::Search(_))
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
