//! Sage - 研究报告生成器
//!
//! 给定主题，按固定流水线生成带引用的 Markdown 报告：
//! Planner（查询 + 检索 + 大纲） -> SectionsWriter（分节并发调研） -> FinalWriter（综述分节与标题） -> Finalizer（合并引用）
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 报告状态与错误类型
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Groq / DeepSeek / Mock）、token 统计
//! - **search**: Web 检索抽象、Tavily 与内存实现、来源去重与格式化
//! - **research**: 各阶段组件与提示模板
//! - **workflow**: 阶段定义、流水线驱动与检查点
//! - **observability**: 日志初始化

pub mod config;
pub mod core;
pub mod llm;
pub mod observability;
pub mod research;
pub mod search;
pub mod workflow;

pub use crate::core::{ReportError, ReportState, Section};
pub use crate::workflow::{ReportOutput, ReportPipeline};
