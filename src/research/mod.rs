//! 报告各阶段组件
//!
//! - **QueryWriter**: 主题 -> 检索查询
//! - **WebSearcher**: 查询 -> 去重来源（可选逐条摘要）
//! - **Planner**: 查询 + 检索 + 推理模型拆分大纲
//! - **SectionResearcher**: 单个分节的独立调研子流程
//! - **SectionsWriter**: 并发调研 research=true 的分节
//! - **FinalWriter**: 并发撰写综述类分节并生成标题
//! - **Finalizer**: 合并引用、拼装全文

pub mod final_writer;
pub mod finalizer;
pub mod planner;
pub mod prompts;
pub mod query_writer;
pub mod schema;
pub mod section_researcher;
pub mod sections_writer;
pub mod web_searcher;

pub use final_writer::FinalWriter;
pub use finalizer::Finalizer;
pub use planner::{parse_plan, Planner};
pub use query_writer::QueryWriter;
pub use section_researcher::{SectionDraft, SectionRequest, SectionResearch, SectionResearcher};
pub use sections_writer::SectionsWriter;
pub use web_searcher::WebSearcher;
