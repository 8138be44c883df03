//! 检索层：Web 检索抽象、Tavily 实现、内存实现、来源表与格式化

pub mod format;
pub mod memory;
pub mod source;
pub mod tavily;
pub mod traits;

pub use format::{clean_raw_content, format_sources, truncate_to_tokens};
pub use memory::InMemorySearch;
pub use source::{Source, SourceMap};
pub use tavily::TavilyClient;
pub use traits::{SearchCategory, SearchError, SearchParams, WebSearch};
