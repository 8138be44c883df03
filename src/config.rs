//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `SAGE__*` 覆盖（双下划线表示嵌套，如 `SAGE__REPORT__NUMBER_OF_QUERIES=5`）。

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::llm::TokenPrice;
use crate::search::{SearchCategory, SearchParams};

/// 默认报告结构（规划大纲时注入提示）
pub const DEFAULT_REPORT_STRUCTURE: &str = "The report structure should focus on breaking-down the user-provided topic:

1. Introduction (no research needed)
   - Brief overview of the topic area

2. Main Body Sections:
   - Each section should focus on a sub-topic of the user-provided topic
   - Include any key concepts and definitions
   - Provide real-world examples or case studies where applicable

3. Conclusion
   - Aim for 1 structural element (either a list or table) that distills the main body sections
   - Provide a concise summary of the report";

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub report: ResearchConfig,
}

/// [app] 段：输出目录与检查点目录
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    pub name: Option<String>,
    /// 报告输出目录，未设置时用 ./out
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// 设置后每个阶段结束写一次 JSON 检查点
    pub checkpoint_dir: Option<PathBuf>,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            out_dir: default_out_dir(),
            checkpoint_dir: None,
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("out")
}

/// [llm] 段：两个模型角色与单价表
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 写查询、摘要、分节正文与标题
    #[serde(default = "default_language_model")]
    pub language_model: ModelSection,
    /// 规划报告大纲
    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: ModelSection,
    /// 模型名 -> 每百万 token 单价（美元），用于估算费用
    #[serde(default)]
    pub prices: HashMap<String, TokenPrice>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            language_model: default_language_model(),
            reasoning_model: default_reasoning_model(),
            prices: HashMap::new(),
        }
    }
}

/// [llm.language_model] / [llm.reasoning_model]
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ModelSection {
    /// 后端：groq / deepseek / openai / mock
    #[serde(default = "default_provider")]
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    /// 未设置时按 provider 读取对应环境变量
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_language_model() -> ModelSection {
    ModelSection {
        provider: default_provider(),
        model: "llama-3.3-70b-versatile".to_string(),
        temperature: Some(0.0),
        ..ModelSection::default()
    }
}

fn default_reasoning_model() -> ModelSection {
    ModelSection {
        provider: default_provider(),
        model: "deepseek-r1-distill-llama-70b".to_string(),
        temperature: Some(0.0),
        ..ModelSection::default()
    }
}

/// [search] 段：检索后端与超时
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSection {
    /// tavily / memory（memory 为离线合成来源）
    #[serde(default = "default_search_provider")]
    pub provider: String,
    /// 未设置时读取 TAVILY_API_KEY
    pub api_key: Option<String>,
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            provider: default_search_provider(),
            api_key: None,
            timeout_secs: default_search_timeout_secs(),
        }
    }
}

fn default_search_provider() -> String {
    "tavily".to_string()
}

fn default_search_timeout_secs() -> u64 {
    30
}

/// [report] 段：规划阶段的检索参数、报告结构，以及分节调研子流程的嵌套配置
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchConfig {
    #[serde(default = "default_number_of_queries")]
    pub number_of_queries: usize,
    /// 只检索最近 N 天，未设置表示不限
    pub number_of_days_back: Option<u32>,
    #[serde(default = "default_max_results_per_query")]
    pub max_results_per_query: usize,
    #[serde(default = "default_max_tokens_per_source")]
    pub max_tokens_per_source: usize,
    #[serde(default)]
    pub search_category: SearchCategory,
    #[serde(default = "default_report_structure")]
    pub report_structure: String,
    #[serde(default = "default_true")]
    pub strip_thinking_tokens: bool,
    #[serde(default)]
    pub sections: SectionsConfig,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            number_of_queries: default_number_of_queries(),
            number_of_days_back: None,
            max_results_per_query: default_max_results_per_query(),
            max_tokens_per_source: default_max_tokens_per_source(),
            search_category: SearchCategory::default(),
            report_structure: default_report_structure(),
            strip_thinking_tokens: true,
            sections: SectionsConfig::default(),
        }
    }
}

impl ResearchConfig {
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            category: self.search_category,
            max_results: self.max_results_per_query,
            days_back: self.number_of_days_back,
            include_raw_content: true,
        }
    }
}

/// [report.sections] 段：每个需调研分节的子流程配置
#[derive(Debug, Clone, Deserialize)]
pub struct SectionsConfig {
    #[serde(default = "default_section_queries")]
    pub number_of_queries: usize,
    pub number_of_days_back: Option<u32>,
    #[serde(default = "default_section_results")]
    pub max_results_per_query: usize,
    #[serde(default = "default_max_tokens_per_source")]
    pub max_tokens_per_source: usize,
    #[serde(default)]
    pub search_category: SearchCategory,
    #[serde(default = "default_true")]
    pub strip_thinking_tokens: bool,
    /// 是否逐条来源按分节主题做摘要（每条来源一次 LLM 调用）
    #[serde(default = "default_true")]
    pub summarize_sources: bool,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            number_of_queries: default_section_queries(),
            number_of_days_back: None,
            max_results_per_query: default_section_results(),
            max_tokens_per_source: default_max_tokens_per_source(),
            search_category: SearchCategory::default(),
            strip_thinking_tokens: true,
            summarize_sources: true,
        }
    }
}

impl SectionsConfig {
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            category: self.search_category,
            max_results: self.max_results_per_query,
            days_back: self.number_of_days_back,
            include_raw_content: true,
        }
    }
}

fn default_number_of_queries() -> usize {
    3
}

fn default_section_queries() -> usize {
    4
}

fn default_max_results_per_query() -> usize {
    4
}

fn default_section_results() -> usize {
    5
}

fn default_max_tokens_per_source() -> usize {
    5000
}

fn default_report_structure() -> String {
    DEFAULT_REPORT_STRUCTURE.to_string()
}

fn default_true() -> bool {
    true
}

/// 从 config 目录加载配置，环境变量 SAGE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 则追加该文件（可覆盖前面的键），文件不存在时报错
/// 3. 最后叠加环境变量 SAGE__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(
                config::File::with_name(name).required(false),
            );
            break;
        }
    }

    if let Some(path) = config_path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SAGE")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
