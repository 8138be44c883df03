//! 服务商预设：Groq / DeepSeek / OpenAI 均为 OpenAI 兼容格式
//!
//! - Groq: https://api.groq.com/openai/v1，Key 取 `GROQ_API_KEY`
//! - DeepSeek: https://api.deepseek.com，Key 取 `DEEPSEEK_API_KEY`
//! - OpenAI: 默认端点，Key 取 `OPENAI_API_KEY`
//!
//! provider 为 `mock` 时返回 MockLlmClient（无需 API Key，便于本地跑通流程）。

use std::sync::Arc;

use crate::config::ModelSection;
use crate::llm::{LlmClient, MockLlmClient, OpenAiClient, SamplingParams};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";

/// (默认 base_url, API Key 环境变量)
fn provider_defaults(provider: &str) -> (Option<&'static str>, &'static str) {
    match provider {
        "groq" => (Some(GROQ_BASE_URL), "GROQ_API_KEY"),
        "deepseek" => (Some(DEEPSEEK_BASE_URL), "DEEPSEEK_API_KEY"),
        _ => (None, "OPENAI_API_KEY"),
    }
}

/// 根据模型配置创建客户端
///
/// - base_url：配置 > 服务商默认
/// - api_key：配置 > 服务商对应环境变量 > OPENAI_API_KEY
pub fn create_llm_client(section: &ModelSection) -> Arc<dyn LlmClient> {
    let provider = section.provider.to_lowercase();
    if provider == "mock" {
        tracing::warn!(model = %section.model, "Using Mock LLM");
        return Arc::new(MockLlmClient::new(&section.model));
    }

    let (default_base, key_env) = provider_defaults(&provider);
    let base_url = section.base_url.as_deref().or(default_base);
    let api_key = section
        .api_key
        .clone()
        .or_else(|| std::env::var(key_env).ok())
        .or_else(|| std::env::var("OPENAI_API_KEY").ok());

    tracing::info!(provider = %provider, model = %section.model, "Using OpenAI-compatible LLM");
    let client = OpenAiClient::new(base_url, &section.model, api_key.as_deref()).with_sampling(
        SamplingParams {
            temperature: section.temperature,
            max_tokens: section.max_tokens,
            top_p: section.top_p,
        },
    );
    Arc::new(client)
}
