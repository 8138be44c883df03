//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容 / Groq / DeepSeek / Mock）实现 LlmClient：complete 返回文本与本次调用的 token 计数。
//! 客户端不在调用之间共享可变状态，可被多个并发任务同时 await。

use async_trait::async_trait;
use thiserror::Error;

use crate::llm::{Message, TokenCount};

/// 单次调用选项
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionOptions {
    /// 要求返回 JSON 对象（response_format = json_object）
    pub json_mode: bool,
}

impl CompletionOptions {
    pub fn json() -> Self {
        Self { json_mode: true }
    }
}

/// 单次完成的结果
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub text: String,
    pub usage: TokenCount,
}

/// LLM 调用错误
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Request build failed: {0}")]
    Request(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Empty response from model {0}")]
    EmptyResponse(String),
}

/// LLM 客户端 trait
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 模型标识（token 统计的键）
    fn model_name(&self) -> &str;

    /// 非流式完成
    async fn complete(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<Completion, LlmError>;

    /// 单条 user 消息的便捷调用
    async fn prompt(&self, prompt: &str, options: CompletionOptions) -> Result<Completion, LlmError> {
        self.complete(&[Message::user(prompt)], options).await
    }
}
