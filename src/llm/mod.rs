//! LLM 层：客户端抽象与实现（OpenAI 兼容 / Groq / DeepSeek / Mock）、token 统计与输出清理

pub mod message;
pub mod mock;
pub mod openai;
pub mod providers;
pub mod text;
pub mod traits;
pub mod usage;

pub use message::{Message, Role};
pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, SamplingParams};
pub use providers::{create_llm_client, DEEPSEEK_BASE_URL, GROQ_BASE_URL};
pub use text::{extract_json, strip_thinking_tokens};
pub use traits::{Completion, CompletionOptions, LlmClient, LlmError};
pub use usage::{TokenCount, TokenPrice, TokenUsage};
