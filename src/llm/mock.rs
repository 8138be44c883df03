//! Mock LLM 客户端（用于测试与本地演示，无需 API）
//!
//! 默认按提示内容给出可解析的固定回复（查询列表 / 报告大纲 / 标题 / 正文），
//! 测试中可用 with_responder 注入脚本化回复、with_delay 模拟不同的调用延迟。
//! token 计数按空白分词近似：输入 = 提示词数，输出 = 回复词数。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::{Completion, CompletionOptions, LlmClient, LlmError, Message, TokenCount};

type Responder = dyn Fn(&str) -> Result<String, LlmError> + Send + Sync;
type Latency = dyn Fn(&str) -> Duration + Send + Sync;

/// Mock 客户端：脚本化回复 + 可选延迟
#[derive(Clone)]
pub struct MockLlmClient {
    model: String,
    responder: Arc<Responder>,
    latency: Option<Arc<Latency>>,
}

impl std::fmt::Debug for MockLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLlmClient")
            .field("model", &self.model)
            .finish()
    }
}

/// 默认回复：根据提示中的输出格式约定返回合法内容
fn default_response(prompt: &str) -> Result<String, LlmError> {
    if prompt.contains("\"queries\"") {
        return Ok(r#"{"queries": ["overview", "recent developments", "key debates", "case studies", "outlook"]}"#.to_string());
    }
    if prompt.contains("\"sections\"") {
        return Ok(r#"{"sections": [
            {"name": "Introduction", "description": "Overview of the topic", "research": false, "content": ""},
            {"name": "Background", "description": "Key concepts and history", "research": true, "content": ""},
            {"name": "Conclusion", "description": "Summary and outlook", "research": false, "content": ""}
        ]}"#
        .to_string());
    }
    if prompt.contains("Write only the report title") {
        return Ok("A Mock Report".to_string());
    }
    Ok("Mock content generated without a model backend.".to_string())
}

fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

impl MockLlmClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            responder: Arc::new(default_response),
            latency: None,
        }
    }

    /// 使用自定义回复函数（入参为拼接后的提示文本）
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        self.responder = Arc::new(responder);
        self
    }

    /// 每次调用前按提示内容 sleep 一段时间
    pub fn with_delay<F>(mut self, latency: F) -> Self
    where
        F: Fn(&str) -> Duration + Send + Sync + 'static,
    {
        self.latency = Some(Arc::new(latency));
        self
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: &[Message],
        _options: CompletionOptions,
    ) -> Result<Completion, LlmError> {
        let prompt = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(&prompt)).await;
        }

        let text = (self.responder)(&prompt)?;
        let usage = TokenCount::new(word_count(&prompt), word_count(&text));
        Ok(Completion { text, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_response_counts_words() {
        let client = MockLlmClient::new("mock");
        let out = client
            .prompt("write something nice", CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(out.usage.input_tokens, 3);
        assert_eq!(out.usage.output_tokens, word_count(&out.text));
    }

    #[tokio::test]
    async fn test_custom_responder_error() {
        let client = MockLlmClient::new("mock")
            .with_responder(|_| Err(LlmError::Api("boom".to_string())));
        let err = client
            .prompt("x", CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
