//! FinalWriter：并发撰写 research=false 的综述类分节（引言 / 结论），再生成报告标题
//!
//! 共享上下文只取已写好的调研分节；标题调用在分发结束后顺序执行，使用全部分节。

use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::core::{ReportError, ReportState, Result};
use crate::llm::{strip_thinking_tokens, CompletionOptions, LlmClient};
use crate::research::prompts;
use crate::workflow::Stage;

pub struct FinalWriter {
    llm: Arc<dyn LlmClient>,
}

impl FinalWriter {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    fn clean(&self, text: &str, strip_thinking: bool) -> String {
        if strip_thinking {
            strip_thinking_tokens(text)
        } else {
            text.trim().to_string()
        }
    }

    pub async fn run(&self, state: &mut ReportState, strip_thinking: bool) -> Result<()> {
        let context = state.sections_context(Some(true));
        let final_idx = state.section_indices(false);

        let requests: Vec<String> = final_idx
            .iter()
            .map(|&idx| {
                let section = &state.sections[idx];
                prompts::final_section(&state.topic, &section.name, &section.description, &context)
            })
            .collect();

        tracing::info!(sections = requests.len(), "writing synthesis sections");
        let completions = try_join_all(
            requests
                .iter()
                .map(|p| self.llm.prompt(p, CompletionOptions::default())),
        )
        .await?;

        for (&idx, completion) in final_idx.iter().zip(completions) {
            state.sections[idx].content = self.clean(&completion.text, strip_thinking);
            state.token_usage.add(self.llm.model_name(), completion.usage);
        }

        // 综述类分节可能出现在任意位置，标题上下文按最终顺序重新拼接
        let full_context = state.sections_context(None);
        let completion = self
            .llm
            .prompt(&prompts::report_title(&state.topic, &full_context), CompletionOptions::default())
            .await?;
        state.token_usage.add(self.llm.model_name(), completion.usage);

        let title = self.clean(&completion.text, strip_thinking);
        if title.is_empty() {
            return Err(ReportError::MalformedModelOutput("report title is empty".to_string()));
        }
        state.report_title = title;
        state.steps.push(Stage::FinalWriter);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::core::Section;
    use crate::llm::MockLlmClient;

    fn state() -> ReportState {
        let mut state = ReportState::new("X", ["lang"]);
        state.sections = vec![
            Section::new("Intro", "opening", false),
            Section::new("Body", "main", true),
            Section::new("Conclusion", "closing", false),
        ];
        state.sections[1].content = "body findings".to_string();
        state
    }

    #[tokio::test]
    async fn test_writes_only_non_research_sections() {
        let prompts_seen = Arc::new(Mutex::new(Vec::new()));
        let seen = prompts_seen.clone();
        let llm = MockLlmClient::new("lang").with_responder(move |prompt| {
            seen.lock().unwrap().push(prompt.to_string());
            if prompt.contains("Write only the report title") {
                return Ok("  Title Here \n".to_string());
            }
            let name = prompt
                .lines()
                .skip_while(|l| *l != "<section name>")
                .nth(1)
                .unwrap_or("?");
            Ok(format!("[final] {}", name))
        });
        let writer = FinalWriter::new(Arc::new(llm));
        let mut state = state();
        writer.run(&mut state, true).await.unwrap();

        assert_eq!(state.sections[0].content, "[final] Intro");
        assert_eq!(state.sections[1].content, "body findings");
        assert_eq!(state.sections[2].content, "[final] Conclusion");
        assert_eq!(state.report_title, "Title Here");
        assert_eq!(state.steps, vec![Stage::FinalWriter]);

        let seen = prompts_seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        // 分节上下文只含调研分节；标题上下文含全部分节
        assert!(seen[0].contains("## Body\n\nbody findings"));
        assert!(!seen[0].contains("## Intro"));
        assert!(seen[2].contains("## Intro\n\n[final] Intro"));
    }

    #[tokio::test]
    async fn test_empty_title_is_malformed() {
        let llm = MockLlmClient::new("lang").with_responder(|prompt| {
            if prompt.contains("Write only the report title") {
                Ok("<think>hmm</think>".to_string())
            } else {
                Ok("text".to_string())
            }
        });
        let mut state = state();
        let err = FinalWriter::new(Arc::new(llm)).run(&mut state, true).await.unwrap_err();
        assert!(matches!(err, ReportError::MalformedModelOutput(_)));
    }
}
