//! 模型输出清理：去除思考标记、提取 JSON 块
//!
//! 推理模型（如 deepseek-r1）会在正文前输出 `<think>...</think>`；
//! 结构化输出可能包在 ```json ... ``` 代码块中或前后带有说明文字。

use std::sync::OnceLock;

use regex::Regex;

fn think_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think regex"))
}

/// 去除所有 `<think>...</think>` 块；未闭合的 `<think>` 视为其后全部是思考内容
pub fn strip_thinking_tokens(text: &str) -> String {
    let stripped = think_regex().replace_all(text, "");
    let stripped = match stripped.find("<think>") {
        Some(idx) => &stripped[..idx],
        None => &stripped[..],
    };
    stripped.trim().to_string()
}

/// 提取 JSON 块（```json ... ``` 或首个 `{` 到最后一个 `}`）；找不到时返回 None
pub fn extract_json(output: &str) -> Option<&str> {
    let trimmed = output.trim();

    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        return Some(rest.find("```").map(|end| rest[..end].trim()).unwrap_or(rest.trim()));
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_thinking_tokens() {
        let out = strip_thinking_tokens("<think>hmm\nlet me see</think>\n  Final answer ");
        assert_eq!(out, "Final answer");
    }

    #[test]
    fn test_strip_unclosed_think() {
        assert_eq!(strip_thinking_tokens("Title<think>never closed"), "Title");
    }

    #[test]
    fn test_extract_json_fenced() {
        let out = "Here you go:\n```json\n{\"a\": 1}\n```\nthanks";
        assert_eq!(extract_json(out), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_json_bare() {
        assert_eq!(extract_json("x {\"a\": {\"b\": 2}} y"), Some("{\"a\": {\"b\": 2}}"));
        assert_eq!(extract_json("no json here"), None);
    }
}
