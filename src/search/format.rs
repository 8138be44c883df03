//! 来源格式化：拼成提示上下文，并按 token 预算截断正文
//!
//! token 按 4 字符/token 近似；原始正文若为 HTML，先用 html2text 提取可读文本。

use html2text::from_read;

use crate::search::SourceMap;

/// 每 token 近似字符数
const CHARS_PER_TOKEN: usize = 4;

/// 简易去除 HTML 标签（html2text 失败时的回退）
fn strip_html_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 判断内容是否像 HTML（需提取可读文本）
fn looks_like_html(s: &str) -> bool {
    let s = s.trim_start();
    s.starts_with("<!")
        || s.starts_with("<html")
        || s.starts_with("<HTML")
        || (s.len() > 20
            && s.contains('<')
            && (s.contains("</")
                || s.contains("<meta")
                || s.contains("<head")
                || s.contains("<title")))
}

/// 清理原始正文：去 BOM，HTML 转可读文本
pub fn clean_raw_content(raw: &str) -> String {
    let raw = raw.strip_prefix('\u{FEFF}').unwrap_or(raw);
    if !looks_like_html(raw) {
        return raw.to_string();
    }
    match from_read(raw.as_bytes(), 120) {
        Ok(text) if !text.trim().is_empty() => text,
        _ => strip_html_tags(raw),
    }
}

/// 按 token 预算截断，超出时追加 `... [truncated]`
pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> String {
    let limit = max_tokens.saturating_mul(CHARS_PER_TOKEN);
    if text.chars().count() <= limit {
        return text.to_string();
    }
    text.chars().take(limit).collect::<String>() + "... [truncated]"
}

/// 将来源表格式化为提示上下文
pub fn format_sources(sources: &SourceMap, max_tokens_per_source: usize, include_raw_content: bool) -> String {
    let mut out = String::from("Content from sources:\n");
    for source in sources.iter() {
        out.push_str(&format!("{}\n", "=".repeat(80)));
        out.push_str(&format!("Source: {}\n", source.title));
        out.push_str(&format!("URL: {}\n", source.url));
        out.push_str(&format!("Most relevant content from source: {}\n", source.content));
        if include_raw_content {
            let raw = source.raw_content.as_deref().unwrap_or_default();
            out.push_str(&format!(
                "Full source content limited to {} tokens: {}\n",
                max_tokens_per_source,
                truncate_to_tokens(raw, max_tokens_per_source)
            ));
        }
        out.push_str(&format!("{}\n\n", "=".repeat(80)));
    }
    out.trim_end().to_string()
}
