//! Finalizer：合并引用、拼装全文（纯函数，无模型调用）
//!
//! 引用按分节顺序合并，同一 URL 后出现的分节覆盖先前的值、保留首次出现的位置。

use crate::core::ReportState;
use crate::search::SourceMap;
use crate::workflow::Stage;

#[derive(Debug, Default, Clone, Copy)]
pub struct Finalizer;

impl Finalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, state: &mut ReportState) {
        let mut unique_sources = SourceMap::new();
        for section in state.sections.iter().filter(|s| s.research) {
            unique_sources.extend(&section.unique_sources);
        }

        state.content = render_report(state, &unique_sources);
        state.unique_sources = unique_sources;
        state.steps.push(Stage::Finalizer);
    }
}

/// `# 标题`，各分节 `## 名称`，最后 `## Citations` 编号列表
fn render_report(state: &ReportState, sources: &SourceMap) -> String {
    let mut out = format!("# {}", state.report_title);
    for section in &state.sections {
        out.push_str(&format!("\n\n## {}\n\n{}", section.name, section.content));
    }
    out.push_str("\n\n## Citations\n\n");
    for (i, source) in sources.iter().enumerate() {
        out.push_str(&format!("{}. {}: [{}]({})\n", i + 1, source.title, source.url, source.url));
    }
    out
}
