//! 阶段检查点：每个顶层阶段结束后保存一次完整状态
//!
//! 只用于事后排查与外部续跑；保存失败只记录警告，不影响本次运行。

use std::path::{Path, PathBuf};

use crate::core::ReportState;
use crate::workflow::Stage;

/// 检查点保存 trait
pub trait Checkpointer: Send + Sync {
    fn save(&self, stage: Stage, seq: usize, state: &ReportState) -> std::io::Result<()>;
}

/// 写入 `<dir>/<run_id>/<NN>-<stage>.json`
pub struct JsonCheckpointer {
    dir: PathBuf,
}

impl JsonCheckpointer {
    pub fn new(root: impl AsRef<Path>, run_id: &str) -> Self {
        Self {
            dir: root.as_ref().join(run_id),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, stage: Stage, seq: usize) -> PathBuf {
        self.dir.join(format!("{:02}-{}.json", seq, stage))
    }
}

impl Checkpointer for JsonCheckpointer {
    fn save(&self, stage: Stage, seq: usize, state: &ReportState) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(self.path_for(stage, seq), json)
    }
}

/// 读取检查点（外部续跑时使用）
pub fn load_checkpoint(path: impl AsRef<Path>) -> std::io::Result<ReportState> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Section;

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let cp = JsonCheckpointer::new(tmp.path(), "run-1");
        let mut state = ReportState::new("topic", ["lang"]);
        state.sections.push(Section::new("Intro", "d", false));
        state.steps.push(Stage::Planner);

        cp.save(Stage::Planner, 1, &state).unwrap();
        let path = cp.path_for(Stage::Planner, 1);
        assert!(path.ends_with("run-1/01-planner.json"));

        let loaded = load_checkpoint(&path).unwrap();
        assert_eq!(loaded, state);
    }
}
