//! 流水线：阶段定义、驱动器与检查点

pub mod checkpoint;
pub mod engine;
pub mod types;

pub use checkpoint::{load_checkpoint, Checkpointer, JsonCheckpointer};
pub use engine::{run, ReportOutput, ReportPipeline};
pub use types::Stage;
