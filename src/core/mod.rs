//! 核心层：报告状态与错误类型

pub mod error;
pub mod state;

pub use error::{ReportError, Result};
pub use state::{ReportState, Section};
