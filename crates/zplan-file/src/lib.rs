//! ZPlan 文件格式处理
//!
//! 支持：
//! - `.dxf` 平面图导出（图层表 + LINE 实体）
//! - `.dxf` 读回为 [`zplan_core::drawing::Drawing`]

pub mod artifact;
pub mod dxf_io;
pub mod error;

pub use artifact::{ExportArtifact, DEFAULT_FILE_NAME};
pub use error::FileError;
