//! 导出错误定义

use crate::services::ServiceError;
use thiserror::Error;
use zplan_core::geometry::GeometryError;
use zplan_core::spatial::{ExpressId, SpatialError};
use zplan_file::FileError;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    MalformedGeometry(#[from] GeometryError),

    #[error("Nothing to export for plan '{0}'")]
    EmptyDrawing(String),

    #[error("Timed out waiting for {stage} after {timeout_ms} ms")]
    GeometryTimeout { stage: &'static str, timeout_ms: u64 },

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Unknown storey: {0}")]
    UnknownStorey(ExpressId),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("File error: {0}")]
    File(FileError),
}

/// 错误类别，供界面层分支处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorKind {
    MalformedGeometry,
    EmptyDrawing,
    GeometryTimeout,
    UnknownPlan,
    UnknownStorey,
    Service,
    File,
}

impl ExportError {
    pub fn kind(&self) -> ExportErrorKind {
        match self {
            ExportError::MalformedGeometry(_) => ExportErrorKind::MalformedGeometry,
            ExportError::EmptyDrawing(_) => ExportErrorKind::EmptyDrawing,
            ExportError::GeometryTimeout { .. } => ExportErrorKind::GeometryTimeout,
            ExportError::UnknownPlan(_) => ExportErrorKind::UnknownPlan,
            ExportError::UnknownStorey(_) => ExportErrorKind::UnknownStorey,
            ExportError::Service(_) => ExportErrorKind::Service,
            ExportError::File(_) => ExportErrorKind::File,
        }
    }

    /// 可恢复的错误：提示用户或重试即可
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ExportErrorKind::EmptyDrawing | ExportErrorKind::GeometryTimeout | ExportErrorKind::Service
        )
    }
}

impl From<SpatialError> for ExportError {
    fn from(err: SpatialError) -> Self {
        match err {
            SpatialError::UnknownStorey(id) => ExportError::UnknownStorey(id),
        }
    }
}

impl From<FileError> for ExportError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::EmptyDrawing(name) => ExportError::EmptyDrawing(name),
            other => ExportError::File(other),
        }
    }
}
