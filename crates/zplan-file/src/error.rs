//! 文件操作错误定义

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DXF error: {0}")]
    Dxf(String),

    #[error("Drawing '{0}' has no entities to export")]
    EmptyDrawing(String),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
}
