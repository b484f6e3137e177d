//! 可下载的导出产物

use crate::dxf_io;
use crate::error::FileError;
use std::path::{Path, PathBuf};
use zplan_core::drawing::Drawing;

/// 每次导出使用的固定文件名
pub const DEFAULT_FILE_NAME: &str = "floorplan.dxf";

/// 导出产物：文件名 + DXF 字节
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    /// 产物对应的图纸（即最近一次导出的平面）
    pub drawing_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// 序列化图纸生成产物
    pub fn from_drawing(drawing: &Drawing, file_name: impl Into<String>) -> Result<Self, FileError> {
        Ok(Self {
            file_name: file_name.into(),
            drawing_name: drawing.name().to_string(),
            bytes: dxf_io::serialize(drawing)?,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 写入目录，返回完整路径（同名文件被覆盖）
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, FileError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "wrote export artifact");
        Ok(path)
    }
}
