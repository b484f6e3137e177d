//! 几何输入/输出单元
//!
//! - [`Edge3D`]：世界坐标系中的无向三维线段，投影的输入
//! - [`ProjectedSegment`]：平面坐标系中的二维线段，投影和剖切的输出

use crate::math::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// 每条边在顶点缓冲中占用的数值个数（x0,y0,z0,x1,y1,z1）
pub const EDGE_STRIDE: usize = 6;

/// 几何数据错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(f64),
}

/// 三维边（世界坐标，Y 轴竖直）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge3D {
    pub x0: f64,
    pub y0: f64,
    pub z0: f64,
    pub x1: f64,
    pub y1: f64,
    pub z1: f64,
}

impl Edge3D {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self {
            x0: start.x,
            y0: start.y,
            z0: start.z,
            x1: end.x,
            y1: end.y,
            z1: end.z,
        }
    }

    /// 从扁平顶点缓冲解析边列表
    ///
    /// 长度必须是 6 的整数倍且所有值有限，否则返回
    /// [`GeometryError::MalformedGeometry`]，不会截断。
    pub fn from_positions(positions: &[f64]) -> Result<Vec<Edge3D>, GeometryError> {
        if positions.len() % EDGE_STRIDE != 0 {
            return Err(GeometryError::MalformedGeometry(format!(
                "{} values is not a multiple of {}",
                positions.len(),
                EDGE_STRIDE
            )));
        }

        if let Some(offset) = positions.iter().position(|v| !v.is_finite()) {
            return Err(GeometryError::MalformedGeometry(format!(
                "non-finite value {} at offset {}",
                positions[offset], offset
            )));
        }

        Ok(positions
            .chunks_exact(EDGE_STRIDE)
            .map(|c| Edge3D {
                x0: c[0],
                y0: c[1],
                z0: c[2],
                x1: c[3],
                y1: c[4],
                z1: c[5],
            })
            .collect())
    }

    pub fn start(&self) -> Point3 {
        Point3::new(self.x0, self.y0, self.z0)
    }

    pub fn end(&self) -> Point3 {
        Point3::new(self.x1, self.y1, self.z1)
    }
}

/// 平面图中的二维线段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSegment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl ProjectedSegment {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_points(start: Point2, end: Point2) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }

    pub fn start(&self) -> Point2 {
        Point2::new(self.x0, self.y0)
    }

    pub fn end(&self) -> Point2 {
        Point2::new(self.x1, self.y1)
    }

    pub fn length(&self) -> f64 {
        (self.end() - self.start()).norm()
    }
}
