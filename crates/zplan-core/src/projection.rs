//! 正交平面投影
//!
//! 世界坐标 (x, y, z) 投影到平面坐标 (x, -z)，竖直分量 y 被丢弃。

use crate::geometry::{Edge3D, GeometryError, ProjectedSegment};
use crate::math::{Point2, Vector2};

/// 投影后的边
///
/// `dx`/`dz` 仅用于退化判断；`segment` 是最终写入图纸的线段。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedEdge {
    /// x0 - x1
    pub dx: f64,
    /// z1 - z0，即 (-z1) - (-z0)
    pub dz: f64,
    pub segment: ProjectedSegment,
}

impl ProjectedEdge {
    /// 投影后的平面长度
    pub fn planar_length(&self) -> f64 {
        Vector2::new(self.dx, self.dz).norm()
    }
}

/// 将世界坐标点投影到平面
#[inline]
pub fn project_point(x: f64, z: f64) -> Point2 {
    Point2::new(x, -z)
}

/// 投影单条边
pub fn project_edge(edge: &Edge3D) -> ProjectedEdge {
    ProjectedEdge {
        dx: edge.x0 - edge.x1,
        dz: edge.z1 - edge.z0,
        segment: ProjectedSegment::from_points(
            project_point(edge.x0, edge.z0),
            project_point(edge.x1, edge.z1),
        ),
    }
}

/// 按输入顺序投影边列表
pub fn project_edges(edges: &[Edge3D]) -> Vec<ProjectedEdge> {
    edges.iter().map(project_edge).collect()
}

/// 直接投影扁平顶点缓冲（每条边 6 个数值）
pub fn project_positions(positions: &[f64]) -> Result<Vec<ProjectedEdge>, GeometryError> {
    let edges = Edge3D::from_positions(positions)?;
    Ok(project_edges(&edges))
}
