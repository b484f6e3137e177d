//! 退化边过滤
//!
//! 完全竖直的三维边（如墙角）投影后两个端点重合，不携带任何平面信息。
//! 保留条件：`sqrt(dx² + dz²) > tolerance`，等于容差的边被丢弃。

use crate::geometry::GeometryError;
use crate::projection::ProjectedEdge;
use serde::{Deserialize, Serialize};

/// 默认容差（模型长度单位）
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// 退化边过滤器
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegeneracyFilter {
    tolerance: f64,
}

/// 过滤结果
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// 保留的边，保持输入顺序
    pub edges: Vec<ProjectedEdge>,
    /// 被丢弃的边数
    pub dropped: usize,
}

impl DegeneracyFilter {
    /// 创建过滤器，容差必须是有限的非负数
    pub fn new(tolerance: f64) -> Result<Self, GeometryError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(GeometryError::InvalidTolerance(tolerance));
        }
        Ok(Self { tolerance })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// 判断单条边是否保留
    #[inline]
    pub fn keep(&self, edge: &ProjectedEdge) -> bool {
        edge.planar_length() > self.tolerance
    }

    /// 过滤边列表
    pub fn apply(&self, edges: impl IntoIterator<Item = ProjectedEdge>) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        for edge in edges {
            if self.keep(&edge) {
                outcome.edges.push(edge);
            } else {
                outcome.dropped += 1;
            }
        }
        outcome
    }
}

impl Default for DegeneracyFilter {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}
