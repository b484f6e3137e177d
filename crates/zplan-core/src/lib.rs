//! ZPlan 核心
//!
//! 将一个楼层的三维构件边线转换为二维平面图实体。
//!
//! # 处理流程
//!
//! ```text
//! Edge3D (x0,y0,z0,x1,y1,z1)
//!   └─ projection  丢弃竖直轴 Y，平面 Y = -Z
//!       └─ filter  去除投影长度 <= 容差 的退化边
//!           └─ drawing  按图层追加 LineEntity
//! ```
//!
//! # 示例
//!
//! ```rust
//! use zplan_core::prelude::*;
//!
//! let edges = project_positions(&[0.0, 0.0, 0.0, 5.0, 0.0, 3.0]).unwrap();
//! let kept = DegeneracyFilter::default().apply(edges);
//!
//! let mut registry = DrawingRegistry::new();
//! let drawing = registry.ensure_drawing("Level 1");
//! for edge in &kept.edges {
//!     drawing.add_line("Projection", LayerStyle::continuous(Color::Blue), edge.segment);
//! }
//! assert_eq!(drawing.entity_count(), 1);
//! ```

pub mod drawing;
pub mod filter;
pub mod geometry;
pub mod layer;
pub mod math;
pub mod projection;
pub mod properties;
pub mod spatial;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::drawing::{Drawing, DrawingId, DrawingRegistry, LineEntity};
    pub use crate::filter::{DegeneracyFilter, FilterOutcome, DEFAULT_TOLERANCE};
    pub use crate::geometry::{Edge3D, GeometryError, ProjectedSegment};
    pub use crate::layer::{Layer, LayerTable};
    pub use crate::math::{BoundingBox2, Point2, Point3, Vector2};
    pub use crate::projection::{project_edge, project_positions, ProjectedEdge};
    pub use crate::properties::{Color, LayerStyle, LineType};
    pub use crate::spatial::{ExpressId, NodeId, SpatialError, SpatialTree, StoreyNode};
}
