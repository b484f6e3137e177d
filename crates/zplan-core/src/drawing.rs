//! 分层矢量图纸模型
//!
//! - [`Drawing`]：一张命名图纸，包含图层表和有序的线实体
//! - [`DrawingRegistry`]：图纸名 → 图纸，按名称"存在即复用"
//!
//! 实体只会追加，唯一的删除方式是丢弃整张图纸。

use crate::geometry::ProjectedSegment;
use crate::layer::{Layer, LayerTable};
use crate::math::{BoundingBox2, Point2};
use crate::properties::LayerStyle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// 全局图纸ID生成器
static DRAWING_COUNTER: AtomicU64 = AtomicU64::new(1);

/// 图纸唯一标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawingId(pub u64);

impl DrawingId {
    pub fn new() -> Self {
        Self(DRAWING_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for DrawingId {
    fn default() -> Self {
        Self::new()
    }
}

/// 线实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineEntity {
    /// 所属图层名称（必须已存在于图纸的图层表中）
    pub layer: String,
    pub start: Point2,
    pub end: Point2,
}

impl LineEntity {
    pub fn segment(&self) -> ProjectedSegment {
        ProjectedSegment::from_points(self.start, self.end)
    }
}

/// 图纸
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drawing {
    id: DrawingId,
    name: String,
    layers: LayerTable,
    entities: Vec<LineEntity>,
}

impl Drawing {
    /// 创建空图纸
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DrawingId::new(),
            name: name.into(),
            layers: LayerTable::new(),
            entities: Vec::new(),
        }
    }

    pub fn id(&self) -> DrawingId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layers(&self) -> &LayerTable {
        &self.layers
    }

    pub fn entities(&self) -> &[LineEntity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// 获取图层，不存在时按给定样式创建
    pub fn ensure_layer(&mut self, name: &str, style: LayerStyle) -> &Layer {
        self.layers.get_or_create(name, style)
    }

    /// 追加一条线段，图层不存在时先创建
    pub fn add_line(&mut self, layer: &str, style: LayerStyle, segment: ProjectedSegment) -> &LineEntity {
        let layer = self.layers.get_or_create(layer, style).name().to_string();
        self.entities.push(LineEntity {
            layer,
            start: segment.start(),
            end: segment.end(),
        });
        &self.entities[self.entities.len() - 1]
    }

    /// 按坐标追加一条线段
    pub fn add_entity(
        &mut self,
        layer: &str,
        style: LayerStyle,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> &LineEntity {
        self.add_line(layer, style, ProjectedSegment::new(x0, y0, x1, y1))
    }

    /// 指定图层上的实体
    pub fn entities_on<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a LineEntity> + 'a {
        self.entities.iter().filter(move |e| e.layer == layer)
    }

    /// 所有实体的包围盒，空图纸返回 None
    pub fn bounds(&self) -> Option<BoundingBox2> {
        if self.entities.is_empty() {
            return None;
        }
        Some(BoundingBox2::from_points(
            self.entities.iter().flat_map(|e| [e.start, e.end]),
        ))
    }
}

/// 图纸注册表
///
/// 由导出会话持有；图纸在首次引用时创建，直到 [`DrawingRegistry::reset`] 才销毁。
#[derive(Debug, Default)]
pub struct DrawingRegistry {
    drawings: HashMap<String, Drawing>,
}

impl DrawingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取图纸，不存在时创建并注册
    pub fn ensure_drawing(&mut self, name: &str) -> &mut Drawing {
        self.drawings.entry(name.to_string()).or_insert_with(|| {
            tracing::debug!(drawing = name, "creating drawing");
            Drawing::new(name)
        })
    }

    /// 向指定图纸追加一条线段（图纸和图层按需创建）
    #[allow(clippy::too_many_arguments)]
    pub fn add_entity(
        &mut self,
        drawing: &str,
        layer: &str,
        style: LayerStyle,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> &LineEntity {
        self.ensure_drawing(drawing)
            .add_entity(layer, style, x0, y0, x1, y1)
    }

    pub fn get(&self, name: &str) -> Option<&Drawing> {
        self.drawings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.drawings.contains_key(name)
    }

    /// 丢弃整张图纸
    pub fn remove(&mut self, name: &str) -> Option<Drawing> {
        self.drawings.remove(name)
    }

    /// 销毁全部图纸
    pub fn reset(&mut self) {
        self.drawings.clear();
    }

    pub fn len(&self) -> usize {
        self.drawings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }

    /// 已注册的图纸名称（排序后）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drawings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
