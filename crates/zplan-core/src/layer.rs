//! 图层管理
//!
//! 图层在首次使用时按名称惰性创建，创建后名称和样式不再改变。

use crate::properties::LayerStyle;
use serde::{Deserialize, Serialize};

/// 图层定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    name: String,
    style: LayerStyle,
}

impl Layer {
    pub fn new(name: impl Into<String>, style: LayerStyle) -> Self {
        Self {
            name: name.into(),
            style,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> LayerStyle {
        self.style
    }
}

/// 图层表
///
/// 按创建顺序保存，名称唯一。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerTable {
    layers: Vec<Layer>,
}

impl LayerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取图层，不存在时创建
    ///
    /// 已存在的图层保持原样式，传入的 `style` 被忽略。
    pub fn get_or_create(&mut self, name: &str, style: LayerStyle) -> &Layer {
        let idx = match self.position(name) {
            Some(idx) => {
                if self.layers[idx].style != style {
                    tracing::trace!(layer = name, "layer exists, keeping original style");
                }
                idx
            }
            None => {
                self.layers.push(Layer::new(name, style));
                self.layers.len() - 1
            }
        };
        &self.layers[idx]
    }

    /// 获取图层（按名称）
    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// 按创建顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }
}
