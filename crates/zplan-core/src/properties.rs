//! 图层样式：颜色与线型
//!
//! 颜色直接使用 AutoCAD 颜色索引（ACI）的标准色，导出时不需要做 RGB 匹配。

use serde::{Deserialize, Serialize};

/// ACI 标准颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    Red,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
    White,
    Gray,
}

impl Color {
    /// AutoCAD 颜色索引
    pub fn aci(&self) -> u8 {
        match self {
            Color::Red => 1,
            Color::Yellow => 2,
            Color::Green => 3,
            Color::Cyan => 4,
            Color::Blue => 5,
            Color::Magenta => 6,
            Color::White => 7,
            Color::Gray => 8,
        }
    }

    /// 从颜色索引转换，非标准色返回 None
    pub fn from_aci(aci: u8) -> Option<Self> {
        match aci {
            1 => Some(Color::Red),
            2 => Some(Color::Yellow),
            3 => Some(Color::Green),
            4 => Some(Color::Cyan),
            5 => Some(Color::Blue),
            6 => Some(Color::Magenta),
            7 => Some(Color::White),
            8 => Some(Color::Gray),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::White
    }
}

/// 线型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineType {
    /// 连续线（实线）
    Continuous,
    /// 虚线
    Dashed,
    /// 隐藏线
    Hidden,
    /// 中心线
    Center,
}

impl LineType {
    /// DXF 线型表中的名称
    pub fn dxf_name(&self) -> &'static str {
        match self {
            LineType::Continuous => "CONTINUOUS",
            LineType::Dashed => "DASHED",
            LineType::Hidden => "HIDDEN",
            LineType::Center => "CENTER",
        }
    }

    /// 按名称解析（不区分大小写）
    pub fn from_dxf_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "CONTINUOUS" => Some(LineType::Continuous),
            "DASHED" => Some(LineType::Dashed),
            "HIDDEN" => Some(LineType::Hidden),
            "CENTER" => Some(LineType::Center),
            _ => None,
        }
    }
}

impl Default for LineType {
    fn default() -> Self {
        LineType::Continuous
    }
}

/// 图层样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerStyle {
    pub color: Color,
    pub line_type: LineType,
}

impl LayerStyle {
    pub fn new(color: Color, line_type: LineType) -> Self {
        Self { color, line_type }
    }

    /// 指定颜色的连续线样式
    pub fn continuous(color: Color) -> Self {
        Self::new(color, LineType::Continuous)
    }
}
