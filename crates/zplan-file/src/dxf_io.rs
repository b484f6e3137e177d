//! DXF文件导出/导入
//!
//! 导出内容：
//! - 图层表：每个图层一项（名称、ACI颜色、线型）
//! - 模型空间：每个 LineEntity 一条 LINE，按名称引用图层
//!
//! 输出为 R12 ASCII 格式。文件头中的时间戳固定为默认值，
//! 同一张图纸多次导出得到逐字节相同的结果。

use crate::error::FileError;
use std::collections::HashSet;
use std::path::Path;
use zplan_core::drawing::Drawing;
use zplan_core::layer::Layer;
use zplan_core::properties::{Color, LayerStyle, LineType};

/// DXF 强制存在的图层
const LAYER_ZERO: &str = "0";

/// 将图纸序列化为 DXF 字节流
///
/// 空图纸返回 [`FileError::EmptyDrawing`]，由调用方决定是否提示用户。
pub fn serialize(drawing: &Drawing) -> Result<Vec<u8>, FileError> {
    if drawing.is_empty() {
        return Err(FileError::EmptyDrawing(drawing.name().to_string()));
    }

    let dxf_drawing = to_dxf_drawing(drawing);

    let mut buffer = Vec::new();
    dxf_drawing
        .save(&mut buffer)
        .map_err(|e| FileError::Dxf(e.to_string()))?;

    tracing::debug!(
        drawing = drawing.name(),
        layers = drawing.layers().len(),
        entities = drawing.entity_count(),
        bytes = buffer.len(),
        "serialized drawing to DXF"
    );

    Ok(buffer)
}

/// 导出到DXF文件
pub fn export(drawing: &Drawing, path: &Path) -> Result<(), FileError> {
    let bytes = serialize(drawing)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// 从DXF字节流读回图纸
///
/// 只读取图层表和 LINE 实体，其余实体类型被跳过。
pub fn deserialize(name: &str, bytes: &[u8]) -> Result<Drawing, FileError> {
    let mut reader = bytes;
    let dxf_drawing =
        dxf::Drawing::load(&mut reader).map_err(|e| FileError::Dxf(e.to_string()))?;

    let used: HashSet<&str> = dxf_drawing
        .entities()
        .map(|e| e.common.layer.as_str())
        .collect();

    let mut drawing = Drawing::new(name);

    // 先按图层表顺序建立图层，未使用的 0 层不导入
    for layer in dxf_drawing.layers() {
        if layer.name == LAYER_ZERO && !used.contains(LAYER_ZERO) {
            continue;
        }
        drawing.ensure_layer(&layer.name, layer_style(layer));
    }

    let mut skipped = 0usize;
    for entity in dxf_drawing.entities() {
        match &entity.specific {
            dxf::entities::EntityType::Line(line) => {
                let layer = entity.common.layer.as_str();
                let style = drawing
                    .layers()
                    .get(layer)
                    .map(Layer::style)
                    .unwrap_or_default();
                drawing.add_entity(layer, style, line.p1.x, line.p1.y, line.p2.x, line.p2.y);
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(drawing = name, skipped, "skipped non-LINE entities");
    }

    Ok(drawing)
}

/// 从DXF文件导入，图纸名取文件名（不含扩展名）
pub fn import(path: &Path) -> Result<Drawing, FileError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| FileError::InvalidFormat(format!("bad file name: {}", path.display())))?;
    let bytes = std::fs::read(path)?;
    deserialize(name, &bytes)
}

/// 构建 dxf crate 的图纸对象
fn to_dxf_drawing(drawing: &Drawing) -> dxf::Drawing {
    let mut out = dxf::Drawing::new();
    out.header.version = dxf::enums::AcadVersion::R12;

    // 固定时间戳，保证输出可复现
    out.header.creation_date = Default::default();
    out.header.creation_date_universal = Default::default();
    out.header.update_date = Default::default();
    out.header.update_date_universal = Default::default();

    for layer in drawing.layers().iter() {
        let style = layer.style();
        let mut dxf_layer = dxf::tables::Layer::default();
        dxf_layer.name = layer.name().to_string();
        dxf_layer.color = dxf::Color::from_index(style.color.aci());
        dxf_layer.line_type_name = style.line_type.dxf_name().to_string();
        out.add_layer(dxf_layer);
    }

    for entity in drawing.entities() {
        let mut line = dxf::entities::Line::default();
        line.p1 = dxf::Point::new(entity.start.x, entity.start.y, 0.0);
        line.p2 = dxf::Point::new(entity.end.x, entity.end.y, 0.0);

        let mut dxf_entity = dxf::entities::Entity::new(dxf::entities::EntityType::Line(line));
        dxf_entity.common.layer = entity.layer.clone();
        out.add_entity(dxf_entity);
    }

    // 补齐引用到的线型和 0 层等必需表项
    out.normalize();
    out
}

/// DXF 图层转样式，非标准色回退为白色，未知线型回退为连续线
fn layer_style(layer: &dxf::tables::Layer) -> LayerStyle {
    let color = layer
        .color
        .index()
        .and_then(|i| Color::from_aci(i as u8))
        .unwrap_or_default();
    let line_type = LineType::from_dxf_name(&layer.line_type_name).unwrap_or_default();
    LayerStyle::new(color, line_type)
}
