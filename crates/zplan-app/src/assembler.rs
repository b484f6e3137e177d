//! 图层组装
//!
//! 把一张平面图的三类线条写入对应图层：
//!
//! | 图层 | 来源 | 样式 |
//! |------|------|------|
//! | `Projection` | 构件线框投影 + 退化过滤 | 蓝色 连续线 |
//! | `Section` | 平面视图剖切粗线 | 红色 连续线 |
//! | `Section-Secondary` | 平面视图剖切细线 | 青色 连续线 |
//!
//! 投影图层总是先于剖切图层写入。

use crate::error::ExportError;
use crate::services::{GeometryEngine, PlanView, SectionGeometry};
use crate::session::bounded;
use std::collections::BTreeSet;
use std::time::Duration;
use zplan_core::drawing::Drawing;
use zplan_core::filter::DegeneracyFilter;
use zplan_core::geometry::GeometryError;
use zplan_core::projection::project_positions;
use zplan_core::properties::{Color, LayerStyle};
use zplan_core::spatial::ExpressId;

pub const PROJECTION_LAYER: &str = "Projection";
pub const SECTION_LAYER: &str = "Section";
pub const SECTION_SECONDARY_LAYER: &str = "Section-Secondary";

pub fn projection_style() -> LayerStyle {
    LayerStyle::continuous(Color::Blue)
}

pub fn section_style() -> LayerStyle {
    LayerStyle::continuous(Color::Red)
}

pub fn section_secondary_style() -> LayerStyle {
    LayerStyle::continuous(Color::Cyan)
}

/// 一次组装的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// 写入 Projection 的线段
    pub projected: usize,
    /// 被退化过滤丢弃的边
    pub dropped: usize,
    pub section_thick: usize,
    pub section_thin: usize,
    /// 线框服务失败，仅导出了剖切线
    pub projection_missing: bool,
}

impl AssemblyReport {
    pub fn added(&self) -> usize {
        self.projected + self.section_thick + self.section_thin
    }
}

pub struct LayerAssembler {
    filter: DegeneracyFilter,
    timeout: Duration,
}

impl LayerAssembler {
    pub fn new(filter: DegeneracyFilter, timeout: Duration) -> Self {
        Self { filter, timeout }
    }

    /// 组装一张平面图
    ///
    /// 线框数据格式错误或超时直接返回错误；线框服务本身失败时记录警告，
    /// 仍然写入剖切线，得到一张不完整但可用的图纸。
    pub async fn assemble<G: GeometryEngine>(
        &self,
        engine: &G,
        ids: &BTreeSet<ExpressId>,
        plan: &PlanView,
        drawing: &mut Drawing,
    ) -> Result<AssemblyReport, ExportError> {
        let mut report = AssemblyReport::default();

        match self.fetch_wireframe(engine, ids).await? {
            Some(positions) => {
                let (projected, dropped) = self.add_projection(drawing, &positions)?;
                report.projected = projected;
                report.dropped = dropped;
            }
            None => report.projection_missing = true,
        }

        let (thick, thin) = add_sections(drawing, &plan.section);
        report.section_thick = thick;
        report.section_thin = thin;

        tracing::debug!(
            drawing = drawing.name(),
            projected = report.projected,
            dropped = report.dropped,
            thick,
            thin,
            "assembled plan layers"
        );
        Ok(report)
    }

    async fn fetch_wireframe<G: GeometryEngine>(
        &self,
        engine: &G,
        ids: &BTreeSet<ExpressId>,
    ) -> Result<Option<Vec<f64>>, ExportError> {
        if ids.is_empty() {
            tracing::debug!("empty element subset, no projection geometry");
            return Ok(Some(Vec::new()));
        }

        match bounded("element wireframe", self.timeout, engine.element_subset_wireframe(ids)).await? {
            Ok(positions) => Ok(Some(positions)),
            Err(err) => {
                tracing::warn!(error = %err, "wireframe unavailable, exporting section geometry only");
                Ok(None)
            }
        }
    }

    /// 投影、过滤并写入 Projection 图层，返回 (写入数, 丢弃数)
    pub fn add_projection(
        &self,
        drawing: &mut Drawing,
        positions: &[f64],
    ) -> Result<(usize, usize), GeometryError> {
        let outcome = self.filter.apply(project_positions(positions)?);
        for edge in &outcome.edges {
            drawing.add_line(PROJECTION_LAYER, projection_style(), edge.segment);
        }
        Ok((outcome.edges.len(), outcome.dropped))
    }
}

/// 写入剖切线（已是平面坐标，不再投影），返回 (粗线数, 细线数)
pub fn add_sections(drawing: &mut Drawing, section: &SectionGeometry) -> (usize, usize) {
    for segment in &section.thick {
        drawing.add_line(SECTION_LAYER, section_style(), *segment);
    }
    for segment in &section.thin {
        drawing.add_line(SECTION_SECONDARY_LAYER, section_secondary_style(), *segment);
    }
    (section.thick.len(), section.thin.len())
}
