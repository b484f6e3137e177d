//! 导出会话
//!
//! 持有外部服务、导出配置、图纸注册表和最近一次导出产物。
//! 导出需要 `&mut self`，同一会话内的导出天然串行，最近一次结果覆盖产物。

use crate::assembler::LayerAssembler;
use crate::config::{ConfigError, ExportConfig};
use crate::error::ExportError;
use crate::services::{GeometryEngine, PlanViewService, SpatialStructureSource};
use std::future::Future;
use std::time::Duration;
use zplan_core::drawing::DrawingRegistry;
use zplan_core::spatial::{ExpressId, SpatialTree};
use zplan_file::ExportArtifact;

/// 给外部调用加超时
pub(crate) async fn bounded<F: Future>(
    stage: &'static str,
    limit: Duration,
    call: F,
) -> Result<F::Output, ExportError> {
    let timeout_ms = limit.as_millis() as u64;
    tokio::time::timeout(limit, call).await.map_err(|_| {
        tracing::warn!(stage, timeout_ms, "collaborator call timed out");
        ExportError::GeometryTimeout { stage, timeout_ms }
    })
}

pub struct ExportSession<S> {
    services: S,
    config: ExportConfig,
    assembler: LayerAssembler,
    registry: DrawingRegistry,
    /// 空间结构只读取一次
    spatial: Option<SpatialTree>,
    latest: Option<ExportArtifact>,
}

impl<S> ExportSession<S>
where
    S: GeometryEngine + PlanViewService + SpatialStructureSource,
{
    pub fn new(services: S, config: ExportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let assembler = LayerAssembler::new(config.filter()?, config.timeout());
        Ok(Self {
            services,
            config,
            assembler,
            registry: DrawingRegistry::new(),
            spatial: None,
            latest: None,
        })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn registry(&self) -> &DrawingRegistry {
        &self.registry
    }

    /// 最近一次成功导出的产物
    pub fn latest_artifact(&self) -> Option<&ExportArtifact> {
        self.latest.as_ref()
    }

    /// 模型的空间结构树（首次调用时向服务读取）
    pub async fn spatial_tree(&mut self) -> Result<&SpatialTree, ExportError> {
        let tree = match self.spatial.take() {
            Some(tree) => tree,
            None => {
                let root = bounded(
                    "spatial structure",
                    self.config.timeout(),
                    self.services.spatial_structure(),
                )
                .await??;
                let tree = SpatialTree::from_root(&root);
                tracing::debug!(nodes = tree.len(), storeys = tree.storeys().len(), "loaded spatial structure");
                tree
            }
        };
        Ok(self.spatial.insert(tree))
    }

    /// 导出一个楼层的平面图
    ///
    /// 同名图纸已存在时继续追加实体。图纸为空时返回 [`ExportError::EmptyDrawing`]，
    /// 此时不生成产物，上一次的产物保持不变。
    pub async fn export_plan(
        &mut self,
        storey_id: ExpressId,
        plan_id: &str,
    ) -> Result<ExportArtifact, ExportError> {
        tracing::info!(storey_id, plan_id, "exporting floor plan");

        let ids = self.spatial_tree().await?.storey_element_ids(storey_id)?;

        let plan = bounded("plan view", self.config.timeout(), self.services.plan_view(plan_id))
            .await??
            .ok_or_else(|| ExportError::UnknownPlan(plan_id.to_string()))?;
        if plan.storey_express_id != storey_id {
            tracing::warn!(
                plan_id,
                plan_storey = plan.storey_express_id,
                storey_id,
                "plan belongs to a different storey"
            );
        }

        let drawing = self.registry.ensure_drawing(&plan.name);
        let report = self
            .assembler
            .assemble(&self.services, &ids, &plan, drawing)
            .await?;

        let artifact = ExportArtifact::from_drawing(drawing, self.config.file_name.as_str())?;
        tracing::info!(
            drawing = %artifact.drawing_name,
            added = report.added(),
            entities = drawing.entity_count(),
            bytes = artifact.len(),
            "floor plan exported"
        );

        self.latest = Some(artifact.clone());
        Ok(artifact)
    }

    /// 丢弃所有图纸、缓存的空间结构和产物
    pub fn reset(&mut self) {
        self.registry.reset();
        self.spatial = None;
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{PROJECTION_LAYER, SECTION_LAYER, SECTION_SECONDARY_LAYER};
    use crate::error::ExportErrorKind;
    use crate::fixture::SceneFixture;
    use crate::services::{PlanView, SectionGeometry, ServiceError};
    use std::cell::Cell;
    use std::collections::BTreeSet;
    use zplan_core::geometry::ProjectedSegment;
    use zplan_core::spatial::StoreyNode;

    fn scene() -> SceneFixture {
        let spatial = StoreyNode::new(1, "IFCPROJECT").with_children(vec![StoreyNode::new(
            2,
            "IFCBUILDING",
        )
        .with_children(vec![
            StoreyNode::new(10, "IFCBUILDINGSTOREY").with_children(vec![
                StoreyNode::new(11, "IFCWALLSTANDARDCASE"),
                StoreyNode::new(12, "IFCSLAB")
                    .with_children(vec![StoreyNode::new(13, "IFCOPENINGELEMENT")]),
            ]),
            StoreyNode::new(20, "IFCBUILDINGSTOREY"),
        ])]);

        SceneFixture::new(spatial)
            .with_element(
                11,
                vec![
                    0.0, 0.0, 0.0, 5.0, 0.0, 3.0, //
                    0.0, 0.0, 0.0, 0.0, 0.0, 4.0, //
                    5.0, 0.0, 3.0, 5.0, 3.0, 3.0, // 竖直边，被过滤
                ],
            )
            .with_element(12, vec![0.0, 0.0, 4.0, 5.0, 0.0, 4.0])
            .with_plan(PlanView {
                id: "p1".to_string(),
                name: "Level 1".to_string(),
                storey_express_id: 10,
                section: SectionGeometry {
                    thick: vec![
                        ProjectedSegment::new(0.0, 0.0, 5.0, 0.0),
                        ProjectedSegment::new(5.0, 0.0, 5.0, -4.0),
                    ],
                    thin: vec![ProjectedSegment::new(1.0, -1.0, 2.0, -1.0)],
                },
            })
            .with_plan(PlanView {
                id: "p2".to_string(),
                name: "Level 2".to_string(),
                storey_express_id: 20,
                section: SectionGeometry::default(),
            })
    }

    fn session<S>(services: S) -> ExportSession<S>
    where
        S: GeometryEngine + PlanViewService + SpatialStructureSource,
    {
        ExportSession::new(services, ExportConfig::default()).unwrap()
    }

    /// 线框调用永不返回
    struct Stalled(SceneFixture);

    impl GeometryEngine for Stalled {
        async fn element_subset_wireframe(
            &self,
            _ids: &BTreeSet<ExpressId>,
        ) -> Result<Vec<f64>, ServiceError> {
            std::future::pending().await
        }
    }

    impl PlanViewService for Stalled {
        async fn plan_view(&self, plan_id: &str) -> Result<Option<PlanView>, ServiceError> {
            self.0.plan_view(plan_id).await
        }
    }

    impl SpatialStructureSource for Stalled {
        async fn spatial_structure(&self) -> Result<StoreyNode, ServiceError> {
            self.0.spatial_structure().await
        }
    }

    /// 线框服务不可用，并记录空间结构读取次数
    struct Offline {
        scene: SceneFixture,
        structure_reads: Cell<usize>,
    }

    impl GeometryEngine for Offline {
        async fn element_subset_wireframe(
            &self,
            _ids: &BTreeSet<ExpressId>,
        ) -> Result<Vec<f64>, ServiceError> {
            Err(ServiceError::Unavailable("engine not loaded".to_string()))
        }
    }

    impl PlanViewService for Offline {
        async fn plan_view(&self, plan_id: &str) -> Result<Option<PlanView>, ServiceError> {
            self.scene.plan_view(plan_id).await
        }
    }

    impl SpatialStructureSource for Offline {
        async fn spatial_structure(&self) -> Result<StoreyNode, ServiceError> {
            self.structure_reads.set(self.structure_reads.get() + 1);
            self.scene.spatial_structure().await
        }
    }

    #[tokio::test]
    async fn test_export_plan_layers() {
        let mut session = session(scene());
        let artifact = session.export_plan(10, "p1").await.unwrap();

        assert_eq!(artifact.file_name, "floorplan.dxf");
        assert_eq!(artifact.drawing_name, "Level 1");

        let drawing = session.registry().get("Level 1").unwrap();
        assert_eq!(drawing.entities_on(PROJECTION_LAYER).count(), 3);
        assert_eq!(drawing.entities_on(SECTION_LAYER).count(), 2);
        assert_eq!(drawing.entities_on(SECTION_SECONDARY_LAYER).count(), 1);

        // 投影先于剖切
        assert_eq!(drawing.entities()[0].layer, PROJECTION_LAYER);
        assert_eq!(
            drawing.entities()[0].segment(),
            ProjectedSegment::new(0.0, 0.0, 5.0, -3.0)
        );

        let read_back = zplan_file::dxf_io::deserialize("Level 1", &artifact.bytes).unwrap();
        let names: Vec<&str> = read_back.layers().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec![PROJECTION_LAYER, SECTION_LAYER, SECTION_SECONDARY_LAYER]);
        assert_eq!(read_back.entity_count(), 6);
        for entity in read_back.entities() {
            assert!(read_back.layers().contains(&entity.layer));
        }

        assert_eq!(session.latest_artifact(), Some(&artifact));
    }

    #[tokio::test]
    async fn test_empty_storey_is_empty_drawing() {
        let mut session = session(scene());
        let err = session.export_plan(20, "p2").await.unwrap_err();

        assert_eq!(err.kind(), ExportErrorKind::EmptyDrawing);
        assert!(err.is_recoverable());
        assert!(session.latest_artifact().is_none());
    }

    #[tokio::test]
    async fn test_empty_export_keeps_previous_artifact() {
        let mut session = session(scene());
        session.export_plan(10, "p1").await.unwrap();
        assert!(session.export_plan(20, "p2").await.is_err());

        assert_eq!(session.latest_artifact().unwrap().drawing_name, "Level 1");
    }

    #[tokio::test]
    async fn test_unknown_storey_and_plan() {
        let mut session = session(scene());

        let err = session.export_plan(99, "p1").await.unwrap_err();
        assert!(matches!(err, ExportError::UnknownStorey(99)));

        let err = session.export_plan(10, "missing").await.unwrap_err();
        assert!(matches!(err, ExportError::UnknownPlan(ref id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_wireframe_timeout() {
        let config = ExportConfig::default().with_timeout(Duration::from_millis(20));
        let mut session = ExportSession::new(Stalled(scene()), config).unwrap();

        let err = session.export_plan(10, "p1").await.unwrap_err();
        assert!(matches!(
            err,
            ExportError::GeometryTimeout { stage: "element wireframe", timeout_ms: 20 }
        ));
        assert!(session.latest_artifact().is_none());
    }

    #[tokio::test]
    async fn test_wireframe_failure_exports_sections_only() {
        let mut session = session(Offline {
            scene: scene(),
            structure_reads: Cell::new(0),
        });

        let artifact = session.export_plan(10, "p1").await.unwrap();
        let drawing = session.registry().get("Level 1").unwrap();
        assert_eq!(drawing.entities_on(PROJECTION_LAYER).count(), 0);
        assert_eq!(drawing.entity_count(), 3);
        assert!(!artifact.is_empty());

        session.export_plan(10, "p1").await.unwrap();
        assert_eq!(session.services.structure_reads.get(), 1);
    }

    #[tokio::test]
    async fn test_malformed_wireframe() {
        let mut session = session(scene().with_element(11, vec![0.0; 7]));
        let err = session.export_plan(10, "p1").await.unwrap_err();

        assert_eq!(err.kind(), ExportErrorKind::MalformedGeometry);
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_reexport_appends() {
        let mut session = session(scene());
        let first = session.export_plan(10, "p1").await.unwrap();
        let second = session.export_plan(10, "p1").await.unwrap();

        assert_eq!(session.registry().len(), 1);
        assert_eq!(session.registry().get("Level 1").unwrap().entity_count(), 12);
        assert!(second.len() > first.len());
    }

    #[tokio::test]
    async fn test_tolerance_from_config() {
        let config = ExportConfig::default().with_tolerance(4.5);
        let mut session = ExportSession::new(scene(), config).unwrap();
        session.export_plan(10, "p1").await.unwrap();

        // 只有长度 5 和 sqrt(34) 的两条边超过 4.5
        let drawing = session.registry().get("Level 1").unwrap();
        assert_eq!(drawing.entities_on(PROJECTION_LAYER).count(), 2);
    }

    #[tokio::test]
    async fn test_reset() {
        let mut session = session(scene());
        session.export_plan(10, "p1").await.unwrap();
        session.reset();

        assert!(session.registry().is_empty());
        assert!(session.latest_artifact().is_none());
        assert_eq!(session.spatial_tree().await.unwrap().len(), 7);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExportConfig::default().with_tolerance(f64::NAN);
        assert!(ExportSession::new(scene(), config).is_err());
    }
}
