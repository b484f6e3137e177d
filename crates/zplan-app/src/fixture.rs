//! JSON 场景文件
//!
//! 离线保存的模型快照：空间结构树、每个构件的线框缓冲和平面视图。
//! 同时实现三个外部服务 trait，供命令行和测试使用。
//!
//! ```json
//! {
//!   "spatial": { "expressId": 1, "type": "IFCPROJECT", "children": [] },
//!   "elements": { "11": [0, 0, 0, 5, 0, 3] },
//!   "plans": [{ "id": "p1", "name": "Level 1", "storeyExpressId": 10,
//!               "section": { "thick": [], "thin": [] } }]
//! }
//! ```

use crate::services::{
    GeometryEngine, PlanView, PlanViewService, ServiceError, SpatialStructureSource,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use zplan_core::spatial::{ExpressId, StoreyNode};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 场景快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFixture {
    pub spatial: StoreyNode,
    /// 构件编号 → 线框顶点缓冲
    #[serde(default)]
    pub elements: BTreeMap<ExpressId, Vec<f64>>,
    #[serde(default)]
    pub plans: Vec<PlanView>,
}

impl SceneFixture {
    pub fn new(spatial: StoreyNode) -> Self {
        Self {
            spatial,
            elements: BTreeMap::new(),
            plans: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_element(mut self, id: ExpressId, positions: Vec<f64>) -> Self {
        self.elements.insert(id, positions);
        self
    }

    pub fn with_plan(mut self, plan: PlanView) -> Self {
        self.plans.push(plan);
        self
    }
}

impl GeometryEngine for SceneFixture {
    async fn element_subset_wireframe(
        &self,
        ids: &BTreeSet<ExpressId>,
    ) -> Result<Vec<f64>, ServiceError> {
        let mut positions = Vec::new();
        for id in ids {
            // 空间、开洞等节点没有线框
            match self.elements.get(id) {
                Some(buffer) => positions.extend_from_slice(buffer),
                None => tracing::trace!(express_id = *id, "no wireframe for element"),
            }
        }
        Ok(positions)
    }
}

impl PlanViewService for SceneFixture {
    async fn plan_view(&self, plan_id: &str) -> Result<Option<PlanView>, ServiceError> {
        Ok(self.plans.iter().find(|p| p.id == plan_id).cloned())
    }
}

impl SpatialStructureSource for SceneFixture {
    async fn spatial_structure(&self) -> Result<StoreyNode, ServiceError> {
        Ok(self.spatial.clone())
    }
}
