//! 外部协作服务接口
//!
//! 模型加载、线框计算和剖切计算都由外部几何引擎完成，导出流程只通过这些 trait 访问。
//! 每个调用都是一个挂起点，调用方负责加超时。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use zplan_core::geometry::ProjectedSegment;
use zplan_core::spatial::{ExpressId, StoreyNode};

/// 服务调用错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// 平面视图的预计算剖切线（已在平面坐标系中）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionGeometry {
    /// 粗线：被剖切平面切到的构件轮廓
    #[serde(default)]
    pub thick: Vec<ProjectedSegment>,
    /// 细线：剖切平面以下可见的次要轮廓
    #[serde(default)]
    pub thin: Vec<ProjectedSegment>,
}

/// 平面视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    pub id: String,
    /// 图纸名称
    pub name: String,
    pub storey_express_id: ExpressId,
    #[serde(default)]
    pub section: SectionGeometry,
}

/// 几何引擎：按构件编号集合计算线框
#[allow(async_fn_in_trait)]
pub trait GeometryEngine {
    /// 返回扁平顶点缓冲，每条边 6 个数值 (x0,y0,z0,x1,y1,z1)
    async fn element_subset_wireframe(
        &self,
        ids: &BTreeSet<ExpressId>,
    ) -> Result<Vec<f64>, ServiceError>;
}

/// 平面视图服务
#[allow(async_fn_in_trait)]
pub trait PlanViewService {
    async fn plan_view(&self, plan_id: &str) -> Result<Option<PlanView>, ServiceError>;
}

/// 空间结构提取
#[allow(async_fn_in_trait)]
pub trait SpatialStructureSource {
    async fn spatial_structure(&self) -> Result<StoreyNode, ServiceError>;
}
