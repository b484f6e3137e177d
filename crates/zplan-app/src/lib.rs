//! ZPlan 导出流程
//!
//! 从外部几何服务取得楼层构件线框和平面视图剖切线，组装成三图层平面图并导出 DXF。

pub mod assembler;
pub mod cli;
pub mod config;
pub mod error;
pub mod fixture;
pub mod services;
pub mod session;

pub use assembler::{AssemblyReport, LayerAssembler};
pub use config::{ConfigError, ExportConfig};
pub use error::{ExportError, ExportErrorKind};
pub use fixture::SceneFixture;
pub use services::{GeometryEngine, PlanView, PlanViewService, SectionGeometry, ServiceError, SpatialStructureSource};
pub use session::ExportSession;
