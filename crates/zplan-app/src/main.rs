//! ZPlan 命令行入口

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use zplan_app::cli::{Cli, Commands};
use zplan_app::{ExportConfig, ExportError, ExportSession, SceneFixture};
use zplan_core::spatial::SpatialTree;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(level).finish(),
    )?;

    match cli.command {
        Commands::Export { scene, storey, plan, tolerance, config, out } => {
            let mut export_config = match config {
                Some(path) => ExportConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => ExportConfig::default(),
            };
            if let Some(tolerance) = tolerance {
                export_config = export_config.with_tolerance(tolerance);
            }
            export(&scene, storey, &plan, export_config, &out).await
        }
        Commands::Tree { scene } => {
            let fixture = load_scene(&scene)?;
            for line in SpatialTree::from_root(&fixture.spatial).outline() {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn load_scene(path: &Path) -> Result<SceneFixture> {
    SceneFixture::load(path).with_context(|| format!("loading scene {}", path.display()))
}

async fn export(
    scene: &Path,
    storey: u32,
    plan: &str,
    config: ExportConfig,
    out: &Path,
) -> Result<()> {
    let mut session = ExportSession::new(load_scene(scene)?, config)?;

    match session.export_plan(storey, plan).await {
        Ok(artifact) => {
            let path = artifact.write_to(out)?;
            println!("{}", path.display());
            Ok(())
        }
        Err(ExportError::EmptyDrawing(name)) => {
            info!(drawing = %name, "nothing to export");
            println!("Nothing to export for plan '{name}'");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
