//! 命令行定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ZPlan - 楼层平面图 DXF 导出
#[derive(Parser, Debug)]
#[command(name = "zplan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 导出一个楼层的平面图
    Export {
        /// 场景 JSON 文件
        #[arg(short, long)]
        scene: PathBuf,

        /// 楼层 expressID
        #[arg(long)]
        storey: u32,

        /// 平面视图 id
        #[arg(long)]
        plan: String,

        /// 退化边容差，覆盖配置文件
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// 导出配置 JSON 文件
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 输出目录
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// 打印空间结构树
    Tree {
        /// 场景 JSON 文件
        #[arg(short, long)]
        scene: PathBuf,
    },
}
