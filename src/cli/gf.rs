//! # gf 子命令 CLI 定义
//!
//! 读取格点文件，计算热力学量和单粒子格林函数
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/gf.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum GfOutputFormat {
    /// CSV table
    Csv,
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
}

impl GfOutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            GfOutputFormat::Csv => "csv",
            GfOutputFormat::Png => "png",
            GfOutputFormat::Svg => "svg",
        }
    }
}

/// gf 子命令参数
#[derive(Args, Debug)]
pub struct GfArgs {
    /// Lattice JSON file or directory of lattice files
    pub input: PathBuf,

    /// Inverse temperature
    #[arg(short, long, default_value_t = 10.0)]
    pub beta: f64,

    /// Mode index SITE:SPIN of the Green's function component
    #[arg(short, long, default_value = "0:up")]
    pub index: String,

    /// Number of Matsubara frequencies
    #[arg(short, long, default_value_t = 20)]
    pub n_max: i64,

    /// Number of values to print in the terminal table
    #[arg(long, default_value_t = 5)]
    pub show: usize,

    /// Output directory for CSV / plot files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = GfOutputFormat::Csv)]
    pub format: GfOutputFormat,

    /// Image width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Glob pattern for lattice files in directory mode (comma separated)
    #[arg(short, long, default_value = "*.json")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0, env = "EDKIT_JOBS")]
    pub jobs: usize,
}
