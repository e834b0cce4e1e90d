//! # lattice 子命令 CLI 定义
//!
//! 生成杂质 + 浴（VLA）模型的 JSON 格点文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/lattice.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 预定义的浴跃迁
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LatticePreset {
    /// 2 bath sites, t = 0.5, 1
    Minimal,
    /// 4 bath sites, t = 0.5, 1, 0.3, 0.4
    Extended,
}

impl LatticePreset {
    /// 预设的跃迁振幅
    pub fn hoppings(&self) -> Vec<f64> {
        match self {
            LatticePreset::Minimal => vec![0.5, 1.0],
            LatticePreset::Extended => vec![0.5, 1.0, 0.3, 0.4],
        }
    }
}

/// lattice 子命令参数
#[derive(Args, Debug)]
pub struct LatticeArgs {
    /// On-site interaction U of the correlated site
    #[arg(short = 'u', long = "u", default_value_t = 4.0, allow_hyphen_values = true)]
    pub u: f64,

    /// Impurity-bath hopping amplitudes (comma separated, overrides --preset)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub hopping: Option<Vec<f64>>,

    /// Predefined bath hoppings
    #[arg(long, value_enum, default_value_t = LatticePreset::Minimal)]
    pub preset: LatticePreset,

    /// Output lattice file
    #[arg(short, long, default_value = "LatticeTest.json")]
    pub output: PathBuf,

    /// Overwrite an existing output file
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

impl LatticeArgs {
    /// 实际使用的跃迁振幅
    pub fn hoppings(&self) -> Vec<f64> {
        self.hopping
            .clone()
            .unwrap_or_else(|| self.preset.hoppings())
    }
}
