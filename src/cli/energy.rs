//! # energy 子命令 CLI 定义
//!
//! 半满 Hubbard 原子的热平均能量
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/energy.rs`

use clap::Args;

/// energy 子命令参数
#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// Inverse temperatures (comma separated)
    #[arg(short, long, value_delimiter = ',', default_value = "1,5,10")]
    pub beta: Vec<f64>,

    /// On-site interaction U
    #[arg(short = 'u', long = "u", default_value_t = 4.0, allow_hyphen_values = true)]
    pub u: f64,

    /// Reference energy E0 used to shift the Boltzmann factors
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub e0: f64,

    /// Maximum allowed deviation between the closed form and ED
    #[arg(long, default_value_t = 1e-8)]
    pub tolerance: f64,
}
