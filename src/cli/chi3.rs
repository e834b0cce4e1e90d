//! # chi3 子命令 CLI 定义
//!
//! 周期 Hubbard 团簇的三阶响应函数
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/chi3.rs`

use crate::ed::Channel;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 响应通道选择
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ChannelArg {
    /// Particle-particle
    Pp,
    /// Particle-hole
    Ph,
    /// Crossed particle-hole
    Xph,
    /// All three channels
    All,
}

impl ChannelArg {
    /// 展开为具体通道
    pub fn channels(&self) -> Vec<Channel> {
        match self {
            ChannelArg::Pp => vec![Channel::Pp],
            ChannelArg::Ph => vec![Channel::Ph],
            ChannelArg::Xph => vec![Channel::Xph],
            ChannelArg::All => Channel::ALL.to_vec(),
        }
    }
}

/// chi3 子命令参数
#[derive(Args, Debug)]
pub struct Chi3Args {
    /// Cluster size along x
    #[arg(long, default_value_t = 3)]
    pub nx: usize,

    /// Cluster size along y
    #[arg(long, default_value_t = 1)]
    pub ny: usize,

    /// Use open instead of periodic boundaries
    #[arg(long, default_value_t = false)]
    pub open: bool,

    /// Inverse temperature
    #[arg(short, long, default_value_t = 5.0)]
    pub beta: f64,

    /// Nearest-neighbour hopping t
    #[arg(short, long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub t: f64,

    /// On-site interaction U
    #[arg(short = 'u', long = "u", default_value_t = 4.0, allow_hyphen_values = true)]
    pub u: f64,

    /// Chemical potential (default: 0.6 U)
    #[arg(long, allow_hyphen_values = true)]
    pub mu: Option<f64>,

    /// Response channel
    #[arg(short, long, value_enum, default_value_t = ChannelArg::All)]
    pub channel: ChannelArg,

    /// Lowest Matsubara index
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub n_min: i64,

    /// Highest Matsubara index
    #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
    pub n_max: i64,

    /// Override external leg x1' (SITE:SPIN, e.g. '0,0:up')
    #[arg(long)]
    pub x1p: Option<String>,

    /// Override external leg x1
    #[arg(long)]
    pub x1: Option<String>,

    /// Override external leg x2'
    #[arg(long)]
    pub x2p: Option<String>,

    /// Override external leg x2
    #[arg(long)]
    pub x2: Option<String>,

    /// Write results to CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0, env = "EDKIT_JOBS")]
    pub jobs: usize,
}

impl Chi3Args {
    /// 化学势（默认 0.6 U）
    pub fn chemical_potential(&self) -> f64 {
        self.mu.unwrap_or(0.6 * self.u)
    }
}
