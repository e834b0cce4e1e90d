//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `lattice`: 生成 VLA 格点文件
//! - `energy`: Hubbard 原子热平均能量
//! - `chi3`: Hubbard 团簇三阶响应函数
//! - `gf`: 格点文件的单粒子格林函数
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: lattice, energy, chi3, gf

pub mod chi3;
pub mod energy;
pub mod gf;
pub mod lattice;

use clap::{Parser, Subcommand};

/// edkit - 小团簇精确对角化工具箱
#[derive(Parser)]
#[command(name = "edkit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Exact diagonalization toolkit for small fermionic lattice models", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a JSON lattice file for an impurity + bath (VLA) model
    Lattice(lattice::LatticeArgs),

    /// Thermal-average energy of the half-filled Hubbard atom
    Energy(energy::EnergyArgs),

    /// Third-order susceptibility of a periodic Hubbard cluster
    Chi3(chi3::Chi3Args),

    /// Thermodynamics and Green's function of lattice file(s)
    Gf(gf::GfArgs),
}
