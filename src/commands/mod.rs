//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `models/`, `ed/`, `batch/`, `utils/`
//! - 子模块: lattice, energy, chi3, gf

pub mod chi3;
pub mod energy;
pub mod gf;
pub mod lattice;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Lattice(args) => lattice::execute(args),
        Commands::Energy(args) => energy::execute(args),
        Commands::Chi3(args) => chi3::execute(args),
        Commands::Gf(args) => gf::execute(args),
    }
}
