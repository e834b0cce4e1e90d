//! # edkit - 小团簇精确对角化工具箱
//!
//! 将费米子团簇的精确对角化计算脚本用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `lattice` - 生成 VLA 格点描述文件
//! - `energy`  - Hubbard 原子热平均能量（解析式与对角化对比）
//! - `chi3`    - Hubbard 团簇三阶响应函数 χ⁽³⁾
//! - `gf`      - 从格点文件计算单粒子格林函数
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── ed/       (对角化与响应函数)
//!   │     ├── batch/    (批量处理)
//!   │     └── models/   (格点与团簇)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod ed;
mod error;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
