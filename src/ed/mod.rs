//! # 精确对角化模块
//!
//! 小团簇费米子模型的精确对角化与响应函数计算。
//!
//! ## 子模块
//! - `index`: 单粒子模式索引
//! - `hamiltonian`: 哈密顿量表达式与模型构造器
//! - `fock`: Fock 空间与算符矩阵
//! - `spectrum`: 对角化与一致性检查
//! - `thermal`: Hubbard 原子热平均能量
//! - `greens`: 单粒子格林函数
//! - `chi3`: 三阶响应函数
//! - `export`: 数据导出
//! - `plot`: 图表生成
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/` 的格点描述

pub mod chi3;
pub mod export;
pub mod fock;
pub mod greens;
pub mod hamiltonian;
pub mod index;
pub mod plot;
pub mod spectrum;
pub mod thermal;

pub use chi3::{Channel, Chi3Calculator, Chi3Indices, Chi3Point};
pub use fock::FockSpace;
pub use greens::{GreensFunction, GreensPoint};
pub use index::ModeIndex;
pub use spectrum::EigenSystem;
