//! # 数据模型模块
//!
//! 定义格点描述文件和团簇几何。
//!
//! ## 依赖关系
//! - 被 `ed/` 和 `commands/` 使用
//! - 子模块: lattice, cluster

pub mod cluster;
pub mod lattice;

pub use cluster::Grid2d;
pub use lattice::LatticeFile;
