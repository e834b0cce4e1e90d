//! # 二维网格团簇
//!
//! Nx × Ny 矩形网格，可选周期边界，用于构造 Hubbard 团簇的跃迁矩阵。
//!
//! ## 约定
//! - 节点按 `(x, y)` 行优先排列（x 外层，y 内层）
//! - 某一方向仅当格点数大于 2 时才添加周期回绕键，避免重复键和自环
//!
//! ## 依赖关系
//! - 被 `ed/hamiltonian.rs` 和 `commands/chi3.rs` 使用
//! - 使用 `nalgebra` 存储邻接矩阵

use nalgebra::DMatrix;

/// 矩形网格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid2d {
    pub nx: usize,
    pub ny: usize,
    pub periodic: bool,
}

impl Grid2d {
    pub fn new(nx: usize, ny: usize, periodic: bool) -> Self {
        Self { nx, ny, periodic }
    }

    /// 格点数
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// 所有节点坐标
    pub fn nodes(&self) -> Vec<(usize, usize)> {
        (0..self.nx)
            .flat_map(|x| (0..self.ny).map(move |y| (x, y)))
            .collect()
    }

    /// 节点标签
    pub fn labels(&self) -> Vec<String> {
        self.nodes()
            .into_iter()
            .map(|(x, y)| site_label(x, y))
            .collect()
    }

    /// 节点 `(x, y)` 在 `nodes()` 中的位置
    pub fn node_position(&self, x: usize, y: usize) -> usize {
        x * self.ny + y
    }

    /// 无向边列表（每条边仅出现一次）
    pub fn edges(&self) -> Vec<((usize, usize), (usize, usize))> {
        let mut edges = Vec::new();

        for x in 0..self.nx {
            for y in 0..self.ny {
                if x > 0 {
                    edges.push(((x - 1, y), (x, y)));
                }
                if y > 0 {
                    edges.push(((x, y - 1), (x, y)));
                }
            }
        }

        if self.periodic {
            if self.nx > 2 {
                for y in 0..self.ny {
                    edges.push(((0, y), (self.nx - 1, y)));
                }
            }
            if self.ny > 2 {
                for x in 0..self.nx {
                    edges.push(((x, 0), (x, self.ny - 1)));
                }
            }
        }

        edges
    }

    /// 邻接矩阵（对称，0/1）
    pub fn adjacency(&self) -> DMatrix<f64> {
        let n = self.len();
        let mut adjacency = DMatrix::<f64>::zeros(n, n);

        for (a, b) in self.edges() {
            let i = self.node_position(a.0, a.1);
            let j = self.node_position(b.0, b.1);
            adjacency[(i, j)] = 1.0;
            adjacency[(j, i)] = 1.0;
        }

        adjacency
    }
}

/// 格点标签 "x,y"
pub fn site_label(x: usize, y: usize) -> String {
    format!("{},{}", x, y)
}
