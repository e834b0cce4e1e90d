//! # 三阶响应函数 χ⁽³⁾
//!
//! 在本征基下计算 Hubbard 团簇的三点磁化率，三个通道：
//! - `pp`: 粒子-粒子，复合算符 Δ = c_{x1} c_{x2}
//! - `ph`: 粒子-空穴，复合算符 N = c†_{x2'} c_{x2}
//! - `xph`: 交叉粒子-空穴，复合算符 N̄ = −c†_{x2'} c_{x1}
//!
//! ## 算法
//! 对所有本征态三元组 (i, j, k) 求和：
//! ```text
//! f(i,j,k;ω1,ω2) = −[ (wⱼ+wᵢ)/(Eᵢ−Eⱼ−iω1) + R ] / (Eⱼ−Eₖ−iω2)
//! R = β wᵢ δ(ω1+ω2)                      若 Eᵢ ≈ Eₖ
//!   = (wₖ−wᵢ)/(Eᵢ−Eₖ−iω1−iω2)            否则
//! ```
//! 矩阵元乘积恰为零的项直接跳过。
//!
//! ## 依赖关系
//! - 被 `commands/chi3.rs` 使用
//! - 使用 `ed/spectrum.rs` 的本征系统
//! - 使用 `ed/fock.rs` 构造产生/湮灭算符
//! - 使用 `num-complex` 进行复数运算

use crate::ed::fock::FockSpace;
use crate::ed::index::{IndexSet, ModeIndex, Spin};
use crate::ed::spectrum::{ensure_adjoint, EigenSystem};
use crate::error::{EdkitError, Result};
use crate::models::cluster::site_label;

use nalgebra::DMatrix;
use num_complex::Complex64;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt;

/// 判断能级简并的绝对容差
pub const ENERGY_ATOL: f64 = 1e-13;
/// 判断 ω1 = −ω2 的绝对容差
pub const FREQUENCY_ATOL: f64 = 1e-13;
/// 相对容差（与 numpy.isclose 默认值一致）
pub const RELATIVE_TOL: f64 = 1e-5;

/// 费米子 Matsubara 频率 νₙ = π(2n+1)/β
pub fn matsubara(n: i64, beta: f64) -> f64 {
    PI * (2 * n + 1) as f64 / beta
}

/// |a − b| ≤ atol + rtol·|b|
pub fn isclose(a: f64, b: f64, atol: f64) -> bool {
    (a - b).abs() <= atol + RELATIVE_TOL * b.abs()
}

/// 频率网格 (n1, n2)，n1 为外层
pub fn frequency_grid(n_min: i64, n_max: i64) -> Vec<(i64, i64)> {
    (n_min..=n_max)
        .flat_map(|n1| (n_min..=n_max).map(move |n2| (n1, n2)))
        .collect()
}

/// 响应通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Pp,
    Ph,
    Xph,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Pp, Channel::Ph, Channel::Xph];

    /// 用于终端输出的名称
    pub fn title(&self) -> &'static str {
        match self {
            Channel::Pp => "Particle-particle",
            Channel::Ph => "Particle-hole",
            Channel::Xph => "Crossed particle-hole",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Pp => write!(f, "pp"),
            Channel::Ph => write!(f, "ph"),
            Channel::Xph => write!(f, "xph"),
        }
    }
}

/// 外腿指标 (x1', x1, x2', x2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chi3Indices {
    pub x1p: ModeIndex,
    pub x1: ModeIndex,
    pub x2p: ModeIndex,
    pub x2: ModeIndex,
}

impl Chi3Indices {
    pub fn new(x1p: ModeIndex, x1: ModeIndex, x2p: ModeIndex, x2: ModeIndex) -> Self {
        Self { x1p, x1, x2p, x2 }
    }

    /// 各通道在网格团簇上的默认指标（格点 (0,0) 与 (2,0)）
    pub fn default_for(channel: Channel) -> Self {
        let a_up = ModeIndex::new(site_label(0, 0), Spin::Up);
        let b_up = ModeIndex::new(site_label(2, 0), Spin::Up);
        let a_dn = ModeIndex::new(site_label(0, 0), Spin::Down);
        let b_dn = ModeIndex::new(site_label(2, 0), Spin::Down);

        match channel {
            Channel::Pp => Self::new(a_up, b_up, a_dn, b_dn),
            Channel::Ph => Self::new(a_up.clone(), a_up, b_dn.clone(), b_dn),
            Channel::Xph => Self::new(a_up, b_up, b_dn, a_dn),
        }
    }

    fn modes(&self) -> [&ModeIndex; 4] {
        [&self.x1p, &self.x1, &self.x2p, &self.x2]
    }
}

impl fmt::Display for Chi3Indices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x1'={} x1={} x2'={} x2={}",
            self.x1p, self.x1, self.x2p, self.x2
        )
    }
}

/// 单个频率点的结果
#[derive(Debug, Clone)]
pub struct Chi3Point {
    pub channel: Channel,
    pub n1: i64,
    pub n2: i64,
    pub nu1: f64,
    pub nu2: f64,
    pub value: Complex64,
}

/// 本征基下的 c 与 c†
#[derive(Debug, Clone)]
struct ModeOperators {
    c: DMatrix<f64>,
    cdag: DMatrix<f64>,
}

/// χ⁽³⁾ 计算器
pub struct Chi3Calculator<'a> {
    eig: &'a EigenSystem,
    fock: FockSpace,
    indices: &'a IndexSet,
    operators: HashMap<usize, ModeOperators>,
}

impl<'a> Chi3Calculator<'a> {
    pub fn new(eig: &'a EigenSystem, fock: FockSpace, indices: &'a IndexSet) -> Result<Self> {
        if eig.dim() != fock.dim() {
            return Err(EdkitError::InvalidArgument(format!(
                "eigensystem dimension {} does not match Fock space dimension {}",
                eig.dim(),
                fock.dim()
            )));
        }
        Ok(Self {
            eig,
            fock,
            indices,
            operators: HashMap::new(),
        })
    }

    /// 预先变换外腿所需的算符到本征基
    pub fn prepare(&mut self, quad: &Chi3Indices) -> Result<()> {
        for mode in quad.modes() {
            let pos = self.indices.require(mode)?;
            if self.operators.contains_key(&pos) {
                continue;
            }

            let c = self.eig.to_eigenbasis(&self.fock.annihilation_matrix(pos)?);
            let cdag = self.eig.to_eigenbasis(&self.fock.creation_matrix(pos)?);
            ensure_adjoint(&c, &cdag, &mode.to_string())?;

            self.operators.insert(pos, ModeOperators { c, cdag });
        }
        Ok(())
    }

    fn ops(&self, mode: &ModeIndex) -> Result<&ModeOperators> {
        let pos = self.indices.require(mode)?;
        self.operators.get(&pos).ok_or_else(|| {
            EdkitError::Other(format!("operators for {} were not prepared", mode))
        })
    }

    /// 计算某通道在 (ω1, ω2) 处的值
    pub fn evaluate(&self, channel: Channel, quad: &Chi3Indices, w1: f64, w2: f64) -> Result<Complex64> {
        match channel {
            Channel::Pp => self.pp(quad, w1, w2),
            Channel::Ph => self.ph(quad, w1, w2),
            Channel::Xph => self.xph(quad, w1, w2),
        }
    }

    /// 粒子-粒子通道
    pub fn pp(&self, quad: &Chi3Indices, w1: f64, w2: f64) -> Result<Complex64> {
        let x1p = self.ops(&quad.x1p)?;
        let x1 = self.ops(&quad.x1)?;
        let x2p = self.ops(&quad.x2p)?;
        let x2 = self.ops(&quad.x2)?;

        let delta = &x1.c * &x2.c;

        let direct = self.contract(&x1p.cdag, &x2p.cdag, &delta, |i, j, k| self.f(i, j, k, w1, w2));
        let exchange = self.contract(&x2p.cdag, &x1p.cdag, &delta, |i, j, k| self.f(i, j, k, w2, w1));

        Ok(direct - exchange)
    }

    /// 粒子-空穴通道
    pub fn ph(&self, quad: &Chi3Indices, w1: f64, w2: f64) -> Result<Complex64> {
        let x1p = self.ops(&quad.x1p)?;
        let x1 = self.ops(&quad.x1)?;
        let x2p = self.ops(&quad.x2p)?;
        let x2 = self.ops(&quad.x2)?;

        let density = &x2p.cdag * &x2.c;

        Ok(self.particle_hole(&x1p.cdag, &x1.c, &density, w1, w2))
    }

    /// 交叉粒子-空穴通道
    pub fn xph(&self, quad: &Chi3Indices, w1: f64, w2: f64) -> Result<Complex64> {
        let x1p = self.ops(&quad.x1p)?;
        let x1 = self.ops(&quad.x1)?;
        let x2p = self.ops(&quad.x2p)?;
        let x2 = self.ops(&quad.x2)?;

        let crossed = -(&x2p.cdag * &x1.c);

        Ok(self.particle_hole(&x1p.cdag, &x2.c, &crossed, w1, w2))
    }

    /// ph 与 xph 共用的两项求和
    fn particle_hole(
        &self,
        cdag: &DMatrix<f64>,
        c: &DMatrix<f64>,
        bilinear: &DMatrix<f64>,
        w1: f64,
        w2: f64,
    ) -> Complex64 {
        let first = self.contract(cdag, c, bilinear, |i, j, k| self.f(i, j, k, w1, -w2));
        let second = self.contract(c, cdag, bilinear, |i, j, k| self.f(i, j, k, -w2, w1));
        second - first
    }

    /// Σᵢⱼₖ g(i,j,k) A[i,j] B[j,k] D[k,i]
    fn contract<G>(&self, a: &DMatrix<f64>, b: &DMatrix<f64>, d: &DMatrix<f64>, g: G) -> Complex64
    where
        G: Fn(usize, usize, usize) -> Complex64,
    {
        let dim = self.eig.dim();
        let mut sum = Complex64::new(0.0, 0.0);

        for i in 0..dim {
            for j in 0..dim {
                let aij = a[(i, j)];
                if aij == 0.0 {
                    continue;
                }
                for k in 0..dim {
                    let amp = aij * b[(j, k)] * d[(k, i)];
                    if amp == 0.0 {
                        continue;
                    }
                    sum += g(i, j, k) * amp;
                }
            }
        }

        sum
    }

    /// 三点频率核 f(i, j, k; ω1, ω2)
    pub fn f(&self, i: usize, j: usize, k: usize, w1: f64, w2: f64) -> Complex64 {
        let e = self.eig.energies();
        let w = self.eig.weights();

        let mut res = (w[j] + w[i]) / Complex64::new(e[i] - e[j], -w1);
        if isclose(e[i], e[k], ENERGY_ATOL) {
            if isclose(w1, -w2, FREQUENCY_ATOL) {
                res += self.eig.beta() * w[i];
            }
        } else {
            res += (w[k] - w[i]) / Complex64::new(e[i] - e[k], -w1 - w2);
        }

        res / -Complex64::new(e[j] - e[k], -w2)
    }
}
