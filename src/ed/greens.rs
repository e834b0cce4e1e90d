//! # 单粒子格林函数
//!
//! G_ab(iωₙ) = Σᵢⱼ (c_a)ᵢⱼ (c†_b)ⱼᵢ (wᵢ + wⱼ) / (iωₙ + Eᵢ − Eⱼ)
//!
//! ## 依赖关系
//! - 被 `commands/gf.rs` 使用
//! - 使用 `ed/spectrum.rs`, `ed/fock.rs`, `ed/chi3.rs` (Matsubara 频率)

use crate::ed::chi3::matsubara;
use crate::ed::fock::FockSpace;
use crate::ed::spectrum::{ensure_adjoint, EigenSystem};
use crate::error::Result;

use num_complex::Complex64;

/// 非零极点: (残数, 极点位置 Eⱼ − Eᵢ)
#[derive(Debug, Clone, Copy)]
struct Pole {
    residue: f64,
    position: f64,
}

/// 单个 Matsubara 频率上的值
#[derive(Debug, Clone, Copy)]
pub struct GreensPoint {
    pub n: i64,
    pub omega: f64,
    pub value: Complex64,
}

/// 格林函数 G_ab
#[derive(Debug, Clone)]
pub struct GreensFunction {
    beta: f64,
    poles: Vec<Pole>,
}

impl GreensFunction {
    /// 由模式 a, b 构造（a = b 时为对角分量）
    pub fn new(eig: &EigenSystem, fock: &FockSpace, a: usize, b: usize) -> Result<Self> {
        let c = eig.to_eigenbasis(&fock.annihilation_matrix(a)?);
        let cdag = eig.to_eigenbasis(&fock.creation_matrix(b)?);
        if a == b {
            ensure_adjoint(&c, &cdag, &format!("mode {}", a))?;
        }

        let dim = eig.dim();
        let mut poles = Vec::new();
        for i in 0..dim {
            for j in 0..dim {
                let amp = c[(i, j)] * cdag[(j, i)];
                if amp == 0.0 {
                    continue;
                }
                let residue = amp * (eig.weight(i) + eig.weight(j));
                if residue == 0.0 {
                    continue;
                }
                poles.push(Pole {
                    residue,
                    position: eig.energy(j) - eig.energy(i),
                });
            }
        }

        Ok(Self {
            beta: eig.beta(),
            poles,
        })
    }

    /// G(iω)
    pub fn at(&self, omega: f64) -> Complex64 {
        let z = Complex64::new(0.0, omega);
        self.poles
            .iter()
            .map(|p| p.residue / (z - p.position))
            .sum()
    }

    /// G(iνₙ)
    pub fn value(&self, n: i64) -> GreensPoint {
        let omega = matsubara(n, self.beta);
        GreensPoint {
            n,
            omega,
            value: self.at(omega),
        }
    }

    /// n = 0..n_max 的所有值
    pub fn values(&self, n_max: i64) -> Vec<GreensPoint> {
        (0..n_max).map(|n| self.value(n)).collect()
    }

    /// 谱权重之和（对角分量应为 1）
    pub fn total_weight(&self) -> f64 {
        self.poles.iter().map(|p| p.residue).sum()
    }
}
