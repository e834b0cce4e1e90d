//! # Fock 空间
//!
//! 以比特串表示费米子占据数基矢（第 i 位 ↔ 模式 i），
//! 采用 Jordan–Wigner 符号约定：作用于模式 i 时乘以 (−1)^(i 之下的占据数)。
//!
//! ## 依赖关系
//! - 被 `ed/spectrum.rs`, `ed/chi3.rs`, `ed/greens.rs` 使用
//! - 使用 `ed/hamiltonian.rs` 的表达式
//! - 使用 `nalgebra` 存储稠密矩阵

use crate::ed::hamiltonian::{Expression, Term};
use crate::error::{EdkitError, Result};

use nalgebra::DMatrix;

/// 稠密对角化可承受的最大模式数（维数 2^14 = 16384）
pub const MAX_MODES: usize = 14;

/// 费米子 Fock 空间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FockSpace {
    modes: usize,
}

impl FockSpace {
    pub fn new(modes: usize) -> Result<Self> {
        if modes > MAX_MODES {
            return Err(EdkitError::TooManyModes {
                modes,
                max: MAX_MODES,
            });
        }
        Ok(Self { modes })
    }

    pub fn modes(&self) -> usize {
        self.modes
    }

    /// 希尔伯特空间维数
    pub fn dim(&self) -> usize {
        1 << self.modes
    }

    /// 态 `state` 的总粒子数
    pub fn particle_number(state: usize) -> u32 {
        state.count_ones()
    }

    /// c_i |state⟩
    pub fn annihilate(state: usize, i: usize) -> Option<(f64, usize)> {
        let bit = 1 << i;
        if state & bit == 0 {
            return None;
        }
        Some((jordan_wigner_sign(state, i), state ^ bit))
    }

    /// c†_i |state⟩
    pub fn create(state: usize, i: usize) -> Option<(f64, usize)> {
        let bit = 1 << i;
        if state & bit != 0 {
            return None;
        }
        Some((jordan_wigner_sign(state, i), state | bit))
    }

    /// c_i 的矩阵表示
    pub fn annihilation_matrix(&self, i: usize) -> Result<DMatrix<f64>> {
        self.check_mode(i)?;
        Ok(self.single_operator_matrix(|s| Self::annihilate(s, i)))
    }

    /// c†_i 的矩阵表示
    pub fn creation_matrix(&self, i: usize) -> Result<DMatrix<f64>> {
        self.check_mode(i)?;
        Ok(self.single_operator_matrix(|s| Self::create(s, i)))
    }

    /// 表达式的矩阵表示
    pub fn expression_matrix(&self, expr: &Expression) -> Result<DMatrix<f64>> {
        let needed = expr.mode_count();
        if needed > self.modes {
            return Err(EdkitError::InvalidArgument(format!(
                "expression acts on {} modes but the Fock space has {}",
                needed, self.modes
            )));
        }

        let dim = self.dim();
        let mut m = DMatrix::<f64>::zeros(dim, dim);

        for state in 0..dim {
            for term in expr.terms() {
                match *term {
                    Term::Hopping { from, to, value } => {
                        let applied = Self::annihilate(state, to)
                            .and_then(|(s1, mid)| Self::create(mid, from).map(|(s2, out)| (s1 * s2, out)));
                        if let Some((sign, out)) = applied {
                            m[(out, state)] += value * sign;
                        }
                    }
                    Term::Density { mode, value } => {
                        if state & (1 << mode) != 0 {
                            m[(state, state)] += value;
                        }
                    }
                    Term::Interaction { a, b, value } => {
                        if state & (1 << a) != 0 && state & (1 << b) != 0 {
                            m[(state, state)] += value;
                        }
                    }
                }
            }
        }

        Ok(m)
    }

    /// 总粒子数算符（对角）
    pub fn number_matrix(&self) -> DMatrix<f64> {
        let dim = self.dim();
        DMatrix::from_fn(dim, dim, |r, c| {
            if r == c {
                Self::particle_number(r) as f64
            } else {
                0.0
            }
        })
    }

    fn check_mode(&self, i: usize) -> Result<()> {
        if i >= self.modes {
            return Err(EdkitError::InvalidArgument(format!(
                "mode {} out of range (Fock space has {} modes)",
                i, self.modes
            )));
        }
        Ok(())
    }

    fn single_operator_matrix<F>(&self, op: F) -> DMatrix<f64>
    where
        F: Fn(usize) -> Option<(f64, usize)>,
    {
        let dim = self.dim();
        let mut m = DMatrix::<f64>::zeros(dim, dim);
        for state in 0..dim {
            if let Some((sign, out)) = op(state) {
                m[(out, state)] = sign;
            }
        }
        m
    }
}

/// (−1)^(模式 i 之下的占据数)
fn jordan_wigner_sign(state: usize, i: usize) -> f64 {
    let below = state & ((1 << i) - 1);
    if below.count_ones() % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anticommutation() {
        let fock = FockSpace::new(3).unwrap();
        let dim = fock.dim();
        let id = DMatrix::<f64>::identity(dim, dim);

        for i in 0..3 {
            let ci = fock.annihilation_matrix(i).unwrap();
            for j in 0..3 {
                let cdj = fock.creation_matrix(j).unwrap();
                let anti = &ci * &cdj + &cdj * &ci;
                let expected = if i == j { id.clone() } else { DMatrix::zeros(dim, dim) };
                assert!((anti - expected).amax() < 1e-14, "{{c_{}, c†_{}}} != δ", i, j);

                let cj = fock.annihilation_matrix(j).unwrap();
                assert!((&ci * &cj + &cj * &ci).amax() < 1e-14);
            }
        }
    }

    #[test]
    fn test_creation_is_transpose() {
        let fock = FockSpace::new(4).unwrap();
        for i in 0..4 {
            let c = fock.annihilation_matrix(i).unwrap();
            let cd = fock.creation_matrix(i).unwrap();
            assert_eq!(c.transpose(), cd);
        }
    }

    #[test]
    fn test_two_site_hopping_spectrum() {
        let fock = FockSpace::new(2).unwrap();
        let mut h = Expression::new();
        h.push(Term::Hopping { from: 0, to: 1, value: -1.0 });
        h.push(Term::Hopping { from: 1, to: 0, value: -1.0 });
        let m = fock.expression_matrix(&h).unwrap();

        let mut eigs: Vec<f64> = m.symmetric_eigenvalues().iter().copied().collect();
        eigs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected = [-1.0, 0.0, 0.0, 1.0];
        for (e, x) in eigs.iter().zip(expected) {
            assert!((e - x).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hopping_matches_operator_product() {
        let fock = FockSpace::new(3).unwrap();
        let mut h = Expression::new();
        h.push(Term::Hopping { from: 2, to: 0, value: 0.7 });
        let m = fock.expression_matrix(&h).unwrap();
        let product = fock.creation_matrix(2).unwrap() * fock.annihilation_matrix(0).unwrap() * 0.7;
        assert!((m - product).amax() < 1e-14);
    }

    #[test]
    fn test_too_many_modes() {
        assert!(matches!(
            FockSpace::new(MAX_MODES + 1),
            Err(EdkitError::TooManyModes { .. })
        ));
    }

    #[test]
    fn test_number_matrix() {
        let fock = FockSpace::new(2).unwrap();
        let n = fock.number_matrix();
        assert_eq!(n[(3, 3)], 2.0);
        assert_eq!(n[(1, 1)], 1.0);
    }
}
