//! # 本征系统
//!
//! 对角化哈密顿量矩阵并计算统计权重。
//!
//! ## 一致性检查
//! 1. H 是厄米的
//! 2. 本征矢矩阵 U 满足 UᵀU = 1
//! 3. UᵀHU = diag(E)
//!
//! 任一检查失败都返回 `EdkitError::ConsistencyCheck`。
//!
//! ## 依赖关系
//! - 被 `ed/thermal.rs`, `ed/chi3.rs`, `ed/greens.rs`, `commands/` 使用
//! - 使用 `nalgebra::SymmetricEigen`

use crate::error::{EdkitError, Result};

use nalgebra::{DMatrix, DVector, SymmetricEigen};

/// H 与 Hᵀ 的最大允许偏差
pub const HERMITICITY_TOL: f64 = 1e-12;
/// UᵀU 与单位阵的最大允许偏差
pub const UNITARITY_TOL: f64 = 1e-12;
/// UᵀHU 与 diag(E) 的最大允许偏差
pub const EIGENBASIS_TOL: f64 = 1e-10;

/// 对角化结果
#[derive(Debug, Clone)]
pub struct EigenSystem {
    /// 升序排列的本征能量
    energies: DVector<f64>,
    /// 本征矢（按列）
    vectors: DMatrix<f64>,
    /// 逆温度
    beta: f64,
    /// 归一化统计权重 exp(−βEᵢ)/Z
    weights: DVector<f64>,
    /// ln Z
    log_z: f64,
}

impl EigenSystem {
    /// 对角化并检查一致性
    pub fn new(h: &DMatrix<f64>, beta: f64) -> Result<Self> {
        if !h.is_square() {
            return Err(EdkitError::InvalidArgument(format!(
                "Hamiltonian matrix is {}x{}",
                h.nrows(),
                h.ncols()
            )));
        }
        if !(beta > 0.0 && beta.is_finite()) {
            return Err(EdkitError::InvalidArgument(format!(
                "inverse temperature must be positive, got {}",
                beta
            )));
        }

        check("Hamiltonian is Hermitian", (h - h.transpose()).amax(), HERMITICITY_TOL)?;

        let eigen = SymmetricEigen::new(h.clone());

        // 按能量升序重排
        let dim = h.nrows();
        let mut order: Vec<usize> = (0..dim).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let energies = DVector::from_iterator(dim, order.iter().map(|&k| eigen.eigenvalues[k]));
        let mut vectors = DMatrix::<f64>::zeros(dim, dim);
        for (col, &k) in order.iter().enumerate() {
            vectors.set_column(col, &eigen.eigenvectors.column(k));
        }

        let identity = DMatrix::<f64>::identity(dim, dim);
        check(
            "eigenvectors are orthonormal",
            (vectors.transpose() * &vectors - identity).amax(),
            scaled_tolerance(UNITARITY_TOL, dim, 1.0),
        )?;
        check(
            "Hamiltonian is diagonal in the eigenbasis",
            (vectors.transpose() * h * &vectors - DMatrix::from_diagonal(&energies)).amax(),
            scaled_tolerance(EIGENBASIS_TOL, dim, h.amax()),
        )?;

        let (weights, log_z) = boltzmann_weights(&energies, beta);

        Ok(Self {
            energies,
            vectors,
            beta,
            weights,
            log_z,
        })
    }

    pub fn dim(&self) -> usize {
        self.energies.len()
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn energies(&self) -> &DVector<f64> {
        &self.energies
    }

    pub fn energy(&self, i: usize) -> f64 {
        self.energies[i]
    }

    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    pub fn weight(&self, i: usize) -> f64 {
        self.weights[i]
    }

    pub fn ground_energy(&self) -> f64 {
        self.energies[0]
    }

    /// ln Z，Z = Σ exp(−βEᵢ)
    pub fn log_partition_function(&self) -> f64 {
        self.log_z
    }

    /// Z 本身（可能溢出为无穷大）
    pub fn partition_function(&self) -> f64 {
        self.log_z.exp()
    }

    /// Uᵀ O U
    pub fn to_eigenbasis(&self, op: &DMatrix<f64>) -> DMatrix<f64> {
        self.vectors.transpose() * op * &self.vectors
    }

    /// ⟨O⟩ = Σᵢ wᵢ (UᵀOU)ᵢᵢ
    pub fn thermal_average(&self, op: &DMatrix<f64>) -> f64 {
        let transformed = self.to_eigenbasis(op);
        (0..self.dim())
            .map(|i| self.weights[i] * transformed[(i, i)])
            .sum()
    }

    /// ⟨H⟩ = Σᵢ wᵢ Eᵢ
    pub fn average_energy(&self) -> f64 {
        self.weights.dot(&self.energies)
    }

    /// 能级简并度（按容差分组）
    pub fn degeneracies(&self, tol: f64) -> Vec<(f64, usize)> {
        let mut levels: Vec<(f64, usize)> = Vec::new();
        for &e in self.energies.iter() {
            match levels.last_mut() {
                Some((e0, count)) if (e - *e0).abs() <= tol => *count += 1,
                _ => levels.push((e, 1)),
            }
        }
        levels
    }
}

/// 检查本征基下 c† = cᵀ
pub fn ensure_adjoint(c: &DMatrix<f64>, cdag: &DMatrix<f64>, what: &str) -> Result<()> {
    check(
        &format!("c† is the adjoint of c for {}", what),
        (c.transpose() - cdag).amax(),
        HERMITICITY_TOL,
    )
}

/// 归一化统计权重与 ln Z，相对基态能量平移以避免溢出
fn boltzmann_weights(energies: &DVector<f64>, beta: f64) -> (DVector<f64>, f64) {
    let e0 = energies.min();
    let raw = energies.map(|e| (-beta * (e - e0)).exp());
    let z_shifted = raw.sum();
    (raw / z_shifted, z_shifted.ln() - beta * e0)
}

/// 基准容差随维数（64 以上）和矩阵元量级放大
fn scaled_tolerance(base: f64, dim: usize, scale: f64) -> f64 {
    base * (dim as f64 / 64.0).max(1.0) * scale.max(1.0)
}

fn check(what: &str, deviation: f64, tolerance: f64) -> Result<()> {
    if deviation > tolerance || deviation.is_nan() {
        return Err(EdkitError::ConsistencyCheck {
            check: what.to_string(),
            deviation,
            tolerance,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ed::fock::FockSpace;
    use crate::ed::hamiltonian::{hubbard_atom, hubbard_cluster};
    use crate::models::Grid2d;

    #[test]
    fn test_atom_levels_sorted() {
        let (h, _) = hubbard_atom(4.0, 2.0);
        let fock = FockSpace::new(2).unwrap();
        let eig = EigenSystem::new(&fock.expression_matrix(&h).unwrap(), 1.0).unwrap();

        let expected = [-2.0, -2.0, 0.0, 0.0];
        for (i, e) in expected.iter().enumerate() {
            assert!((eig.energy(i) - e).abs() < 1e-12);
        }
        assert!((eig.weights().sum() - 1.0).abs() < 1e-14);
        assert_eq!(eig.degeneracies(1e-9), vec![(eig.energy(0), 2), (eig.energy(2), 2)]);
    }

    #[test]
    fn test_partition_function() {
        let (h, _) = hubbard_atom(1.0, 0.4);
        let fock = FockSpace::new(2).unwrap();
        let beta = 3.0;
        let eig = EigenSystem::new(&fock.expression_matrix(&h).unwrap(), beta).unwrap();

        // 能级: 0, −μ, −μ, U − 2μ
        let z = 1.0 + 2.0 * (beta * 0.4_f64).exp() + (-beta * (1.0 - 0.8_f64)).exp();
        assert!((eig.partition_function() - z).abs() < 1e-12);
    }

    #[test]
    fn test_hubbard_dimer_ground_state() {
        let (t, u) = (1.0, 4.0);
        let grid = Grid2d::new(2, 1, true);
        let (h, indices) = hubbard_cluster(&grid, t, u, u / 2.0).unwrap();
        let fock = FockSpace::new(indices.len()).unwrap();
        let eig = EigenSystem::new(&fock.expression_matrix(&h).unwrap(), 10.0).unwrap();

        // 半满二聚体: E = (U − √(U² + 16t²))/2，化学势贡献 −2μ = −U
        let expected = (u - (u * u + 16.0 * t * t).sqrt()) / 2.0 - u;
        assert!((eig.ground_energy() - expected).abs() < 1e-10);

        // 基态处于半满
        let n = eig.thermal_average(&fock.number_matrix());
        assert!((n - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_non_hermitian() {
        let mut h = DMatrix::<f64>::zeros(2, 2);
        h[(0, 1)] = 1.0;
        let err = EigenSystem::new(&h, 1.0).unwrap_err();
        assert!(matches!(err, EdkitError::ConsistencyCheck { .. }));
    }

    #[test]
    fn test_rejects_bad_beta() {
        let h = DMatrix::<f64>::identity(2, 2);
        assert!(EigenSystem::new(&h, 0.0).is_err());
        assert!(EigenSystem::new(&h, f64::NAN).is_err());
    }

    #[test]
    fn test_large_beta_no_overflow() {
        let (h, _) = hubbard_atom(4.0, 2.0);
        let fock = FockSpace::new(2).unwrap();
        let eig = EigenSystem::new(&fock.expression_matrix(&h).unwrap(), 1e4).unwrap();
        assert!((eig.average_energy() + 2.0).abs() < 1e-12);
        assert!(eig.log_partition_function().is_finite());
    }
}
