//! # Hubbard 原子的热平均能量
//!
//! 半满 Hubbard 原子（μ = U/2）有四个多体能级：
//! 空态 0，两个单占据态 −U/2，双占据态 0。
//!
//! 三种算法：
//! - `shifted_average_energy`: 相对参考能量 E₀ 平移后逐能级求和
//! - `closed_form_energy`: −(U/2)·e^{βU/2}/(1+e^{βU/2})
//! - `ed_atom_energy`: 对角化原子哈密顿量后求 Σ wᵢEᵢ
//!
//! ## 依赖关系
//! - 被 `commands/energy.rs` 使用
//! - 使用 `ed/hamiltonian.rs`, `ed/fock.rs`, `ed/spectrum.rs`

use crate::ed::fock::FockSpace;
use crate::ed::hamiltonian::hubbard_atom;
use crate::ed::spectrum::EigenSystem;
use crate::error::Result;

/// 半满原子的四个能级
pub fn atom_levels(u: f64) -> [f64; 4] {
    [0.0, -u / 2.0, -u / 2.0, 0.0]
}

/// 相对 `e0` 平移后的热平均能量
pub fn shifted_average_energy(beta: f64, u: f64, e0: f64) -> f64 {
    let levels = atom_levels(u);
    let weights = levels.map(|e| (-beta * (e - e0)).exp());
    let z: f64 = weights.iter().sum();

    let shifted: f64 = levels
        .iter()
        .zip(&weights)
        .map(|(e, r)| (e - e0) * r)
        .sum();

    shifted / z + e0
}

/// 解析表达式 −(U/2)·e^{βU/2}/(1+e^{βU/2})
///
/// 按 U 的符号改写为只含衰减指数的形式，大 β 下不溢出。
pub fn closed_form_energy(beta: f64, u: f64) -> f64 {
    let x = beta * u / 2.0;
    let fraction = if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let ex = x.exp();
        ex / (1.0 + ex)
    };
    -u / 2.0 * fraction
}

/// 精确对角化得到的热平均能量
pub fn ed_atom_energy(beta: f64, u: f64) -> Result<f64> {
    let (h, indices) = hubbard_atom(u, u / 2.0);
    let fock = FockSpace::new(indices.len())?;
    let eig = EigenSystem::new(&fock.expression_matrix(&h)?, beta)?;
    Ok(eig.average_energy())
}
