//! # 哈密顿量表达式
//!
//! 以二次量子化单项式之和表示哈密顿量，并提供常用模型的构造器：
//! - `tight_binding`: Σᵢⱼ Tᵢⱼ c†ᵢ cⱼ
//! - `dispersion`: Σᵢ εᵢ nᵢ
//! - `hubbard_int`: Σᵢ Uᵢ n↑ᵢ n↓ᵢ
//!
//! ## 依赖关系
//! - 被 `ed/fock.rs` 转换为矩阵
//! - 使用 `models/` 的格点文件与网格
//! - 使用 `ed/index.rs` 的模式索引

use crate::ed::index::{IndexSet, ModeIndex, Spin};
use crate::error::{EdkitError, Result};
use crate::models::{Grid2d, LatticeFile};

use nalgebra::DMatrix;

/// 哈密顿量中的单项
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// `value · c†_from c_to`
    Hopping {
        from: usize,
        to: usize,
        value: f64,
    },
    /// `value · n_mode`
    Density { mode: usize, value: f64 },
    /// `value · n_a n_b`
    Interaction { a: usize, b: usize, value: f64 },
}

/// 项的线性组合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    terms: Vec<Term>,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn push(&mut self, term: Term) {
        self.terms.push(term);
    }

    /// 合并另一个表达式
    pub fn extend(&mut self, other: Expression) {
        self.terms.extend(other.terms);
    }

    /// 出现过的最大模式编号 + 1
    pub fn mode_count(&self) -> usize {
        self.terms
            .iter()
            .map(|t| match *t {
                Term::Hopping { from, to, .. } => from.max(to) + 1,
                Term::Density { mode, .. } => mode + 1,
                Term::Interaction { a, b, .. } => a.max(b) + 1,
            })
            .max()
            .unwrap_or(0)
    }
}

fn positions(indices: &IndexSet, modes: &[ModeIndex]) -> Result<Vec<usize>> {
    modes.iter().map(|m| indices.require(m)).collect()
}

/// Σᵢⱼ Tᵢⱼ c†ᵢ cⱼ
pub fn tight_binding(
    matrix: &DMatrix<f64>,
    modes: &[ModeIndex],
    indices: &IndexSet,
) -> Result<Expression> {
    if matrix.nrows() != modes.len() || matrix.ncols() != modes.len() {
        return Err(EdkitError::InvalidArgument(format!(
            "hopping matrix is {}x{} but {} modes were given",
            matrix.nrows(),
            matrix.ncols(),
            modes.len()
        )));
    }

    let pos = positions(indices, modes)?;
    let mut expr = Expression::new();

    for i in 0..modes.len() {
        for j in 0..modes.len() {
            let value = matrix[(i, j)];
            if value == 0.0 {
                continue;
            }
            if i == j {
                expr.push(Term::Density {
                    mode: pos[i],
                    value,
                });
            } else {
                expr.push(Term::Hopping {
                    from: pos[i],
                    to: pos[j],
                    value,
                });
            }
        }
    }

    Ok(expr)
}

/// Σᵢ εᵢ nᵢ
pub fn dispersion(eps: &[f64], modes: &[ModeIndex], indices: &IndexSet) -> Result<Expression> {
    if eps.len() != modes.len() {
        return Err(EdkitError::InvalidArgument(format!(
            "{} energies for {} modes",
            eps.len(),
            modes.len()
        )));
    }

    let pos = positions(indices, modes)?;
    let mut expr = Expression::new();
    for (&mode, &value) in pos.iter().zip(eps) {
        if value != 0.0 {
            expr.push(Term::Density { mode, value });
        }
    }

    Ok(expr)
}

/// Σᵢ Uᵢ n↑ᵢ n↓ᵢ
pub fn hubbard_int(
    u: &[f64],
    up: &[ModeIndex],
    dn: &[ModeIndex],
    indices: &IndexSet,
) -> Result<Expression> {
    if u.len() != up.len() || u.len() != dn.len() {
        return Err(EdkitError::InvalidArgument(format!(
            "{} interaction values for {} up / {} down modes",
            u.len(),
            up.len(),
            dn.len()
        )));
    }

    let up = positions(indices, up)?;
    let dn = positions(indices, dn)?;
    let mut expr = Expression::new();
    for ((&a, &b), &value) in up.iter().zip(&dn).zip(u) {
        if value != 0.0 {
            expr.push(Term::Interaction { a, b, value });
        }
    }

    Ok(expr)
}

/// 周期网格上的 Hubbard 团簇
///
/// H = −t Σ⟨ij⟩σ c†ᵢσ cⱼσ − μ Σᵢσ nᵢσ + U Σᵢ nᵢ↑ nᵢ↓
pub fn hubbard_cluster(grid: &Grid2d, t: f64, u: f64, mu: f64) -> Result<(Expression, IndexSet)> {
    let labels = grid.labels();
    let indices = IndexSet::from_sites(&labels);
    let up = indices.with_spin(Spin::Up);
    let dn = indices.with_spin(Spin::Down);

    let hopping = grid.adjacency() * (-t);
    let n = grid.len();

    let mut h = tight_binding(&hopping, &up, &indices)?;
    h.extend(tight_binding(&hopping, &dn, &indices)?);
    h.extend(dispersion(&vec![-mu; n], &up, &indices)?);
    h.extend(dispersion(&vec![-mu; n], &dn, &indices)?);
    h.extend(hubbard_int(&vec![u; n], &up, &dn, &indices)?);

    Ok((h, indices))
}

/// 单格点 Hubbard 原子: U n↑n↓ − μ (n↑ + n↓)
pub fn hubbard_atom(u: f64, mu: f64) -> (Expression, IndexSet) {
    let indices = IndexSet::from_sites(&["0"]);
    let mut h = Expression::new();
    h.push(Term::Interaction { a: 0, b: 1, value: u });
    h.push(Term::Density { mode: 0, value: -mu });
    h.push(Term::Density { mode: 1, value: -mu });
    (h, indices)
}

/// 从格点文件构造哈密顿量
///
/// 每个格点贡献 U n↑n↓ − LocalMu (n↑+n↓)，每条跃迁对两个自旋分别贡献
/// `value · c†_{site,σ} c_{to,σ}`。格点文件中的跃迁通常双向列出。
pub fn from_lattice(lattice: &LatticeFile) -> Result<(Expression, IndexSet)> {
    lattice.validate()?;

    let labels = lattice.site_labels();
    let indices = IndexSet::from_sites(&labels);
    let mut h = Expression::new();

    for (label, site) in &lattice.sites {
        let up = indices.require(&ModeIndex::new(label.as_str(), Spin::Up))?;
        let dn = indices.require(&ModeIndex::new(label.as_str(), Spin::Down))?;

        if site.u != 0.0 {
            h.push(Term::Interaction {
                a: up,
                b: dn,
                value: site.u,
            });
        }
        if site.local_mu != 0.0 {
            h.push(Term::Density {
                mode: up,
                value: -site.local_mu,
            });
            h.push(Term::Density {
                mode: dn,
                value: -site.local_mu,
            });
        }

        for hop in &site.hopping {
            for spin in Spin::BOTH {
                let from = indices.require(&ModeIndex::new(label.as_str(), spin))?;
                let to = indices.require(&ModeIndex::new(hop.to.as_str(), spin))?;
                h.push(Term::Hopping {
                    from,
                    to,
                    value: hop.value,
                });
            }
        }
    }

    Ok((h, indices))
}
