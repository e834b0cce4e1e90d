//! # energy 命令实现
//!
//! 比较半满 Hubbard 原子热平均能量的三种算法。
//!
//! ## 依赖关系
//! - 使用 `cli/energy.rs` 定义的参数
//! - 使用 `ed/thermal.rs`
//! - 使用 `utils/output.rs`，`tabled` 打印表格

use crate::cli::energy::EnergyArgs;
use crate::ed::thermal;
use crate::error::{EdkitError, Result};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 表格行
#[derive(Debug, Clone, Tabled)]
struct EnergyRow {
    #[tabled(rename = "β")]
    beta: String,
    #[tabled(rename = "⟨E⟩ shifted")]
    shifted: String,
    #[tabled(rename = "⟨E⟩ closed form")]
    closed: String,
    #[tabled(rename = "⟨E⟩ ED")]
    ed: String,
    #[tabled(rename = "max |Δ|")]
    deviation: String,
}

/// 单个 β 的计算结果
#[derive(Debug, Clone, Copy)]
struct EnergyComparison {
    beta: f64,
    shifted: f64,
    closed: f64,
    ed: f64,
}

impl EnergyComparison {
    fn compute(beta: f64, u: f64, e0: f64) -> Result<Self> {
        Ok(Self {
            beta,
            shifted: thermal::shifted_average_energy(beta, u, e0),
            closed: thermal::closed_form_energy(beta, u),
            ed: thermal::ed_atom_energy(beta, u)?,
        })
    }

    fn deviation(&self) -> f64 {
        (self.shifted - self.closed)
            .abs()
            .max((self.ed - self.closed).abs())
    }
}

/// 执行 energy 命令
pub fn execute(args: EnergyArgs) -> Result<()> {
    output::print_header("Hubbard Atom Thermal Energy");

    if args.beta.is_empty() {
        return Err(EdkitError::InvalidArgument(
            "At least one inverse temperature is required".to_string(),
        ));
    }

    output::print_info(&format!("U = {}, E0 = {}", args.u, args.e0));
    output::print_info(&format!(
        "Levels: {:?}",
        thermal::atom_levels(args.u)
    ));

    let mut rows = Vec::new();
    let mut worst = 0.0_f64;

    for &beta in &args.beta {
        let cmp = EnergyComparison::compute(beta, args.u, args.e0)?;
        // 平移求和在 β(E − E0) 很大时溢出，偏差为 NaN 时必须保留
        let deviation = cmp.deviation();
        if deviation.is_nan() || deviation > worst {
            worst = deviation;
        }

        rows.push(EnergyRow {
            beta: format!("{}", cmp.beta),
            shifted: format!("{:.12}", cmp.shifted),
            closed: format!("{:.12}", cmp.closed),
            ed: format!("{:.12}", cmp.ed),
            deviation: format!("{:.2e}", deviation),
        });
    }

    println!("{}", Table::new(&rows));

    if worst.is_nan() || worst > args.tolerance {
        return Err(EdkitError::ConsistencyCheck {
            check: "thermal energy methods agree".to_string(),
            deviation: worst,
            tolerance: args.tolerance,
        });
    }

    output::print_done(&format!("All methods agree within {:.1e}", args.tolerance));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_agrees() {
        let cmp = EnergyComparison::compute(5.0, 4.0, 0.0).unwrap();
        assert!(cmp.deviation() < 1e-10);
        assert!((cmp.closed + 2.0 * (10.0_f64).exp() / (1.0 + (10.0_f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_execute_default_grid() {
        let args = EnergyArgs {
            beta: vec![1.0, 5.0, 10.0],
            u: 4.0,
            e0: 0.0,
            tolerance: 1e-8,
        };
        assert!(execute(args).is_ok());
    }

    #[test]
    fn test_execute_rejects_empty_beta() {
        let args = EnergyArgs {
            beta: vec![],
            u: 4.0,
            e0: 0.0,
            tolerance: 1e-8,
        };
        assert!(execute(args).is_err());
    }
}
